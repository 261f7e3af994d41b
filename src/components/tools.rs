use std::fmt;
use std::str::FromStr;

use crate::canvas::{PixelRect, Tile};
use crate::color::Color;
use crate::ops::brush::Brush;
use crate::ops::fill::{FillReport, flood_fill};
use crate::ops::shapes;

// ============================================================================
// TOOL – the fixed set of editing tools
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Rectangle,
    FloodFill,
    ColorPicker,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Pencil,
            Tool::Eraser,
            Tool::Rectangle,
            Tool::FloodFill,
            Tool::ColorPicker,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pencil => "pencil",
            Tool::Eraser => "eraser",
            Tool::Rectangle => "rectangle",
            Tool::FloodFill => "fill",
            Tool::ColorPicker => "picker",
        }
    }

    /// Whether a drag keeps the stroke alive after pointer-down.
    /// Fill and picker act once; moving across tiles must not repeat them.
    pub fn keeps_session(self) -> bool {
        matches!(self, Tool::Pencil | Tool::Eraser | Tool::Rectangle)
    }

    /// Color the tool writes with, given the selected color.
    pub fn paint_color(self, current: Color) -> Color {
        match self {
            Tool::Eraser => Color::BLACK,
            _ => current,
        }
    }

    #[inline]
    fn handlers(self) -> &'static ToolHandlers {
        &HANDLERS[self as usize]
    }

    /// Pointer-down on a tile at local pixel `pos`.
    pub fn start(self, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
        (self.handlers().on_start)(self, state, ctx, pos)
    }

    /// Pointer-move while the stroke is active.
    pub fn drag(self, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
        (self.handlers().on_move)(self, state, ctx, pos)
    }

    /// Pointer-up, or hand-off away from this tile.
    pub fn finish(self, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
        (self.handlers().on_end)(self, state, ctx, pos)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pencil" | "brush" => Ok(Tool::Pencil),
            "eraser" => Ok(Tool::Eraser),
            "rectangle" | "rect" => Ok(Tool::Rectangle),
            "fill" | "flood-fill" | "floodfill" => Ok(Tool::FloodFill),
            "picker" | "color-picker" | "colorpicker" => Ok(Tool::ColorPicker),
            other => Err(format!("unknown tool '{}'", other)),
        }
    }
}

// ============================================================================
// STROKE STATE / CONTEXT / OUTCOME
// ============================================================================

/// Per-stroke memory of the active tool on the active tile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolState {
    last_pos: Option<(i32, i32)>,
    drag_start: Option<(i32, i32)>,
}

impl ToolState {
    pub fn last_pos(&self) -> Option<(i32, i32)> {
        self.last_pos
    }

    pub fn drag_start(&self) -> Option<(i32, i32)> {
        self.drag_start
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub tile: &'a mut Tile,
    pub brush: &'a Brush,
    /// Selected color; the picker writes into it.
    pub color: &'a mut Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Nothing changed.
    Idle,
    /// Pixels written, with the region touched.
    Painted(PixelRect),
    /// Overlay redrawn with this many cells.
    Previewed(usize),
    Filled(FillReport),
    /// The selected color became this one.
    Picked(Color),
}

impl ToolOutcome {
    fn painted(rect: Option<PixelRect>) -> Self {
        rect.map_or(ToolOutcome::Idle, ToolOutcome::Painted)
    }

    /// Whether the tile's pixels changed.
    pub fn modified_pixels(&self) -> bool {
        match self {
            ToolOutcome::Painted(_) => true,
            ToolOutcome::Filled(report) => report.filled > 0,
            _ => false,
        }
    }
}

// ============================================================================
// DISPATCH TABLE
// ============================================================================

type Handler = fn(Tool, &mut ToolState, &mut ToolContext<'_>, (i32, i32)) -> ToolOutcome;

/// `{on_start, on_move, on_end}` of one tool.
pub struct ToolHandlers {
    pub on_start: Handler,
    pub on_move: Handler,
    pub on_end: Handler,
}

/// Indexed by `Tool as usize`; order must follow the enum.
static HANDLERS: [ToolHandlers; 5] = [
    // Pencil
    ToolHandlers { on_start: brush_start, on_move: brush_move, on_end: clear_state },
    // Eraser
    ToolHandlers { on_start: brush_start, on_move: brush_move, on_end: clear_state },
    // Rectangle
    ToolHandlers { on_start: rect_start, on_move: rect_move, on_end: rect_end },
    // FloodFill
    ToolHandlers { on_start: fill_start, on_move: idle, on_end: clear_state },
    // ColorPicker
    ToolHandlers { on_start: pick_start, on_move: idle, on_end: clear_state },
];

fn idle(_: Tool, _: &mut ToolState, _: &mut ToolContext<'_>, _: (i32, i32)) -> ToolOutcome {
    ToolOutcome::Idle
}

fn clear_state(_: Tool, state: &mut ToolState, _: &mut ToolContext<'_>, _: (i32, i32)) -> ToolOutcome {
    state.reset();
    ToolOutcome::Idle
}

// ---- pencil / eraser --------------------------------------------------------

fn brush_start(tool: Tool, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
    let color = tool.paint_color(*ctx.color);
    let rect = ctx.brush.stamp(ctx.tile.pixels_mut(), pos.0, pos.1, color);
    state.last_pos = Some(pos);
    ToolOutcome::painted(rect)
}

fn brush_move(tool: Tool, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
    let Some(last) = state.last_pos else {
        return brush_start(tool, state, ctx, pos);
    };
    if last == pos {
        return ToolOutcome::Idle;
    }
    let color = tool.paint_color(*ctx.color);
    let rect = ctx.brush.stroke(ctx.tile.pixels_mut(), last, pos, color);
    state.last_pos = Some(pos);
    ToolOutcome::painted(rect)
}

// ---- rectangle --------------------------------------------------------------

fn rect_start(_: Tool, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
    state.drag_start = Some(pos);
    state.last_pos = Some(pos);
    ctx.tile.clear_overlay();
    ToolOutcome::Idle
}

fn rect_move(_: Tool, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
    let Some(start) = state.drag_start else {
        return ToolOutcome::Idle;
    };
    state.last_pos = Some(pos);
    let color = *ctx.color;
    let drawn = shapes::preview_rectangle(ctx.tile.overlay_mut(), start, pos, color);
    ToolOutcome::Previewed(drawn)
}

fn rect_end(_: Tool, state: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
    let Some(start) = state.drag_start else {
        return ToolOutcome::Idle;
    };
    state.reset();
    ctx.tile.clear_overlay();
    let color = *ctx.color;
    let rect = shapes::draw_rectangle(ctx.tile.pixels_mut(), ctx.brush, start, pos, color);
    ToolOutcome::painted(rect)
}

// ---- fill / picker ----------------------------------------------------------

fn fill_start(_: Tool, _: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
    let color = *ctx.color;
    let report = flood_fill(ctx.tile.pixels_mut(), pos.0, pos.1, color);
    crate::log_info!(
        "Flood fill on tile {} at ({}, {}) with {}: {} cells",
        ctx.tile.coord(),
        pos.0,
        pos.1,
        color,
        report.filled
    );
    ToolOutcome::Filled(report)
}

fn pick_start(_: Tool, _: &mut ToolState, ctx: &mut ToolContext<'_>, pos: (i32, i32)) -> ToolOutcome {
    if !ctx.tile.pixels().in_bounds(pos.0, pos.1) {
        return ToolOutcome::Idle;
    }
    let picked = ctx.tile.pixels().get(pos.0, pos.1);
    *ctx.color = picked;
    ToolOutcome::Picked(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileCoord;

    fn tile() -> Tile {
        Tile::new(TileCoord::ORIGIN, 64)
    }

    #[test]
    fn dispatch_table_follows_enum_order() {
        assert_eq!(Tool::all().len(), HANDLERS.len());
        for (i, tool) in Tool::all().iter().enumerate() {
            assert_eq!(*tool as usize, i);
        }
    }

    #[test]
    fn tool_names_parse() {
        for tool in Tool::all() {
            assert_eq!(tool.label().parse::<Tool>(), Ok(*tool));
        }
        assert_eq!("Flood-Fill".parse::<Tool>(), Ok(Tool::FloodFill));
        assert!("lasso".parse::<Tool>().is_err());
    }

    #[test]
    fn pencil_interpolates_between_moves() {
        let mut tile = tile();
        let brush = Brush::new(1);
        let mut color = Color::RED;
        let mut state = ToolState::default();
        let mut ctx = ToolContext { tile: &mut tile, brush: &brush, color: &mut color };

        Tool::Pencil.start(&mut state, &mut ctx, (5, 5));
        assert_eq!(Tool::Pencil.drag(&mut state, &mut ctx, (5, 5)), ToolOutcome::Idle);
        let outcome = Tool::Pencil.drag(&mut state, &mut ctx, (5, 15));
        assert_eq!(outcome, ToolOutcome::Painted(PixelRect::new(5, 5, 1, 11)));
        Tool::Pencil.finish(&mut state, &mut ctx, (5, 15));
        assert_eq!(state, ToolState::default());

        for y in 5..=15 {
            assert_eq!(tile.pixels().get(5, y), Color::RED);
        }
    }

    #[test]
    fn eraser_paints_background() {
        let mut tile = tile();
        tile.pixels_mut().fill(Color::WHITE);
        let brush = Brush::new(3);
        let mut color = Color::RED;
        let mut state = ToolState::default();
        let mut ctx = ToolContext { tile: &mut tile, brush: &brush, color: &mut color };
        Tool::Eraser.start(&mut state, &mut ctx, (10, 10));
        assert_eq!(tile.pixels().get(10, 10), Color::BLACK);
        assert_eq!(color, Color::RED);
    }

    #[test]
    fn rectangle_previews_then_commits() {
        let mut tile = tile();
        let brush = Brush::new(1);
        let mut color = Color::BLUE;
        let mut state = ToolState::default();
        let mut ctx = ToolContext { tile: &mut tile, brush: &brush, color: &mut color };

        Tool::Rectangle.start(&mut state, &mut ctx, (4, 4));
        let preview = Tool::Rectangle.drag(&mut state, &mut ctx, (9, 8));
        assert!(matches!(preview, ToolOutcome::Previewed(n) if n > 0));
        assert_eq!(ctx.tile.pixels().count(Color::BLUE), 0);

        let done = Tool::Rectangle.finish(&mut state, &mut ctx, (9, 8));
        assert_eq!(done, ToolOutcome::Painted(PixelRect::new(4, 4, 6, 5)));
        assert!(tile.overlay().is_some_and(|o| o.is_empty()));
        assert_eq!(tile.pixels().count(Color::BLUE), 30);
    }

    #[test]
    fn fill_and_picker_act_on_start() {
        let mut tile = tile();
        tile.pixels_mut().set(1, 1, Color::WHITE);
        let brush = Brush::default();
        let mut color = Color::GREEN;
        let mut state = ToolState::default();
        let mut ctx = ToolContext { tile: &mut tile, brush: &brush, color: &mut color };

        let filled = Tool::FloodFill.start(&mut state, &mut ctx, (40, 40));
        assert!(filled.modified_pixels());
        assert_eq!(Tool::FloodFill.drag(&mut state, &mut ctx, (1, 1)), ToolOutcome::Idle);

        assert_eq!(Tool::ColorPicker.start(&mut state, &mut ctx, (1, 1)), ToolOutcome::Picked(Color::WHITE));
        assert_eq!(Tool::ColorPicker.start(&mut state, &mut ctx, (-1, 1)), ToolOutcome::Idle);
        assert_eq!(color, Color::WHITE);
        assert!(!Tool::FloodFill.keeps_session());
        assert!(Tool::Rectangle.keeps_session());
    }
}
