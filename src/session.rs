use std::collections::HashMap;

use uuid::Uuid;

use crate::color::Color;
use crate::components::colors::Palette;
use crate::components::tools::{Tool, ToolContext, ToolOutcome, ToolState};
use crate::grid::{Creation, Direction, TileCoord, TileGrid};
use crate::ops::brush::Brush;
use crate::settings::{EditorSettings, MAX_BRUSH_SIZE};
use crate::view::ViewTransform;

// ============================================================================
// INPUT EVENTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Normalized pointer event in viewport pixels.
///
/// `target` is the tile the input layer saw under the pointer, if it knows;
/// otherwise the session hit-tests the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub sx: f32,
    pub sy: f32,
    pub target: Option<TileCoord>,
}

impl PointerEvent {
    pub fn down(sx: f32, sy: f32) -> Self {
        Self { kind: PointerKind::Down, sx, sy, target: None }
    }

    pub fn moved(sx: f32, sy: f32) -> Self {
        Self { kind: PointerKind::Move, sx, sy, target: None }
    }

    pub fn up(sx: f32, sy: f32) -> Self {
        Self { kind: PointerKind::Up, sx, sy, target: None }
    }

    pub fn on(mut self, target: TileCoord) -> Self {
        self.target = Some(target);
        self
    }
}

/// Keys held during one keyboard-pan frame (W/↑, S/↓, A/←, D/→).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The one live stroke: which tool, on which tile, with what memory.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeSession {
    pub tool: Tool,
    pub tile: TileCoord,
    pub state: ToolState,
}

#[derive(Clone, Copy, Debug)]
struct PinchState {
    center: (f32, f32),
    distance: f32,
}

#[derive(Clone, Copy)]
enum Phase {
    Start,
    Move,
    End,
}

/// Tile outcomes of one pointer event (a hand-off yields several).
pub type PointerOutcomes = Vec<(TileCoord, ToolOutcome)>;

// ============================================================================
// EDITOR SESSION
// ============================================================================

/// One editor instance: the grid, the view and every bit of input state.
pub struct EditorSession {
    id: Uuid,
    settings: EditorSettings,
    grid: TileGrid,
    view: ViewTransform,
    tool: Tool,
    color: Color,
    brush: Brush,
    palette: Palette,
    stroke: Option<StrokeSession>,
    /// Last screen point of an active pan drag.
    pan_drag: Option<(f32, f32)>,
    space_held: bool,
    pinch: Option<PinchState>,
    /// Visibility flips not yet collected by the render layer, one entry per
    /// tile holding its latest state.
    visibility_changes: Vec<(TileCoord, bool)>,
    /// `TileCoord::key` → slot in `visibility_changes`.
    visibility_slots: HashMap<u64, usize>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorSession {
    pub fn new(settings: EditorSettings) -> Self {
        let settings = settings.validated();
        let view = ViewTransform::new(
            settings.tile_size,
            settings.gap_size,
            settings.viewport_width as f32,
            settings.viewport_height as f32,
        )
        .with_zoom_limits(settings.min_zoom, settings.max_zoom);
        let mut session = Self {
            id: Uuid::new_v4(),
            grid: TileGrid::new(settings.tile_size),
            view,
            tool: Tool::default(),
            color: settings.default_color,
            brush: Brush::new(settings.brush_size),
            palette: Palette::new(),
            stroke: None,
            pan_drag: None,
            space_held: false,
            pinch: None,
            visibility_changes: Vec::new(),
            visibility_slots: HashMap::new(),
            settings,
        };
        session.refresh_visibility();
        session.take_visibility_changes();
        crate::log_info!(
            "Editor session {} started: tile {}px, gap {}px, viewport {}x{}",
            session.id,
            session.settings.tile_size,
            session.settings.gap_size,
            session.settings.viewport_width,
            session.settings.viewport_height
        );
        session
    }

    // ---- accessors ----------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn stroke(&self) -> Option<&StrokeSession> {
        self.stroke.as_ref()
    }

    /// Tile of the live stroke.
    pub fn active_tile(&self) -> Option<TileCoord> {
        self.stroke.as_ref().map(|s| s.tile)
    }

    /// Space held, pan drag or pinch in progress.
    pub fn drawing_disabled(&self) -> bool {
        self.space_held || self.pan_drag.is_some() || self.pinch.is_some()
    }

    // ---- tool / color / brush -----------------------------------------------

    /// Switch tools. Any live stroke is dropped without committing and every
    /// preview overlay is cleared.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.stroke.take().is_some() {
            crate::log_info!("Stroke cancelled by switching to {}", tool);
        }
        for tile in self.grid.tiles_mut() {
            tile.clear_overlay();
        }
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.palette.sync_selection(color);
    }

    /// Make a palette swatch the current color.
    pub fn select_swatch(&mut self, index: usize) -> Option<Color> {
        let color = self.palette.select(index)?;
        self.color = color;
        Some(color)
    }

    /// Clamped to `[1, MAX_BRUSH_SIZE]`.
    pub fn set_brush_size(&mut self, diameter: u32) {
        self.brush.set_diameter(diameter.clamp(1, MAX_BRUSH_SIZE));
    }

    /// Add `(name, argb)` materials to the palette.
    pub fn load_materials<'a, I>(&mut self, materials: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let added = self.palette.load_materials(materials);
        self.palette.sync_selection(self.color);
        added
    }

    // ---- pointer ------------------------------------------------------------

    /// Feed one pointer event through the active tool.
    ///
    /// While space is held a pointer drag pans the view instead of drawing.
    /// A move that crosses onto another existing tile ends the stroke on the
    /// old tile and starts it on the new one before the move is applied.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcomes {
        if !event.sx.is_finite() || !event.sy.is_finite() {
            return Vec::new();
        }
        if self.space_held {
            match event.kind {
                PointerKind::Down => self.begin_pan(event.sx, event.sy),
                PointerKind::Move => self.drag_pan(event.sx, event.sy),
                PointerKind::Up => self.end_pan(),
            }
            return Vec::new();
        }
        if self.drawing_disabled() {
            return Vec::new();
        }
        match event.kind {
            PointerKind::Down => self.pointer_down(event),
            PointerKind::Move => self.pointer_move(event),
            PointerKind::Up => self.pointer_up(event),
        }
    }

    /// Tile under the event, restricted to tiles that exist.
    fn resolve_target(&self, event: &PointerEvent) -> Option<TileCoord> {
        let coord = match event.target {
            Some(coord) => coord,
            None => {
                let hit = self.view.screen_to_tile(event.sx, event.sy);
                if hit.in_gap {
                    return None;
                }
                hit.tile
            }
        };
        self.grid.contains(coord).then_some(coord)
    }

    fn pointer_down(&mut self, event: PointerEvent) -> PointerOutcomes {
        let mut outcomes = Vec::new();
        // A missed pointer-up: close the old stroke first.
        if let Some(stroke) = self.stroke.take() {
            outcomes.push(self.end_stroke(stroke, &event));
        }
        let Some(coord) = self.resolve_target(&event) else {
            return outcomes;
        };
        let tool = self.tool;
        let mut state = ToolState::default();
        let pos = self.view.screen_to_local(event.sx, event.sy, coord);
        let outcome = self.dispatch(tool, coord, Phase::Start, &mut state, pos);
        outcomes.push((coord, outcome));
        if tool.keeps_session() {
            self.stroke = Some(StrokeSession { tool, tile: coord, state });
        }
        outcomes
    }

    fn pointer_move(&mut self, event: PointerEvent) -> PointerOutcomes {
        let Some(mut stroke) = self.stroke.take() else {
            return Vec::new();
        };
        let mut outcomes = Vec::new();
        if let Some(hovered) = self.resolve_target(&event)
            && hovered != stroke.tile
        {
            crate::log_info!(
                "Stroke hand-off from tile {} to tile {}",
                stroke.tile,
                hovered
            );
            let ended = self.end_stroke(stroke.clone(), &event);
            outcomes.push(ended);
            stroke.tile = hovered;
            stroke.state = ToolState::default();
            let pos = self.view.screen_to_local(event.sx, event.sy, hovered);
            let started = self.dispatch(stroke.tool, hovered, Phase::Start, &mut stroke.state, pos);
            outcomes.push((hovered, started));
        }
        let pos = self.view.screen_to_local(event.sx, event.sy, stroke.tile);
        let moved = self.dispatch(stroke.tool, stroke.tile, Phase::Move, &mut stroke.state, pos);
        outcomes.push((stroke.tile, moved));
        self.stroke = Some(stroke);
        outcomes
    }

    fn pointer_up(&mut self, event: PointerEvent) -> PointerOutcomes {
        match self.stroke.take() {
            Some(stroke) => vec![self.end_stroke(stroke, &event)],
            None => Vec::new(),
        }
    }

    fn end_stroke(&mut self, mut stroke: StrokeSession, event: &PointerEvent) -> (TileCoord, ToolOutcome) {
        let pos = self.view.screen_to_local(event.sx, event.sy, stroke.tile);
        let outcome = self.dispatch(stroke.tool, stroke.tile, Phase::End, &mut stroke.state, pos);
        (stroke.tile, outcome)
    }

    fn dispatch(
        &mut self,
        tool: Tool,
        coord: TileCoord,
        phase: Phase,
        state: &mut ToolState,
        pos: (i32, i32),
    ) -> ToolOutcome {
        let Some(tile) = self.grid.get_mut(coord) else {
            return ToolOutcome::Idle;
        };
        let mut ctx = ToolContext {
            tile,
            brush: &self.brush,
            color: &mut self.color,
        };
        let outcome = match phase {
            Phase::Start => tool.start(state, &mut ctx, pos),
            Phase::Move => tool.drag(state, &mut ctx, pos),
            Phase::End => tool.finish(state, &mut ctx, pos),
        };
        if let ToolOutcome::Picked(color) = outcome {
            self.palette.sync_selection(color);
        }
        outcome
    }

    // ---- pan / zoom -----------------------------------------------------------

    /// Start a pan drag (middle button, or space + primary button).
    /// A live stroke is ended where it stands.
    pub fn begin_pan(&mut self, sx: f32, sy: f32) {
        if let Some(stroke) = self.stroke.take() {
            let event = PointerEvent::up(sx, sy);
            self.end_stroke(stroke, &event);
        }
        self.pan_drag = Some((sx, sy));
    }

    pub fn drag_pan(&mut self, sx: f32, sy: f32) {
        let Some((lx, ly)) = self.pan_drag else { return };
        self.pan_drag = Some((sx, sy));
        self.pan_by(sx - lx, sy - ly);
    }

    pub fn end_pan(&mut self) {
        self.pan_drag = None;
    }

    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
        if !held {
            self.pan_drag = None;
        }
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.view.pan_by(dx, dy);
        self.refresh_visibility();
    }

    /// One frame of keyboard panning at `pan_speed`. Returns whether it moved.
    pub fn keyboard_pan(&mut self, keys: PanKeys) -> bool {
        let step = self.settings.pan_speed;
        let mut dx = 0.0;
        let mut dy = 0.0;
        if keys.up {
            dy += step;
        }
        if keys.down {
            dy -= step;
        }
        if keys.left {
            dx += step;
        }
        if keys.right {
            dx -= step;
        }
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.pan_by(dx, dy);
        true
    }

    /// Mouse wheel at `(sx, sy)`: scrolling up (`delta_y < 0`) zooms in one step.
    pub fn wheel(&mut self, sx: f32, sy: f32, delta_y: f32) -> bool {
        let direction = if delta_y < 0.0 { 1.0 } else { -1.0 };
        self.zoom_at(sx, sy, direction * self.settings.wheel_zoom_step)
    }

    /// Anchored zoom by `1 + delta_factor`.
    pub fn zoom_at(&mut self, sx: f32, sy: f32, delta_factor: f32) -> bool {
        let changed = self.view.zoom_at(sx, sy, delta_factor);
        if changed {
            self.refresh_visibility();
        }
        changed
    }

    /// Two-finger gesture frame: pan by the centre's motion, then zoom around
    /// the centre by the change in finger distance.
    pub fn pinch(&mut self, center: (f32, f32), distance: f32) {
        if !distance.is_finite() || !center.0.is_finite() || !center.1.is_finite() {
            return;
        }
        let Some(last) = self.pinch else {
            if let Some(stroke) = self.stroke.take() {
                let event = PointerEvent::up(center.0, center.1);
                self.end_stroke(stroke, &event);
            }
            self.pinch = Some(PinchState { center, distance });
            return;
        };
        self.view.pan_by(center.0 - last.center.0, center.1 - last.center.1);
        let change = distance - last.distance;
        self.view
            .zoom_at(center.0, center.1, change * self.settings.zoom_sensitivity);
        self.pinch = Some(PinchState { center, distance });
        self.refresh_visibility();
    }

    /// Fewer than two fingers remain.
    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.view.set_viewport(width, height);
        self.refresh_visibility();
    }

    // ---- grid -----------------------------------------------------------------

    /// Expansion arrow clicked on `from`.
    pub fn add_neighbor(&mut self, from: TileCoord, direction: Direction) -> Option<(TileCoord, Creation)> {
        let result = self.grid.add_neighbor(from, direction)?;
        self.refresh_visibility();
        Some(result)
    }

    /// Recompute every tile's `visible` flag; flips are queued for
    /// [`EditorSession::take_visibility_changes`], a tile that flips again
    /// before the queue is drained keeps its first slot with the new state.
    /// Returns how many flipped.
    pub fn refresh_visibility(&mut self) -> usize {
        let view = &self.view;
        let mut flipped = 0;
        for coord in self.grid.coords().collect::<Vec<_>>() {
            let visible = view.is_tile_visible(coord);
            if let Some(tile) = self.grid.get_mut(coord)
                && tile.is_visible() != visible
            {
                tile.set_visible(visible);
                match self.visibility_slots.get(&coord.key()) {
                    Some(&slot) => self.visibility_changes[slot].1 = visible,
                    None => {
                        self.visibility_slots.insert(coord.key(), self.visibility_changes.len());
                        self.visibility_changes.push((coord, visible));
                    }
                }
                flipped += 1;
            }
        }
        flipped
    }

    /// Drain queued `(tile, now_visible)` flips, ordered by each tile's first
    /// flip since the last drain.
    pub fn take_visibility_changes(&mut self) -> Vec<(TileCoord, bool)> {
        self.visibility_slots.clear();
        std::mem::take(&mut self.visibility_changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> EditorSession {
        let settings = EditorSettings {
            tile_size: 32,
            gap_size: 4,
            viewport_width: 200,
            viewport_height: 200,
            brush_size: 1,
            ..EditorSettings::default()
        };
        EditorSession::new(settings)
    }

    /// Screen point of local pixel `(x, y)` on `coord` at zoom 1, no pan.
    fn screen_of(session: &EditorSession, coord: TileCoord, x: i32, y: i32) -> (f32, f32) {
        let r = session.view().tile_screen_rect(coord);
        (r.x + x as f32 + 0.5, r.y + y as f32 + 0.5)
    }

    #[test]
    fn pencil_stroke_paints_active_tile() {
        let mut s = small();
        let (x0, y0) = screen_of(&s, TileCoord::ORIGIN, 2, 2);
        let (x1, y1) = screen_of(&s, TileCoord::ORIGIN, 2, 9);
        s.handle_pointer(PointerEvent::down(x0, y0));
        assert_eq!(s.active_tile(), Some(TileCoord::ORIGIN));
        s.handle_pointer(PointerEvent::moved(x1, y1));
        s.handle_pointer(PointerEvent::up(x1, y1));
        assert!(s.stroke().is_none());
        let px = s.grid().get(TileCoord::ORIGIN).unwrap().pixels();
        for y in 2..=9 {
            assert_eq!(px.get(2, y), Color::RED);
        }
    }

    #[test]
    fn moving_onto_another_tile_hands_off_the_stroke() {
        let mut s = small();
        s.add_neighbor(TileCoord::ORIGIN, Direction::Right);
        let right = TileCoord::new(1, 0);
        let (x0, y0) = screen_of(&s, TileCoord::ORIGIN, 30, 5);
        let (x1, y1) = screen_of(&s, right, 1, 5);

        s.handle_pointer(PointerEvent::down(x0, y0));
        let outcomes = s.handle_pointer(PointerEvent::moved(x1, y1));
        let tiles: Vec<TileCoord> = outcomes.iter().map(|(c, _)| *c).collect();
        assert_eq!(tiles, vec![TileCoord::ORIGIN, right, right]);
        assert_eq!(s.active_tile(), Some(right));
        assert_eq!(s.grid().get(right).unwrap().pixels().get(1, 5), Color::RED);

        s.handle_pointer(PointerEvent::up(x1, y1));
        assert_eq!(s.active_tile(), None);
    }

    #[test]
    fn pointer_in_gap_or_empty_slot_starts_nothing() {
        let mut s = small();
        let r = s.view().tile_screen_rect(TileCoord::ORIGIN);
        // Inside the 4px gap right of the origin tile.
        let out = s.handle_pointer(PointerEvent::down(r.x + 33.0, r.y + 5.0));
        assert!(out.is_empty());
        // Slot of a tile that was never created.
        let out = s.handle_pointer(PointerEvent::down(r.x + 40.0, r.y + 5.0));
        assert!(out.is_empty());
        assert!(s.stroke().is_none());
    }

    #[test]
    fn space_turns_pointer_drags_into_pans() {
        let mut s = small();
        s.set_space_held(true);
        s.handle_pointer(PointerEvent::down(50.0, 50.0));
        s.handle_pointer(PointerEvent::moved(60.0, 45.0));
        s.handle_pointer(PointerEvent::up(60.0, 45.0));
        assert_eq!(s.view().pan(), (10.0, -5.0));
        assert!(s.stroke().is_none());
        let px = s.grid().get(TileCoord::ORIGIN).unwrap().pixels();
        assert_eq!(px.count(Color::BLACK), 32 * 32);
    }

    #[test]
    fn pan_drag_disables_drawing() {
        let mut s = small();
        s.begin_pan(0.0, 0.0);
        let (x, y) = screen_of(&s, TileCoord::ORIGIN, 1, 1);
        assert!(s.handle_pointer(PointerEvent::down(x, y)).is_empty());
        s.end_pan();
        assert!(!s.handle_pointer(PointerEvent::down(x, y)).is_empty());
    }

    #[test]
    fn tool_switch_drops_stroke_and_previews() {
        let mut s = small();
        s.set_tool(Tool::Rectangle);
        let (x0, y0) = screen_of(&s, TileCoord::ORIGIN, 2, 2);
        let (x1, y1) = screen_of(&s, TileCoord::ORIGIN, 10, 10);
        s.handle_pointer(PointerEvent::down(x0, y0));
        s.handle_pointer(PointerEvent::moved(x1, y1));
        assert!(s.grid().get(TileCoord::ORIGIN).unwrap().overlay().is_some_and(|o| !o.is_empty()));

        s.set_tool(Tool::Pencil);
        assert!(s.stroke().is_none());
        let tile = s.grid().get(TileCoord::ORIGIN).unwrap();
        assert!(tile.overlay().is_some_and(|o| o.is_empty()));
        assert_eq!(tile.pixels().count(Color::RED), 0);
    }

    #[test]
    fn picker_updates_color_and_palette() {
        let mut s = small();
        s.load_materials([("grass", "ff00FF00"), ("rock", "ff808080")]);
        s.grid_mut()
            .get_mut(TileCoord::ORIGIN)
            .unwrap()
            .pixels_mut()
            .set(3, 3, Color::GREEN);
        s.set_tool(Tool::ColorPicker);
        let (x, y) = screen_of(&s, TileCoord::ORIGIN, 3, 3);
        s.handle_pointer(PointerEvent::down(x, y));
        assert_eq!(s.color(), Color::GREEN);
        assert_eq!(s.palette().selected().map(|w| w.name.as_str()), Some("grass"));
        assert!(s.stroke().is_none());
    }

    #[test]
    fn wheel_zooms_in_on_scroll_up() {
        let mut s = small();
        assert!(s.wheel(100.0, 100.0, -120.0));
        assert!((s.view().zoom() - 1.1).abs() < 1e-6);
        assert!(s.wheel(100.0, 100.0, 120.0));
        assert!((s.view().zoom() - 0.99).abs() < 1e-6);
    }

    #[test]
    fn keyboard_pan_directions() {
        let mut s = small();
        assert!(!s.keyboard_pan(PanKeys::default()));
        s.keyboard_pan(PanKeys { up: true, ..PanKeys::default() });
        assert_eq!(s.view().pan(), (0.0, 2.0));
        s.keyboard_pan(PanKeys { left: true, ..PanKeys::default() });
        assert_eq!(s.view().pan(), (2.0, 2.0));
        s.keyboard_pan(PanKeys { down: true, right: true, ..PanKeys::default() });
        assert_eq!(s.view().pan(), (0.0, 0.0));
    }

    #[test]
    fn pinch_pans_with_centre_and_zooms_with_spread() {
        let mut s = small();
        s.pinch((100.0, 100.0), 50.0);
        assert_eq!(s.view().zoom(), 1.0);
        s.pinch((110.0, 100.0), 50.0);
        assert_eq!(s.view().pan(), (10.0, 0.0));
        s.pinch((110.0, 100.0), 70.0);
        assert!((s.view().zoom() - 1.1).abs() < 1e-6);
        s.end_pinch();
        assert!(!s.drawing_disabled());
    }

    #[test]
    fn visibility_flips_are_queued() {
        let mut s = small();
        s.add_neighbor(TileCoord::ORIGIN, Direction::Left);
        s.take_visibility_changes();
        // Push everything off the right edge.
        s.pan_by(1000.0, 0.0);
        let mut flips = s.take_visibility_changes();
        flips.sort_by_key(|(c, _)| c.x);
        assert_eq!(flips, vec![(TileCoord::new(-1, 0), false), (TileCoord::ORIGIN, false)]);
        assert!(s.take_visibility_changes().is_empty());
        s.pan_by(-1000.0, 0.0);
        assert_eq!(s.take_visibility_changes().len(), 2);
    }

    #[test]
    fn repeated_flips_keep_one_entry_per_tile() {
        let mut s = EditorSession::default();
        s.add_neighbor(TileCoord::ORIGIN, Direction::Right);
        s.take_visibility_changes();
        for _ in 0..1000 {
            s.pan_by(5000.0, 0.0);
            s.pan_by(-5000.0, 0.0);
        }
        s.pan_by(5000.0, 0.0);
        let flips = s.take_visibility_changes();
        assert_eq!(flips.len(), 2);
        assert!(flips.iter().all(|(_, visible)| !visible));

        s.pan_by(-5000.0, 0.0);
        assert_eq!(
            s.take_visibility_changes(),
            vec![(TileCoord::ORIGIN, true), (TileCoord::new(1, 0), true)]
        );
    }

    #[test]
    fn brush_size_is_clamped() {
        let mut s = small();
        s.set_brush_size(0);
        assert_eq!(s.brush().diameter(), 1);
        s.set_brush_size(10_000);
        assert_eq!(s.brush().diameter(), MAX_BRUSH_SIZE);
    }
}
