//! Pan/zoom state and the screen ↔ tile ↔ pixel mapping.
//!
//! Tile `(x, y)` is placed on screen at
//! `screen = (x·pitch, −y·pitch)·zoom + pan + viewport/2` with
//! `pitch = tile_size + gap`; the grid's Y axis points up, the screen's down.

use crate::canvas::DEFAULT_TILE_SIZE;
use crate::grid::TileCoord;

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 20.0;
/// Screen-space gap between neighbouring tiles at zoom 1.
pub const GAP_SIZE: u32 = 10;
/// Zoom change per pixel of pinch distance change.
pub const ZOOM_SENSITIVITY: f32 = 0.005;
/// Zoom change per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 0.1;
/// Keyboard pan step per frame.
pub const PAN_SPEED: f32 = 2.0;
/// Largest viewport edge, in screen pixels.
pub const MAX_VIEWPORT: u32 = 16384;

#[inline]
fn clamp_viewport(v: f32) -> f32 {
    v.max(0.0).min(MAX_VIEWPORT as f32)
}

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ScreenRect {
    pub fn contains(&self, sx: f32, sy: f32) -> bool {
        sx >= self.x && sx < self.x + self.w && sy >= self.y && sy < self.y + self.h
    }
}

/// Result of hit-testing a screen point against the grid layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenHit {
    pub tile: TileCoord,
    /// Buffer-local pixel, clamped to `[0, tile_size)`.
    pub local_x: u32,
    pub local_y: u32,
    /// The point lies in the gap to the right of / below `tile`.
    pub in_gap: bool,
}

/// Process-wide view state of one editor: pan, zoom and viewport size.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
    pan_x: f32,
    pan_y: f32,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    viewport_w: f32,
    viewport_h: f32,
    tile_size: u32,
    gap: u32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE, GAP_SIZE, 1280.0, 720.0)
    }
}

impl ViewTransform {
    pub fn new(tile_size: u32, gap: u32, viewport_w: f32, viewport_h: f32) -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            viewport_w: clamp_viewport(viewport_w),
            viewport_h: clamp_viewport(viewport_h),
            tile_size: tile_size.max(1),
            gap,
        }
    }

    /// Override the zoom clamp range (swapped if given backwards).
    pub fn with_zoom_limits(mut self, min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_zoom = min.max(f32::MIN_POSITIVE);
        self.max_zoom = max.max(self.min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    // ---- accessors ----------------------------------------------------------

    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_limits(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.viewport_w, self.viewport_h)
    }

    pub fn set_viewport(&mut self, w: f32, h: f32) {
        self.viewport_w = clamp_viewport(w);
        self.viewport_h = clamp_viewport(h);
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Distance between the origins of two neighbouring tiles, in world units.
    #[inline]
    pub fn pitch(&self) -> f32 {
        (self.tile_size + self.gap) as f32
    }

    /// Back to zoom 1, no pan.
    pub fn reset(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.zoom = 1.0_f32.clamp(self.min_zoom, self.max_zoom);
    }

    // ---- coordinate mapping -------------------------------------------------

    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (
            wx * self.zoom + self.pan_x + self.viewport_w / 2.0,
            wy * self.zoom + self.pan_y + self.viewport_h / 2.0,
        )
    }

    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (sx - self.viewport_w / 2.0 - self.pan_x) / self.zoom,
            (sy - self.viewport_h / 2.0 - self.pan_y) / self.zoom,
        )
    }

    /// World position of a tile's top-left pixel.
    pub fn tile_origin_world(&self, coord: TileCoord) -> (f32, f32) {
        let pitch = self.pitch();
        (coord.x as f32 * pitch, -(coord.y as f32) * pitch)
    }

    /// On-screen rectangle of a tile (`tile_size · zoom` square).
    pub fn tile_screen_rect(&self, coord: TileCoord) -> ScreenRect {
        let (wx, wy) = self.tile_origin_world(coord);
        let (x, y) = self.world_to_screen(wx, wy);
        let side = self.tile_size as f32 * self.zoom;
        ScreenRect { x, y, w: side, h: side }
    }

    /// Which tile slot a screen point falls in, with the clamped local pixel.
    pub fn screen_to_tile(&self, sx: f32, sy: f32) -> ScreenHit {
        let (wx, wy) = self.screen_to_world(sx, sy);
        let pitch = self.pitch();
        let col = (wx / pitch).floor();
        let row = (wy / pitch).floor();
        let local_x = wx - col * pitch;
        let local_y = wy - row * pitch;
        let size = self.tile_size as f32;
        let max = (self.tile_size - 1) as f32;
        ScreenHit {
            tile: TileCoord::new(col as i32, -(row as i32)),
            local_x: local_x.floor().clamp(0.0, max) as u32,
            local_y: local_y.floor().clamp(0.0, max) as u32,
            in_gap: local_x >= size || local_y >= size,
        }
    }

    /// Unclamped local pixel of a screen point relative to `coord`'s buffer.
    ///
    /// Strokes that leave a tile keep producing coordinates outside
    /// `[0, tile_size)`; the buffer clips the writes.
    pub fn screen_to_local(&self, sx: f32, sy: f32, coord: TileCoord) -> (i32, i32) {
        let (wx, wy) = self.screen_to_world(sx, sy);
        let (ox, oy) = self.tile_origin_world(coord);
        ((wx - ox).floor() as i32, (wy - oy).floor() as i32)
    }

    /// Bounding-box test of the tile's screen square against the viewport.
    pub fn is_tile_visible(&self, coord: TileCoord) -> bool {
        let r = self.tile_screen_rect(coord);
        !(r.x + r.w < 0.0 || r.x > self.viewport_w || r.y + r.h < 0.0 || r.y > self.viewport_h)
    }

    // ---- pan / zoom ---------------------------------------------------------

    /// Additive translation in screen pixels.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// Multiply zoom by `1 + delta_factor` (clamped) while keeping the world
    /// point under `(sx, sy)` fixed on screen. Returns whether zoom changed.
    pub fn zoom_at(&mut self, sx: f32, sy: f32, delta_factor: f32) -> bool {
        if !delta_factor.is_finite() || !sx.is_finite() || !sy.is_finite() {
            return false;
        }
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * (1.0 + delta_factor)).clamp(self.min_zoom, self.max_zoom);
        if new_zoom == old_zoom {
            return false;
        }
        let ratio = new_zoom / old_zoom;
        // Measured from the point the pan is applied to (viewport centre),
        // the anchor's offset from the world origin scales by `ratio`.
        let ax = sx - self.viewport_w / 2.0 - self.pan_x;
        let ay = sy - self.viewport_h / 2.0 - self.pan_y;
        self.pan_x -= ax * (ratio - 1.0);
        self.pan_y -= ay * (ratio - 1.0);
        self.zoom = new_zoom;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewTransform {
        ViewTransform::new(512, 10, 800.0, 600.0)
    }

    #[test]
    fn origin_tile_starts_at_viewport_centre() {
        let v = view();
        let r = v.tile_screen_rect(TileCoord::ORIGIN);
        assert_eq!((r.x, r.y, r.w, r.h), (400.0, 300.0, 512.0, 512.0));
        let hit = v.screen_to_tile(400.5, 300.5);
        assert_eq!(hit, ScreenHit { tile: TileCoord::ORIGIN, local_x: 0, local_y: 0, in_gap: false });
    }

    #[test]
    fn upward_tiles_sit_higher_on_screen() {
        let v = view();
        let up = v.tile_screen_rect(TileCoord::new(0, 1));
        assert_eq!(up.y, 300.0 - 522.0);
        let hit = v.screen_to_tile(410.5, 300.0 - 522.0 + 20.5);
        assert_eq!(hit.tile, TileCoord::new(0, 1));
        assert_eq!((hit.local_x, hit.local_y), (10, 20));

        let left = v.screen_to_tile(399.5, 310.5);
        assert_eq!(left.tile, TileCoord::new(-1, 0));
        assert!(left.in_gap);
        assert_eq!(left.local_x, 511);
    }

    #[test]
    fn local_coordinates_are_unclamped_against_a_given_tile() {
        let v = view();
        assert_eq!(v.screen_to_local(395.5, 290.5, TileCoord::ORIGIN), (-5, -10));
        assert_eq!(v.screen_to_local(400.5 + 600.0, 301.5, TileCoord::ORIGIN), (600, 1));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut v = view();
        for _ in 0..200 {
            v.zoom_at(10.0, 10.0, 0.5);
        }
        assert_eq!(v.zoom(), MAX_ZOOM);
        assert!(!v.zoom_at(10.0, 10.0, 0.5));
        for _ in 0..200 {
            v.zoom_at(10.0, 10.0, -0.5);
        }
        assert_eq!(v.zoom(), MIN_ZOOM);
        v.zoom_at(10.0, 10.0, -5.0);
        assert_eq!(v.zoom(), MIN_ZOOM);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut v = view();
        v.pan_by(-137.0, 42.0);
        let anchors = [(500.5, 400.5), (123.5, 77.5), (790.5, 10.5)];
        for &(sx, sy) in &anchors {
            for &delta in &[0.1, -0.1, 0.35, -0.2, 1.5] {
                let before = v.screen_to_tile(sx, sy);
                let (wx0, wy0) = v.screen_to_world(sx, sy);
                v.zoom_at(sx, sy, delta);
                let (wx1, wy1) = v.screen_to_world(sx, sy);
                assert!((wx0 - wx1).abs() < 0.05 && (wy0 - wy1).abs() < 0.05);
                assert_eq!(v.screen_to_tile(sx, sy).tile, before.tile);
                let after = v.screen_to_tile(sx, sy);
                assert!((after.local_x as i64 - before.local_x as i64).abs() <= 1);
                assert!((after.local_y as i64 - before.local_y as i64).abs() <= 1);
            }
        }
    }

    #[test]
    fn visibility_culls_offscreen_tiles() {
        let mut v = view();
        assert!(v.is_tile_visible(TileCoord::ORIGIN));
        assert!(v.is_tile_visible(TileCoord::new(-1, 0)));
        assert!(!v.is_tile_visible(TileCoord::new(2, 0)));
        assert!(!v.is_tile_visible(TileCoord::new(0, -2)));
        v.pan_by(-1044.0, 0.0);
        assert!(v.is_tile_visible(TileCoord::new(2, 0)));
        assert!(!v.is_tile_visible(TileCoord::new(-1, 0)));
    }

    #[test]
    fn zoom_limits_can_be_overridden() {
        let v = ViewTransform::new(64, 0, 100.0, 100.0).with_zoom_limits(4.0, 0.5);
        assert_eq!(v.zoom_limits(), (0.5, 4.0));
        assert_eq!(v.pitch(), 64.0);
    }

    #[test]
    fn viewport_size_is_bounded() {
        let mut v = ViewTransform::new(64, 0, 1e9, -5.0);
        assert_eq!(v.viewport(), (MAX_VIEWPORT as f32, 0.0));
        v.set_viewport(f32::NAN, 70_000.0);
        assert_eq!(v.viewport(), (0.0, MAX_VIEWPORT as f32));
    }
}
