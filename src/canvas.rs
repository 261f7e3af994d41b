use crate::color::Color;
use crate::grid::TileCoord;

/// Default edge length of a tile, in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 512;

// ============================================================================
// PIXEL RECT – clipped, non-empty region inside one buffer
// ============================================================================

/// Inclusive-exclusive pixel rectangle `[x, x + w) × [y, y + h)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Clip a signed rectangle against a `size × size` buffer.
    /// Returns `None` when nothing of it lies inside.
    pub fn clipped(x: i32, y: i32, w: u32, h: u32, size: u32) -> Option<Self> {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + w as i64).min(size as i64);
        let y1 = (y as i64 + h as i64).min(size as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Smallest rect covering both.
    pub fn union(self, other: PixelRect) -> PixelRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let r = self.right().max(other.right());
        let b = self.bottom().max(other.bottom());
        PixelRect::new(x, y, r - x, b - y)
    }

    /// Union that tolerates an empty left-hand side.
    pub fn merge(acc: Option<PixelRect>, rect: Option<PixelRect>) -> Option<PixelRect> {
        match (acc, rect) {
            (Some(a), Some(r)) => Some(a.union(r)),
            (a, None) => a,
            (None, r) => r,
        }
    }
}

// ============================================================================
// PIXEL BUFFER – flat packed-color storage of one tile
// ============================================================================

/// Per-tile color storage, independent of any rendering surface.
///
/// Every index in `[0, size²)` always holds a color; a fresh buffer is all
/// [`Color::BLACK`].  Every write is folded into a damage rectangle that the
/// render layer drains with [`PixelBuffer::take_damage`].
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    size: u32,
    data: Vec<Color>,
    damage: Option<PixelRect>,
    generation: u64,
}

impl PixelBuffer {
    // ---- construction -------------------------------------------------------

    /// Create an all-background buffer.
    pub fn new(size: u32) -> Self {
        Self::new_filled(size, Color::BLACK)
    }

    pub fn new_filled(size: u32, color: Color) -> Self {
        let size = size.max(1);
        Self {
            size,
            data: vec![color; size as usize * size as usize],
            damage: None,
            generation: 0,
        }
    }

    // ---- indexing helpers ----------------------------------------------------

    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.size && (y as u32) < self.size
    }

    /// Linear `y * size + x` index, `None` outside the buffer.
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.size as usize + x as usize)
        } else {
            None
        }
    }

    // ---- pixel access -------------------------------------------------------

    /// Read a cell; out-of-range coordinates read as the background color.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color {
        match self.index(x, y) {
            Some(i) => self.data[i],
            None => Color::BLACK,
        }
    }

    /// Write one cell. Out-of-range coordinates are a silent no-op.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color;
            self.mark_damaged(PixelRect::new(x as u32, y as u32, 1, 1));
        }
    }

    /// Bulk write clipped to the buffer. Returns the region actually written.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Option<PixelRect> {
        let rect = PixelRect::clipped(x, y, w, h, self.size)?;
        let stride = self.size as usize;
        for row in rect.y..rect.bottom() {
            let start = row as usize * stride + rect.x as usize;
            self.data[start..start + rect.w as usize].fill(color);
        }
        self.mark_damaged(rect);
        Some(rect)
    }

    /// Fill every cell with `color`.
    pub fn fill(&mut self, color: Color) {
        self.data.fill(color);
        self.mark_damaged(PixelRect::new(0, 0, self.size, self.size));
    }

    /// Row-major view of every cell.
    pub fn as_slice(&self) -> &[Color] {
        &self.data
    }

    /// Raw mutable cells for tight loops (flood fill).  Callers must report
    /// what they touched through [`PixelBuffer::mark_damaged`].
    pub(crate) fn cells_mut(&mut self) -> &mut [Color] {
        &mut self.data
    }

    /// One row of cells.
    pub fn row(&self, y: u32) -> &[Color] {
        let stride = self.size as usize;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Number of cells holding exactly `color`.
    pub fn count(&self, color: Color) -> usize {
        self.data.iter().filter(|&&c| c == color).count()
    }

    // ---- change tracking ----------------------------------------------------

    /// Merge `rect` into the pending damage and bump the write generation.
    pub fn mark_damaged(&mut self, rect: PixelRect) {
        self.damage = Some(match self.damage {
            Some(existing) => existing.union(rect),
            None => rect,
        });
        self.generation = self.generation.wrapping_add(1);
    }

    /// Pending damage without draining it.
    pub fn damage(&self) -> Option<PixelRect> {
        self.damage
    }

    /// Drain the pending damage (what the render layer must redraw).
    pub fn take_damage(&mut self) -> Option<PixelRect> {
        self.damage.take()
    }

    /// Monotonic count of write operations; equal generations mean equal contents.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.data == other.data
    }
}

// ============================================================================
// OVERLAY – transient preview cells drawn above a tile
// ============================================================================

/// Scratch layer for previews such as the rectangle drag outline.
/// Cells are either unset (transparent) or hold a color.
#[derive(Clone, Debug)]
pub struct Overlay {
    size: u32,
    cells: Vec<Option<Color>>,
    dirty: bool,
}

impl Overlay {
    pub fn new(size: u32) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![None; size as usize * size as usize],
            dirty: false,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.size || y as u32 >= self.size {
            return None;
        }
        self.cells[y as usize * self.size as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as u32 >= self.size || y as u32 >= self.size {
            return;
        }
        self.cells[y as usize * self.size as usize + x as usize] = Some(color);
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        if self.dirty {
            self.cells.fill(None);
            self.dirty = false;
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.dirty
    }

    /// Number of set cells.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

// ============================================================================
// TILE
// ============================================================================

/// One square bitmap of the infinite grid.
#[derive(Clone, Debug)]
pub struct Tile {
    coord: TileCoord,
    pixels: PixelBuffer,
    /// Allocated on first preview.
    overlay: Option<Overlay>,
    visible: bool,
}

impl Tile {
    pub fn new(coord: TileCoord, size: u32) -> Self {
        Self {
            coord,
            pixels: PixelBuffer::new(size),
            overlay: None,
            visible: true,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Stable external key, `"x|y"`.
    pub fn id(&self) -> String {
        self.coord.id()
    }

    pub fn size(&self) -> u32 {
        self.pixels.size()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.pixels
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Overlay for drawing, created on demand.
    pub fn overlay_mut(&mut self) -> &mut Overlay {
        let size = self.pixels.size();
        self.overlay.get_or_insert_with(|| Overlay::new(size))
    }

    pub fn clear_overlay(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.clear();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: u32 = 32;

    #[test]
    fn fresh_buffer_reads_background_everywhere() {
        let buf = PixelBuffer::new(S);
        for y in 0..S as i32 {
            for x in 0..S as i32 {
                assert_eq!(buf.get(x, y), Color::BLACK);
            }
        }
        assert_eq!(buf.count(Color::BLACK), (S * S) as usize);
        assert!(buf.damage().is_none());
    }

    #[test]
    fn out_of_range_set_is_a_no_op() {
        let mut buf = PixelBuffer::new(S);
        let before = buf.clone();
        for &(x, y) in &[(-1, 0), (0, -1), (S as i32, 0), (0, S as i32), (-5, -5), (i32::MAX, 3)] {
            buf.set(x, y, Color::RED);
        }
        assert_eq!(buf, before);
        assert!(buf.damage().is_none());
        assert_eq!(buf.generation(), 0);
    }

    #[test]
    fn out_of_range_get_reads_background() {
        let mut buf = PixelBuffer::new_filled(S, Color::WHITE);
        buf.set(0, 0, Color::RED);
        assert_eq!(buf.get(-1, 0), Color::BLACK);
        assert_eq!(buf.get(0, S as i32), Color::BLACK);
        assert_eq!(buf.get(0, 0), Color::RED);
    }

    #[test]
    fn fill_rect_is_clipped_to_bounds() {
        let mut buf = PixelBuffer::new(S);
        let written = buf.fill_rect(-2, S as i32 - 2, 4, 10, Color::GREEN);
        assert_eq!(written, Some(PixelRect::new(0, S - 2, 2, 2)));
        assert_eq!(buf.count(Color::GREEN), 4);
        assert_eq!(buf.get(1, S as i32 - 1), Color::GREEN);
        assert_eq!(buf.get(2, S as i32 - 1), Color::BLACK);
    }

    #[test]
    fn fill_rect_fully_outside_writes_nothing() {
        let mut buf = PixelBuffer::new(S);
        assert_eq!(buf.fill_rect(S as i32, 0, 3, 3, Color::RED), None);
        assert_eq!(buf.fill_rect(-3, -3, 3, 3, Color::RED), None);
        assert_eq!(buf.fill_rect(1, 1, 0, 5, Color::RED), None);
        assert_eq!(buf.count(Color::RED), 0);
    }

    #[test]
    fn damage_accumulates_and_drains() {
        let mut buf = PixelBuffer::new(S);
        buf.set(2, 3, Color::RED);
        buf.fill_rect(10, 10, 2, 2, Color::RED);
        assert_eq!(buf.take_damage(), Some(PixelRect::new(2, 3, 10, 9)));
        assert_eq!(buf.take_damage(), None);
        assert_eq!(buf.generation(), 2);
    }

    #[test]
    fn rect_union_and_clip() {
        let a = PixelRect::new(0, 0, 2, 2);
        let b = PixelRect::new(5, 1, 1, 4);
        assert_eq!(a.union(b), PixelRect::new(0, 0, 6, 5));
        assert_eq!(PixelRect::merge(None, Some(b)), Some(b));
        assert_eq!(PixelRect::merge(Some(a), None), Some(a));
        assert!(PixelRect::clipped(i32::MIN, 0, u32::MAX, 1, 4).is_some());
    }

    #[test]
    fn overlay_is_lazy_and_clearable() {
        let mut tile = Tile::new(TileCoord::new(3, -2), S);
        assert!(tile.overlay().is_none());
        tile.overlay_mut().set(1, 1, Color::RED);
        tile.overlay_mut().set(-1, 1, Color::RED);
        assert_eq!(tile.overlay().map(Overlay::len), Some(1));
        tile.clear_overlay();
        assert!(tile.overlay().is_some_and(Overlay::is_empty));
        assert_eq!(tile.id(), "3|-2");
        // The pixel buffer is untouched by previews.
        assert_eq!(tile.pixels().count(Color::BLACK), (S * S) as usize);
    }
}
