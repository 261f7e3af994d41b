// ============================================================================
// FLOOD FILL — 4-connected, single tile, explicit stack
// ============================================================================

use crate::canvas::{PixelBuffer, PixelRect};
use crate::color::Color;

/// What a fill touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Number of cells recolored.
    pub filled: usize,
    /// Bounding box of the recolored cells.
    pub bounds: Option<PixelRect>,
}

/// Replace the 4-connected region of `buffer.get(x, y)`'s color that contains
/// `(x, y)` with `replacement`.
///
/// Same-color fills and out-of-range seeds leave the buffer untouched,
/// damage and generation included. The fill never leaves `buffer`.
pub fn flood_fill(buffer: &mut PixelBuffer, x: i32, y: i32, replacement: Color) -> FillReport {
    let Some(seed_idx) = buffer.index(x, y) else {
        return FillReport::default();
    };
    let target = buffer.as_slice()[seed_idx];
    if target == replacement {
        return FillReport::default();
    }

    let size = buffer.size();
    let wu = size as usize;
    let cells = buffer.cells_mut();

    let mut min_x = x as u32;
    let mut min_y = y as u32;
    let mut max_x = min_x;
    let mut max_y = min_y;
    let mut filled = 0usize;

    // Recolor on push: a recolored cell no longer matches `target`, so the
    // buffer doubles as the visited set.
    let mut stack: Vec<usize> = Vec::with_capacity(4096);
    cells[seed_idx] = replacement;
    stack.push(seed_idx);

    while let Some(idx) = stack.pop() {
        filled += 1;
        let cx = (idx % wu) as u32;
        let cy = (idx / wu) as u32;
        min_x = min_x.min(cx);
        max_x = max_x.max(cx);
        min_y = min_y.min(cy);
        max_y = max_y.max(cy);

        // Left
        if cx > 0 && cells[idx - 1] == target {
            cells[idx - 1] = replacement;
            stack.push(idx - 1);
        }
        // Right
        if cx + 1 < size && cells[idx + 1] == target {
            cells[idx + 1] = replacement;
            stack.push(idx + 1);
        }
        // Up
        if cy > 0 && cells[idx - wu] == target {
            cells[idx - wu] = replacement;
            stack.push(idx - wu);
        }
        // Down
        if cy + 1 < size && cells[idx + wu] == target {
            cells[idx + wu] = replacement;
            stack.push(idx + wu);
        }
    }

    let bounds = PixelRect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
    buffer.mark_damaged(bounds);
    FillReport {
        filled,
        bounds: Some(bounds),
    }
}
