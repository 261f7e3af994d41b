// ============================================================================
// RECTANGLE TOOL GEOMETRY — committed fill and dashed drag preview
// ============================================================================

use crate::canvas::{Overlay, PixelBuffer, PixelRect};
use crate::color::Color;
use crate::ops::brush::Brush;

/// Dash pattern of the drag preview: `DASH_ON` cells drawn, `DASH_OFF` skipped.
pub const DASH_ON: i64 = 4;
pub const DASH_OFF: i64 = 2;

/// Corner pair → `(x0, y0, x1, y1)` with `x0 <= x1`, `y0 <= y1` (inclusive).
pub fn normalize(a: (i32, i32), b: (i32, i32)) -> (i32, i32, i32, i32) {
    (a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
}

/// Intersect the inclusive span `[lo, hi]` with `[0, size)`.
fn clip_span(lo: i64, hi: i64, size: u32) -> Option<(i64, i64)> {
    let lo = lo.max(0);
    let hi = hi.min(size as i64 - 1);
    (lo <= hi).then_some((lo, hi))
}

/// Commit a rectangle dragged from `a` to `b`: every cell of the inclusive
/// rectangle receives a brush stamp.
///
/// Stamping the interior adds nothing beyond the interior itself plus the
/// stamps of the perimeter (disk membership only shrinks with distance from
/// the stamp centre), so that is what gets written: one `fill_rect` and a
/// stamp per perimeter cell that can still reach the buffer.
pub fn draw_rectangle(
    buffer: &mut PixelBuffer,
    brush: &Brush,
    a: (i32, i32),
    b: (i32, i32),
    color: Color,
) -> Option<PixelRect> {
    let (x0, y0, x1, y1) = normalize(a, b);
    let w = (x1 as i64 - x0 as i64 + 1) as u32;
    let h = (y1 as i64 - y0 as i64 + 1) as u32;
    let mut written = buffer.fill_rect(x0, y0, w, h, color);

    // Stamps further than one diameter outside the buffer cannot reach it.
    let reach = brush.diameter() as i64;
    let size = buffer.size() as i64;
    let xs = (x0 as i64).max(-reach)..=(x1 as i64).min(size + reach);
    let ys = (y0 as i64).max(-reach)..=(y1 as i64).min(size + reach);

    let rows = if y0 == y1 { vec![y0] } else { vec![y0, y1] };
    for y in rows {
        if !(-reach..=size + reach).contains(&(y as i64)) {
            continue;
        }
        for x in xs.clone() {
            written = PixelRect::merge(written, brush.stamp(buffer, x as i32, y, color));
        }
    }
    let cols = if x0 == x1 { vec![x0] } else { vec![x0, x1] };
    for x in cols {
        if !(-reach..=size + reach).contains(&(x as i64)) {
            continue;
        }
        for y in ys.clone() {
            written = PixelRect::merge(written, brush.stamp(buffer, x, y as i32, color));
        }
    }
    written
}

/// Redraw the one-pixel dashed outline of the rectangle `a`–`b` into
/// `overlay`, replacing whatever preview was there. Returns the number of
/// cells drawn.
///
/// The dash phase runs clockwise from the top-left corner, so it stays put
/// while only the opposite corner moves.
pub fn preview_rectangle(overlay: &mut Overlay, a: (i32, i32), b: (i32, i32), color: Color) -> usize {
    overlay.clear();
    let (x0, y0, x1, y1) = normalize(a, b);
    let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
    let w = x1 - x0 + 1;
    let h = y1 - y0 + 1;
    let size = overlay.size();
    let mut drawn = 0;

    let mut plot = |overlay: &mut Overlay, x: i64, y: i64, k: i64| {
        if k.rem_euclid(DASH_ON + DASH_OFF) < DASH_ON {
            overlay.set(x as i32, y as i32, color);
            drawn += 1;
        }
    };

    // Top, left to right.
    if (0..size as i64).contains(&y0)
        && let Some((lo, hi)) = clip_span(x0, x1, size)
    {
        for x in lo..=hi {
            plot(overlay, x, y0, x - x0);
        }
    }
    // Right, top to bottom.
    if (0..size as i64).contains(&x1)
        && let Some((lo, hi)) = clip_span(y0 + 1, y1, size)
    {
        for y in lo..=hi {
            plot(overlay, x1, y, w + (y - y0 - 1));
        }
    }
    // Bottom, right to left.
    if y1 != y0
        && (0..size as i64).contains(&y1)
        && let Some((lo, hi)) = clip_span(x0, x1 - 1, size)
    {
        for x in lo..=hi {
            plot(overlay, x, y1, w + (h - 1) + (x1 - 1 - x));
        }
    }
    // Left, bottom to top.
    if x1 != x0
        && (0..size as i64).contains(&x0)
        && let Some((lo, hi)) = clip_span(y0 + 1, y1 - 1, size)
    {
        for y in lo..=hi {
            plot(overlay, x0, y, w + (h - 1) + (w - 1) + (y1 - 1 - y));
        }
    }

    drawn
}
