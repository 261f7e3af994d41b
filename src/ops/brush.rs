// ============================================================================
// BRUSH RASTERIZER — disk stamps built from greedy squares
// ============================================================================

use crate::canvas::{PixelBuffer, PixelRect};
use crate::color::Color;

/// One square of a rasterized brush, relative to the stamp's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StampSquare {
    pub dx: u32,
    pub dy: u32,
    pub side: u32,
}

/// `radius = d/2`, `center = radius − 0.5` (both in cell units of the d×d box).
#[inline]
fn disk_geometry(diameter: u32) -> (f64, f64) {
    let radius = diameter.max(1) as f64 / 2.0;
    (radius, radius - 0.5)
}

/// Reference membership test: is cell `(ox, oy)` of the `d × d` brush box
/// inside the disk?
pub fn disk_contains(diameter: u32, ox: u32, oy: u32) -> bool {
    let d = diameter.max(1);
    if ox >= d || oy >= d {
        return false;
    }
    let (radius, center) = disk_geometry(d);
    (ox as f64 - center).hypot(oy as f64 - center) < radius
}

/// Cover the disk of diameter `d` with as few squares as the greedy scan finds.
///
/// Row by row, every inside cell not yet covered seeds a square that grows
/// while it fits the box, the seed distance plus growth stays under the
/// radius, and all four corners remain inside the disk.  The disk is convex,
/// so corner membership implies every cell of the square is inside: the
/// union of the squares is exactly the set [`disk_contains`] accepts.
pub fn rasterize_disk(diameter: u32) -> Vec<StampSquare> {
    let d = diameter.max(1);
    let du = d as usize;
    let (radius, center) = disk_geometry(d);
    let dist = |ox: u32, oy: u32| (ox as f64 - center).hypot(oy as f64 - center);
    let inside = |ox: u32, oy: u32| dist(ox, oy) < radius;

    let mut covered = vec![false; du * du];
    let mut squares = Vec::new();

    for oy in 0..d {
        let mut ox = 0;
        while ox < d {
            if covered[oy as usize * du + ox as usize] || !inside(ox, oy) {
                ox += 1;
                continue;
            }

            let distance = dist(ox, oy);
            let mut side = 1u32;
            loop {
                let next = side + 1;
                let far = next - 1;
                let fits = ox + next <= d
                    && oy + next <= d
                    && distance + (far as f64) < radius
                    && inside(ox + far, oy)
                    && inside(ox, oy + far)
                    && inside(ox + far, oy + far);
                if !fits {
                    break;
                }
                side = next;
            }

            for y in oy..oy + side {
                let row = y as usize * du;
                covered[row + ox as usize..row + (ox + side) as usize].fill(true);
            }
            squares.push(StampSquare { dx: ox, dy: oy, side });
            ox += side;
        }
    }

    squares
}

/// Points a drag from `from` to `to` stamps at: `ceil(|to − from|) + 1`
/// evenly spaced samples, rounded to the nearest cell, both ends included.
pub fn stroke_points(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let steps = stroke_steps(from, to);
    (0..=steps).map(|i| stroke_sample(from, to, steps, i)).collect()
}

/// Number of intervals between samples; `0` for a zero-length drag.
#[inline]
fn stroke_steps(from: (i32, i32), to: (i32, i32)) -> u64 {
    let dx = to.0 as f64 - from.0 as f64;
    let dy = to.1 as f64 - from.1 as f64;
    dx.hypot(dy).ceil() as u64
}

/// Sample `i` of `0..=steps` along `from → to`.
#[inline]
fn stroke_sample(from: (i32, i32), to: (i32, i32), steps: u64, i: u64) -> (i32, i32) {
    if steps == 0 {
        return from;
    }
    let t = i as f64 / steps as f64;
    let dx = to.0 as f64 - from.0 as f64;
    let dy = to.1 as f64 - from.1 as f64;
    (
        round_half_up(from.0 as f64 + t * dx),
        round_half_up(from.1 as f64 + t * dy),
    )
}

/// Sample indices of `from → to` whose stamps can reach a `size`-wide buffer
/// for a brush of `diameter`, or `None` when the segment misses it entirely.
///
/// The segment is clipped (Liang-Barsky) against the buffer grown by the
/// diameter plus one cell of rounding slack on every side.
fn stroke_sample_range(
    from: (i32, i32),
    to: (i32, i32),
    steps: u64,
    size: u32,
    diameter: u32,
) -> Option<(u64, u64)> {
    let margin = diameter as f64 + 1.0;
    let (lo, hi) = (-margin, size as f64 + margin);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, d) in [
        (from.0 as f64, to.0 as f64 - from.0 as f64),
        (from.1 as f64, to.1 as f64 - from.1 as f64),
    ] {
        if d == 0.0 {
            if p < lo || p > hi {
                return None;
            }
            continue;
        }
        let (a, b) = ((lo - p) / d, (hi - p) / d);
        t0 = t0.max(a.min(b));
        t1 = t1.min(a.max(b));
        if t0 > t1 {
            return None;
        }
    }
    let first = ((t0 * steps as f64).floor() as u64).saturating_sub(1);
    let last = ((t1 * steps as f64).ceil() as u64).saturating_add(1).min(steps);
    Some((first, last))
}

/// Nearest integer with halves going toward +∞ (`Math.round` semantics).
#[inline]
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// A circular brush of fixed diameter with its squares precomputed.
#[derive(Clone, Debug)]
pub struct Brush {
    diameter: u32,
    squares: Vec<StampSquare>,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Brush {
    /// Diameters 0 and 1 both give a single-cell stamp.
    pub fn new(diameter: u32) -> Self {
        let diameter = diameter.max(1);
        Self {
            diameter,
            squares: rasterize_disk(diameter),
        }
    }

    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    /// Change diameter, rebuilding the square list only when it differs.
    pub fn set_diameter(&mut self, diameter: u32) {
        let diameter = diameter.max(1);
        if diameter != self.diameter {
            *self = Self::new(diameter);
        }
    }

    pub fn squares(&self) -> &[StampSquare] {
        &self.squares
    }

    /// Top-left of the stamp box for a stamp centred on `(cx, cy)`.
    /// Odd diameters centre exactly on the cell; even ones lean right/down.
    #[inline]
    pub fn origin(&self, cx: i32, cy: i32) -> (i32, i32) {
        let half = ((self.diameter - 1) / 2) as i32;
        (cx.saturating_sub(half), cy.saturating_sub(half))
    }

    /// Apply one stamp. Returns the region written (clipped), if any.
    pub fn stamp(&self, buffer: &mut PixelBuffer, cx: i32, cy: i32, color: Color) -> Option<PixelRect> {
        let (ox, oy) = self.origin(cx, cy);
        let size = buffer.size() as i64;
        let d = self.diameter as i64;
        if ox as i64 + d <= 0 || oy as i64 + d <= 0 || ox as i64 >= size || oy as i64 >= size {
            return None;
        }
        let mut written = None;
        for sq in &self.squares {
            let rect = buffer.fill_rect(
                ox.saturating_add(sq.dx as i32),
                oy.saturating_add(sq.dy as i32),
                sq.side,
                sq.side,
                color,
            );
            written = PixelRect::merge(written, rect);
        }
        written
    }

    /// Stamp along the segment `from → to` (see [`stroke_points`]). Only the
    /// samples near the buffer are visited, so a far-off pointer stays cheap.
    pub fn stroke(
        &self,
        buffer: &mut PixelBuffer,
        from: (i32, i32),
        to: (i32, i32),
        color: Color,
    ) -> Option<PixelRect> {
        let steps = stroke_steps(from, to);
        let (first, last) = stroke_sample_range(from, to, steps, buffer.size(), self.diameter)?;
        let mut written = None;
        for i in first..=last {
            let (x, y) = stroke_sample(from, to, steps, i);
            written = PixelRect::merge(written, self.stamp(buffer, x, y, color));
        }
        written
    }

    /// Every cell the stamp covers, relative to its top-left corner.
    pub fn cells(&self) -> Vec<(u32, u32)> {
        let d = self.diameter as usize;
        let mut mask = vec![false; d * d];
        for sq in &self.squares {
            for y in sq.dy..sq.dy + sq.side {
                for x in sq.dx..sq.dx + sq.side {
                    mask[y as usize * d + x as usize] = true;
                }
            }
        }
        mask.iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(|(i, _)| ((i % d) as u32, (i / d) as u32))
            .collect()
    }
}
