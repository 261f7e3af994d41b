use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::canvas::{PixelRect, Tile};
use crate::grid::{TileCoord, TileGrid};
use crate::view::{ScreenRect, ViewTransform};

/// Background between and around tiles in viewport snapshots.
pub const GAP_COLOR: Rgba<u8> = Rgba([0x2b, 0x2b, 0x2b, 255]);

// ============================================================================
// TILE PROJECTION — pixels (+ overlay) → RGBA
// ============================================================================

/// Full tile as an image, preview overlay on top.
pub fn tile_image(tile: &Tile) -> RgbaImage {
    let size = tile.size();
    tile_region(tile, PixelRect::new(0, 0, size, size))
}

/// Just `rect` of the tile (clipped), for partial redraws of damaged areas.
pub fn tile_region(tile: &Tile, rect: PixelRect) -> RgbaImage {
    let Some(rect) = PixelRect::clipped(rect.x as i32, rect.y as i32, rect.w, rect.h, tile.size()) else {
        return RgbaImage::new(0, 0);
    };
    let pixels = tile.pixels();
    let overlay = tile.overlay().filter(|o| !o.is_empty());
    let row_bytes = rect.w as usize * 4;

    let mut img = RgbaImage::new(rect.w, rect.h);
    img.par_chunks_mut(row_bytes).enumerate().for_each(|(row, row_buf)| {
        let y = rect.y + row as u32;
        let src = &pixels.row(y)[rect.x as usize..rect.right() as usize];
        for (col, color) in src.iter().enumerate() {
            let x = rect.x + col as u32;
            let color = overlay
                .and_then(|o| o.get(x as i32, y as i32))
                .unwrap_or(*color);
            row_buf[col * 4..col * 4 + 4].copy_from_slice(&color.to_rgba().0);
        }
    });
    img
}

// ============================================================================
// VIEWPORT PROJECTION
// ============================================================================

/// Where a visible tile lands on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePlacement {
    pub coord: TileCoord,
    pub rect: ScreenRect,
}

/// Tiles intersecting the viewport, in creation order.
pub fn visible_tiles(grid: &TileGrid, view: &ViewTransform) -> Vec<TilePlacement> {
    grid.coords()
        .filter(|c| view.is_tile_visible(*c))
        .map(|coord| TilePlacement {
            coord,
            rect: view.tile_screen_rect(coord),
        })
        .collect()
}

/// Nearest-neighbour render of what the viewport shows.
pub fn viewport_image(grid: &TileGrid, view: &ViewTransform) -> RgbaImage {
    let (vw, vh) = view.viewport();
    let width = vw.ceil().max(1.0) as u32;
    let height = vh.ceil().max(1.0) as u32;
    let row_bytes = width as usize * 4;

    let mut img = RgbaImage::new(width, height);
    img.par_chunks_mut(row_bytes).enumerate().for_each(|(row, row_buf)| {
        let sy = row as f32 + 0.5;
        for col in 0..width as usize {
            let sx = col as f32 + 0.5;
            let hit = view.screen_to_tile(sx, sy);
            let px = if hit.in_gap {
                GAP_COLOR
            } else {
                match grid.get(hit.tile) {
                    Some(tile) => {
                        let (x, y) = (hit.local_x as i32, hit.local_y as i32);
                        tile.overlay()
                            .and_then(|o| o.get(x, y))
                            .unwrap_or_else(|| tile.pixels().get(x, y))
                            .to_rgba()
                    }
                    None => GAP_COLOR,
                }
            };
            row_buf[col * 4..col * 4 + 4].copy_from_slice(&px.0);
        }
    });
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::grid::Direction;

    #[test]
    fn tile_image_shows_pixels_and_overlay() {
        let mut tile = Tile::new(TileCoord::ORIGIN, 8);
        tile.pixels_mut().set(1, 2, Color::RED);
        tile.overlay_mut().set(3, 3, Color::BLUE);
        let img = tile_image(&tile);
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(*img.get_pixel(1, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(3, 3), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn region_is_clipped_and_offset() {
        let mut tile = Tile::new(TileCoord::ORIGIN, 8);
        tile.pixels_mut().set(6, 6, Color::GREEN);
        let img = tile_region(&tile, PixelRect::new(5, 5, 10, 10));
        assert_eq!(img.dimensions(), (3, 3));
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 255, 0, 255]));
        assert_eq!(tile_region(&tile, PixelRect::new(9, 0, 2, 2)).dimensions(), (0, 0));
    }

    #[test]
    fn viewport_snapshot_places_tiles_and_gaps() {
        let mut grid = TileGrid::new(16);
        grid.add_neighbor(TileCoord::ORIGIN, Direction::Right);
        grid.get_mut(TileCoord::ORIGIN).unwrap().pixels_mut().fill(Color::RED);
        let view = ViewTransform::new(16, 4, 80.0, 40.0);

        let img = viewport_image(&grid, &view);
        assert_eq!(img.dimensions(), (80, 40));
        // Origin tile starts at the viewport centre.
        assert_eq!(*img.get_pixel(40, 20), Rgba([255, 0, 0, 255]));
        // Gap between origin and its right neighbour.
        assert_eq!(*img.get_pixel(57, 20), GAP_COLOR);
        // Right neighbour, still black.
        assert_eq!(*img.get_pixel(61, 20), Rgba([0, 0, 0, 255]));
        // Top-left quadrant has no tiles.
        assert_eq!(*img.get_pixel(5, 5), GAP_COLOR);

        let placed = visible_tiles(&grid, &view);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].coord, TileCoord::ORIGIN);
    }
}
