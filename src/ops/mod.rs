pub mod brush;
pub mod fill;
pub mod shapes;

pub use brush::{Brush, StampSquare, disk_contains, rasterize_disk, stroke_points};
pub use fill::{FillReport, flood_fill};
