//! Infinite-canvas pixel-art editor core.
//!
//! A sparse grid of fixed-size tiles ([`grid::TileGrid`]), each storing packed
//! colors ([`canvas::PixelBuffer`]), edited through brush stamps, flood fill
//! and rectangle tools, and viewed through a pan/zoom [`view::ViewTransform`].
//! [`session::EditorSession`] ties them together behind normalized input
//! events; [`render`] projects tiles to RGBA images.

#[macro_use]
pub mod logger;

pub mod canvas;
pub mod cli;
pub mod color;
pub mod components;
pub mod grid;
pub mod ops;
pub mod render;
pub mod script;
pub mod session;
pub mod settings;
pub mod view;

pub use canvas::{PixelBuffer, PixelRect, Tile};
pub use color::Color;
pub use grid::{Direction, TileCoord, TileGrid};
pub use session::{EditorSession, PointerEvent};
pub use settings::EditorSettings;
pub use view::ViewTransform;
