pub mod colors;
pub mod tools;

pub use colors::{Palette, Swatch};
pub use tools::{Tool, ToolContext, ToolOutcome, ToolState};
