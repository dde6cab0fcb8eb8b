pub mod layout;
pub mod svg;

pub use layout::{squarify, Rect};
pub use svg::{render, CANVAS_HEIGHT, CANVAS_WIDTH};
