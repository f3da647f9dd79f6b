//! Software 3D renderer for terminal display.

mod rasterize;
mod sixel;

pub use rasterize::*;
pub use sixel::*;
