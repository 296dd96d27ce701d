//! CPU-only triangle rasterizer: programmable vertex/fragment shaders,
//! a z-buffered bounding-box rasterizer and two-pass shadow mapping.

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;
