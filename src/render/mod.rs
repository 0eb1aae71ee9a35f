/// Rendered frame buffers.
pub mod backend;
/// Frame scheduling and the range render driver.
pub mod pipeline;
/// Font database and SVG rasterization.
pub mod raster;
/// Frame description to SVG serialization.
pub mod svg;
