/// Audio/media probing through the system `ffprobe`.
pub mod media;
/// Song name matching under the `input/` directory layout.
pub mod resolve;
