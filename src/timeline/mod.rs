/// Lyrics JSON input.
pub mod lyrics;
/// Validated lyric lines.
pub mod model;
