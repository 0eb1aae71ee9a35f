//! Pure per-instant queries over a scheduled timeline.

/// Engine facade bundling timeline, schedule and layout.
pub mod engine;
/// Highlight progress, wrapping and token partitioning.
pub mod highlight;
pub(crate) mod position;
/// Visible lines and opacity falloff.
pub mod visibility;
