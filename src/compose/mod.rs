/// Per-frame description assembly.
pub mod frame;
