/// Scroll transitions and the first-line pre-roll.
pub mod transitions;
