/// Theme schema, defaults and validation.
pub mod model;
