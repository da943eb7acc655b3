//! CLI command implementations

pub mod presets;
pub mod run;
pub mod validate;
