//! Error types for Ember

use thiserror::Error;

/// The main error type for Ember operations
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("Value out of range: {field} must be {requirement}, got {value}")]
    ValueOutOfRange {
        field: String,
        requirement: &'static str,
        value: f64,
    },

    #[error("Invalid time step: dt must be finite and non-negative, got {0}")]
    InvalidTimeStep(f32),

    #[error("Invalid field type: {field} expected {expected}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

impl EmberError {
    /// Shorthand for a `ValueOutOfRange` error on a scalar field
    pub fn out_of_range(field: impl Into<String>, requirement: &'static str, value: f32) -> Self {
        EmberError::ValueOutOfRange {
            field: field.into(),
            requirement,
            value: value as f64,
        }
    }
}

/// Result type alias for Ember operations
pub type Result<T> = std::result::Result<T, EmberError>;

impl From<toml::de::Error> for EmberError {
    fn from(err: toml::de::Error) -> Self {
        EmberError::TomlParseError(err.to_string())
    }
}
