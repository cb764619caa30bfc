//! Error types for artifact loading, configuration and form input.

use std::path::PathBuf;
use thiserror::Error;

use crate::features::Feature;

/// Errors raised while loading artifacts or configuration.
///
/// Every variant is fatal at startup: no prediction is produced once one of
/// these has been returned.
#[derive(Debug, Error)]
pub enum CardioError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid artifact: {0}")]
    Artifact(String),
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Rejections from the input-collection layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: Feature,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} = {value} is below the minimum of {min}")]
    BelowMinimum { field: Feature, value: f64, min: f64 },
    #[error("{field} must be a whole number, got {value}")]
    NotInteger { field: Feature, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: Feature },
    #[error("{field}: '{input}' is not a number")]
    InvalidNumber { field: Feature, input: String },
    #[error("{field}: {source}")]
    InvalidLabel {
        field: Feature,
        #[source]
        source: ParseLabelError,
    },
}

/// A categorical label that does not belong to the field's two options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not one of {expected}")]
pub struct ParseLabelError {
    pub input: String,
    pub expected: &'static str,
}
