//! Error types for acfkit-core

use thiserror::Error;

/// Result type alias for acfkit-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in acfkit-core
#[derive(Error, Debug)]
pub enum Error {
    /// Conditional logic operator outside the allowed set
    #[error("invalid conditional logic operator [{operator}]")]
    InvalidOperator {
        /// The rejected operator
        operator: String,
    },

    /// A derived field key was already issued in the current build session
    #[error("the field key [{key}] is not unique")]
    DuplicateKey {
        /// The colliding key
        key: String,
    },

    /// Attribute not supported by the field type
    #[error("field type '{field_type}' does not support the '{attribute}' attribute")]
    UnsupportedAttribute {
        /// Field type name
        field_type: String,
        /// Attribute name
        attribute: String,
    },

    /// Structurally invalid field definition
    #[error("invalid field '{name}': {message}")]
    InvalidField {
        /// Name of the field with the error
        name: String,
        /// Description of the error
        message: String,
    },

    /// Invalid group location rule
    #[error("invalid location rule: {message}")]
    InvalidLocation {
        /// Description of what's invalid
        message: String,
    },

    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
