//! Error handling for ExtrudeKit
//!
//! Provides the error types shared by every layer of the command generator:
//! - Configuration errors (missing or invalid print geometry and properties)
//! - Lookup errors (unknown property keys)
//! - Mode errors (unsupported tool transitions)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Raised when a required print property is missing or holds a value the
/// triggering operation cannot work with. Fatal to that operation only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A required property has not been set
    #[error("Print property '{param}' is not set")]
    Missing {
        /// The name of the missing property.
        param: String,
    },

    /// A geometry value must be strictly positive
    #[error("Print property '{param}' must be positive, got {value}")]
    NonPositive {
        /// The name of the property.
        param: String,
        /// The rejected value.
        value: f64,
    },

    /// The extruded bead cannot be narrower than the nozzle
    #[error("Layer width {layer_width} is smaller than nozzle diameter {nozzle_diameter}")]
    WidthBelowNozzle {
        /// Configured layer width in mm.
        layer_width: f64,
        /// Configured nozzle diameter in mm.
        nozzle_diameter: f64,
    },

    /// A value has the wrong type or is outside its valid range
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// The property or parameter name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::Missing`]
    pub fn missing(param: impl Into<String>) -> Self {
        Self::Missing {
            param: param.into(),
        }
    }

    /// Shorthand for [`ConfigurationError::InvalidValue`]
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Lookup error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    /// The requested property key is not recognized
    #[error("Print property '{key}' does not exist")]
    Property {
        /// The unrecognized key as supplied by the caller.
        key: String,
    },
}

/// Mode error type
///
/// Raised for modal transitions the machine cannot perform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidModeError {
    /// Only toolheads 0 and 1 exist
    #[error("Unsupported tool index {requested}, expected 0 or 1")]
    UnsupportedTool {
        /// The requested tool index.
        requested: i64,
    },
}

/// Main error type for ExtrudeKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Lookup error
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Mode error
    #[error(transparent)]
    InvalidMode(#[from] InvalidModeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this is a lookup error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a mode error
    pub fn is_invalid_mode(&self) -> bool {
        matches!(self, Error::InvalidMode(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
