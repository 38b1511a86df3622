//! ExtrudeKit Settings Crate
//!
//! Handles print properties, configuration files and output locations.

pub mod config;
pub mod error;
pub mod properties;

pub use config::{Config, OutputSettings};
pub use error::{SettingsError, SettingsResult};
pub use properties::{PrintProperties, PropertyKey, PropertyValue};
