//! # ExtrudeKit Core
//!
//! Core types, error taxonomy and the extrusion flow model for ExtrudeKit.
//! Provides the fundamental abstractions shared by the settings, motion
//! emitter and communication crates.

pub mod data;
pub mod error;
pub mod flow;

pub use data::{Axis, ModalMode, PartialPosition, Position, RotationDirection, ToolIndex};

pub use error::{ConfigurationError, Error, InvalidModeError, NotFoundError, Result};

pub use flow::{extrusion_for, FlowGeometry};
