//! Data models for positions and modal machine state
//!
//! This module provides:
//! - Position tracking for the X, Y and Z axes
//! - Partial positions for selective axis targets
//! - Distance mode (G90/G91) and Z motor rotation direction
//! - Toolhead selection

use crate::error::InvalidModeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tool position in machine coordinates (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Position axes must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// Mutable coordinate on one axis
    pub fn axis_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3} Z:{:.3}", self.x, self.y, self.z)
    }
}

/// Linear machine axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Lowercase parameter name
    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Axis targets where only the supplied axes are present
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialPosition {
    /// X-axis target (if any)
    pub x: Option<f64>,
    /// Y-axis target (if any)
    pub y: Option<f64>,
    /// Z-axis target (if any)
    pub z: Option<f64>,
}

impl PartialPosition {
    /// Create an empty partial position
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplied axes in X, Y, Z order
    pub fn axes(&self) -> impl Iterator<Item = (Axis, f64)> {
        [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)]
            .into_iter()
            .filter_map(|(axis, value)| value.map(|v| (axis, v)))
    }

    /// Get the number of axes that are set
    pub fn axis_count(&self) -> usize {
        self.axes().count()
    }

    /// Check if no axes are set
    pub fn is_empty(&self) -> bool {
        self.axis_count() == 0
    }
}

/// Distance mode for coordinate operands (G90/G91)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalMode {
    /// Coordinates are absolute machine positions (G90)
    #[default]
    Absolute,
    /// Coordinates are deltas from the current position (G91)
    Incremental,
}

impl ModalMode {
    /// Check if this is incremental mode
    pub fn is_incremental(&self) -> bool {
        matches!(self, Self::Incremental)
    }
}

impl fmt::Display for ModalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => write!(f, "absolute"),
            Self::Incremental => write!(f, "incremental"),
        }
    }
}

/// Rotation direction of the Z motor
///
/// Clockwise rotation moves the toolhead down (-Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    /// Downward motion
    Clockwise,
    /// Upward motion, the state after homing or probing
    CounterClockwise,
}

impl RotationDirection {
    /// Direction of a signed Z delta; zero counts as upward
    pub fn from_delta(delta: f64) -> Self {
        if delta < 0.0 {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }

    /// +1 for counter-clockwise, -1 for clockwise
    pub fn sign(&self) -> f64 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }
}

impl Default for RotationDirection {
    fn default() -> Self {
        Self::CounterClockwise
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "cw"),
            Self::CounterClockwise => write!(f, "ccw"),
        }
    }
}

/// Toolhead index
///
/// The machine carries two toolheads, so every tool transition is one of
/// T0 -> T1 or T1 -> T0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ToolIndex {
    /// First toolhead
    #[default]
    T0,
    /// Second toolhead
    T1,
}

impl ToolIndex {
    /// The toolhead a tool change switches to
    pub fn other(&self) -> Self {
        match self {
            Self::T0 => Self::T1,
            Self::T1 => Self::T0,
        }
    }

    /// Numeric index used in T-words
    pub fn index(&self) -> u8 {
        match self {
            Self::T0 => 0,
            Self::T1 => 1,
        }
    }

    /// Convert a caller-supplied index
    pub fn from_index(index: i64) -> Result<Self, InvalidModeError> {
        match index {
            0 => Ok(Self::T0),
            1 => Ok(Self::T1),
            requested => Err(InvalidModeError::UnsupportedTool { requested }),
        }
    }
}

impl TryFrom<u8> for ToolIndex {
    type Error = InvalidModeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(i64::from(value))
    }
}

impl From<ToolIndex> for u8 {
    fn from(tool: ToolIndex) -> Self {
        tool.index()
    }
}

impl fmt::Display for ToolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.index())
    }
}
