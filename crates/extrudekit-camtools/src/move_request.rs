//! Move request builder

use extrudekit_core::{ConfigurationError, ModalMode, PartialPosition};

/// Parameters of one travel or extrusion move
///
/// ```rust,ignore
/// let request = MoveRequest::absolute().x(10.0).y(5.0).feed(1800.0).z_lift(2.0).retract();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveRequest {
    /// Axis targets; only supplied axes are written
    pub target: PartialPosition,
    /// Feed rate in mm/min
    pub feed: Option<f64>,
    /// Distance mode the target is expressed in
    pub mode: ModalMode,
    /// Vertical clearance raised before and lowered after a travel move (mm)
    pub z_lift: f64,
    /// Firmware retract around a travel move
    pub retract: bool,
    /// Switch toolheads before a travel move
    pub tool_change: bool,
}

impl MoveRequest {
    /// Request in absolute coordinates
    pub fn absolute() -> Self {
        Self::default()
    }

    /// Request in incremental coordinates
    pub fn incremental() -> Self {
        Self {
            mode: ModalMode::Incremental,
            ..Self::default()
        }
    }

    pub fn x(mut self, x: f64) -> Self {
        self.target.x = Some(x);
        self
    }

    pub fn y(mut self, y: f64) -> Self {
        self.target.y = Some(y);
        self
    }

    pub fn z(mut self, z: f64) -> Self {
        self.target.z = Some(z);
        self
    }

    pub fn feed(mut self, feed: f64) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn z_lift(mut self, z_lift: f64) -> Self {
        self.z_lift = z_lift;
        self
    }

    pub fn retract(mut self) -> Self {
        self.retract = true;
        self
    }

    pub fn tool_change(mut self) -> Self {
        self.tool_change = true;
        self
    }

    /// Reject non-finite targets, non-positive feeds and negative lifts
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (axis, value) in self.target.axes() {
            if !value.is_finite() {
                return Err(ConfigurationError::invalid(
                    axis.name(),
                    "target must be finite",
                ));
            }
        }
        if let Some(feed) = self.feed {
            if !feed.is_finite() || feed <= 0.0 {
                return Err(ConfigurationError::NonPositive {
                    param: "feed".to_string(),
                    value: feed,
                });
            }
        }
        if !self.z_lift.is_finite() || self.z_lift < 0.0 {
            return Err(ConfigurationError::invalid(
                "z_lift",
                "lift cannot be negative",
            ));
        }
        Ok(())
    }
}
