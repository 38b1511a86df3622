//! Extrusion flow model
//!
//! Converts a move length into the filament length that has to be fed to
//! deposit a bead of the configured cross-section. Two regimes are used,
//! following the Slic3r flow math:
//!
//! - Wide bead (`w > 1.05 * d_nozzle`): stadium cross-section, a rectangle
//!   with semicircular ends. `E = (4/pi * (w - h) * h + h^2) * L / d_f^2`
//! - Narrow bead: rectangular equivalent. `E = 4 * L * w * h / (pi * d_f^2)`

use crate::error::ConfigurationError;
use std::f64::consts::PI;

/// Ratio of layer width to nozzle diameter above which the stadium model applies
pub const WIDE_BEAD_RATIO: f64 = 1.05;

/// Validated bead and filament geometry (all values in mm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowGeometry {
    layer_width: f64,
    layer_height: f64,
    filament_diameter: f64,
    nozzle_diameter: f64,
}

fn require_positive(param: &str, value: Option<f64>) -> Result<f64, ConfigurationError> {
    let value = value.ok_or_else(|| ConfigurationError::missing(param))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigurationError::NonPositive {
            param: param.to_string(),
            value,
        });
    }
    Ok(value)
}

impl FlowGeometry {
    /// Validate geometry given as optional values, as stored in print properties
    pub fn from_optional(
        layer_width: Option<f64>,
        layer_height: Option<f64>,
        filament_diameter: Option<f64>,
        nozzle_diameter: Option<f64>,
    ) -> Result<Self, ConfigurationError> {
        let layer_width = require_positive("layer_width", layer_width)?;
        let layer_height = require_positive("layer_height", layer_height)?;
        let filament_diameter = require_positive("filament_diameter", filament_diameter)?;
        let nozzle_diameter = require_positive("nozzle_diameter", nozzle_diameter)?;

        if layer_width < nozzle_diameter {
            return Err(ConfigurationError::WidthBelowNozzle {
                layer_width,
                nozzle_diameter,
            });
        }

        Ok(Self {
            layer_width,
            layer_height,
            filament_diameter,
            nozzle_diameter,
        })
    }

    /// Validate fully specified geometry
    pub fn new(
        layer_width: f64,
        layer_height: f64,
        filament_diameter: f64,
        nozzle_diameter: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::from_optional(
            Some(layer_width),
            Some(layer_height),
            Some(filament_diameter),
            Some(nozzle_diameter),
        )
    }

    pub fn layer_width(&self) -> f64 {
        self.layer_width
    }

    pub fn layer_height(&self) -> f64 {
        self.layer_height
    }

    pub fn filament_diameter(&self) -> f64 {
        self.filament_diameter
    }

    pub fn nozzle_diameter(&self) -> f64 {
        self.nozzle_diameter
    }

    /// Check whether the stadium (wide bead) model applies
    pub fn is_wide_bead(&self) -> bool {
        self.layer_width > WIDE_BEAD_RATIO * self.nozzle_diameter
    }

    /// Filament length (mm) to extrude over a move of `length` mm
    pub fn extrusion_for(&self, length: f64) -> f64 {
        let w = self.layer_width;
        let h = self.layer_height;
        let d_f = self.filament_diameter;

        let extrusion = if self.is_wide_bead() {
            (4.0 / PI * (w - h) * h + h * h) * length / (d_f * d_f)
        } else {
            4.0 * length * w * h / (PI * d_f * d_f)
        };

        tracing::trace!(length, extrusion, wide = self.is_wide_bead(), "flow model");
        extrusion
    }
}

/// Filament length for a move, validating the geometry first
///
/// Fails with [`ConfigurationError`] when any geometry value is
/// non-positive or when the layer is narrower than the nozzle.
pub fn extrusion_for(
    length: f64,
    layer_width: f64,
    layer_height: f64,
    filament_diameter: f64,
    nozzle_diameter: f64,
) -> Result<f64, ConfigurationError> {
    FlowGeometry::new(layer_width, layer_height, filament_diameter, nozzle_diameter)
        .map(|geometry| geometry.extrusion_for(length))
}
