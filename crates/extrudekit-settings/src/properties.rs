//! Print properties
//!
//! A typed property bag for nozzle and bead geometry, feed and override
//! settings, backlash and session parameters. Properties can be addressed
//! by name (case-insensitive) for runtime overrides; unknown names are
//! rejected instead of being stored.

use extrudekit_core::{
    ConfigurationError, FlowGeometry, NotFoundError, Result, ToolIndex,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognized print property names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    NozzleDiameter,
    FilamentDiameter,
    LayerWidth,
    LayerHeight,
    Feedrate,
    Backlash,
    SpeedOverride,
    ExtrudeOverride,
    StartTool,
    Simulation,
    T0Temp,
    BedTemp,
}

impl PropertyKey {
    /// Every recognized key
    pub const ALL: [PropertyKey; 12] = [
        Self::NozzleDiameter,
        Self::FilamentDiameter,
        Self::LayerWidth,
        Self::LayerHeight,
        Self::Feedrate,
        Self::Backlash,
        Self::SpeedOverride,
        Self::ExtrudeOverride,
        Self::StartTool,
        Self::Simulation,
        Self::T0Temp,
        Self::BedTemp,
    ];

    /// Canonical (lowercase) property name
    pub fn name(&self) -> &'static str {
        match self {
            Self::NozzleDiameter => "nozzle_diameter",
            Self::FilamentDiameter => "filament_diameter",
            Self::LayerWidth => "layer_width",
            Self::LayerHeight => "layer_height",
            Self::Feedrate => "feedrate",
            Self::Backlash => "backlash",
            Self::SpeedOverride => "speed_override",
            Self::ExtrudeOverride => "extrude_override",
            Self::StartTool => "start_tool",
            Self::Simulation => "simulation",
            Self::T0Temp => "t0_temp",
            Self::BedTemp => "bed_temp",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyKey {
    type Err = NotFoundError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.name() == lowered)
            .ok_or_else(|| NotFoundError::Property { key: s.to_string() })
    }
}

/// Value of a single print property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Numeric value (lengths in mm, temperatures in C, overrides in percent)
    Number(f64),
    /// Boolean switch
    Flag(bool),
}

impl PropertyValue {
    /// Numeric content, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Flag(_) => None,
        }
    }

    /// Boolean content, if this is a flag
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Flag(value) => write!(f, "{}", value),
        }
    }
}

/// Print and machine properties for one toolhead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintProperties {
    /// Nozzle diameter in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nozzle_diameter: Option<f64>,
    /// Filament diameter in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filament_diameter: Option<f64>,
    /// Width of the deposited bead in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_width: Option<f64>,
    /// Height of the deposited bead in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_height: Option<f64>,
    /// Last feed rate in mm/min
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedrate: Option<f64>,
    /// Measured Z backlash in mm, 0 disables compensation
    pub backlash: f64,
    /// Speed factor override in percent (M220)
    pub speed_override: f64,
    /// Extrude factor override in percent (M221)
    pub extrude_override: f64,
    /// Tool selected by the start code
    pub start_tool: ToolIndex,
    /// Suppress firmware macros so generic viewers can render the output
    pub simulation: bool,
    /// Hotend temperature for tool 0 in C
    pub t0_temp: f64,
    /// Bed temperature in C
    pub bed_temp: f64,
}

impl Default for PrintProperties {
    fn default() -> Self {
        Self {
            nozzle_diameter: None,
            filament_diameter: None,
            layer_width: None,
            layer_height: None,
            feedrate: None,
            backlash: 0.0,
            speed_override: 100.0,
            extrude_override: 100.0,
            start_tool: ToolIndex::T0,
            simulation: false,
            t0_temp: 0.0,
            bed_temp: 0.0,
        }
    }
}

fn require_number(key: PropertyKey, value: PropertyValue) -> Result<f64> {
    let number = value.as_number().ok_or_else(|| {
        ConfigurationError::invalid(key.name(), format!("expected a number, got {}", value))
    })?;
    if !number.is_finite() {
        return Err(ConfigurationError::invalid(key.name(), "value must be finite").into());
    }
    Ok(number)
}

impl PrintProperties {
    /// Create properties with default values and no geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for the four flow geometry values
    pub fn with_geometry(
        nozzle_diameter: f64,
        filament_diameter: f64,
        layer_width: f64,
        layer_height: f64,
    ) -> Self {
        Self {
            nozzle_diameter: Some(nozzle_diameter),
            filament_diameter: Some(filament_diameter),
            layer_width: Some(layer_width),
            layer_height: Some(layer_height),
            ..Self::default()
        }
    }

    /// Validated flow geometry for extrusion moves
    pub fn flow_geometry(&self) -> std::result::Result<FlowGeometry, ConfigurationError> {
        FlowGeometry::from_optional(
            self.layer_width,
            self.layer_height,
            self.filament_diameter,
            self.nozzle_diameter,
        )
    }

    /// Read a property; unset optional properties are a configuration error
    pub fn get(&self, key: PropertyKey) -> Result<PropertyValue> {
        let optional = |value: Option<f64>| {
            value
                .map(PropertyValue::Number)
                .ok_or_else(|| ConfigurationError::missing(key.name()))
        };
        let value = match key {
            PropertyKey::NozzleDiameter => optional(self.nozzle_diameter)?,
            PropertyKey::FilamentDiameter => optional(self.filament_diameter)?,
            PropertyKey::LayerWidth => optional(self.layer_width)?,
            PropertyKey::LayerHeight => optional(self.layer_height)?,
            PropertyKey::Feedrate => optional(self.feedrate)?,
            PropertyKey::Backlash => PropertyValue::Number(self.backlash),
            PropertyKey::SpeedOverride => PropertyValue::Number(self.speed_override),
            PropertyKey::ExtrudeOverride => PropertyValue::Number(self.extrude_override),
            PropertyKey::StartTool => PropertyValue::Number(f64::from(self.start_tool.index())),
            PropertyKey::Simulation => PropertyValue::Flag(self.simulation),
            PropertyKey::T0Temp => PropertyValue::Number(self.t0_temp),
            PropertyKey::BedTemp => PropertyValue::Number(self.bed_temp),
        };
        Ok(value)
    }

    /// Read a property by name
    pub fn get_by_name(&self, name: &str) -> Result<PropertyValue> {
        let key: PropertyKey = name.parse()?;
        self.get(key)
    }

    /// Write a single property, checking its type
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue) -> Result<()> {
        match key {
            PropertyKey::Simulation => {
                self.simulation = value.as_flag().ok_or_else(|| {
                    ConfigurationError::invalid(key.name(), format!("expected a flag, got {}", value))
                })?;
            }
            PropertyKey::StartTool => {
                let number = require_number(key, value)?;
                if number.fract() != 0.0 {
                    return Err(
                        ConfigurationError::invalid(key.name(), "tool index must be whole").into(),
                    );
                }
                self.start_tool = ToolIndex::from_index(number as i64)?;
            }
            PropertyKey::Backlash => {
                let number = require_number(key, value)?;
                if number < 0.0 {
                    return Err(
                        ConfigurationError::invalid(key.name(), "backlash cannot be negative")
                            .into(),
                    );
                }
                self.backlash = number;
            }
            PropertyKey::NozzleDiameter => self.nozzle_diameter = Some(require_number(key, value)?),
            PropertyKey::FilamentDiameter => {
                self.filament_diameter = Some(require_number(key, value)?)
            }
            PropertyKey::LayerWidth => self.layer_width = Some(require_number(key, value)?),
            PropertyKey::LayerHeight => self.layer_height = Some(require_number(key, value)?),
            PropertyKey::Feedrate => self.feedrate = Some(require_number(key, value)?),
            PropertyKey::SpeedOverride => self.speed_override = require_number(key, value)?,
            PropertyKey::ExtrudeOverride => self.extrude_override = require_number(key, value)?,
            PropertyKey::T0Temp => self.t0_temp = require_number(key, value)?,
            PropertyKey::BedTemp => self.bed_temp = require_number(key, value)?,
        }
        Ok(())
    }

    /// Merge named values into the properties
    ///
    /// Keys are matched case-insensitively. The merge is all-or-nothing:
    /// if any key is unknown or any value invalid, nothing is changed.
    pub fn set_properties<I, K>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: AsRef<str>,
    {
        let mut merged = self.clone();
        for (name, value) in values {
            let key: PropertyKey = name.as_ref().parse()?;
            merged.set(key, value)?;
        }
        *self = merged;
        Ok(())
    }

    /// Validate values that were deserialized without going through `set`
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        let optional = [
            (PropertyKey::NozzleDiameter, self.nozzle_diameter),
            (PropertyKey::FilamentDiameter, self.filament_diameter),
            (PropertyKey::LayerWidth, self.layer_width),
            (PropertyKey::LayerHeight, self.layer_height),
            (PropertyKey::Feedrate, self.feedrate),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigurationError::NonPositive {
                        param: key.name().to_string(),
                        value,
                    });
                }
            }
        }

        if !self.backlash.is_finite() || self.backlash < 0.0 {
            return Err(ConfigurationError::invalid(
                PropertyKey::Backlash.name(),
                "backlash cannot be negative",
            ));
        }

        Ok(())
    }
}
