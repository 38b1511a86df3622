//! Typed G-code commands
//!
//! Commands are stored as values and only rendered to text when the script
//! is read. Number formatting follows the printer firmware conventions:
//! axis words and feed rates use three decimals, extrusion lengths six,
//! dwell times and override percentages two.

use extrudekit_core::{ModalMode, ToolIndex};
use std::fmt;

/// Firmware macros defined in the printer host configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KlipperMacro {
    /// Homing, heating and priming
    StartPrint,
    /// Cool down and park
    EndPrint,
    /// Z probe of the active tool
    Probe,
}

impl KlipperMacro {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartPrint => "start_print",
            Self::EndPrint => "end_print",
            Self::Probe => "probe",
        }
    }
}

/// Firmware retraction parameters for SET_RETRACTION
///
/// Absent values are left out of the command and keep their firmware value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RetractionSettings {
    /// Retract length in mm
    pub length: Option<f64>,
    /// Retract speed in mm/s
    pub speed: Option<f64>,
    /// Extra length pushed on unretract in mm
    pub unretract_extra_length: Option<f64>,
    /// Unretract speed in mm/s
    pub unretract_speed: Option<f64>,
}

/// One G-code command
#[derive(Debug, Clone, PartialEq)]
pub enum GcodeCommand {
    /// Comment-only line
    Comment(String),
    /// G21
    UnitsMillimeters,
    /// G90 / G91
    DistanceMode(ModalMode),
    /// M83
    RelativeExtrusion,
    /// T0 / T1
    SelectTool(ToolIndex),
    /// M104 (no wait) / M109 (wait)
    HotendTemperature {
        tool: ToolIndex,
        celsius: f64,
        wait: bool,
    },
    /// M140 (no wait) / M190 (wait)
    BedTemperature { celsius: f64, wait: bool },
    /// G1 with any combination of axis, extrusion and feed words
    LinearMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        e: Option<f64>,
        feed: Option<f64>,
    },
    /// G1 E-only move for manual filament feeding
    ManualExtrude(f64),
    /// G1 F-only feed rate change
    Feedrate(f64),
    /// G4 dwell in milliseconds
    Dwell(f64),
    /// G10
    FirmwareRetract,
    /// G11
    FirmwareUnretract,
    /// M220 speed factor override in percent
    SpeedOverride(f64),
    /// M221 extrude factor override in percent
    ExtrudeOverride(f64),
    /// Klipper FORCE_MOVE on a single stepper
    ForceMove {
        stepper: &'static str,
        distance: f64,
        velocity: f64,
        accel: f64,
    },
    /// Klipper SET_RETRACTION
    SetRetraction(RetractionSettings),
    /// Named firmware macro
    Macro(KlipperMacro),
}

impl GcodeCommand {
    /// G1 positioning move with only a Z word
    pub fn z_move(z: f64) -> Self {
        Self::LinearMove {
            x: None,
            y: None,
            z: Some(z),
            e: None,
            feed: None,
        }
    }

    /// Check if this line carries no machine command
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Check if this command only exists in the printer host firmware
    pub fn is_firmware_specific(&self) -> bool {
        matches!(
            self,
            Self::FirmwareRetract
                | Self::FirmwareUnretract
                | Self::ForceMove { .. }
                | Self::SetRetraction(_)
                | Self::Macro(_)
        )
    }
}

fn write_word(f: &mut fmt::Formatter<'_>, letter: char, value: Option<f64>, precision: usize) -> fmt::Result {
    match value {
        Some(value) => write!(f, "{}{:.*}", letter, precision, value),
        None => Ok(()),
    }
}

impl fmt::Display for GcodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "; {}", text),
            Self::UnitsMillimeters => f.write_str("G21"),
            Self::DistanceMode(ModalMode::Absolute) => f.write_str("G90"),
            Self::DistanceMode(ModalMode::Incremental) => f.write_str("G91"),
            Self::RelativeExtrusion => f.write_str("M83"),
            Self::SelectTool(tool) => write!(f, "{}", tool),
            Self::HotendTemperature {
                tool,
                celsius,
                wait,
            } => {
                let code = if *wait { "M109" } else { "M104" };
                write!(f, "{} {} S{:.0}", code, tool, celsius)
            }
            Self::BedTemperature { celsius, wait } => {
                let code = if *wait { "M190" } else { "M140" };
                write!(f, "{} S{:.0}", code, celsius)
            }
            Self::LinearMove { x, y, z, e, feed } => {
                f.write_str("G1")?;
                write_word(f, 'X', *x, 3)?;
                write_word(f, 'Y', *y, 3)?;
                write_word(f, 'Z', *z, 3)?;
                write_word(f, 'E', *e, 6)?;
                write_word(f, 'F', *feed, 3)
            }
            Self::ManualExtrude(distance) => write!(f, "G1E{:.2}", distance),
            Self::Feedrate(feed) => write!(f, "G1F{:.3}", feed),
            Self::Dwell(milliseconds) => write!(f, "G4P{:.2}", milliseconds),
            Self::FirmwareRetract => f.write_str("G10"),
            Self::FirmwareUnretract => f.write_str("G11"),
            Self::SpeedOverride(percent) => write!(f, "M220S{:.2}", percent),
            Self::ExtrudeOverride(percent) => write!(f, "M221S{:.2}", percent),
            Self::ForceMove {
                stepper,
                distance,
                velocity,
                accel,
            } => write!(
                f,
                "FORCE_MOVE STEPPER={} DISTANCE={:.4} VELOCITY={} ACCEL={}",
                stepper, distance, velocity, accel
            ),
            Self::SetRetraction(settings) => {
                f.write_str("SET_RETRACTION")?;
                let params = [
                    ("RETRACT_LENGTH", settings.length),
                    ("RETRACT_SPEED", settings.speed),
                    ("UNRETRACT_EXTRA_LENGTH", settings.unretract_extra_length),
                    ("UNRETRACT_SPEED", settings.unretract_speed),
                ];
                for (name, value) in params {
                    if let Some(value) = value {
                        write!(f, " {}={}", name, value)?;
                    }
                }
                Ok(())
            }
            Self::Macro(klipper_macro) => f.write_str(klipper_macro.name()),
        }
    }
}

/// A command with an optional trailing comment
#[derive(Debug, Clone, PartialEq)]
pub struct GcodeLine {
    pub command: GcodeCommand,
    pub comment: Option<String>,
}

impl GcodeLine {
    pub fn new(command: GcodeCommand) -> Self {
        Self {
            command,
            comment: None,
        }
    }

    pub fn with_comment(command: GcodeCommand, comment: impl Into<String>) -> Self {
        Self {
            command,
            comment: Some(comment.into()),
        }
    }

    /// Comment-only line
    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(GcodeCommand::Comment(text.into()))
    }

    pub fn is_comment(&self) -> bool {
        self.command.is_comment()
    }
}

impl From<GcodeCommand> for GcodeLine {
    fn from(command: GcodeCommand) -> Self {
        Self::new(command)
    }
}

impl fmt::Display for GcodeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        if let Some(comment) = &self.comment {
            write!(f, " ; {}", comment)?;
        }
        Ok(())
    }
}
