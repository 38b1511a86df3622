//! # ExtrudeKit
//!
//! A stateful G-code generator for extrusion toolpaths on Klipper-driven
//! printers. Moves are emitted with Z backlash compensation, firmware
//! retraction and Z-lift bracketing, with extrusion lengths derived from the
//! bead geometry.
//!
//! ## Architecture
//!
//! ExtrudeKit is organized as a workspace with multiple crates:
//!
//! 1. **extrudekit-core** - Shared types, error taxonomy, flow model
//! 2. **extrudekit-settings** - Print properties and configuration files
//! 3. **extrudekit-camtools** - Motion emitter, command stream, aperture generators
//! 4. **extrudekit-communication** - Script export, upload and streaming
//! 5. **extrudekit** - Command line binary that integrates all crates

pub mod cli;

pub use extrudekit_core::data;

pub use extrudekit_core::{
    extrusion_for, Axis, ConfigurationError, Error, FlowGeometry, InvalidModeError, ModalMode,
    NotFoundError, PartialPosition, Position, Result, RotationDirection, ToolIndex,
};

pub use extrudekit_settings::{
    Config, OutputSettings, PrintProperties, PropertyKey, PropertyValue, SettingsError,
};

pub use extrudekit_camtools::{
    ApertureGenerator, GcodeCommand, GcodeLine, KlipperMacro, MachineState, MotionEmitter,
    MoveRequest, RetractionSettings, ScriptBuffer, DEFAULT_OVERLAP,
};

pub use extrudekit_communication::{
    stream_script, CommandSender, CommunicationError, NoOpSender, RecordingSender,
    ScriptExporter, SendResponse, StreamReport,
};

pub use cli::LogFormat;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Events go to stderr so a script printed with `--show` stays clean.
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
