//! # ExtrudeKit CAM Tools
//!
//! This crate turns geometric move requests into a G-code command stream for
//! a Klipper-driven extrusion printer.
//!
//! ## Components
//!
//! - **Commands**: typed G-code commands, rendered to text only when read
//! - **Script Buffer**: append-only, ordered command stream
//! - **Machine State**: position, distance mode, Z rotation direction, tool
//! - **Motion Emitter**: the state machine that emits travel and extrusion
//!   moves, mode switches, backlash compensation, retraction and Z-lift
//!   bracketing
//! - **Aperture Generator**: hollow square/rectangle apertures and lattices
//!   built from emitter moves
//!
//! ## Usage
//!
//! ```rust,ignore
//! use extrudekit_camtools::{MotionEmitter, MoveRequest};
//! use extrudekit_settings::PrintProperties;
//!
//! let mut emitter = MotionEmitter::new(PrintProperties::with_geometry(0.4, 1.75, 0.4, 0.2));
//! emitter.begin_session();
//! emitter.travel_move(MoveRequest::absolute().x(10.0).y(10.0).z_lift(2.0))?;
//! emitter.extrude_move(MoveRequest::incremental().x(20.0))?;
//! emitter.end_session();
//! println!("{}", emitter.script_text());
//! ```

pub mod apertures;
pub mod command;
pub mod emitter;
pub mod machine_state;
pub mod move_request;
pub mod script;

pub use apertures::{ApertureGenerator, DEFAULT_OVERLAP};
pub use command::{GcodeCommand, GcodeLine, KlipperMacro, RetractionSettings};
pub use emitter::MotionEmitter;
pub use machine_state::MachineState;
pub use move_request::MoveRequest;
pub use script::ScriptBuffer;
