//! # ExtrudeKit Communication
//!
//! Delivery of generated scripts to the printer host: saving to disk,
//! uploading into the host's gcode directory (or the simulation preview
//! file) and streaming line by line through a [`CommandSender`].

pub mod error;
pub mod export;
pub mod sender;
pub mod stream;

pub use error::{CommunicationError, CommunicationResult};
pub use export::ScriptExporter;
pub use sender::{CommandSender, NoOpSender, RecordingSender, SendResponse};
pub use stream::{stream_script, StreamReport};
