//! Saving and uploading scripts
//!
//! Uploading writes into the gcode directory the printer host watches. In
//! simulation the script replaces the web viewer's preview file instead, so
//! nothing reaches the printer queue.

use crate::error::{CommunicationError, CommunicationResult};
use extrudekit_settings::OutputSettings;
use std::path::{Component, Path, PathBuf};

/// Writes rendered scripts to their destinations
#[derive(Debug, Clone)]
pub struct ScriptExporter {
    output: OutputSettings,
}

impl ScriptExporter {
    pub fn new(output: OutputSettings) -> Self {
        Self { output }
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }

    /// Write `script` to `path`, creating parent directories
    pub fn save(&self, script: &str, path: &Path) -> CommunicationResult<()> {
        let write_error = |source| CommunicationError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, script).map_err(write_error)?;
        tracing::info!("File saved at {}", path.display());
        Ok(())
    }

    /// Destination `upload` would write to
    pub fn upload_path(&self, name: &str, simulation: bool) -> CommunicationResult<PathBuf> {
        if simulation {
            return Ok(self.output.preview_file.clone());
        }

        let mut components = Path::new(name).components();
        let valid = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !valid {
            return Err(CommunicationError::InvalidName(name.to_string()));
        }
        Ok(self.output.gcode_directory.join(format!("{}.gcode", name)))
    }

    /// Upload `script` under `name`, or to the preview file in simulation
    pub fn upload(&self, script: &str, name: &str, simulation: bool) -> CommunicationResult<PathBuf> {
        let path = self.upload_path(name, simulation)?;
        self.save(script, &path)?;
        Ok(path)
    }
}
