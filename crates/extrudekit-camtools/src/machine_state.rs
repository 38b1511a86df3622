//! Modal machine state tracked while emitting

use extrudekit_core::{Axis, ModalMode, Position, RotationDirection, ToolIndex};

/// State the printer will be in after executing every emitted line
///
/// Z-lift bracketing moves never change `position`; they are undone before
/// the move completes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MachineState {
    position: Position,
    modal_mode: ModalMode,
    last_vertical_direction: RotationDirection,
    feedrate: Option<f64>,
    tool: ToolIndex,
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn modal_mode(&self) -> ModalMode {
        self.modal_mode
    }

    pub fn last_vertical_direction(&self) -> RotationDirection {
        self.last_vertical_direction
    }

    /// Last commanded feed rate in mm/min
    pub fn feedrate(&self) -> Option<f64> {
        self.feedrate
    }

    pub fn tool(&self) -> ToolIndex {
        self.tool
    }

    pub(crate) fn set_modal_mode(&mut self, mode: ModalMode) {
        self.modal_mode = mode;
    }

    pub(crate) fn set_last_vertical_direction(&mut self, direction: RotationDirection) {
        self.last_vertical_direction = direction;
    }

    pub(crate) fn set_feedrate(&mut self, feedrate: f64) {
        self.feedrate = Some(feedrate);
    }

    pub(crate) fn set_tool(&mut self, tool: ToolIndex) {
        self.tool = tool;
    }

    /// Signed Z travel a target implies under the current mode
    pub(crate) fn z_delta(&self, z: f64) -> f64 {
        match self.modal_mode {
            ModalMode::Incremental => z,
            ModalMode::Absolute => z - self.position.z,
        }
    }

    /// Update one axis from a target under the current mode
    pub(crate) fn apply_axis(&mut self, axis: Axis, value: f64) {
        let incremental = self.modal_mode.is_incremental();
        let slot = self.position.axis_mut(axis);
        if incremental {
            *slot += value;
        } else {
            *slot = value;
        }
    }
}
