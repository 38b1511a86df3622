//! Motion emitter
//!
//! Stateful translator from move requests to G-code. The emitter tracks the
//! modal state the printer will be in after executing everything emitted so
//! far and only writes mode switches when the mode actually changes.
//!
//! Every operation runs against a draft copy of the emitter state. Lines
//! are collected in the draft and appended to the script only when the
//! operation succeeds, so a failed operation leaves both the state and the
//! script untouched.
//!
//! Around travel moves the emitter can bracket the move with firmware
//! retraction and a Z-lift. Any Z motion that reverses the Z motor rotation
//! direction is preceded by a backlash compensation block driving the Z
//! stepper of the active tool by the configured backlash.

use crate::command::{GcodeCommand, GcodeLine, KlipperMacro, RetractionSettings};
use crate::machine_state::MachineState;
use crate::move_request::MoveRequest;
use crate::script::ScriptBuffer;
use extrudekit_core::{
    Axis, ConfigurationError, FlowGeometry, ModalMode, Position, Result, RotationDirection,
    ToolIndex,
};
use extrudekit_settings::{PrintProperties, PropertyValue};

const FORCE_MOVE_VELOCITY: f64 = 0.6;
const FORCE_MOVE_ACCEL: f64 = 0.5;

fn z_stepper(tool: ToolIndex) -> &'static str {
    match tool {
        ToolIndex::T0 => "stepper_z",
        ToolIndex::T1 => "stepper_z1",
    }
}

/// Staged copy of the emitter state for one operation
#[derive(Debug, Clone)]
struct Draft {
    state: MachineState,
    properties: PrintProperties,
    parked: PrintProperties,
    lines: Vec<GcodeLine>,
}

impl Draft {
    fn push(&mut self, command: GcodeCommand) {
        self.lines.push(GcodeLine::new(command));
    }

    fn push_commented(&mut self, command: GcodeCommand, comment: &str) {
        self.lines.push(GcodeLine::with_comment(command, comment));
    }

    fn comment(&mut self, text: impl Into<String>) {
        self.lines.push(GcodeLine::comment(text));
    }

    fn simulation(&self) -> bool {
        self.properties.simulation
    }

    fn set_mode(&mut self, mode: ModalMode) {
        if self.state.modal_mode() != mode {
            self.push(GcodeCommand::DistanceMode(mode));
            self.state.set_modal_mode(mode);
        }
    }

    /// Emit a FORCE_MOVE block when `z` reverses the Z motor direction
    fn compensate_backlash(&mut self, z: f64) {
        let next = RotationDirection::from_delta(self.state.z_delta(z));
        let last = self.state.last_vertical_direction();
        let backlash = self.properties.backlash;

        if next != last && backlash > 0.0 && !self.simulation() {
            tracing::trace!("Backlash flip {} -> {} ({:.3}mm)", last, next, backlash);
            self.comment(format!("Backlash Compensation ({:.2}mm)", backlash));
            self.comment(format!("Last: {} - Next: {}", last, next));
            self.push(GcodeCommand::ForceMove {
                stepper: z_stepper(self.state.tool()),
                distance: next.sign() * backlash,
                velocity: FORCE_MOVE_VELOCITY,
                accel: FORCE_MOVE_ACCEL,
            });
        }
        self.state.set_last_vertical_direction(next);
    }

    fn toolchange(&mut self) {
        let next = self.state.tool().other();
        std::mem::swap(&mut self.properties, &mut self.parked);
        self.push(GcodeCommand::SelectTool(next));
        self.state.set_tool(next);
    }

    fn record_feed(&mut self, feed: f64) {
        self.properties.feedrate = Some(feed);
        self.state.set_feedrate(feed);
    }

    /// Incremental Z move that does not change the tracked position
    fn lift(&mut self, amount: f64, comment: &str) {
        self.set_mode(ModalMode::Incremental);
        self.compensate_backlash(amount);
        self.comment(comment);
        self.push(GcodeCommand::z_move(amount));
    }
}

/// Stateful G-code emitter for one print session
#[derive(Debug, Clone, Default)]
pub struct MotionEmitter {
    state: MachineState,
    properties: PrintProperties,
    parked: PrintProperties,
    script: ScriptBuffer,
}

impl MotionEmitter {
    /// Create an emitter with the active tool's properties
    ///
    /// The parked toolhead starts with default properties; configure it with
    /// [`MotionEmitter::set_tool_properties`] before switching to it.
    pub fn new(properties: PrintProperties) -> Self {
        let mut state = MachineState::new();
        state.set_tool(properties.start_tool);
        if let Some(feed) = properties.feedrate {
            state.set_feedrate(feed);
        }
        Self {
            state,
            properties,
            parked: PrintProperties::default(),
            script: ScriptBuffer::new(),
        }
    }

    fn draft(&self) -> Draft {
        Draft {
            state: self.state,
            properties: self.properties.clone(),
            parked: self.parked.clone(),
            lines: Vec::new(),
        }
    }

    fn commit(&mut self, operation: &str, draft: Draft) {
        tracing::debug!("{}: {} line(s)", operation, draft.lines.len());
        for line in &draft.lines {
            tracing::trace!("{}", line);
        }
        self.state = draft.state;
        self.properties = draft.properties;
        self.parked = draft.parked;
        self.script.append(draft.lines);
    }

    fn transact<T>(
        &mut self,
        operation: &str,
        apply: impl FnOnce(&mut Draft) -> Result<T>,
    ) -> Result<T> {
        let mut draft = self.draft();
        match apply(&mut draft) {
            Ok(value) => {
                self.commit(operation, draft);
                Ok(value)
            }
            Err(e) => {
                tracing::debug!("{} rejected: {}", operation, e);
                Err(e)
            }
        }
    }

    fn emit(&mut self, operation: &str, apply: impl FnOnce(&mut Draft)) {
        let mut draft = self.draft();
        apply(&mut draft);
        self.commit(operation, draft);
    }

    /// Start code: units, modes, tool selection and preheat
    pub fn begin_session(&mut self) {
        tracing::info!(
            "Beginning print session with {} (simulation: {})",
            self.properties.start_tool,
            self.properties.simulation
        );
        self.emit("begin_session", |draft| {
            let start_tool = draft.properties.start_tool;
            let t0_temp = draft.properties.t0_temp;
            let bed_temp = draft.properties.bed_temp;

            draft.comment("start code");
            draft.push_commented(GcodeCommand::UnitsMillimeters, "units mm");
            draft.push_commented(GcodeCommand::DistanceMode(ModalMode::Absolute), "absolute mode");
            draft.state.set_modal_mode(ModalMode::Absolute);
            draft.push_commented(GcodeCommand::RelativeExtrusion, "relative extrusion");
            draft.push(GcodeCommand::SelectTool(start_tool));
            draft.state.set_tool(start_tool);

            draft.comment("Preheat");
            draft.push(GcodeCommand::HotendTemperature {
                tool: ToolIndex::T0,
                celsius: t0_temp,
                wait: false,
            });
            draft.push(GcodeCommand::BedTemperature {
                celsius: bed_temp,
                wait: true,
            });
            draft.comment("wait for temp to be reached...");
            draft.push(GcodeCommand::HotendTemperature {
                tool: ToolIndex::T0,
                celsius: t0_temp,
                wait: true,
            });

            if !draft.simulation() {
                draft.push_commented(GcodeCommand::Macro(KlipperMacro::StartPrint), "klipper start code");
                // start_print homes Z, which leaves the motor turning upward
                draft
                    .state
                    .set_last_vertical_direction(RotationDirection::CounterClockwise);
            }
        });
    }

    /// End code
    pub fn end_session(&mut self) {
        self.emit("end_session", |draft| {
            if !draft.simulation() {
                draft.push_commented(GcodeCommand::Macro(KlipperMacro::EndPrint), "klipper end code");
            }
        });
        tracing::info!("Print session ended, {} line(s) emitted", self.script.len());
    }

    /// Switch the distance mode, writing G90/G91 only on change
    pub fn set_mode(&mut self, mode: ModalMode) {
        self.emit("set_mode", |draft| draft.set_mode(mode));
    }

    /// Non-extruding move, optionally bracketed by retraction and a Z-lift
    pub fn travel_move(&mut self, request: MoveRequest) -> Result<()> {
        request.validate()?;
        self.transact("travel_move", |draft| {
            if request.tool_change {
                draft.toolchange();
            }

            let simulation = draft.simulation();
            let retract = request.retract && !simulation;
            let lift = if simulation { 0.0 } else { request.z_lift };

            if retract {
                draft.comment("Retract");
                draft.push(GcodeCommand::FirmwareRetract);
            }
            if lift > 0.0 {
                draft.lift(lift, "Z-Lift");
            }

            draft.set_mode(request.mode);
            let target = request.target;
            if let Some(x) = target.x {
                draft.state.apply_axis(Axis::X, x);
            }
            if let Some(y) = target.y {
                draft.state.apply_axis(Axis::Y, y);
            }
            if let Some(z) = target.z {
                draft.compensate_backlash(z);
                draft.state.apply_axis(Axis::Z, z);
            }
            if let Some(feed) = request.feed {
                draft.record_feed(feed);
            }
            if !target.is_empty() || request.feed.is_some() {
                draft.push(GcodeCommand::LinearMove {
                    x: target.x,
                    y: target.y,
                    z: target.z,
                    e: None,
                    feed: request.feed,
                });
            }

            if lift > 0.0 && target.z.is_none() {
                draft.lift(-lift, "Undo Z-Lift");
            }
            if retract {
                draft.comment("Unretract");
                draft.push(GcodeCommand::FirmwareUnretract);
            }
            draft.set_mode(request.mode);
            Ok(())
        })
    }

    /// Extruding move with the E value derived from the flow model
    ///
    /// Lift, retract and tool change flags of the request are ignored.
    pub fn extrude_move(&mut self, request: MoveRequest) -> Result<()> {
        request.validate()?;
        self.transact("extrude_move", |draft| {
            let geometry = draft.properties.flow_geometry()?;
            draft.set_mode(request.mode);

            let target = request.target;
            let start = draft.state.position();
            if let Some(x) = target.x {
                draft.state.apply_axis(Axis::X, x);
            }
            if let Some(y) = target.y {
                draft.state.apply_axis(Axis::Y, y);
            }
            if let Some(z) = target.z {
                draft.compensate_backlash(z);
                draft.state.apply_axis(Axis::Z, z);
            }
            if let Some(feed) = request.feed {
                draft.record_feed(feed);
            }
            let length = start.distance_to(&draft.state.position());

            draft.push(GcodeCommand::LinearMove {
                x: target.x,
                y: target.y,
                z: target.z,
                e: Some(geometry.extrusion_for(length)),
                feed: request.feed,
            });
            Ok(())
        })
    }

    /// Set the feed rate without moving
    pub fn set_feed(&mut self, feed: f64) -> Result<()> {
        MoveRequest::absolute().feed(feed).validate()?;
        self.emit("set_feed", |draft| {
            draft.push(GcodeCommand::Feedrate(feed));
            draft.record_feed(feed);
        });
        Ok(())
    }

    /// Set or increment the speed factor override (M220); zero is a no-op
    pub fn set_speed_override(&mut self, value: f64, increment: bool) -> Result<()> {
        self.transact("set_speed_override", |draft| {
            let percent = apply_override(draft.properties.speed_override, value, increment, "speed_override")?;
            if let Some(percent) = percent {
                draft.properties.speed_override = percent;
                draft.push(GcodeCommand::SpeedOverride(percent));
            }
            Ok(())
        })
    }

    /// Set or increment the extrude factor override (M221); zero is a no-op
    pub fn set_extrude_override(&mut self, value: f64, increment: bool) -> Result<()> {
        self.transact("set_extrude_override", |draft| {
            let percent = apply_override(
                draft.properties.extrude_override,
                value,
                increment,
                "extrude_override",
            )?;
            if let Some(percent) = percent {
                draft.properties.extrude_override = percent;
                draft.push(GcodeCommand::ExtrudeOverride(percent));
            }
            Ok(())
        })
    }

    /// Pause for the given number of seconds
    pub fn dwell(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ConfigurationError::invalid(
                "dwell",
                "time cannot be negative",
            )
            .into());
        }
        self.emit("dwell", |draft| draft.push(GcodeCommand::Dwell(seconds * 1e3)));
        Ok(())
    }

    pub fn retract(&mut self) {
        self.emit("retract", |draft| {
            if !draft.simulation() {
                draft.comment("Retract");
                draft.push(GcodeCommand::FirmwareRetract);
            }
        });
    }

    pub fn unretract(&mut self) {
        self.emit("unretract", |draft| {
            if !draft.simulation() {
                draft.comment("Unretract");
                draft.push(GcodeCommand::FirmwareUnretract);
            }
        });
    }

    /// Push filament without moving the toolhead
    pub fn manual_extrude(&mut self, distance: f64) -> Result<()> {
        if !distance.is_finite() {
            return Err(ConfigurationError::invalid(
                "distance",
                "value must be finite",
            )
            .into());
        }
        self.emit("manual_extrude", |draft| {
            draft.comment("Manual Extrude Filament");
            draft.push(GcodeCommand::ManualExtrude(distance));
        });
        Ok(())
    }

    /// Z probe of the active tool
    pub fn probe_tool(&mut self) {
        self.emit("probe_tool", |draft| {
            if !draft.simulation() {
                draft.push_commented(GcodeCommand::Macro(KlipperMacro::Probe), "klipper macro for probe");
            }
        });
    }

    /// Switch to the other toolhead and its parameter set
    pub fn toolchange(&mut self) {
        self.emit("toolchange", Draft::toolchange);
        tracing::debug!("Active tool is now {}", self.state.tool());
    }

    /// Select a toolhead by index; selecting the active tool emits nothing
    pub fn set_tool(&mut self, index: i64) -> Result<()> {
        let tool = ToolIndex::from_index(index)?;
        self.emit("set_tool", |draft| {
            if draft.state.tool() != tool {
                draft.toolchange();
            }
        });
        Ok(())
    }

    /// Replace the parameter set of a tool, active or parked
    pub fn set_tool_properties(&mut self, tool: ToolIndex, properties: PrintProperties) -> Result<()> {
        properties.validate()?;
        if tool == self.state.tool() {
            self.properties = properties;
        } else {
            self.parked = properties;
        }
        tracing::debug!("Replaced properties of {}", tool);
        Ok(())
    }

    /// Configure firmware retraction (SET_RETRACTION)
    pub fn set_firmware_retraction(&mut self, settings: RetractionSettings) {
        self.emit("set_firmware_retraction", |draft| {
            if !draft.simulation() {
                draft.push(GcodeCommand::SetRetraction(settings));
            }
        });
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.emit("add_comment", |draft| draft.comment(text));
    }

    pub fn current_position(&self) -> Position {
        self.state.position()
    }

    pub fn modal_mode(&self) -> ModalMode {
        self.state.modal_mode()
    }

    pub fn last_vertical_direction(&self) -> RotationDirection {
        self.state.last_vertical_direction()
    }

    pub fn active_tool(&self) -> ToolIndex {
        self.state.tool()
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Properties of the active tool
    pub fn properties(&self) -> &PrintProperties {
        &self.properties
    }

    /// Properties of the parked tool
    pub fn parked_properties(&self) -> &PrintProperties {
        &self.parked
    }

    /// Validated flow geometry of the active tool
    pub fn flow_geometry(&self) -> Result<FlowGeometry> {
        Ok(self.properties.flow_geometry()?)
    }

    /// Read an active tool property by case-insensitive name
    pub fn get_property(&self, name: &str) -> Result<PropertyValue> {
        self.properties.get_by_name(name)
    }

    /// Merge named values into the active tool properties, all or nothing
    pub fn set_properties<I, K>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: AsRef<str>,
    {
        self.properties.set_properties(values)?;
        if let Some(feed) = self.properties.feedrate {
            self.state.set_feedrate(feed);
        }
        Ok(())
    }

    pub fn script(&self) -> &ScriptBuffer {
        &self.script
    }

    /// Emitted script as text
    pub fn script_text(&self) -> String {
        self.script.render()
    }
}

/// New override percentage, or `None` when `value` is zero
fn apply_override(current: f64, value: f64, increment: bool, key: &str) -> Result<Option<f64>> {
    if !value.is_finite() {
        return Err(ConfigurationError::invalid(key, "value must be finite").into());
    }
    if value == 0.0 {
        return Ok(None);
    }
    Ok(Some(if increment { current + value } else { value }))
}
