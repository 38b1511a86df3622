use extrudekit_camtools::MotionEmitter;
use extrudekit_settings::PrintProperties;

/// 0.4mm nozzle, 1.75mm filament, 0.4 x 0.2mm bead
pub fn reference_properties() -> PrintProperties {
    PrintProperties::with_geometry(0.4, 1.75, 0.4, 0.2)
}

pub fn emitter() -> MotionEmitter {
    MotionEmitter::new(reference_properties())
}

pub fn emitter_with_backlash(backlash: f64) -> MotionEmitter {
    let mut props = reference_properties();
    props.backlash = backlash;
    MotionEmitter::new(props)
}

/// Rendered lines emitted since `from`
pub fn lines_from(emitter: &MotionEmitter, from: usize) -> Vec<String> {
    emitter.script().line_texts().split_off(from)
}

/// Line text without its E and F words
pub fn without_extrusion(line: &str) -> &str {
    line.split('E').next().unwrap_or(line)
}

/// E word of a rendered move
pub fn e_value(line: &str) -> f64 {
    let tail = line.split('E').nth(1).expect("line has no E word");
    tail.split('F').next().unwrap().parse().unwrap()
}
