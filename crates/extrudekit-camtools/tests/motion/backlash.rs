use crate::common::*;
use extrudekit_camtools::MoveRequest;
use extrudekit_core::{RotationDirection, ToolIndex};

#[test]
fn test_direction_flip_emits_force_move() {
    let mut em = emitter_with_backlash(0.2);
    em.extrude_move(MoveRequest::incremental().z(-0.5)).unwrap();

    let lines = em.script().line_texts();
    assert_eq!(lines[0], "G91");
    assert_eq!(lines[1], "; Backlash Compensation (0.20mm)");
    assert_eq!(lines[2], "; Last: ccw - Next: cw");
    assert_eq!(
        lines[3],
        "FORCE_MOVE STEPPER=stepper_z DISTANCE=-0.2000 VELOCITY=0.6 ACCEL=0.5"
    );
    assert_eq!(without_extrusion(&lines[4]), "G1Z-0.500");
    assert_eq!(lines.len(), 5);
    assert_eq!(em.last_vertical_direction(), RotationDirection::Clockwise);
}

#[test]
fn test_same_direction_emits_nothing_extra() {
    let mut em = emitter_with_backlash(0.2);
    em.travel_move(MoveRequest::incremental().z(-0.5)).unwrap();
    let mark = em.script().len();
    em.travel_move(MoveRequest::incremental().z(-0.5)).unwrap();
    assert_eq!(lines_from(&em, mark), vec!["G1Z-0.500"]);
}

#[test]
fn test_absolute_target_uses_delta_to_current() {
    let mut em = emitter_with_backlash(0.15);
    em.travel_move(MoveRequest::absolute().z(5.0)).unwrap();
    // upward from the homed state, no flip
    assert_eq!(em.script().line_texts(), vec!["G1Z5.000"]);

    em.travel_move(MoveRequest::absolute().z(4.0)).unwrap();
    em.travel_move(MoveRequest::absolute().z(4.5)).unwrap();
    let lines = em.script().line_texts();
    assert!(lines.contains(&"; Last: ccw - Next: cw".to_string()));
    assert!(lines.contains(&"; Last: cw - Next: ccw".to_string()));
    assert_eq!(
        lines[lines.len() - 2],
        "FORCE_MOVE STEPPER=stepper_z DISTANCE=0.1500 VELOCITY=0.6 ACCEL=0.5"
    );
}

#[test]
fn test_absolute_descent_compensates_once() {
    let mut em = emitter_with_backlash(0.2);
    em.travel_move(MoveRequest::absolute().z(-1.0)).unwrap();
    em.travel_move(MoveRequest::absolute().z(-2.0)).unwrap();

    let lines = em.script().line_texts();
    let nudges: Vec<_> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| line.starts_with("FORCE_MOVE"))
        .collect();
    assert_eq!(
        nudges,
        vec!["FORCE_MOVE STEPPER=stepper_z DISTANCE=-0.2000 VELOCITY=0.6 ACCEL=0.5"]
    );
    assert_eq!(lines.last().map(String::as_str), Some("G1Z-2.000"));
    assert_eq!(em.last_vertical_direction(), RotationDirection::Clockwise);
    assert_eq!(em.current_position().z, -2.0);
}

#[test]
fn test_absolute_target_at_current_height_counts_as_upward() {
    let mut em = emitter_with_backlash(0.2);
    em.travel_move(MoveRequest::incremental().z(-1.0)).unwrap();
    em.travel_move(MoveRequest::absolute().z(-1.0)).unwrap();
    assert_eq!(em.last_vertical_direction(), RotationDirection::CounterClockwise);
}

#[test]
fn test_zero_backlash_still_tracks_direction() {
    let mut em = emitter();
    em.travel_move(MoveRequest::incremental().z(-0.3)).unwrap();
    assert_eq!(em.script().line_texts(), vec!["G91", "G1Z-0.300"]);
    assert_eq!(em.last_vertical_direction(), RotationDirection::Clockwise);
}

#[test]
fn test_simulation_suppresses_force_move() {
    let mut props = reference_properties();
    props.backlash = 0.2;
    props.simulation = true;
    let mut em = extrudekit_camtools::MotionEmitter::new(props);

    em.travel_move(MoveRequest::incremental().z(-0.3)).unwrap();
    assert!(em
        .script()
        .iter()
        .all(|line| !line.to_string().starts_with("FORCE_MOVE")));
    assert_eq!(em.last_vertical_direction(), RotationDirection::Clockwise);
}

#[test]
fn test_second_tool_uses_its_own_stepper() {
    let mut em = emitter();
    let mut t1 = reference_properties();
    t1.backlash = 0.25;
    em.set_tool_properties(ToolIndex::T1, t1).unwrap();
    em.toolchange();

    em.travel_move(MoveRequest::incremental().z(-1.0)).unwrap();
    let lines = em.script().line_texts();
    assert!(lines.contains(
        &"FORCE_MOVE STEPPER=stepper_z1 DISTANCE=-0.2500 VELOCITY=0.6 ACCEL=0.5".to_string()
    ));
}
