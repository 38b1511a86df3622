use crate::common::*;
use extrudekit_camtools::MoveRequest;
use extrudekit_core::{ModalMode, Position, RotationDirection};

#[test]
fn test_retract_and_lift_around_travel() {
    let mut em = emitter();
    em.travel_move(
        MoveRequest::absolute()
            .x(5.0)
            .y(5.0)
            .feed(3000.0)
            .z_lift(1.5)
            .retract(),
    )
    .unwrap();

    assert_eq!(
        em.script().line_texts(),
        vec![
            "; Retract",
            "G10",
            "G91",
            "; Z-Lift",
            "G1Z1.500",
            "G90",
            "G1X5.000Y5.000F3000.000",
            "G91",
            "; Undo Z-Lift",
            "G1Z-1.500",
            "; Unretract",
            "G11",
            "G90",
        ]
    );
}

#[test]
fn test_lift_does_not_change_position() {
    let mut em = emitter();
    em.travel_move(MoveRequest::absolute().x(5.0).z_lift(3.0))
        .unwrap();
    assert_eq!(em.current_position(), Position::new(5.0, 0.0, 0.0));
}

#[test]
fn test_no_undo_when_z_is_supplied() {
    let mut em = emitter();
    em.travel_move(MoveRequest::absolute().z(3.0).z_lift(1.0))
        .unwrap();

    assert_eq!(
        em.script().line_texts(),
        vec!["G91", "; Z-Lift", "G1Z1.000", "G90", "G1Z3.000"]
    );
    assert_eq!(em.current_position().z, 3.0);
}

#[test]
fn test_lowering_after_lift_is_compensated() {
    let mut em = emitter_with_backlash(0.1);
    em.travel_move(MoveRequest::absolute().x(10.0).z_lift(2.0))
        .unwrap();

    assert_eq!(
        em.script().line_texts(),
        vec![
            "G91",
            "; Z-Lift",
            "G1Z2.000",
            "G90",
            "G1X10.000",
            "G91",
            "; Backlash Compensation (0.10mm)",
            "; Last: ccw - Next: cw",
            "FORCE_MOVE STEPPER=stepper_z DISTANCE=-0.1000 VELOCITY=0.6 ACCEL=0.5",
            "; Undo Z-Lift",
            "G1Z-2.000",
            "G90",
        ]
    );
    assert_eq!(em.last_vertical_direction(), RotationDirection::Clockwise);
}

#[test]
fn test_simulation_skips_retract_and_lift() {
    let mut props = reference_properties();
    props.simulation = true;
    let mut em = extrudekit_camtools::MotionEmitter::new(props);

    em.travel_move(MoveRequest::absolute().x(5.0).z_lift(2.0).retract())
        .unwrap();
    assert_eq!(em.script().line_texts(), vec!["G1X5.000"]);
}

#[test]
fn test_request_without_axes() {
    let mut em = emitter();
    em.travel_move(MoveRequest::incremental().retract()).unwrap();
    assert_eq!(
        em.script().line_texts(),
        vec!["; Retract", "G10", "G91", "; Unretract", "G11"]
    );
    assert_eq!(em.modal_mode(), ModalMode::Incremental);
}

#[test]
fn test_negative_lift_rejected() {
    let mut em = emitter();
    let err = em
        .travel_move(MoveRequest::absolute().x(1.0).z_lift(-1.0))
        .unwrap_err();
    assert!(err.is_configuration_error());
    assert!(em.script().is_empty());
}
