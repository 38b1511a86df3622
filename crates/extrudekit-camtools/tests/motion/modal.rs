use crate::common::*;
use extrudekit_camtools::MoveRequest;
use extrudekit_core::{ModalMode, Position};

#[test]
fn test_mode_written_once_for_consecutive_incremental_moves() {
    let mut em = emitter();
    em.extrude_move(MoveRequest::incremental().x(10.0)).unwrap();
    em.extrude_move(MoveRequest::incremental().y(10.0)).unwrap();

    let lines = em.script().line_texts();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "G91");
    assert_eq!(lines[1], "G1X10.000E0.332601");
    assert_eq!(lines[2], "G1Y10.000E0.332601");
    assert_eq!(em.modal_mode(), ModalMode::Incremental);
}

#[test]
fn test_switch_back_to_absolute() {
    let mut em = emitter();
    em.extrude_move(MoveRequest::incremental().x(1.0)).unwrap();
    let mark = em.script().len();
    em.travel_move(MoveRequest::absolute().x(5.0)).unwrap();

    assert_eq!(lines_from(&em, mark), vec!["G90", "G1X5.000"]);
    assert_eq!(em.current_position(), Position::new(5.0, 0.0, 0.0));
}

#[test]
fn test_travel_restores_requested_mode_after_lift() {
    let mut em = emitter();
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
            "; Undo Z-Lift",
            "G1Z-2.000",
            "G90",
        ]
    );
    assert_eq!(em.modal_mode(), ModalMode::Absolute);
}

#[test]
fn test_incremental_positions_accumulate() {
    let mut em = emitter();
    em.travel_move(MoveRequest::absolute().x(1.0).y(2.0).z(3.0))
        .unwrap();
    em.travel_move(MoveRequest::incremental().x(0.5).z(-1.0))
        .unwrap();
    assert_eq!(em.current_position(), Position::new(1.5, 2.0, 2.0));
}

#[test]
fn test_first_move_in_absolute_writes_no_mode() {
    let mut em = emitter();
    em.travel_move(MoveRequest::absolute().x(1.0).feed(1500.0))
        .unwrap();
    assert_eq!(em.script().line_texts(), vec!["G1X1.000F1500.000"]);
    assert_eq!(em.state().feedrate(), Some(1500.0));
}
