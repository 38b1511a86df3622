use crate::{generated_moves, parked_emitter};
use extrudekit_camtools::apertures::DEFAULT_OVERLAP;
use extrudekit_camtools::ApertureGenerator;
use extrudekit_core::Position;

#[test]
fn test_square_aperture_spirals_inward() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .square_aperture(2.0, 1.0, 0.0)
        .unwrap();

    // stride 0.5: sides 2.0, 1.5 then 1.0 stops the spiral
    assert_eq!(
        generated_moves(&emitter),
        vec!["G91", "G1X2.000", "G1Y2.000", "G1X-1.500", "G1Y-1.500"]
    );
    let end = emitter.current_position();
    assert!((end.x - 10.5).abs() < 1e-9);
    assert!((end.y - 10.5).abs() < 1e-9);
}

#[test]
fn test_square_aperture_default_overlap() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .square_aperture(3.0, 2.0, DEFAULT_OVERLAP)
        .unwrap();

    // stride 0.375: sides 3.0 down to 1.875, then 1.5 stops
    assert_eq!(
        generated_moves(&emitter),
        vec![
            "G91",
            "G1X3.000",
            "G1Y3.000",
            "G1X-2.625",
            "G1Y-2.625",
            "G1X2.250",
            "G1Y2.250",
            "G1X-1.875",
            "G1Y-1.875",
        ]
    );
}

#[test]
fn test_square_aperture_without_room_emits_nothing() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .square_aperture(1.0, 1.0, 0.25)
        .unwrap();
    assert_eq!(emitter.script().len(), 1);
}

#[test]
fn test_rect_aperture() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .rect_aperture(6.0, 3.0, 3.0, 2.0, 0.0)
        .unwrap();

    assert_eq!(
        generated_moves(&emitter),
        vec![
            // frame spiral around the inner rectangle
            "G91",
            "G1X3.000",
            "G1Y2.000",
            "G1X-3.500",
            "G1Y-2.500",
            // low-X block
            "G90",
            "G1X9.500",
            "G1Y9.500",
            "G91",
            "G1Y3.000",
            "G1X-0.500",
            "G1Y-3.000",
            // high-X block
            "G90",
            "G1X13.750",
            "G1Y9.500",
            "G91",
            "G1Y3.000",
            "G1X0.500",
            "G1Y-3.000",
        ]
    );
    assert_eq!(
        emitter.modal_mode(),
        extrudekit_core::ModalMode::Incremental
    );
}

#[test]
fn test_rect_aperture_high_block_uses_final_spiral_height() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .rect_aperture(6.2, 3.2, 3.0, 2.0, 0.0)
        .unwrap();

    let moves = generated_moves(&emitter);
    let low = moves.iter().position(|l| l == "G1X9.400").unwrap();
    let high = moves.iter().position(|l| l == "G1X13.850").unwrap();

    // the spiral overshoots outer_y to 3.5, the high-X block follows it
    assert_eq!(moves[low + 3], "G1Y3.200");
    assert_eq!(moves[high + 3], "G1Y3.500");
}

#[test]
fn test_rect_aperture_starts_from_current_position() {
    let mut emitter = parked_emitter();
    let start = emitter.current_position();
    assert_eq!(start, Position::new(10.0, 10.0, 0.0));
    ApertureGenerator::new(&mut emitter)
        .rect_aperture(6.0, 3.0, 3.0, 2.0, 0.0)
        .unwrap();

    let end = emitter.current_position();
    assert!((end.x - 14.25).abs() < 1e-9);
    assert!((end.y - 9.5).abs() < 1e-9);
}

#[test]
fn test_unbounded_square_is_rejected() {
    let mut emitter = parked_emitter();
    let before = emitter.script().len();
    let err = ApertureGenerator::new(&mut emitter)
        .square_aperture(10.0, f64::NEG_INFINITY, DEFAULT_OVERLAP)
        .unwrap_err();
    assert!(err.is_configuration_error());
    assert_eq!(emitter.script().len(), before);
}

#[test]
fn test_unbounded_rect_is_rejected() {
    let mut emitter = parked_emitter();
    let before = emitter.script().len();
    for (outer_x, outer_y, inner_x, inner_y) in [
        (20.0, f64::INFINITY, 10.0, 4.0),
        (f64::NAN, 8.0, 10.0, 4.0),
        (20.0, 8.0, 10.0, f64::NEG_INFINITY),
    ] {
        let err = ApertureGenerator::new(&mut emitter)
            .rect_aperture(outer_x, outer_y, inner_x, inner_y, DEFAULT_OVERLAP)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }
    assert_eq!(emitter.script().len(), before);
}
