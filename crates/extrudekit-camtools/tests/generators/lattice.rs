use crate::{generated_moves, parked_emitter};
use extrudekit_camtools::ApertureGenerator;

#[test]
fn test_lattice_two_bars_per_pass() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .lattice(4.0, 1.0, 10.0)
        .unwrap();

    assert_eq!(
        generated_moves(&emitter),
        vec![
            "G91",
            "G1X10.000",
            "G1Y1.000",
            "G1X-10.000",
            "G1Y1.000",
            "G1X10.000",
            "G1Y1.000",
            "G1X-10.000",
            "G1Y1.000",
        ]
    );
    let end = emitter.current_position();
    assert_eq!((end.x, end.y), (10.0, 14.0));
}

#[test]
fn test_pass_count_follows_spacing() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .lattice(4.0, 0.5, 10.0)
        .unwrap();
    // G91 plus four passes of four moves
    assert_eq!(generated_moves(&emitter).len(), 17);
    let end = emitter.current_position();
    assert_eq!((end.x, end.y), (10.0, 14.0));
}

#[test]
fn test_partial_extent_gets_a_full_pass() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .lattice(3.0, 1.0, 5.0)
        .unwrap();
    // 3 -> 1 -> -1
    assert_eq!(generated_moves(&emitter).len(), 9);
}

#[test]
fn test_lattice_rejects_bad_bounds() {
    let mut emitter = parked_emitter();
    let before = emitter.script().len();
    for (extent, spacing, length) in [
        (f64::INFINITY, 1.0, 10.0),
        (4.0, 1.0, f64::NAN),
        (4.0, 0.0, 10.0),
        (4.0, -1.0, 10.0),
    ] {
        let err = ApertureGenerator::new(&mut emitter)
            .lattice(extent, spacing, length)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }
    assert_eq!(emitter.script().len(), before);
}

#[test]
fn test_empty_lattice() {
    let mut emitter = parked_emitter();
    ApertureGenerator::new(&mut emitter)
        .lattice(0.0, 1.0, 10.0)
        .unwrap();
    assert!(generated_moves(&emitter).is_empty());
}
