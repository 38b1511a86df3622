use crate::common::*;
use extrudekit_camtools::RetractionSettings;
use extrudekit_settings::{PrintProperties, PropertyValue};

#[test]
fn test_get_property_case_insensitive() {
    let em = emitter();
    assert_eq!(
        em.get_property("Layer_Width").unwrap(),
        PropertyValue::Number(0.4)
    );
    assert_eq!(
        em.get_property("SIMULATION").unwrap(),
        PropertyValue::Flag(false)
    );
}

#[test]
fn test_unknown_property() {
    let mut em = emitter();
    assert!(em.get_property("spindle_speed").unwrap_err().is_not_found());

    let err = em
        .set_properties([
            ("backlash", PropertyValue::Number(0.3)),
            ("spindle_speed", PropertyValue::Number(1.0)),
        ])
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(em.properties().backlash, 0.0);
}

#[test]
fn test_unset_property_is_configuration_error() {
    let em = extrudekit_camtools::MotionEmitter::new(PrintProperties::default());
    assert!(em.get_property("feedrate").unwrap_err().is_configuration_error());
}

#[test]
fn test_set_properties_merges() {
    let mut em = emitter();
    em.set_properties([
        ("Backlash", PropertyValue::Number(0.3)),
        ("feedrate", PropertyValue::Number(900.0)),
    ])
    .unwrap();
    assert_eq!(em.properties().backlash, 0.3);
    assert_eq!(em.state().feedrate(), Some(900.0));
    assert!(em.script().is_empty());
}

#[test]
fn test_feed_and_overrides() {
    let mut em = emitter();
    em.set_feed(600.0).unwrap();
    em.set_speed_override(80.0, false).unwrap();
    em.set_speed_override(5.0, true).unwrap();
    em.set_extrude_override(0.0, true).unwrap();
    em.set_extrude_override(110.0, false).unwrap();

    assert_eq!(
        em.script().line_texts(),
        vec!["G1F600.000", "M220S80.00", "M220S85.00", "M221S110.00"]
    );
    assert_eq!(em.properties().feedrate, Some(600.0));
    assert_eq!(em.properties().speed_override, 85.0);
    assert_eq!(em.properties().extrude_override, 110.0);
    assert!(em.set_feed(0.0).is_err());
}

#[test]
fn test_simple_commands() {
    let mut em = emitter();
    em.dwell(1.5).unwrap();
    em.manual_extrude(5.0).unwrap();
    em.add_comment("layer 1");
    em.retract();
    em.unretract();
    em.probe_tool();
    em.set_firmware_retraction(RetractionSettings {
        length: Some(0.8),
        speed: Some(35.0),
        unretract_extra_length: Some(0.0),
        unretract_speed: Some(20.0),
    });

    assert_eq!(
        em.script().line_texts(),
        vec![
            "G4P1500.00",
            "; Manual Extrude Filament",
            "G1E5.00",
            "; layer 1",
            "; Retract",
            "G10",
            "; Unretract",
            "G11",
            "probe ; klipper macro for probe",
            "SET_RETRACTION RETRACT_LENGTH=0.8 RETRACT_SPEED=35 UNRETRACT_EXTRA_LENGTH=0 UNRETRACT_SPEED=20",
        ]
    );
}

#[test]
fn test_negative_dwell_rejected() {
    let mut em = emitter();
    assert!(em.dwell(-1.0).unwrap_err().is_configuration_error());
    assert!(em.script().is_empty());
}
