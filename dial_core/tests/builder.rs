use dial_core::mocks::{ScriptedConnector, ScriptedTargets};
use dial_core::{BuildError, ControlCfg, Controller};

type TestController = Controller<ScriptedConnector, ScriptedTargets>;

#[test]
fn missing_connector_is_rejected() {
    let err = TestController::builder()
        .with_targets(ScriptedTargets::new(Vec::<Option<u8>>::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, BuildError::MissingConnector));
}

#[test]
fn missing_target_source_is_rejected() {
    let err = TestController::builder()
        .with_connector(ScriptedConnector::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, BuildError::MissingTargets));
}

#[test]
fn invalid_control_values_are_rejected() {
    for cfg in [
        ControlCfg {
            initial_attempts: 0,
            ..ControlCfg::default()
        },
        ControlCfg {
            homing_pulses: 0,
            ..ControlCfg::default()
        },
        ControlCfg {
            motor: String::new(),
            ..ControlCfg::default()
        },
    ] {
        let err = TestController::builder()
            .with_connector(ScriptedConnector::new())
            .with_targets(ScriptedTargets::new(Vec::<Option<u8>>::new()))
            .with_control(cfg)
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfig(_)));
    }
}

#[test]
fn defaults_match_the_deployed_calendar_variant() {
    let ctl = TestController::builder()
        .with_connector(ScriptedConnector::new())
        .with_targets(ScriptedTargets::new(Vec::<Option<u8>>::new()))
        .build()
        .unwrap();
    assert_eq!(ctl.station().get(), 0);
    assert!(!ctl.connected());
}
