//! Homing normalizes the believed position to station 0 from unknown
//! physical state, surviving transient disconnects.

use dial_core::mocks::{PulseScript, ScriptedConnector, ScriptedTargets, SimClock};
use dial_core::{ControlCfg, Controller, Direction, LoopState, RecoveryPolicy};
use std::time::Duration;

fn build(
    connector: ScriptedConnector,
    recovery: RecoveryPolicy,
) -> Controller<ScriptedConnector, ScriptedTargets> {
    Controller::builder()
        .with_connector(connector)
        .with_targets(ScriptedTargets::new(Vec::<Option<u8>>::new()))
        .with_clock(Box::new(SimClock::new()))
        .with_control(ControlCfg {
            recovery,
            idle_delay: Duration::ZERO,
            homing_direction: Direction::Forward,
            ..ControlCfg::default()
        })
        .build()
        .unwrap()
}

#[test]
fn clean_homing_sweeps_six_pulses_and_fixes_station_zero() {
    let connector = ScriptedConnector::new();
    let rig = connector.handle();
    let mut ctl = build(connector, RecoveryPolicy::ResumePlan);

    ctl.home();

    assert_eq!(ctl.state(), LoopState::Idle);
    assert_eq!(ctl.station().get(), 0);
    let powers = rig.landed_powers();
    assert_eq!(powers.len(), 6);
    assert!(powers.iter().all(|p| (p - 1.0 / 6.0).abs() < 1e-12));
}

#[test]
fn resume_policy_completes_the_sweep_in_one_pass() {
    let connector = ScriptedConnector::new().with_pulse_script([
        PulseScript::Land,
        PulseScript::Land,
        PulseScript::DropBeforeMotion,
    ]);
    let rig = connector.handle();
    let mut ctl = build(connector, RecoveryPolicy::ResumePlan);

    ctl.home();

    assert_eq!(ctl.station().get(), 0);
    // Six attempts total; the dropped pulse is assumed applied.
    assert_eq!(rig.pulse_attempts(), 6);
    assert_eq!(rig.connects(), 2);
}

#[test]
fn abandon_policy_restarts_the_whole_sweep_after_reconnect() {
    let connector = ScriptedConnector::new().with_pulse_script([
        PulseScript::Land,
        PulseScript::Land,
        PulseScript::DropBeforeMotion,
    ]);
    let rig = connector.handle();
    let mut ctl = build(connector, RecoveryPolicy::AbandonPlan);

    ctl.home();

    assert_eq!(ctl.station().get(), 0);
    // Three attempts in the interrupted pass, then a full fresh sweep.
    assert_eq!(rig.pulse_attempts(), 3 + 6);
    assert_eq!(rig.connects(), 2);
}

#[test]
fn homing_lands_on_zero_no_matter_how_many_drops_occur() {
    let connector = ScriptedConnector::new().with_pulse_script([
        PulseScript::DropBeforeMotion,
        PulseScript::Land,
        PulseScript::DropAfterMotion,
    ]);
    let rig = connector.handle();
    let mut ctl = build(connector, RecoveryPolicy::AbandonPlan);

    ctl.home();

    assert_eq!(ctl.state(), LoopState::Idle);
    assert_eq!(ctl.station().get(), 0);
    // Pass 1 dies at pulse 1, pass 2 at pulse 2, pass 3 completes.
    assert_eq!(rig.pulse_attempts(), 1 + 2 + 6);
    assert_eq!(rig.connects(), 3);
}
