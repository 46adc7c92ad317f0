//! Wiring: config + flags → collaborators → control loop.
//!
//! The real remote-controller client and the calendar API client live
//! outside this workspace; anything implementing the `dial_traits` seams can
//! be slotted in here. This binary ships with the simulated controller from
//! `dial_hardware`, which honors the `[sim]` fault-injection knobs.

use crate::cli::Commands;
use dial_config::Config;
use dial_core::error::Result as CoreResult;
use dial_core::{ControlCfg, Controller};
use dial_hardware::schedule::{ScheduleTargets, UpcomingEvent};
use dial_hardware::{FaultPlan, RandomTargets, SimConnector};
use dial_traits::{Connector, Motor, Session, TargetSource};

fn resolve_address(flag: Option<&String>, cfg: &Config) -> CoreResult<String> {
    flag.cloned()
        .or_else(|| cfg.connection.address.clone())
        .ok_or_else(|| {
            eyre::eyre!("no controller address given (flag or [connection].address)")
        })
}

fn faults(cfg: &Config) -> FaultPlan {
    FaultPlan {
        drop_every_pulses: cfg.sim.drop_every_pulses,
        connect_failures: cfg.sim.connect_failures,
    }
}

fn drive<T: TargetSource>(cfg: &Config, address: String, targets: T) -> CoreResult<()> {
    let control = ControlCfg::from(cfg);
    let connector = SimConnector::new(address, control.motor.clone(), faults(cfg));
    let mut controller = Controller::builder()
        .with_connector(connector)
        .with_targets(targets)
        .with_control(control)
        .build()?;
    // Returns only on fatal initial-connect exhaustion.
    controller.run()?;
    Ok(())
}

pub fn run(cfg: &Config, cmd: &Commands) -> CoreResult<()> {
    match cmd {
        Commands::Random {
            api_key: _,
            api_key_id: _,
            smart_machine_domain,
        } => {
            let address = resolve_address(smart_machine_domain.as_ref(), cfg)?;
            tracing::info!(%address, "random-target mode");
            drive(cfg, address, RandomTargets::new())
        }
        Commands::Calendar {
            location_secret: _,
            robot_address,
        } => {
            let address = resolve_address(robot_address.as_ref(), cfg)?;
            tracing::info!(%address, "calendar mode");
            // The event fetcher (calendar API, auth, token cache) is an
            // external collaborator; without one wired in the dial holds
            // its station.
            tracing::warn!("no calendar fetcher configured; dial will hold its station");
            let fetch = || -> Option<UpcomingEvent> { None };
            drive(cfg, address, ScheduleTargets::new(fetch))
        }
        Commands::SelfCheck => self_check(cfg),
    }
}

/// Verify the config and a full connect → motor lookup → zero-power pulse
/// round trip against the simulated controller.
fn self_check(cfg: &Config) -> CoreResult<()> {
    cfg.validate()?;
    let mut connector = SimConnector::new(
        cfg.connection
            .address
            .clone()
            .unwrap_or_else(|| "self-check.local".to_string()),
        cfg.connection.motor.clone(),
        FaultPlan::default(),
    );
    let mut session = connector
        .connect()
        .map_err(|e| eyre::eyre!("self-check connect failed: {e}"))?;
    session
        .motor(&cfg.connection.motor)
        .and_then(|m| m.set_power(0.0))
        .map_err(|e| eyre::eyre!("self-check pulse failed: {e}"))?;
    session.close();
    println!("self-check ok");
    Ok(())
}
