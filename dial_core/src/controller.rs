//! The resilient position-control loop.
//!
//! Owns the session slot, the position estimate, and the cadence between
//! cycles. Strictly sequential: one in-flight pulse or connection attempt at
//! a time, so the session never needs locking.

use crate::config::ControlCfg;
use crate::error::{BuildError, DialError};
use crate::executor::{self, PulseDriver, PulseOutcome};
use crate::position::{MovementPlan, PositionEstimate, Station};
use dial_traits::clock::{Clock, MonotonicClock};
use dial_traits::{Connector, TargetSource};

/// Control loop states. `Terminated` is reached only through exhausted
/// initial-connect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Connecting,
    Homing,
    Idle,
    Moving,
    Terminated,
}

/// Result of one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// No usable target, or already on target.
    Unchanged,
    /// Plan completed; the dial is believed to be at `to`.
    Moved { from: Station, to: Station },
    /// Connection lost under the abandon policy; the remaining plan was
    /// surrendered and the next cycle reconnects and re-polls.
    Interrupted,
}

pub struct Controller<C: Connector, T: TargetSource> {
    connector: C,
    targets: T,
    clock: Box<dyn Clock>,
    cfg: ControlCfg,
    session: Option<C::Session>,
    estimate: PositionEstimate,
    state: LoopState,
}

impl<C: Connector, T: TargetSource> core::fmt::Debug for Controller<C, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("cfg", &self.cfg)
            .field("estimate", &self.estimate)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Controller`]; all fields validated on `build()`.
pub struct ControllerBuilder<C, T> {
    connector: Option<C>,
    targets: Option<T>,
    clock: Option<Box<dyn Clock>>,
    cfg: Option<ControlCfg>,
}

impl<C, T> Default for ControllerBuilder<C, T> {
    fn default() -> Self {
        Self {
            connector: None,
            targets: None,
            clock: None,
            cfg: None,
        }
    }
}

impl<C: Connector, T: TargetSource> ControllerBuilder<C, T> {
    pub fn with_connector(mut self, connector: C) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn with_targets(mut self, targets: T) -> Self {
        self.targets = Some(targets);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_control(mut self, cfg: ControlCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn build(self) -> Result<Controller<C, T>, BuildError> {
        let connector = self.connector.ok_or(BuildError::MissingConnector)?;
        let targets = self.targets.ok_or(BuildError::MissingTargets)?;
        let cfg = self.cfg.unwrap_or_default();
        if cfg.initial_attempts == 0 {
            return Err(BuildError::InvalidConfig("initial_attempts must be at least 1"));
        }
        if cfg.homing_pulses == 0 {
            return Err(BuildError::InvalidConfig("homing_pulses must be at least 1"));
        }
        if cfg.motor.is_empty() {
            return Err(BuildError::InvalidConfig("motor name must not be empty"));
        }
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));
        let estimate = PositionEstimate::at(Station::zero(), cfg.granularity);
        Ok(Controller {
            connector,
            targets,
            clock,
            cfg,
            session: None,
            estimate,
            state: LoopState::Connecting,
        })
    }
}

impl<C: Connector, T: TargetSource> Controller<C, T> {
    pub fn builder() -> ControllerBuilder<C, T> {
        ControllerBuilder::default()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The believed station (never the measured one; there is no sensor).
    pub fn station(&self) -> Station {
        self.estimate.station()
    }

    pub fn connected(&self) -> bool {
        self.session.is_some()
    }

    /// Bounded initial connect. No delay between attempts; the bound is the
    /// attempt count, not wall-clock. Exhaustion is the loop's only fatal
    /// outcome.
    pub fn connect_initial(&mut self) -> Result<(), DialError> {
        self.state = LoopState::Connecting;
        for attempt in 1..=self.cfg.initial_attempts {
            tracing::info!(attempt, "connection try");
            match self.connector.connect() {
                Ok(session) => {
                    self.session = Some(session);
                    tracing::info!("connected to controller");
                    return Ok(());
                }
                Err(e) => tracing::warn!(attempt, error = %e, "connect attempt failed"),
            }
        }
        self.state = LoopState::Terminated;
        Err(DialError::ConnectExhausted {
            attempts: self.cfg.initial_attempts,
        })
    }

    fn ensure_session(&mut self) {
        if self.session.is_none() {
            self.session = Some(executor::reconnect_blocking(&mut self.connector));
        }
    }

    /// Unconditional homing sweep: a fixed pulse count in a fixed direction
    /// to normalize the believed position to station 0 from whatever the
    /// true physical state is. Under the abandon policy an interrupted sweep
    /// restarts from scratch after reconnecting; either way the loop does
    /// not leave this state until a sweep completes.
    pub fn home(&mut self) {
        self.state = LoopState::Homing;
        tracing::info!(
            pulses = self.cfg.homing_pulses,
            "turning dial to initial station 0"
        );
        loop {
            self.ensure_session();
            let mut driver = PulseDriver::new(
                &mut self.connector,
                &self.cfg.motor,
                self.cfg.granularity,
                self.cfg.recovery,
            );
            let mut completed = true;
            for _ in 0..self.cfg.homing_pulses {
                if driver.pulse(&mut self.session, self.cfg.homing_direction).is_err() {
                    completed = false;
                    break;
                }
            }
            if completed {
                break;
            }
            tracing::warn!("homing interrupted; restarting sweep after reconnect");
        }
        self.estimate.snap_to(Station::zero());
        self.state = LoopState::Idle;
        tracing::info!("homed; believed station is 0");
    }

    /// One polling cycle: ask the target source, plan, pulse. The estimate
    /// is stepped optimistically after every pulse attempt regardless of the
    /// reported outcome (the transport can fail after the motion happened).
    pub fn cycle(&mut self) -> CycleStatus {
        self.state = LoopState::Idle;
        self.ensure_session();

        let Some(raw) = self.targets.next_station() else {
            tracing::debug!("no usable target this cycle; staying put");
            return CycleStatus::Unchanged;
        };
        let Some(target) = Station::new(raw) else {
            tracing::warn!(raw, "target source produced an out-of-range station; ignoring");
            return CycleStatus::Unchanged;
        };

        // Replanning quantizes to whole stations. Under half-station slices
        // an abandoned plan can stop at an odd slice count, leaving the
        // estimate mid-station; the floored station feeds the next plan and
        // snap_to clears the residual half slice on completion. The believed
        // and assumed-physical positions can then differ by half a station
        // until the next homing sweep.
        let from = self.estimate.station();
        if target == from {
            return CycleStatus::Unchanged;
        }

        let plan = MovementPlan::between(from, target, self.cfg.granularity);
        tracing::info!(
            %from,
            to = %target,
            slices = plan.slices,
            direction = ?plan.direction,
            "turning dial"
        );
        self.state = LoopState::Moving;

        let mut driver = PulseDriver::new(
            &mut self.connector,
            &self.cfg.motor,
            self.cfg.granularity,
            self.cfg.recovery,
        );
        for issued in 0..plan.slices {
            let outcome = driver.pulse(&mut self.session, plan.direction);
            // Optimistic update even when the call failed; see
            // PositionEstimate::apply_optimistic.
            self.estimate.apply_optimistic(plan.direction);
            match outcome {
                Ok(PulseOutcome::Applied) => {}
                Ok(PulseOutcome::AssumedApplied) => {
                    tracing::info!(issued, "pulse assumed applied across reconnect");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        station = %self.estimate.station(),
                        "move interrupted; will re-poll from the believed station"
                    );
                    self.state = LoopState::Idle;
                    return CycleStatus::Interrupted;
                }
            }
        }

        self.estimate.snap_to(target);
        self.state = LoopState::Idle;
        tracing::info!(station = %target, "dial now at target");
        CycleStatus::Moved { from, to: target }
    }

    /// One cycle plus the inter-cycle cadence. Recovery cycles re-enter
    /// immediately; clean cycles pause for the configured idle delay.
    pub fn run_once(&mut self) -> CycleStatus {
        let status = self.cycle();
        if status != CycleStatus::Interrupted {
            self.clock.sleep(self.cfg.idle_delay);
        }
        status
    }

    /// Drive the dial indefinitely. Returns only on fatal initial-connect
    /// exhaustion; otherwise the loop is stopped by process termination,
    /// leaving the actuator and session wherever the in-flight pulse left
    /// them.
    pub fn run(&mut self) -> Result<(), DialError> {
        self.connect_initial()?;
        self.home();
        loop {
            self.run_once();
        }
    }
}
