//! Single-pulse execution and connection-loss recovery.
//!
//! A pulse is one timed power command to the actuator. The call can fail
//! after the hardware already executed the motion, so the executor never
//! re-sends a failed pulse; the caller's optimistic position update already
//! accounts for it. What happens to the rest of the plan depends on
//! [`RecoveryPolicy`].

use crate::error::DialError;
use crate::position::{Direction, SliceGranularity};
use dial_traits::{Connector, Session};

/// Reaction to a pulse call failing mid-plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Reconnect in place (unbounded, no backoff) and hand control back so
    /// the remaining pulses of the current plan continue.
    ResumePlan,
    /// Drop the session and surface the failure; the control loop abandons
    /// the remaining plan and re-polls on the next cycle.
    AbandonPlan,
}

/// Per-pulse outcome as seen by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    /// The call reported success.
    Applied,
    /// The call failed but the session was re-established; the pulse is
    /// assumed to have landed physically.
    AssumedApplied,
}

/// Re-establish the session, retrying until it succeeds. No backoff: the
/// remote controller either answers or it doesn't, and the actuator is idle
/// while we wait.
pub fn reconnect_blocking<C: Connector>(connector: &mut C) -> C::Session {
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match connector.connect() {
            Ok(session) => {
                tracing::info!(attempt, "reconnected");
                return session;
            }
            Err(e) => tracing::warn!(attempt, error = %e, "reconnect attempt failed"),
        }
    }
}

/// Issues pulses for one plan segment, applying the recovery policy on
/// failure. Borrows the connector and the control loop's session slot; the
/// slot is the only shared state and is only ever touched between pulses.
pub struct PulseDriver<'a, C: Connector> {
    connector: &'a mut C,
    motor: &'a str,
    granularity: SliceGranularity,
    policy: RecoveryPolicy,
}

impl<'a, C: Connector> PulseDriver<'a, C> {
    pub fn new(
        connector: &'a mut C,
        motor: &'a str,
        granularity: SliceGranularity,
        policy: RecoveryPolicy,
    ) -> Self {
        Self {
            connector,
            motor,
            granularity,
            policy,
        }
    }

    /// Send one power pulse through the session slot.
    ///
    /// On failure the old session is always discarded. Under `ResumePlan`
    /// the slot is refilled here and the pulse reported as assumed-applied;
    /// under `AbandonPlan` the slot is left empty and the loss propagated.
    pub fn pulse(
        &mut self,
        session: &mut Option<C::Session>,
        direction: Direction,
    ) -> Result<PulseOutcome, DialError> {
        let Some(live) = session.as_mut() else {
            return Err(DialError::State("pulse issued without a session".into()));
        };

        let power = direction.as_f64() * self.granularity.power_fraction();
        let sent = live
            .motor(self.motor)
            .and_then(|motor| motor.set_power(power));

        match sent {
            Ok(()) => {
                tracing::debug!(power, "pulse applied");
                Ok(PulseOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "pulse call failed, discarding session");
                if let Some(mut dead) = session.take() {
                    dead.close();
                }
                match self.policy {
                    RecoveryPolicy::ResumePlan => {
                        *session = Some(reconnect_blocking(self.connector));
                        Ok(PulseOutcome::AssumedApplied)
                    }
                    RecoveryPolicy::AbandonPlan => {
                        Err(DialError::ConnectionLost(e.to_string()))
                    }
                }
            }
        }
    }
}
