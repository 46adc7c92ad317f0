//! Collaborator implementations behind the `dial_traits` seams.
//!
//! The real remote device controller (session protocol, authentication,
//! motor driver) lives outside this workspace; anything that speaks it just
//! implements [`dial_traits::Connector`]. This crate ships the simulated
//! controller used for development, self-checks and fault-injection runs,
//! plus the two target sources: uniform random and calendar-derived.

pub mod error;
pub mod schedule;

use error::HwError;

use dial_traits::{BoxError, Connector, Motor, Session, TargetSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fault-injection knobs for the simulated controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultPlan {
    /// Drop the connection on every Nth pulse of a session (0 disables).
    pub drop_every_pulses: u32,
    /// Fail this many connect attempts before the first success.
    pub connect_failures: u32,
}

/// Simulated remote controller.
///
/// Behaves like the real thing as seen through the seams: sessions can be
/// refused, can die mid-pulse, and only know one motor.
pub struct SimConnector {
    address: String,
    motor_name: String,
    faults: FaultPlan,
    remaining_connect_failures: u32,
}

impl SimConnector {
    pub fn new(
        address: impl Into<String>,
        motor_name: impl Into<String>,
        faults: FaultPlan,
    ) -> Self {
        Self {
            address: address.into(),
            motor_name: motor_name.into(),
            remaining_connect_failures: faults.connect_failures,
            faults,
        }
    }
}

impl Connector for SimConnector {
    type Session = SimSession;

    fn connect(&mut self) -> Result<Self::Session, BoxError> {
        if self.remaining_connect_failures > 0 {
            self.remaining_connect_failures -= 1;
            tracing::warn!(address = %self.address, "simulated connect refusal");
            return Err(HwError::ConnectionRefused(self.address.clone()).into());
        }
        tracing::info!(address = %self.address, "session established (simulated)");
        Ok(SimSession {
            motor_name: self.motor_name.clone(),
            motor: SimMotor {
                drop_every: self.faults.drop_every_pulses,
                pulses: 0,
            },
        })
    }
}

pub struct SimSession {
    motor_name: String,
    motor: SimMotor,
}

impl Session for SimSession {
    fn motor(&mut self, name: &str) -> Result<&mut dyn Motor, BoxError> {
        if name == self.motor_name {
            Ok(&mut self.motor)
        } else {
            Err(HwError::MotorNotFound(name.to_string()).into())
        }
    }

    fn close(&mut self) {
        tracing::debug!("session closed (simulated)");
    }
}

pub struct SimMotor {
    drop_every: u32,
    pulses: u32,
}

impl Motor for SimMotor {
    fn set_power(&mut self, fraction: f64) -> Result<(), BoxError> {
        self.pulses += 1;
        if self.drop_every != 0 && self.pulses % self.drop_every == 0 {
            tracing::warn!(pulse = self.pulses, "simulated connection loss mid-pulse");
            return Err(HwError::ConnectionLost.into());
        }
        tracing::info!(fraction, "pulse applied (simulated)");
        Ok(())
    }
}

/// Uniform random station picker, the load-test target source.
pub struct RandomTargets {
    rng: StdRng,
}

impl Default for RandomTargets {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomTargets {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests and repeatable soak runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TargetSource for RandomTargets {
    fn next_station(&mut self) -> Option<u8> {
        Some(self.rng.gen_range(0..6))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(session: &mut SimSession) -> Result<(), BoxError> {
        session.motor("wheel_motor")?.set_power(1.0 / 6.0)
    }

    #[test]
    fn sim_refuses_the_configured_number_of_connects() {
        let mut con = SimConnector::new(
            "dial.local",
            "wheel_motor",
            FaultPlan {
                connect_failures: 2,
                ..FaultPlan::default()
            },
        );
        assert!(con.connect().is_err());
        assert!(con.connect().is_err());
        assert!(con.connect().is_ok());
    }

    #[test]
    fn sim_drops_every_nth_pulse() {
        let mut con = SimConnector::new(
            "dial.local",
            "wheel_motor",
            FaultPlan {
                drop_every_pulses: 3,
                ..FaultPlan::default()
            },
        );
        let mut session = con.connect().unwrap();
        assert!(pulse(&mut session).is_ok());
        assert!(pulse(&mut session).is_ok());
        assert!(pulse(&mut session).is_err());
        assert!(pulse(&mut session).is_ok());
    }

    #[test]
    fn unknown_motor_is_reported() {
        let mut con = SimConnector::new("dial.local", "wheel_motor", FaultPlan::default());
        let mut session = con.connect().unwrap();
        assert!(session.motor("auger").is_err());
    }

    #[test]
    fn random_targets_stay_on_the_ring() {
        let mut targets = RandomTargets::seeded(7);
        for _ in 0..100 {
            let s = targets.next_station().unwrap();
            assert!(s < 6);
        }
    }
}
