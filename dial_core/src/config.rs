//! Runtime configuration for the control loop.
//!
//! Separate from the TOML-deserialized schema in `dial_config`; see
//! `conversions` for the bridge.

use crate::executor::RecoveryPolicy;
use crate::position::{Direction, SliceGranularity};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ControlCfg {
    /// Name of the dial actuator on the remote controller.
    pub motor: String,
    pub granularity: SliceGranularity,
    pub recovery: RecoveryPolicy,
    /// Delay between cycles after a clean poll or completed move. Recovery
    /// cycles re-enter immediately.
    pub idle_delay: Duration,
    /// Pulses in the fixed homing sweep that normalizes the believed
    /// position to station 0.
    pub homing_pulses: u32,
    pub homing_direction: Direction,
    /// Bounded attempt count for the initial connect; exhaustion is fatal.
    pub initial_attempts: u32,
}

impl Default for ControlCfg {
    fn default() -> Self {
        Self {
            motor: "wheel_motor".to_string(),
            granularity: SliceGranularity::FullStation,
            recovery: RecoveryPolicy::ResumePlan,
            idle_delay: Duration::from_secs(15),
            homing_pulses: 6,
            homing_direction: Direction::Forward,
            initial_attempts: 10,
        }
    }
}
