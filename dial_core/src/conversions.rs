//! `From` implementations bridging `dial_config` types to `dial_core` types.

use crate::config::ControlCfg;
use crate::executor::RecoveryPolicy;
use crate::position::{Direction, SliceGranularity};
use std::time::Duration;

impl From<dial_config::Granularity> for SliceGranularity {
    fn from(g: dial_config::Granularity) -> Self {
        match g {
            dial_config::Granularity::Full => Self::FullStation,
            dial_config::Granularity::Half => Self::HalfStation,
        }
    }
}

impl From<dial_config::Recovery> for RecoveryPolicy {
    fn from(r: dial_config::Recovery) -> Self {
        match r {
            dial_config::Recovery::Resume => Self::ResumePlan,
            dial_config::Recovery::Abandon => Self::AbandonPlan,
        }
    }
}

impl From<dial_config::HomingDirection> for Direction {
    fn from(d: dial_config::HomingDirection) -> Self {
        match d {
            dial_config::HomingDirection::Forward => Self::Forward,
            dial_config::HomingDirection::Reverse => Self::Reverse,
        }
    }
}

impl From<&dial_config::Config> for ControlCfg {
    fn from(c: &dial_config::Config) -> Self {
        Self {
            motor: c.connection.motor.clone(),
            granularity: c.control.granularity.into(),
            recovery: c.control.recovery.into(),
            idle_delay: Duration::from_secs(c.control.idle_delay_s),
            homing_pulses: c.control.homing_pulses,
            homing_direction: c.control.homing_direction.into(),
            initial_attempts: c.connection.initial_attempts,
        }
    }
}
