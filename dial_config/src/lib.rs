#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the status dial controller.
//!
//! `Config` and sub-structs are deserialized from TOML and validated before
//! the CLI hands them to `dial_core`. Every knob that differs between the two
//! deployed variants of the controller (slice granularity, recovery policy,
//! idle cadence, homing shape) lives here rather than in code.

use serde::Deserialize;

/// Remote controller connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Connection {
    /// Address of the smart machine / robot to dial.
    pub address: Option<String>,
    /// Name of the dial actuator on the remote controller.
    pub motor: String,
    /// Bounded attempt count for the initial connect. Exhaustion is the only
    /// fatal outcome of the whole loop.
    pub initial_attempts: u32,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            address: None,
            motor: "wheel_motor".to_string(),
            initial_attempts: 10,
        }
    }
}

/// Slice granularity: how many power pulses advance the dial by one station.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One pulse per station (1/6 revolution per pulse).
    #[default]
    Full,
    /// Two pulses per station (1/12 revolution per pulse).
    Half,
}

/// What to do when a pulse call fails mid-plan.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Recovery {
    /// Reconnect in place (unbounded, no backoff) and continue the same plan
    /// from the next pulse.
    #[default]
    Resume,
    /// Surrender the remaining plan, reconnect on the next cycle, and re-poll
    /// the target source from the optimistically updated position.
    Abandon,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HomingDirection {
    #[default]
    Forward,
    Reverse,
}

/// Control loop tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Control {
    pub granularity: Granularity,
    pub recovery: Recovery,
    /// Inter-cycle delay in seconds after a clean cycle. The calendar-driven
    /// deployment uses 15; the load-test deployment uses 0 (immediate
    /// re-poll).
    pub idle_delay_s: u64,
    /// Pulse count of the fixed homing sweep issued before the first cycle.
    pub homing_pulses: u32,
    pub homing_direction: HomingDirection,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            granularity: Granularity::Full,
            recovery: Recovery::Resume,
            idle_delay_s: 15,
            homing_pulses: 6,
            homing_direction: HomingDirection::Forward,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Fault-injection knobs for the simulated remote controller.
#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(default)]
pub struct Sim {
    /// Drop the connection on every Nth pulse (0 disables).
    pub drop_every_pulses: u32,
    /// Fail this many connect attempts before the first success.
    pub connect_failures: u32,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub connection: Connection,
    pub control: Control,
    pub logging: Logging,
    pub sim: Sim,
}

impl Config {
    /// Reject values the control loop cannot operate with.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.connection.initial_attempts == 0 {
            eyre::bail!("connection.initial_attempts must be at least 1");
        }
        if self.connection.motor.is_empty() {
            eyre::bail!("connection.motor must not be empty");
        }
        if self.control.homing_pulses == 0 {
            eyre::bail!("control.homing_pulses must be at least 1");
        }
        Ok(())
    }
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}
