#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core position-control logic for the six-station status dial
//! (hardware-agnostic).
//!
//! All collaborator interaction goes through the `dial_traits` seams:
//! `Connector`/`Session`/`Motor` for the remote device controller and
//! `TargetSource` for the desired station.
//!
//! ## Architecture
//!
//! - **Position**: discrete stations, movement planning, and the optimistic
//!   position estimate (`position` module)
//! - **Execution**: single-pulse issue and connection-loss recovery under
//!   two configurable policies (`executor` module)
//! - **Orchestration**: the connect/home/poll/move state machine and its
//!   cadence (`controller` module)
//!
//! ## Failure model
//!
//! The transport can fail *after* the hardware executed a motion, so the
//! position estimate is updated optimistically after every pulse attempt,
//! successful or not. Transient losses are recovered in place; the only
//! fatal path is exhausting the bounded initial-connect attempts.

pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod executor;
pub mod mocks;
pub mod position;

pub use config::ControlCfg;
pub use controller::{Controller, ControllerBuilder, CycleStatus, LoopState};
pub use error::{BuildError, DialError};
pub use executor::{PulseDriver, PulseOutcome, RecoveryPolicy, reconnect_blocking};
pub use position::{
    Direction, MovementPlan, PositionEstimate, STATIONS, SliceGranularity, Station,
};
