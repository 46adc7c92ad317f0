//! Test and helper doubles for the control loop's collaborator seams.
//!
//! The scripted rig plays the role of the remote controller: a script of
//! per-pulse outcomes drives fault injection, and a shared handle exposes
//! what the "hardware" saw for assertions.

use dial_traits::clock::Clock;
use dial_traits::{BoxError, Connector, Motor, Session, TargetSource};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Scripted outcome of one `set_power` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseScript {
    /// Call succeeds, motion recorded.
    Land,
    /// Call fails before any motion reached the motor.
    DropBeforeMotion,
    /// Motion reached the motor, then the call failed anyway. The ambiguous
    /// partial failure the optimistic estimate exists for.
    DropAfterMotion,
}

#[derive(Default)]
struct RigState {
    script: VecDeque<PulseScript>,
    connect_failures: u32,
    connect_attempts: u32,
    connects: u32,
    closes: u32,
    pulse_attempts: u32,
    landed: Vec<f64>,
}

fn lock(state: &Arc<Mutex<RigState>>) -> MutexGuard<'_, RigState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Connector half of the scripted rig.
pub struct ScriptedConnector {
    state: Arc<Mutex<RigState>>,
}

/// Read-only view of what happened on the rig.
#[derive(Clone)]
pub struct RigHandle {
    state: Arc<Mutex<RigState>>,
}

impl RigHandle {
    pub fn connect_attempts(&self) -> u32 {
        lock(&self.state).connect_attempts
    }

    pub fn connects(&self) -> u32 {
        lock(&self.state).connects
    }

    pub fn closes(&self) -> u32 {
        lock(&self.state).closes
    }

    /// Total `set_power` calls, including the ones that failed.
    pub fn pulse_attempts(&self) -> u32 {
        lock(&self.state).pulse_attempts
    }

    /// Signed power fractions that physically reached the motor, in order.
    pub fn landed_powers(&self) -> Vec<f64> {
        lock(&self.state).landed.clone()
    }
}

impl Default for ScriptedConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedConnector {
    /// Rig where every pulse lands and every connect succeeds.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RigState::default())),
        }
    }

    /// Queue per-pulse outcomes; once exhausted every pulse lands.
    pub fn with_pulse_script(self, script: impl IntoIterator<Item = PulseScript>) -> Self {
        lock(&self.state).script = script.into_iter().collect();
        self
    }

    /// Fail the next `n` connect attempts before succeeding.
    pub fn with_connect_failures(self, n: u32) -> Self {
        lock(&self.state).connect_failures = n;
        self
    }

    pub fn handle(&self) -> RigHandle {
        RigHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    fn connect(&mut self) -> Result<Self::Session, BoxError> {
        let mut st = lock(&self.state);
        st.connect_attempts += 1;
        if st.connect_failures > 0 {
            st.connect_failures -= 1;
            return Err(std::io::Error::other("connection refused").into());
        }
        st.connects += 1;
        drop(st);
        Ok(ScriptedSession {
            motor: ScriptedMotor {
                state: Arc::clone(&self.state),
            },
            state: Arc::clone(&self.state),
        })
    }
}

pub struct ScriptedSession {
    motor: ScriptedMotor,
    state: Arc<Mutex<RigState>>,
}

impl Session for ScriptedSession {
    fn motor(&mut self, _name: &str) -> Result<&mut dyn Motor, BoxError> {
        Ok(&mut self.motor)
    }

    fn close(&mut self) {
        lock(&self.state).closes += 1;
    }
}

pub struct ScriptedMotor {
    state: Arc<Mutex<RigState>>,
}

impl Motor for ScriptedMotor {
    fn set_power(&mut self, fraction: f64) -> Result<(), BoxError> {
        let mut st = lock(&self.state);
        st.pulse_attempts += 1;
        match st.script.pop_front().unwrap_or(PulseScript::Land) {
            PulseScript::Land => {
                st.landed.push(fraction);
                Ok(())
            }
            PulseScript::DropBeforeMotion => {
                Err(std::io::Error::other("deadline exceeded: connection lost").into())
            }
            PulseScript::DropAfterMotion => {
                st.landed.push(fraction);
                Err(std::io::Error::other("deadline exceeded: connection lost").into())
            }
        }
    }
}

/// Target source that plays back a fixed sequence, then reports "no target".
pub struct ScriptedTargets {
    seq: VecDeque<Option<u8>>,
}

impl ScriptedTargets {
    pub fn new(seq: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            seq: seq.into_iter().collect(),
        }
    }
}

impl TargetSource for ScriptedTargets {
    fn next_station(&mut self) -> Option<u8> {
        self.seq.pop_front().flatten()
    }
}

/// Deterministic clock that records sleeps instead of performing them.
#[derive(Clone)]
pub struct SimClock {
    origin: Instant,
    state: Arc<Mutex<(Duration, Vec<Duration>)>>,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new((Duration::ZERO, Vec::new()))),
        }
    }

    /// Total simulated time slept.
    pub fn slept(&self) -> Duration {
        let st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.0
    }

    /// Individual sleep durations, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        let st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.1.clone()
    }
}

impl Clock for SimClock {
    fn now(&self) -> Instant {
        let st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.origin + st.0
    }

    fn sleep(&self, d: Duration) {
        let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.0 = st.0.saturating_add(d);
        st.1.push(d);
    }
}
