pub mod clock;

pub use clock::{Clock, MonotonicClock};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Handle to one named actuator on a live session.
pub trait Motor {
    /// Apply a signed power fraction (−1.0..=1.0) for one implicit
    /// fixed-duration pulse, then stop issuing it.
    fn set_power(&mut self, fraction: f64) -> Result<(), BoxError>;
}

/// A live connection to the remote device controller.
///
/// Exactly one owner at a time; the control loop replaces the whole session
/// on failure rather than repairing it.
pub trait Session {
    /// Look up an actuator by its configured name.
    fn motor(&mut self, name: &str) -> Result<&mut dyn Motor, BoxError>;

    /// Tear down the underlying connection (best-effort).
    fn close(&mut self);
}

/// Owns connect/reconnect to the remote controller.
///
/// `connect` must be safely retryable: a failed attempt leaves the connector
/// ready for the next one.
pub trait Connector {
    type Session: Session;

    fn connect(&mut self) -> Result<Self::Session, BoxError>;
}

/// Produces the next desired dial station.
///
/// `None` means "no usable target this cycle" (collaborator failure or no
/// upcoming signal); callers must treat it as "stay put", not as an error.
pub trait TargetSource {
    fn next_station(&mut self) -> Option<u8>;
}
