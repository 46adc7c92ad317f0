use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DialError {
    /// Initial connection attempts exhausted. The only fatal outcome of the
    /// control loop; everything else is recovered in place.
    #[error("cannot connect after {attempts} attempts")]
    ConnectExhausted { attempts: u32 },
    /// Mid-sequence disconnect. Recovered via the configured policy, never
    /// escalated past the control loop.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing connector")]
    MissingConnector,
    #[error("missing target source")]
    MissingTargets,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
