use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("connection refused by controller at {0}")]
    ConnectionRefused(String),
    #[error("deadline exceeded: connection lost")]
    ConnectionLost,
    #[error("no motor named {0:?} on this machine")]
    MotorNotFound(String),
}
