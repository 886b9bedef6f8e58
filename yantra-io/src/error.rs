//! Error types for YantraIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// YantraIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sensor returned no valid reading
    #[error("Sensor fault on {port}: {reason}")]
    SensorFault {
        /// Port the reading was requested from
        port: String,
        /// Device-reported reason
        reason: String,
    },

    /// Invalid parameter passed to a motion primitive or device
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device type in configuration is not known
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// Motion primitive did not complete in time
    #[error("Timed out after {elapsed_ms} ms waiting for {primitive}")]
    Timeout {
        /// Primitive that was waiting (move_forward, turn)
        primitive: &'static str,
        /// Time spent waiting
        elapsed_ms: u64,
    },

    /// Wait aborted because the process is shutting down
    #[error("Interrupted while waiting for {0}")]
    Interrupted(&'static str),
}

impl Error {
    /// True for faults the control loop is expected to ride out.
    pub fn is_sensor_fault(&self) -> bool {
        matches!(self, Self::SensorFault { .. })
    }
}
