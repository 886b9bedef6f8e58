//! Error types for Drishti

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Drishti error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Particle cloud constructed with no particles
    #[error("Particle cloud needs at least one particle")]
    EmptyCloud,

    /// Particle index outside the cloud
    #[error("Particle index {index} out of range (cloud holds {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Cloud size
        len: usize,
    },

    /// Malformed input to a motion update or configuration
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error reported by the drive or the brick
    #[error("Hardware error: {0}")]
    Hardware(#[from] yantra_io::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be rendered
    #[error("Config render error: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    /// Ctrl-C handler could not be installed
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl Error {
    /// True when the run ended because of a shutdown request
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Hardware(yantra_io::Error::Interrupted(_)))
    }
}
