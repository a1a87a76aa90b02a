use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubsumeError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Not initialised: {0}")]
    NotInitialised(String),
    #[error("Already initialised: {0}")]
    AlreadyInitialised(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
    #[error("Cardinality violated on slot `{slot}`: {message}")]
    Cardinality { slot: String, message: String },
    #[error("Unknown concept: {0}")]
    UnknownConcept(String),
    #[error("Unknown identity: {0}")]
    UnknownIdentity(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, SubsumeError>;

// Helper conversions
impl From<config::ConfigError> for SubsumeError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
