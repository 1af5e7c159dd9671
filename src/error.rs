use rust_decimal::Decimal;
use thiserror::Error;

/// Engine-level command failures.
///
/// All variants are recoverable at the command boundary: a failed command
/// leaves the store unchanged and is reported only to the originating
/// observer, never broadcast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("arena not found: {id}")]
    ArenaNotFound { id: String },

    #[error("entry not found: {id}")]
    EntryNotFound { id: String },

    #[error("arena is closed: {id}")]
    ArenaClosed { id: String },

    #[error("insufficient stake: need {required}, have {available}")]
    InsufficientStake {
        required: Decimal,
        available: Decimal,
    },

    #[error("stake amount must be positive, got {amount}")]
    NonPositiveStake { amount: Decimal },
}

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
