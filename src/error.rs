use thiserror::Error;

/// Classifies configuration errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// A clause has no attributes
    EmptyClause,
    /// The active accuracy mode has no clauses configured
    MissingClauses,
    /// Distance threshold outside [0, 1]
    InvalidThreshold,
    /// Cleansing regex does not compile
    InvalidRegex,
    /// Configuration document could not be parsed
    Parse,
}

/// QuickMatch error types
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Config error: {message}")]
    Config {
        kind: ConfigErrorKind,
        message: String,
    },

    #[error("Unknown accuracy mode: {0}")]
    UnknownMode(String),

    #[error("Deadline exceeded after {processed} of {total} traveler records")]
    DeadlineExceeded { processed: usize, total: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MatchError {
    pub(crate) fn config(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        MatchError::Config {
            kind,
            message: message.into(),
        }
    }

    /// Returns the configuration error kind, if this is a configuration error.
    pub fn config_kind(&self) -> Option<ConfigErrorKind> {
        match self {
            MatchError::Config { kind, .. } => Some(*kind),
            MatchError::Json(_) | MatchError::UnknownMode(_) => Some(ConfigErrorKind::Parse),
            MatchError::DeadlineExceeded { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
