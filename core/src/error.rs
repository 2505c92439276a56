use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Marketer '{name}' not found")]
    NotFound { name: String },

    #[error("Wrong password for marketer '{name}'")]
    BadPassword { name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Rating must be between 1 and 5, got {rating}")]
    RatingOutOfRange { rating: i64 },

    #[error("Product quantity cannot be negative, got {quantity}")]
    NegativeQuantity { quantity: i64 },
}

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Cannot read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Backing store changed since this ledger was loaded.
    #[error("Stale write to {path}: store holds {on_disk} rows, ledger expected {expected}")]
    StaleWrite {
        path: String,
        expected: usize,
        on_disk: usize,
    },
}

#[derive(Error, Debug)]
pub enum DeskError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Tabular file error: {0}")]
    Tabular(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed row {row} in {path}: {reason}")]
    MalformedRow {
        path: String,
        row: usize,
        reason: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    /// Text safe to show in the UI.
    /// Both auth failures collapse into one message so the login form
    /// does not reveal which marketer names exist.
    pub fn user_message(&self) -> String {
        match self {
            DeskError::Auth(_) => "Invalid login credentials!".to_string(),
            DeskError::Validation(e) => e.to_string(),
            DeskError::Io(IoError::StaleWrite { .. }) => {
                "The customer file was changed by another session; reload before saving.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
