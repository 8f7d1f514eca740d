//! Error handling module for albumsweep
//!
//! Provides centralized error handling with proper error types using thiserror.
//! The variants follow the failure surfaces of the tool: configuration,
//! inventory store, listing API and desktop actuator.

use thiserror::Error;

/// Reasons an inventory file can fail to load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreLoadError {
    /// The inventory file does not exist yet
    #[error("inventory file not found: {0}")]
    NotFound(String),

    /// The header row lacks one of the required columns
    #[error("inventory is missing required column '{0}'")]
    MissingColumn(String),

    /// A data row could not be parsed
    #[error("inventory row {line}: {reason}")]
    BadRow { line: usize, reason: String },

    /// Two rows carry the same album ID
    #[error("inventory contains album ID '{0}' more than once")]
    DuplicateId(String),
}

/// Main error type for albumsweep
#[derive(Error, Debug)]
pub enum SweepError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Inventory store could not be loaded
    #[error("Store load error: {0}")]
    StoreLoad(#[from] StoreLoadError),

    /// Inventory store could not be written
    #[error("Store save error: {0}")]
    StoreSave(String),

    /// A desktop input or browser call failed
    #[error("Actuator failure: {0}")]
    Actuator(String),

    /// The album listing API returned an error or unreadable page
    #[error("Listing API error: {0}")]
    ListingApi(String),

    /// Driver state machine misuse
    #[error("Stage transition error: {0}")]
    StageTransition(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for albumsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

// Convenient error constructors
impl SweepError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an actuator failure
    pub fn actuator(msg: impl Into<String>) -> Self {
        Self::Actuator(msg.into())
    }

    /// Create a listing API error
    pub fn listing(msg: impl Into<String>) -> Self {
        Self::ListingApi(msg.into())
    }

    /// Create a store save error
    pub fn store_save(msg: impl Into<String>) -> Self {
        Self::StoreSave(msg.into())
    }
}

impl From<reqwest::Error> for SweepError {
    fn from(err: reqwest::Error) -> Self {
        Self::ListingApi(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SweepError::config("max_albums_to_delete must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Configuration error: max_albums_to_delete must be greater than 0"
        );

        let err = SweepError::actuator("xdotool exited with status 1");
        assert_eq!(err.to_string(), "Actuator failure: xdotool exited with status 1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SweepError = io_err.into();
        assert!(matches!(err, SweepError::Io(_)));
    }

    #[test]
    fn test_store_load_error_conversion() {
        let err: SweepError = StoreLoadError::MissingColumn("Album URL".to_string()).into();
        assert!(matches!(err, SweepError::StoreLoad(StoreLoadError::MissingColumn(_))));
        assert!(err.to_string().contains("Album URL"));
    }
}
