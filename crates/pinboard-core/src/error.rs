use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinboardError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The store refused a write because it is full. Nothing was written.
    #[error("Storage full: {0}")]
    StorageFull(String),

    /// Import rejected before any row was written.
    /// `row` is the 1-based line in `file` (header is line 1), 0 for file-level problems.
    #[error("Import error in {file} (row {row}): {message}")]
    Import {
        file: String,
        row: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PinboardError {
    pub fn import(file: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self::Import {
            file: file.into(),
            row,
            message: message.into(),
        }
    }

    /// Whether the caller can carry on after reporting this error to the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StorageFull(_) | Self::Validation(_) | Self::NotFound(_) | Self::Import { .. }
        )
    }
}

impl From<serde_json::Error> for PinboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_display() {
        let err = PinboardError::import("groups.csv", 3, "tab_id \"t9\" does not exist in tabs.csv");
        assert_eq!(
            err.to_string(),
            "Import error in groups.csv (row 3): tab_id \"t9\" does not exist in tabs.csv"
        );
    }

    #[test]
    fn test_storage_full_is_recoverable() {
        assert!(PinboardError::StorageFull("quota".into()).is_recoverable());
        assert!(!PinboardError::Internal("boom".into()).is_recoverable());
    }
}
