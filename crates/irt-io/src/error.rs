//! Error types for table I/O

use thiserror::Error;

/// Errors from reading or writing tables
#[derive(Error, Debug)]
pub enum IoError {
    /// Malformed table contents or invalid model input
    #[error(transparent)]
    Core(#[from] irt_core::Error),

    /// CSV framing or encoding failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// The underlying model error, if that is what this is
    pub fn as_core(&self) -> Option<&irt_core::Error> {
        match self {
            IoError::Core(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias using [`IoError`]
pub type Result<T> = std::result::Result<T, IoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_display_unchanged() {
        let core = irt_core::Error::parse(2, 3, "bad number");
        let expected = core.to_string();
        let wrapped = IoError::from(core);
        assert_eq!(wrapped.to_string(), expected);
        assert!(matches!(
            wrapped.as_core(),
            Some(irt_core::Error::Parse { row: 2, column: 3, .. })
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: IoError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.to_string().contains("missing"));
        assert!(err.as_core().is_none());
    }
}
