//! Error types shared across the SkyRoute workspace

use thiserror::Error;

/// Errors raised while building grids, loading obstacle data or planning
///
/// A search that exhausts its frontier is not an error on its own: planners
/// return an empty path instead. [`SkyrouteError::PathNotFound`] exists for
/// callers that want to turn that outcome into a failure.
#[derive(Debug, Error)]
pub enum SkyrouteError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No path found from {start:?} to {goal:?}")]
    PathNotFound { start: (i32, i32), goal: (i32, i32) },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkyrouteError {
    /// Shorthand for [`SkyrouteError::InvalidInput`]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for [`SkyrouteError::Config`]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Shorthand for [`SkyrouteError::Parse`]
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }
}

/// Result type for SkyRoute operations
pub type SkyrouteResult<T> = Result<T, SkyrouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SkyrouteError::invalid_input("obstacle list is empty");
        assert_eq!(err.to_string(), "Invalid input: obstacle list is empty");

        let err = SkyrouteError::PathNotFound {
            start: (0, 0),
            goal: (9, 9),
        };
        assert_eq!(err.to_string(), "No path found from (0, 0) to (9, 9)");

        let err = SkyrouteError::parse(4, "expected 6 fields, found 5");
        assert_eq!(
            err.to_string(),
            "Parse error on line 4: expected 6 fields, found 5"
        );
    }

    #[test]
    fn test_io_conversion() {
        fn open_missing() -> SkyrouteResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.csv")?)
        }

        match open_missing() {
            Err(SkyrouteError::Io(_)) => {}
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
