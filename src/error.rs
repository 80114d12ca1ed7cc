//! Error types for persistence and the terminal frontend.
//!
//! Gameplay itself never fails: rejected turns and unknown input are no-ops.
//! Only filesystem and terminal operations surface a [`GameError`].

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for the game.
#[derive(Debug)]
pub enum GameError {
    /// A file could not be read or written.
    Io {
        /// File that was being accessed.
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file was read but did not contain the expected JSON.
    Json {
        /// File that was being parsed or written.
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Terminal setup, drawing or event polling failed.
    Terminal(std::io::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io { path, source } => {
                write!(f, "i/o error on '{}': {}", path.display(), source)
            }
            GameError::Json { path, source } => {
                write!(f, "invalid JSON in '{}': {}", path.display(), source)
            }
            GameError::Terminal(source) => write!(f, "terminal error: {}", source),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io { source, .. } => Some(source),
            GameError::Json { source, .. } => Some(source),
            GameError::Terminal(source) => Some(source),
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(source: std::io::Error) -> Self {
        GameError::Terminal(source)
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_names_the_file() {
        let err = GameError::Io {
            path: PathBuf::from("scores.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let text = err.to_string();
        assert!(text.contains("scores.json"));
        assert!(text.contains("denied"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_converts_to_terminal() {
        let err: GameError = std::io::Error::other("tty gone").into();
        assert!(matches!(err, GameError::Terminal(_)));
    }
}
