//! Error type shared by all collectors.
//!
//! Collectors never return these to callers of `collect()`: they are logged
//! and turned into an unavailable flag at the collector boundary.

use crate::collector::procfs::parser::ParseError;

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// A source file could not be read.
    Io(std::io::Error),
    /// An external command could not be run, failed, or timed out.
    Command {
        program: String,
        error: std::io::Error,
    },
    /// Data was read but is not in the expected shape.
    Parse(String),
    /// An expected value is absent from otherwise valid data.
    NotFound(String),
}

impl CollectError {
    /// True for the source-unavailable class (file or command failures).
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, CollectError::Io(_) | CollectError::Command { .. })
    }

    pub(crate) fn command(program: &str, error: std::io::Error) -> Self {
        CollectError::Command {
            program: program.to_string(),
            error,
        }
    }
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Command { program, error } => {
                write!(f, "command {} failed: {}", program, error)
            }
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
            CollectError::NotFound(what) => write!(f, "not found: {}", what),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io(e) => Some(e),
            CollectError::Command { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e.message)
    }
}
