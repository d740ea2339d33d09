//! Error types for cache construction and trace reading.
//!
//! Cache accesses never fail; errors only come from building a cache out of
//! bad parameters ([`ConfigError`]) or from reading a trace ([`TraceError`]).

use std::{fmt, io};

/// Error returned when cache configuration parameters are invalid.
///
/// Carries a human-readable description of which parameter failed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Error returned while reading addresses out of a trace.
#[derive(Debug)]
pub enum TraceError {
    Io(io::Error),
    /// A token that is not a 32-bit hexadecimal number. `line` is 1-based.
    Parse { token: String, line: usize },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(err) => write!(f, "failed to read trace: {err}"),
            TraceError::Parse { token, line } => {
                write!(f, "line {line}: `{token}` is not a 32-bit hex address")
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(err) => Some(err),
            TraceError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(err: io::Error) -> Self {
        TraceError::Io(err)
    }
}
