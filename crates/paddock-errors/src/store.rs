//! Store round-trip errors.
//!
//! Every variant is transient from the caller's point of view: the store
//! could not be asked, so nothing can be concluded about the data.

use crate::common::ErrorSeverity;

/// A failed round trip to the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not open a connection
    #[error("Failed to connect to {addr}: {reason}")]
    Connect {
        /// Store address
        addr: String,
        /// Underlying reason
        reason: String,
    },

    /// I/O failure on an established connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Round trip exceeded its deadline
    #[error("Round trip timed out after {timeout_ms} ms")]
    Timeout {
        /// Deadline in milliseconds
        timeout_ms: u64,
    },

    /// Connection closed while replies were outstanding
    #[error("Connection closed with {pending} replies outstanding")]
    ConnectionClosed {
        /// Replies still expected
        pending: usize,
    },

    /// Store replied with an error for a command
    #[error("Command {command} failed: {message}")]
    Command {
        /// Command name
        command: String,
        /// Error text returned by the store
        message: String,
    },

    /// Reply could not be interpreted
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Store deliberately unavailable (used by test doubles)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StoreError::Connect { .. } | StoreError::Unavailable(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Create a command error.
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        StoreError::Protocol(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_names_command() {
        let err = StoreError::command("HGETALL", "ERR unknown");
        assert!(err.to_string().contains("HGETALL"));
    }

    #[test]
    fn test_timeout_severity() {
        let err = StoreError::Timeout { timeout_ms: 100 };
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }
}
