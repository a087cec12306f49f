//! Unified error types for the doorlock firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! node run loops' error handling uniform.  All variants are `Copy` so they
//! pass through the FSM engine without allocation.
//!
//! Protocol *outcomes* (password match / mismatch, occupied / clear) are
//! never errors: they travel in-band as wire bytes.  The types here cover
//! the plumbing underneath: links, storage and operator input.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link to the peer node failed.
    Link(LinkError),
    /// Credential or config storage failed.
    Storage(StorageError),
    /// The operator input device went away.
    Operator(OperatorError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Operator(e) => write!(f, "operator: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

/// Failures of the byte link between the two nodes.
///
/// A wired UART never reports either of these; they exist for links that
/// can observe the far end going away (the in-process channel link).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The peer hung up.  Node loops stop on this.
    Closed,
    /// The driver reported a hardware fault.
    Io,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "peer closed the link"),
            Self::Io => write!(f, "link I/O error"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Operator input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorError {
    /// The keypad / console input stream ended.
    InputClosed,
}

impl fmt::Display for OperatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputClosed => write!(f, "keypad input closed"),
        }
    }
}

impl From<OperatorError> for Error {
    fn from(e: OperatorError) -> Self {
        Self::Operator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
