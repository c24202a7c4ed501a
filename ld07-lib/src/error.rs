use crate::command::CommandCode;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LdError>;

/// The primary error type for the `ld07-lib` library.
#[derive(Error, Debug)]
pub enum LdError {
    #[error("Bad start marker: expected AA AA AA AA, got {}", hex::encode_upper(.observed))]
    Framing { observed: [u8; 4] },

    #[error("Checksum mismatch: received {received:#04x}, computed {computed:#04x}")]
    Checksum { received: u8, computed: u8 },

    #[error("Serial I/O error: {0}")]
    Transport(#[from] io::Error),

    #[error("Unknown command code {0:#04x}")]
    UnknownCommand(u8),

    #[error("Unexpected response: expected {expected}, got {actual}")]
    UnexpectedCommand { expected: CommandCode, actual: CommandCode },

    #[error("Response from device {actual:#04x}, expected {expected:#04x}")]
    AddressMismatch { expected: u8, actual: u8 },

    #[error("Address configuration returned unsupported pattern {0:#04x}")]
    UnsupportedAddressPattern(u8),

    #[error("Unexpected payload length for {command}: expected {expected} bytes, got {actual}")]
    UnexpectedPayloadLength {
        command: CommandCode,
        expected: usize,
        actual: usize,
    },

    #[error("Point count mismatch: expected {expected} samples, got {actual}")]
    PointCountMismatch { expected: usize, actual: usize },

    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("{0} trailing bytes after frame")]
    TrailingData(usize),

    #[error("Payload of {0} bytes does not fit the 16-bit length field")]
    PayloadTooLarge(usize),

    #[error("{operation} is not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: crate::device::SessionState,
    },
}

/// Coarse classification of [`LdError`] so callers can pick a recovery per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Start marker mismatch; the stream must be realigned.
    Framing,
    /// Corrupted frame; it has been consumed and can be dropped.
    Checksum,
    /// Well-formed frame with content the session cannot accept.
    Protocol,
    /// The serial link itself failed.
    Transport,
}

impl LdError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LdError::Framing { .. } => ErrorKind::Framing,
            LdError::Checksum { .. } => ErrorKind::Checksum,
            LdError::Transport(_) => ErrorKind::Transport,
            _ => ErrorKind::Protocol,
        }
    }

    /// Whether the session is still usable after this error, given the
    /// caller realigns the stream on framing errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Framing | ErrorKind::Checksum)
    }
}
