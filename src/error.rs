//! Error type shared by the encoder, the parser and the driver

use crate::transport::TransportError;

/// Errors returned by driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Caller-supplied value outside the documented domain
    ///
    /// Returned before rendering; nothing is transmitted.
    ValidationFailed,
    /// No candidate token matched the received text
    UnrecognizedToken,
    /// Value decoded but outside the field's domain
    OutOfRange,
    /// Received data ends before the expected field
    Truncated,
    /// Expected delimiter or digit run absent
    Malformed,
    /// The transport collaborator failed
    Transport(TransportError),
}

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        Error::Transport(error)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ValidationFailed => f.write_str("value outside documented range"),
            Error::UnrecognizedToken => f.write_str("unrecognised token in response"),
            Error::OutOfRange => f.write_str("response value out of range"),
            Error::Truncated => f.write_str("response truncated"),
            Error::Malformed => f.write_str("malformed response"),
            Error::Transport(e) => write!(f, "transport error: {:?}", e),
        }
    }
}
