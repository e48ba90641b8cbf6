//! Transport trait for abstraction and testability
//!
//! The driver never touches UART registers. It writes commands and reads
//! replies through this trait, so the real UART can be swapped with a mock
//! for testing.

/// Errors that can occur in the transport collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Write failed
    WriteFailed,
    /// Read failed
    ReadFailed,
    /// Reported more bytes than the buffer holds
    Overflow,
}

/// Byte transport to the module
pub trait Transport {
    /// Send exactly `data`
    fn transmit(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Fill `buf` with up to `buf.len()` bytes of the module's reply
    ///
    /// Returns the number of bytes actually written into `buf`.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transmit(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).transmit(data)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        (**self).receive(buf)
    }
}
