//! Transport over a blocking `embedded-io` UART

use crate::transport::traits::{Transport, TransportError};
use embedded_io::{Read, Write};

/// Adapts any blocking `embedded_io` serial port to [`Transport`]
pub struct IoTransport<T> {
    io: T,
}

impl<T: Read + Write> IoTransport<T> {
    pub fn new(io: T) -> Self {
        Self { io }
    }

    /// Give back the wrapped port
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: Read + Write> Transport for IoTransport<T> {
    fn transmit(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.io
            .write_all(data)
            .map_err(|_| TransportError::WriteFailed)?;
        self.io.flush().map_err(|_| TransportError::WriteFailed)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.io.read(buf).map_err(|_| TransportError::ReadFailed)
    }
}
