//! Serial transport for a module attached to the host.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use hc08_driver::{Hc08, Transport, TransportError};
use serialport::SerialPort;

/// Pick the first USB serial adapter found.
pub fn find_port() -> Result<String> {
    let ports = serialport::available_ports()?;
    ports
        .into_iter()
        .map(|p| p.port_name)
        .find(|name| name.contains("ttyUSB") || name.contains("ttyACM"))
        .ok_or_else(|| anyhow::anyhow!("No serial adapter found - ensure the module is connected"))
}

/// Resolve a port argument - returns the port path if not "auto", otherwise auto-detects.
pub fn resolve_port(port_arg: &str) -> Result<String> {
    if port_arg == "auto" {
        find_port()
    } else {
        Ok(port_arg.to_string())
    }
}

/// Open the port and wrap it in a driver.
pub fn open_module(port_name: &str, baud_rate: u32) -> Result<Hc08<SerialTransport>> {
    Ok(Hc08::new(SerialTransport::new(port_name, baud_rate)?))
}

/// Replies carry no terminator, so a reply ends when the line goes quiet.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    timeout: Duration,
    quiet: Duration,
}

impl SerialTransport {
    pub fn new(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(20))
            .open()?;

        Ok(Self {
            port,
            timeout: Duration::from_secs(1),
            quiet: Duration::from_millis(100),
        })
    }

    /// Clear any pending data in the serial buffer.
    pub fn clear_buffer(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::All)?;
        Ok(())
    }
}

impl Transport for SerialTransport {
    fn transmit(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.port
            .write_all(data)
            .and_then(|_| self.port.flush())
            .map_err(|_| TransportError::WriteFailed)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let start = Instant::now();
        let mut last_byte: Option<Instant> = None;
        let mut count = 0;

        while count < buf.len() {
            match last_byte {
                Some(at) if at.elapsed() >= self.quiet => break,
                None if start.elapsed() >= self.timeout => break,
                _ => {}
            }

            match self.port.read(&mut buf[count..]) {
                Ok(0) => {}
                Ok(n) => {
                    count += n;
                    last_byte = Some(Instant::now());
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(_) => return Err(TransportError::ReadFailed),
            }
        }

        Ok(count)
    }
}
