//! HC-08 driver
//!
//! Owns the transport, the bounded transmit and receive buffers, and the
//! cached module parameters. Commands are encoded and sent in one call;
//! replies are read with [`Hc08::read_answer`] and decoded with the
//! matching `parse_*` call, which commits into the cache only on success.
//!
//! Anything touching the buffers takes `&mut self`; the driver is not reentrant.

use crate::commands::encoder::CommandEncoder;
use crate::commands::parser::ResponseParser;
use crate::commands::types::{
    BaudRate, Command, ConnectionStatus, Connectability, Field, LedState, ModuleParameters,
    Parity, RfPower, Role, WorkingMode,
};
use crate::config::buffers::{RX_BUFFER_SIZE, TX_BUFFER_SIZE};
use crate::config::lengths;
use crate::error::Error;
use crate::transport::{Transport, TransportError};
use heapless::{String, Vec};

/// Driver for one HC-08 module
pub struct Hc08<T: Transport> {
    transport: T,
    encoder: CommandEncoder,
    parser: ResponseParser,
    tx: String<TX_BUFFER_SIZE>,
    rx: Vec<u8, RX_BUFFER_SIZE>,
    params: ModuleParameters,
    connection: ConnectionStatus,
}

impl<T: Transport> Hc08<T> {
    /// Create a driver with factory-default cached parameters
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            encoder: CommandEncoder::new(),
            parser: ResponseParser::new(),
            tx: String::new(),
            rx: Vec::new(),
            params: ModuleParameters::default(),
            connection: ConnectionStatus::default(),
        }
    }

    /// Cached module parameters
    pub fn params(&self) -> &ModuleParameters {
        &self.params
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Text of the last command sent
    pub fn tx_buffer(&self) -> &str {
        &self.tx
    }

    /// Bytes of the last reply, bounded by the received count
    pub fn rx_buffer(&self) -> &[u8] {
        &self.rx
    }

    /// Encode and transmit a command
    ///
    /// Exactly the rendered bytes are sent. On a validation failure nothing
    /// is sent.
    pub fn send(&mut self, command: &Command) -> Result<(), Error> {
        self.encoder.encode(command, &mut self.tx)?;
        log::trace!("HC-08 TX: {}", self.tx.as_str());
        self.transport.transmit(self.tx.as_bytes())?;
        Ok(())
    }

    /// Receive the module's reply into the receive buffer
    ///
    /// Returns the number of bytes received.
    pub fn read_answer(&mut self) -> Result<usize, Error> {
        self.rx.clear();
        // Capacity is fixed, so resizing up to it cannot fail
        let _ = self.rx.resize(RX_BUFFER_SIZE, 0);

        let count = match self.transport.receive(&mut self.rx) {
            Ok(count) => count,
            Err(e) => {
                self.rx.clear();
                return Err(e.into());
            }
        };
        if count > RX_BUFFER_SIZE {
            self.rx.clear();
            return Err(TransportError::Overflow.into());
        }

        self.rx.truncate(count);
        log::trace!(
            "HC-08 RX: {}",
            core::str::from_utf8(&self.rx).unwrap_or("<non-utf8>")
        );
        Ok(count)
    }

    // --- Bare commands ---

    pub fn cmd_at(&mut self) -> Result<(), Error> {
        self.send(&Command::At)
    }

    /// Request the base parameter dump (see [`Hc08::parse_base_param`])
    pub fn cmd_rx(&mut self) -> Result<(), Error> {
        self.send(&Command::Rx)
    }

    pub fn cmd_default(&mut self) -> Result<(), Error> {
        self.send(&Command::Default)
    }

    pub fn cmd_reset(&mut self) -> Result<(), Error> {
        self.send(&Command::Reset)
    }

    pub fn cmd_version(&mut self) -> Result<(), Error> {
        self.send(&Command::Version)
    }

    pub fn cmd_clear(&mut self) -> Result<(), Error> {
        self.send(&Command::Clear)
    }

    // --- Set commands ---

    pub fn set_role(&mut self, role: Role) -> Result<(), Error> {
        self.send(&Command::SetRole(role))
    }

    /// Set the advertised name (1 to 12 printable ASCII bytes)
    pub fn set_name(&mut self, name: &str) -> Result<(), Error> {
        self.send(&Command::SetName(name))
    }

    pub fn set_address(&mut self, address: &[u8; lengths::ADDRESS_LEN]) -> Result<(), Error> {
        self.send(&Command::SetAddress(*address))
    }

    pub fn set_rf_power(&mut self, power: RfPower) -> Result<(), Error> {
        self.send(&Command::SetRfPower(power))
    }

    pub fn set_uart_baud(&mut self, baud: BaudRate) -> Result<(), Error> {
        self.send(&Command::SetBaud(baud))
    }

    pub fn set_uart_baud_parity(&mut self, baud: BaudRate, parity: Parity) -> Result<(), Error> {
        self.send(&Command::SetBaudParity(baud, parity))
    }

    pub fn set_connectability(&mut self, cont: Connectability) -> Result<(), Error> {
        self.send(&Command::SetConnectability(cont))
    }

    /// Set the advertising payload (1 to 12 printable ASCII bytes)
    pub fn set_advertising_data(&mut self, data: &str) -> Result<(), Error> {
        self.send(&Command::SetAdvertisingData(data))
    }

    pub fn set_mode(&mut self, mode: WorkingMode) -> Result<(), Error> {
        self.send(&Command::SetMode(mode))
    }

    /// Advertising interval, 32..=16000
    pub fn set_aint(&mut self, value: u16) -> Result<(), Error> {
        self.send(&Command::SetAdvertisingInterval(value))
    }

    /// Connection interval, 6..=3199
    pub fn set_cint(&mut self, time: u16) -> Result<(), Error> {
        self.send(&Command::SetConnectionInterval(time))
    }

    /// Connection interval range; both in 6..=3199 and `min <= max`
    pub fn set_cint_min_max(&mut self, time_min: u16, time_max: u16) -> Result<(), Error> {
        self.send(&Command::SetConnectionIntervalRange {
            min: time_min,
            max: time_max,
        })
    }

    /// Connection timeout, 10..=3200
    pub fn set_ctout(&mut self, time: u16) -> Result<(), Error> {
        self.send(&Command::SetConnectionTimeout(time))
    }

    pub fn set_led(&mut self, led: LedState) -> Result<(), Error> {
        self.send(&Command::SetLed(led))
    }

    pub fn set_luuid(&mut self, uuid: u16) -> Result<(), Error> {
        self.send(&Command::SetLookupUuid(uuid))
    }

    pub fn set_suuid(&mut self, uuid: u16) -> Result<(), Error> {
        self.send(&Command::SetServiceUuid(uuid))
    }

    pub fn set_tuuid(&mut self, uuid: u16) -> Result<(), Error> {
        self.send(&Command::SetCharacteristicUuid(uuid))
    }

    /// Advertising update supervision timeout, 1..=300
    pub fn set_aust(&mut self, value: u16) -> Result<(), Error> {
        self.send(&Command::SetAdvertisingUpdateSupervisionTimeout(value))
    }

    /// Send `AT+<FIELD>=?`
    pub fn query(&mut self, field: Field) -> Result<(), Error> {
        self.send(&Command::Query(field))
    }

    // --- Reply parsing ---

    /// Check the reply to a set command for `OK`
    pub fn check_set(&self) -> Result<(), Error> {
        self.parser.check_set(&self.rx)
    }

    /// Parse the `AT+RX` dump; all five fields are committed or none
    pub fn parse_base_param(&mut self) -> Result<(), Error> {
        let base = self.parser.parse_base_param(&self.rx)?;
        base.apply_to(&mut self.params);
        Ok(())
    }

    pub fn parse_role(&mut self) -> Result<(), Error> {
        self.params.role = self.parser.parse_role(&self.rx)?;
        Ok(())
    }

    pub fn parse_name(&mut self) -> Result<(), Error> {
        self.params.name = self.parser.parse_name(&self.rx)?;
        Ok(())
    }

    pub fn parse_address(&mut self) -> Result<(), Error> {
        self.params.address = self.parser.parse_address(&self.rx)?;
        Ok(())
    }

    pub fn parse_pin(&mut self) -> Result<(), Error> {
        self.params.pin = self.parser.parse_pin(&self.rx)?;
        Ok(())
    }

    pub fn parse_rf_power(&mut self) -> Result<(), Error> {
        self.params.rf_power = self.parser.parse_rf_power(&self.rx)?;
        Ok(())
    }

    pub fn parse_baud_and_parity(&mut self) -> Result<(), Error> {
        let (baud, parity) = self.parser.parse_baud_and_parity(&self.rx)?;
        self.params.baud = baud;
        self.params.parity = parity;
        Ok(())
    }

    pub fn parse_connectability(&mut self) -> Result<(), Error> {
        self.params.connectability = self.parser.parse_connectability(&self.rx)?;
        Ok(())
    }

    pub fn parse_mode(&mut self) -> Result<(), Error> {
        self.params.mode = self.parser.parse_mode(&self.rx)?;
        Ok(())
    }

    pub fn parse_cint(&mut self) -> Result<(), Error> {
        let (min, max) = self.parser.parse_cint(&self.rx)?;
        self.params.cint_min = min;
        self.params.cint_max = max;
        Ok(())
    }

    pub fn parse_aint(&mut self) -> Result<(), Error> {
        self.params.aint = self.parser.parse_aint(&self.rx)?;
        Ok(())
    }

    pub fn parse_ctout(&mut self) -> Result<(), Error> {
        self.params.ctout = self.parser.parse_ctout(&self.rx)?;
        Ok(())
    }

    pub fn parse_aust(&mut self) -> Result<(), Error> {
        self.params.aust = self.parser.parse_aust(&self.rx)?;
        Ok(())
    }

    pub fn parse_luuid(&mut self) -> Result<(), Error> {
        self.params.luuid = self.parser.parse_uuid(&self.rx)?;
        Ok(())
    }

    pub fn parse_suuid(&mut self) -> Result<(), Error> {
        self.params.suuid = self.parser.parse_uuid(&self.rx)?;
        Ok(())
    }

    pub fn parse_tuuid(&mut self) -> Result<(), Error> {
        self.params.tuuid = self.parser.parse_uuid(&self.rx)?;
        Ok(())
    }

    pub fn parse_led(&mut self) -> Result<(), Error> {
        self.params.led = self.parser.parse_led(&self.rx)?;
        Ok(())
    }

    // --- Connection status and buffers ---

    /// Record the link state reported by the application
    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection = status;
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection
    }

    /// Empty the transmit buffer
    pub fn clear_tx_buffer(&mut self) {
        self.tx.clear();
    }

    /// Zero and empty the receive buffer
    pub fn clear_rx_buffer(&mut self) {
        self.rx.iter_mut().for_each(|b| *b = 0);
        self.rx.clear();
    }
}
