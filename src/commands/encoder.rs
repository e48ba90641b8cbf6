//! Command encoder
//!
//! Renders [`Command`] values into the module's ASCII command text. Values
//! are validated before anything is written, and encoding never looks at
//! cached module state.

use crate::commands::types::{Command, Field, ProtocolToken};
use crate::config::buffers::TX_BUFFER_SIZE;
use crate::config::{lengths, limits, text};
use crate::error::Error;
use core::fmt::Write;
use heapless::String;

/// Encoder for AT commands
pub struct CommandEncoder;

impl CommandEncoder {
    /// Create a new command encoder
    pub fn new() -> Self {
        Self
    }

    /// Render `command` into `out`, replacing its contents
    ///
    /// On `Err`, `out` is left empty.
    pub fn encode(&self, command: &Command, out: &mut String<TX_BUFFER_SIZE>) -> Result<(), Error> {
        out.clear();
        Self::validate(command)?;

        let result = Self::render(command, out);
        if result.is_err() {
            out.clear();
        }
        result.map_err(|_| Error::ValidationFailed)
    }

    /// Encode into a fresh buffer
    pub fn encode_to_string(&self, command: &Command) -> Result<String<TX_BUFFER_SIZE>, Error> {
        let mut out = String::new();
        self.encode(command, &mut out)?;
        Ok(out)
    }

    fn validate(command: &Command) -> Result<(), Error> {
        match *command {
            Command::SetName(name) => check_text(name, lengths::MAX_NAME_LEN),
            Command::SetAdvertisingData(data) => check_text(data, lengths::MAX_AVDA_LEN),
            Command::SetAdvertisingInterval(value) => {
                check_range(value, limits::AINT_MIN, limits::AINT_MAX)
            }
            Command::SetConnectionInterval(value) => {
                check_range(value, limits::CINT_MIN, limits::CINT_MAX)
            }
            Command::SetConnectionIntervalRange { min, max } => {
                check_range(min, limits::CINT_MIN, limits::CINT_MAX)?;
                check_range(max, limits::CINT_MIN, limits::CINT_MAX)?;
                if min > max {
                    return Err(Error::ValidationFailed);
                }
                Ok(())
            }
            Command::SetConnectionTimeout(value) => {
                check_range(value, limits::CTOUT_MIN, limits::CTOUT_MAX)
            }
            Command::SetAdvertisingUpdateSupervisionTimeout(value) => {
                check_range(value, limits::AUST_MIN, limits::AUST_MAX)
            }
            _ => Ok(()),
        }
    }

    fn render(command: &Command, out: &mut String<TX_BUFFER_SIZE>) -> core::fmt::Result {
        match *command {
            Command::At => out.write_str("AT"),
            Command::Rx => out.write_str("AT+RX"),
            Command::Default => out.write_str("AT+DEFAULT"),
            Command::Reset => out.write_str("AT+RESET"),
            Command::Version => out.write_str("AT+VERSION"),
            Command::Clear => out.write_str("AT+CLEAR"),

            Command::SetRole(role) => set_token(out, Field::Role, role),
            Command::SetBaud(baud) => set_token(out, Field::Baud, baud),
            Command::SetBaudParity(baud, parity) => write!(
                out,
                "{}{},{}",
                Field::Baud.prefix(),
                baud.command_token(),
                parity.command_token()
            ),
            Command::SetName(name) => write!(out, "{}{}", Field::Name.prefix(), name),
            Command::SetAddress(address) => {
                out.write_str(Field::Address.prefix())?;
                for byte in address {
                    write!(out, "{:02X}", byte)?;
                }
                Ok(())
            }
            Command::SetRfPower(power) => set_token(out, Field::RfPower, power),
            Command::SetConnectability(cont) => set_token(out, Field::Connectability, cont),
            Command::SetAdvertisingData(data) => {
                write!(out, "{}{}", Field::AdvertisingData.prefix(), data)
            }
            Command::SetMode(mode) => set_token(out, Field::Mode, mode),
            Command::SetAdvertisingInterval(value) => {
                set_decimal(out, Field::AdvertisingInterval, value)
            }
            Command::SetConnectionInterval(value) => {
                set_decimal(out, Field::ConnectionInterval, value)
            }
            Command::SetConnectionIntervalRange { min, max } => {
                write!(out, "{}{},{}", Field::ConnectionInterval.prefix(), min, max)
            }
            Command::SetConnectionTimeout(value) => {
                set_decimal(out, Field::ConnectionTimeout, value)
            }
            Command::SetLed(led) => set_token(out, Field::Led, led),
            Command::SetLookupUuid(uuid) => set_uuid(out, Field::LookupUuid, uuid),
            Command::SetServiceUuid(uuid) => set_uuid(out, Field::ServiceUuid, uuid),
            Command::SetCharacteristicUuid(uuid) => set_uuid(out, Field::CharacteristicUuid, uuid),
            Command::SetAdvertisingUpdateSupervisionTimeout(value) => {
                set_decimal(out, Field::AdvertisingUpdateSupervisionTimeout, value)
            }

            Command::Query(field) => write!(out, "{}{}", field.prefix(), text::QUERY),
        }
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_range(value: u16, min: u16, max: u16) -> Result<(), Error> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::ValidationFailed)
    }
}

/// Non-empty, bounded, printable ASCII
fn check_text(value: &str, max_len: usize) -> Result<(), Error> {
    let valid = !value.is_empty()
        && value.len() <= max_len
        && value.bytes().all(|b| b.is_ascii_graphic() || b == b' ');
    if valid {
        Ok(())
    } else {
        Err(Error::ValidationFailed)
    }
}

fn set_token<T: ProtocolToken>(
    out: &mut String<TX_BUFFER_SIZE>,
    field: Field,
    value: T,
) -> core::fmt::Result {
    out.write_str(field.prefix())?;
    out.write_str(value.command_token())
}

fn set_decimal(out: &mut String<TX_BUFFER_SIZE>, field: Field, value: u16) -> core::fmt::Result {
    write!(out, "{}{}", field.prefix(), value)
}

fn set_uuid(out: &mut String<TX_BUFFER_SIZE>, field: Field, value: u16) -> core::fmt::Result {
    write!(out, "{}{:04X}", field.prefix(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::{
        BaudRate, Connectability, LedState, Parity, RfPower, Role, WorkingMode,
    };

    fn encode(command: Command) -> Result<String<TX_BUFFER_SIZE>, Error> {
        CommandEncoder::new().encode_to_string(&command)
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(encode(Command::At).unwrap().as_str(), "AT");
        assert_eq!(encode(Command::Rx).unwrap().as_str(), "AT+RX");
        assert_eq!(encode(Command::Default).unwrap().as_str(), "AT+DEFAULT");
        assert_eq!(encode(Command::Reset).unwrap().as_str(), "AT+RESET");
        assert_eq!(encode(Command::Version).unwrap().as_str(), "AT+VERSION");
        assert_eq!(encode(Command::Clear).unwrap().as_str(), "AT+CLEAR");
    }

    #[test]
    fn test_enum_set_commands() {
        assert_eq!(encode(Command::SetRole(Role::Master)).unwrap().as_str(), "AT+ROLE=Master");
        assert_eq!(encode(Command::SetBaud(BaudRate::Bps57600)).unwrap().as_str(), "AT+BAUD=57600");
        assert_eq!(
            encode(Command::SetBaudParity(BaudRate::Bps9600, Parity::Even)).unwrap().as_str(),
            "AT+BAUD=9600,EVEN"
        );
        assert_eq!(encode(Command::SetRfPower(RfPower::Minus23dBm)).unwrap().as_str(), "AT+RFPM=3");
        assert_eq!(
            encode(Command::SetConnectability(Connectability::NonConnectable)).unwrap().as_str(),
            "AT+CONT=1"
        );
        assert_eq!(encode(Command::SetMode(WorkingMode::Level2)).unwrap().as_str(), "AT+MODE=2");
        assert_eq!(encode(Command::SetLed(LedState::Off)).unwrap().as_str(), "AT+LED=OFF");
    }

    #[test]
    fn test_address_is_twelve_hex_digits() {
        let out = encode(Command::SetAddress([0x3C, 0xE4, 0xB0, 0x89, 0xDC, 0x03])).unwrap();
        assert_eq!(out.as_str(), "AT+ADDR=3CE4B089DC03");
        assert_eq!(out.len(), "AT+ADDR=".len() + 12);

        // Leading zeros are kept
        let out = encode(Command::SetAddress([0x00, 0x01, 0x02, 0x03, 0x04, 0x05])).unwrap();
        assert_eq!(out.as_str(), "AT+ADDR=000102030405");
    }

    #[test]
    fn test_numeric_set_commands() {
        assert_eq!(encode(Command::SetAdvertisingInterval(1000)).unwrap().as_str(), "AT+AINT=1000");
        assert_eq!(encode(Command::SetConnectionInterval(6)).unwrap().as_str(), "AT+CINT=6");
        assert_eq!(
            encode(Command::SetConnectionIntervalRange { min: 50, max: 100 }).unwrap().as_str(),
            "AT+CINT=50,100"
        );
        assert_eq!(encode(Command::SetConnectionTimeout(3200)).unwrap().as_str(), "AT+CTOUT=3200");
        assert_eq!(
            encode(Command::SetAdvertisingUpdateSupervisionTimeout(300)).unwrap().as_str(),
            "AT+AUST=300"
        );
    }

    #[test]
    fn test_uuid_set_commands() {
        assert_eq!(encode(Command::SetLookupUuid(0xFFF0)).unwrap().as_str(), "AT+LUUID=FFF0");
        assert_eq!(encode(Command::SetServiceUuid(0x00E0)).unwrap().as_str(), "AT+SUUID=00E0");
        assert_eq!(encode(Command::SetCharacteristicUuid(0xFFE1)).unwrap().as_str(), "AT+TUUID=FFE1");
    }

    #[test]
    fn test_range_boundaries() {
        let cases: [(fn(u16) -> Command<'static>, u16, u16); 4] = [
            (Command::SetAdvertisingInterval, limits::AINT_MIN, limits::AINT_MAX),
            (Command::SetConnectionInterval, limits::CINT_MIN, limits::CINT_MAX),
            (Command::SetConnectionTimeout, limits::CTOUT_MIN, limits::CTOUT_MAX),
            (
                Command::SetAdvertisingUpdateSupervisionTimeout,
                limits::AUST_MIN,
                limits::AUST_MAX,
            ),
        ];

        for (make, min, max) in cases {
            assert!(encode(make(min)).is_ok());
            assert!(encode(make(max)).is_ok());
            assert_eq!(encode(make(min - 1)), Err(Error::ValidationFailed));
            assert_eq!(encode(make(max + 1)), Err(Error::ValidationFailed));
        }
    }

    #[test]
    fn test_interval_range_joint_validation() {
        assert_eq!(
            encode(Command::SetConnectionIntervalRange { min: 100, max: 50 }),
            Err(Error::ValidationFailed)
        );
        assert_eq!(
            encode(Command::SetConnectionIntervalRange { min: 5, max: 50 }),
            Err(Error::ValidationFailed)
        );
        assert_eq!(
            encode(Command::SetConnectionIntervalRange { min: 50, max: 3200 }),
            Err(Error::ValidationFailed)
        );
        assert!(encode(Command::SetConnectionIntervalRange { min: 80, max: 80 }).is_ok());
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(encode(Command::SetName("MyDevice")).unwrap().as_str(), "AT+NAME=MyDevice");
        assert!(encode(Command::SetName("ABCDEFGHIJKL")).is_ok());
        assert_eq!(encode(Command::SetName("ABCDEFGHIJKLM")), Err(Error::ValidationFailed));
        assert_eq!(encode(Command::SetName("")), Err(Error::ValidationFailed));
        assert_eq!(encode(Command::SetName("bad\r")), Err(Error::ValidationFailed));
    }

    #[test]
    fn test_advertising_data() {
        assert_eq!(
            encode(Command::SetAdvertisingData("1234567890")).unwrap().as_str(),
            "AT+AVDA=1234567890"
        );
        assert_eq!(
            encode(Command::SetAdvertisingData("1234567890123")),
            Err(Error::ValidationFailed)
        );
    }

    #[test]
    fn test_queries() {
        assert_eq!(encode(Command::Query(Field::Name)).unwrap().as_str(), "AT+NAME=?");
        assert_eq!(encode(Command::Query(Field::ConnectionTimeout)).unwrap().as_str(), "AT+CTOUT=?");
        assert_eq!(
            encode(Command::Query(Field::AdvertisingUpdateSupervisionTimeout)).unwrap().as_str(),
            "AT+AUST=?"
        );
    }

    #[test]
    fn test_failed_encode_leaves_buffer_empty() {
        let encoder = CommandEncoder::new();
        let mut out = String::new();
        encoder.encode(&Command::At, &mut out).unwrap();
        assert_eq!(out.as_str(), "AT");

        let result = encoder.encode(&Command::SetAdvertisingInterval(1), &mut out);
        assert_eq!(result, Err(Error::ValidationFailed));
        assert!(out.is_empty());
    }
}
