//! Command, field and parameter types for the HC-08 AT protocol
//!
//! # Protocol Format
//!
//! Commands are plain ASCII with no terminator:
//! ```text
//! AT                    bare command
//! AT+<FIELD>=<value>    set command
//! AT+<FIELD>=?          query command
//! ```
//!
//! Replies are either the acknowledgement `OK`, a single-field echo such
//! as `AT+AINT=1000`, or the multi-line dump returned for `AT+RX`:
//! ```text
//! Name:HC-08\rRole:Slave\rBaud:115200,NONE\rAddr:3C,E4,B0,89,DC,03\rPIN:000000\r
//! ```

use crate::config::{defaults, lengths};
use heapless::String;

/// Closed set of protocol values with fixed text tokens
///
/// `ALL` is in protocol ordinal order. Response parsers try candidates in
/// this order.
pub trait ProtocolToken: Copy + 'static {
    /// Every variant, in ordinal order
    const ALL: &'static [Self];

    /// Text rendered into a set command
    fn command_token(self) -> &'static str;

    /// Text the module uses for this value in its replies
    fn response_token(self) -> &'static str {
        self.command_token()
    }
}

/// Master/slave role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Master,
    Slave,
}

impl ProtocolToken for Role {
    const ALL: &'static [Self] = &[Role::Master, Role::Slave];

    fn command_token(self) -> &'static str {
        match self {
            Role::Master => "Master",
            Role::Slave => "Slave",
        }
    }
}

/// UART baud rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRate {
    Bps1200,
    Bps2400,
    Bps4800,
    Bps9600,
    Bps19200,
    Bps38400,
    Bps57600,
    Bps115200,
}

impl BaudRate {
    /// Rate in bits per second
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::Bps1200 => 1200,
            BaudRate::Bps2400 => 2400,
            BaudRate::Bps4800 => 4800,
            BaudRate::Bps9600 => 9600,
            BaudRate::Bps19200 => 19200,
            BaudRate::Bps38400 => 38400,
            BaudRate::Bps57600 => 57600,
            BaudRate::Bps115200 => 115200,
        }
    }
}

impl ProtocolToken for BaudRate {
    const ALL: &'static [Self] = &[
        BaudRate::Bps1200,
        BaudRate::Bps2400,
        BaudRate::Bps4800,
        BaudRate::Bps9600,
        BaudRate::Bps19200,
        BaudRate::Bps38400,
        BaudRate::Bps57600,
        BaudRate::Bps115200,
    ];

    fn command_token(self) -> &'static str {
        match self {
            BaudRate::Bps1200 => "1200",
            BaudRate::Bps2400 => "2400",
            BaudRate::Bps4800 => "4800",
            BaudRate::Bps9600 => "9600",
            BaudRate::Bps19200 => "19200",
            BaudRate::Bps38400 => "38400",
            BaudRate::Bps57600 => "57600",
            BaudRate::Bps115200 => "115200",
        }
    }
}

/// UART parity bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl ProtocolToken for Parity {
    const ALL: &'static [Self] = &[Parity::None, Parity::Even, Parity::Odd];

    fn command_token(self) -> &'static str {
        match self {
            Parity::None => "NONE",
            Parity::Even => "EVEN",
            Parity::Odd => "ODD",
        }
    }
}

/// Radio transmit power
///
/// Set as an index (`AT+RFPM=2`), reported in dBm (`-6dBm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfPower {
    Plus4dBm,
    Zero0dBm,
    Minus6dBm,
    Minus23dBm,
}

impl ProtocolToken for RfPower {
    const ALL: &'static [Self] = &[
        RfPower::Plus4dBm,
        RfPower::Zero0dBm,
        RfPower::Minus6dBm,
        RfPower::Minus23dBm,
    ];

    fn command_token(self) -> &'static str {
        match self {
            RfPower::Plus4dBm => "0",
            RfPower::Zero0dBm => "1",
            RfPower::Minus6dBm => "2",
            RfPower::Minus23dBm => "3",
        }
    }

    fn response_token(self) -> &'static str {
        match self {
            RfPower::Plus4dBm => "4dBm",
            RfPower::Zero0dBm => "0dBm",
            RfPower::Minus6dBm => "-6dBm",
            RfPower::Minus23dBm => "-23dBm",
        }
    }
}

/// Whether a central may connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectability {
    Connectable,
    NonConnectable,
}

impl ProtocolToken for Connectability {
    const ALL: &'static [Self] = &[Connectability::Connectable, Connectability::NonConnectable];

    fn command_token(self) -> &'static str {
        match self {
            Connectability::Connectable => "0",
            Connectability::NonConnectable => "1",
        }
    }

    fn response_token(self) -> &'static str {
        match self {
            Connectability::Connectable => "Connectable",
            Connectability::NonConnectable => "Non-Connectable",
        }
    }
}

/// Power-saving working mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingMode {
    /// Full speed
    Full,
    /// Level 1 power saving
    Level1,
    /// Level 2 power saving
    Level2,
}

impl ProtocolToken for WorkingMode {
    const ALL: &'static [Self] = &[WorkingMode::Full, WorkingMode::Level1, WorkingMode::Level2];

    fn command_token(self) -> &'static str {
        match self {
            WorkingMode::Full => "0",
            WorkingMode::Level1 => "1",
            WorkingMode::Level2 => "2",
        }
    }
}

/// Status LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}

impl ProtocolToken for LedState {
    const ALL: &'static [Self] = &[LedState::On, LedState::Off];

    fn command_token(self) -> &'static str {
        match self {
            LedState::On => "ON",
            LedState::Off => "OFF",
        }
    }
}

/// Link state reported by the application, not by the AT protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    NotConnected,
}

/// A settable/queryable module parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Role,
    Baud,
    Name,
    Address,
    RfPower,
    Connectability,
    AdvertisingData,
    Mode,
    AdvertisingInterval,
    ConnectionInterval,
    ConnectionTimeout,
    Led,
    LookupUuid,
    ServiceUuid,
    CharacteristicUuid,
    AdvertisingUpdateSupervisionTimeout,
}

impl Field {
    /// Command prefix including the `=`
    pub fn prefix(self) -> &'static str {
        match self {
            Field::Role => "AT+ROLE=",
            Field::Baud => "AT+BAUD=",
            Field::Name => "AT+NAME=",
            Field::Address => "AT+ADDR=",
            Field::RfPower => "AT+RFPM=",
            Field::Connectability => "AT+CONT=",
            Field::AdvertisingData => "AT+AVDA=",
            Field::Mode => "AT+MODE=",
            Field::AdvertisingInterval => "AT+AINT=",
            Field::ConnectionInterval => "AT+CINT=",
            Field::ConnectionTimeout => "AT+CTOUT=",
            Field::Led => "AT+LED=",
            Field::LookupUuid => "AT+LUUID=",
            Field::ServiceUuid => "AT+SUUID=",
            Field::CharacteristicUuid => "AT+TUUID=",
            Field::AdvertisingUpdateSupervisionTimeout => "AT+AUST=",
        }
    }
}

/// A command the module understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Link test (`AT`)
    At,
    /// Dump base parameters (`AT+RX`)
    Rx,
    /// Restore factory settings (`AT+DEFAULT`)
    Default,
    /// Reboot the module (`AT+RESET`)
    Reset,
    /// Firmware version (`AT+VERSION`)
    Version,
    /// Forget the paired address (`AT+CLEAR`)
    Clear,

    SetRole(Role),
    SetBaud(BaudRate),
    SetBaudParity(BaudRate, Parity),
    /// 1 to 12 printable ASCII bytes
    SetName(&'a str),
    SetAddress([u8; lengths::ADDRESS_LEN]),
    SetRfPower(RfPower),
    SetConnectability(Connectability),
    /// 1 to 12 printable ASCII bytes
    SetAdvertisingData(&'a str),
    SetMode(WorkingMode),
    SetAdvertisingInterval(u16),
    SetConnectionInterval(u16),
    SetConnectionIntervalRange { min: u16, max: u16 },
    SetConnectionTimeout(u16),
    SetLed(LedState),
    SetLookupUuid(u16),
    SetServiceUuid(u16),
    SetCharacteristicUuid(u16),
    SetAdvertisingUpdateSupervisionTimeout(u16),

    /// `AT+<FIELD>=?`
    Query(Field),
}

/// Cached module configuration
///
/// Only successful parses write here; a failed parse leaves every field
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleParameters {
    pub name: String<{ lengths::MAX_NAME_LEN }>,
    pub role: Role,
    pub baud: BaudRate,
    pub parity: Parity,
    pub address: [u8; lengths::ADDRESS_LEN],
    pub pin: [u8; lengths::PIN_LEN],
    pub rf_power: RfPower,
    pub connectability: Connectability,
    pub mode: WorkingMode,
    pub aint: u16,
    pub cint_min: u16,
    pub cint_max: u16,
    pub ctout: u16,
    pub aust: u16,
    pub luuid: u16,
    pub suuid: u16,
    pub tuuid: u16,
    pub led: LedState,
}

impl ModuleParameters {
    /// Logical length of `name` in bytes
    pub fn name_len(&self) -> usize {
        self.name.len()
    }
}

impl Default for ModuleParameters {
    fn default() -> Self {
        let mut name = String::new();
        let _ = name.push_str(defaults::NAME);

        Self {
            name,
            role: Role::Slave,
            baud: BaudRate::Bps9600,
            parity: Parity::None,
            address: [0; lengths::ADDRESS_LEN],
            pin: [0; lengths::PIN_LEN],
            rf_power: RfPower::Plus4dBm,
            connectability: Connectability::Connectable,
            mode: WorkingMode::Full,
            aint: defaults::AINT,
            cint_min: defaults::CINT_MIN,
            cint_max: defaults::CINT_MAX,
            ctout: defaults::CTOUT,
            aust: defaults::AUST,
            luuid: defaults::LUUID,
            suuid: defaults::SUUID,
            tuuid: defaults::TUUID,
            led: LedState::On,
        }
    }
}

/// Fields carried by the `AT+RX` dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseParameters {
    pub name: String<{ lengths::MAX_NAME_LEN }>,
    pub role: Role,
    pub baud: BaudRate,
    pub parity: Parity,
    pub address: [u8; lengths::ADDRESS_LEN],
    pub pin: [u8; lengths::PIN_LEN],
}

impl BaseParameters {
    /// Copy every field into the cache
    pub fn apply_to(self, params: &mut ModuleParameters) {
        params.name = self.name;
        params.role = self.role;
        params.baud = self.baud;
        params.parity = self.parity;
        params.address = self.address;
        params.pin = self.pin;
    }
}
