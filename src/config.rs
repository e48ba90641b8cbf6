//! Protocol constants for the HC-08 BLE module

/// Driver-owned buffer sizes
pub mod buffers {
    /// Transmit buffer capacity in bytes
    pub const TX_BUFFER_SIZE: usize = 100;
    /// Receive buffer capacity in bytes
    pub const RX_BUFFER_SIZE: usize = 127;
}

/// Lengths of fixed-size fields
pub mod lengths {
    /// Maximum module name length in bytes
    pub const MAX_NAME_LEN: usize = 12;
    /// Maximum advertising data length in bytes
    pub const MAX_AVDA_LEN: usize = 12;
    /// BLE MAC address length in bytes
    pub const ADDRESS_LEN: usize = 6;
    /// Pairing PIN digits
    pub const PIN_LEN: usize = 6;
}

/// Documented value ranges (inclusive)
pub mod limits {
    /// Advertising interval, in 0.625 ms units
    pub const AINT_MIN: u16 = 32;
    pub const AINT_MAX: u16 = 16000;

    /// Connection interval, in 1.25 ms units
    pub const CINT_MIN: u16 = 6;
    pub const CINT_MAX: u16 = 3199;

    /// Connection supervision timeout, in 10 ms units
    pub const CTOUT_MIN: u16 = 10;
    pub const CTOUT_MAX: u16 = 3200;

    /// Advertising update supervision timeout, in seconds
    pub const AUST_MIN: u16 = 1;
    pub const AUST_MAX: u16 = 300;
}

/// Factory settings of a freshly reset module
pub mod defaults {
    pub const NAME: &str = "HC-08";
    pub const AINT: u16 = 320;
    pub const CINT_MIN: u16 = 6;
    pub const CINT_MAX: u16 = 12;
    pub const CTOUT: u16 = 200;
    pub const AUST: u16 = 1;
    pub const LUUID: u16 = 0xFFF0;
    pub const SUUID: u16 = 0xFFE0;
    pub const TUUID: u16 = 0xFFE1;
}

/// Fixed protocol text
pub mod text {
    /// Acknowledgement token for set commands
    pub const OK: &[u8] = b"OK";
    /// Query suffix
    pub const QUERY: &str = "?";
    /// Separator inside multi-value fields
    pub const COMMA: u8 = b',';
    /// Delimiter in query echoes (`AT+AINT=1000`)
    pub const EQUALS: u8 = b'=';
    /// Delimiter in the aggregate dump (`Name:HC-08`)
    pub const COLON: u8 = b':';
    pub const CR: u8 = b'\r';
    pub const LF: u8 = b'\n';
}
