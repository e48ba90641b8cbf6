//! Response parser for module replies
//!
//! Every function takes only the bytes actually received. Nothing here
//! keeps state between calls; matching a reply to the command that
//! produced it is the caller's job.

use crate::commands::types::{
    BaseParameters, BaudRate, Connectability, LedState, Parity, ProtocolToken, RfPower, Role,
    WorkingMode,
};
use crate::config::{lengths, limits, text};
use crate::error::Error;
use heapless::String;

/// Parser for AT command replies
pub struct ResponseParser;

impl ResponseParser {
    /// Create a new response parser
    pub fn new() -> Self {
        Self
    }

    /// Check the reply to a set command
    ///
    /// Only the presence of `OK` is checked.
    pub fn check_set(&self, data: &[u8]) -> Result<(), Error> {
        if data.len() < text::OK.len() {
            return Err(Error::Truncated);
        }
        if find_subslice(data, text::OK).is_some() {
            Ok(())
        } else {
            Err(Error::UnrecognizedToken)
        }
    }

    /// Parse the multi-line `AT+RX` dump
    ///
    /// Fields are read in order (`Name`, `Role`, `Baud`, `Addr`, `PIN`),
    /// each search starting where the previous line ended. Either every
    /// field parses or an error is returned.
    pub fn parse_base_param(&self, data: &[u8]) -> Result<BaseParameters, Error> {
        let mut cursor = 0;

        let name = name_value(labelled_value(data, &mut cursor, "Name")?)?;
        let role = token_value(labelled_value(data, &mut cursor, "Role")?)?;
        let (baud, parity) = baud_parity_value(labelled_value(data, &mut cursor, "Baud")?)?;
        let address = address_value(labelled_value(data, &mut cursor, "Addr")?)?;
        let pin = pin_value(labelled_value(data, &mut cursor, "PIN")?)?;

        Ok(BaseParameters {
            name,
            role,
            baud,
            parity,
            address,
            pin,
        })
    }

    /// Parse any single enumerated field
    pub fn parse_token<T: ProtocolToken>(&self, data: &[u8]) -> Result<T, Error> {
        token_value(field_value(data)?)
    }

    pub fn parse_role(&self, data: &[u8]) -> Result<Role, Error> {
        self.parse_token(data)
    }

    /// Parse the reply to `AT+NAME=?`, truncating to 12 bytes
    pub fn parse_name(&self, data: &[u8]) -> Result<String<{ lengths::MAX_NAME_LEN }>, Error> {
        name_value(field_value(data)?)
    }

    /// Parse the reply to `AT+ADDR=?`
    ///
    /// Accepts `3C,E4,B0,89,DC,03` and `3CE4B089DC03`.
    pub fn parse_address(&self, data: &[u8]) -> Result<[u8; lengths::ADDRESS_LEN], Error> {
        address_value(field_value(data)?)
    }

    /// Parse a six digit PIN line (`PIN:000000`)
    pub fn parse_pin(&self, data: &[u8]) -> Result<[u8; lengths::PIN_LEN], Error> {
        pin_value(field_value(data)?)
    }

    pub fn parse_rf_power(&self, data: &[u8]) -> Result<RfPower, Error> {
        self.parse_token(data)
    }

    /// Parse `<rate>,<PARITY>`
    pub fn parse_baud_and_parity(&self, data: &[u8]) -> Result<(BaudRate, Parity), Error> {
        baud_parity_value(field_value(data)?)
    }

    pub fn parse_connectability(&self, data: &[u8]) -> Result<Connectability, Error> {
        self.parse_token(data)
    }

    pub fn parse_mode(&self, data: &[u8]) -> Result<WorkingMode, Error> {
        self.parse_token(data)
    }

    pub fn parse_led(&self, data: &[u8]) -> Result<LedState, Error> {
        self.parse_token(data)
    }

    /// Parse `<min>,<max>` connection interval
    ///
    /// A lone value is read as `min == max`. Both must be in range and
    /// `min <= max`.
    pub fn parse_cint(&self, data: &[u8]) -> Result<(u16, u16), Error> {
        let value = field_value(data)?;
        let (min, rest) = decimal(value)?;
        let rest = trim(rest);

        let max = match rest.split_first() {
            None => min,
            Some((&text::COMMA, tail)) => {
                let (max, tail) = decimal(tail)?;
                if !trim(tail).is_empty() {
                    return Err(Error::Malformed);
                }
                max
            }
            Some(_) => return Err(Error::Malformed),
        };

        let min = in_range(min, limits::CINT_MIN, limits::CINT_MAX)?;
        let max = in_range(max, limits::CINT_MIN, limits::CINT_MAX)?;
        if min > max {
            return Err(Error::OutOfRange);
        }
        Ok((min, max))
    }

    pub fn parse_aint(&self, data: &[u8]) -> Result<u16, Error> {
        bounded_decimal(data, limits::AINT_MIN, limits::AINT_MAX)
    }

    pub fn parse_ctout(&self, data: &[u8]) -> Result<u16, Error> {
        bounded_decimal(data, limits::CTOUT_MIN, limits::CTOUT_MAX)
    }

    pub fn parse_aust(&self, data: &[u8]) -> Result<u16, Error> {
        bounded_decimal(data, limits::AUST_MIN, limits::AUST_MAX)
    }

    /// Parse a 16-bit UUID echo (`AT+LUUID=FFF0`)
    pub fn parse_uuid(&self, data: &[u8]) -> Result<u16, Error> {
        let value = trim(field_value(data)?);
        let digits = value
            .strip_prefix(b"0x")
            .or_else(|| value.strip_prefix(b"0X"))
            .unwrap_or(value);

        let (uuid, _) = hex_run(digits)?;
        u16::try_from(uuid).map_err(|_| Error::OutOfRange)
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Value after the first `=` or `:`, up to the end of the line
fn field_value(data: &[u8]) -> Result<&[u8], Error> {
    let delimiter = data
        .iter()
        .position(|&b| b == text::EQUALS || b == text::COLON)
        .ok_or(Error::Malformed)?;

    let start = delimiter + 1;
    if start >= data.len() {
        return Err(Error::Truncated);
    }
    let end = line_end(data, start);
    Ok(&data[start..end])
}

/// Value of the next `<label>:<value>` line at or after `cursor`
///
/// Advances `cursor` to the end of that line.
fn labelled_value<'d>(data: &'d [u8], cursor: &mut usize, label: &str) -> Result<&'d [u8], Error> {
    let skipped = data
        .iter()
        .skip(*cursor)
        .take_while(|&&b| is_line_break(b))
        .count();
    *cursor += skipped;
    if *cursor >= data.len() {
        return Err(Error::Truncated);
    }
    let rest = &data[*cursor..];

    let colon = rest
        .iter()
        .position(|&b| b == text::COLON)
        .ok_or(Error::Malformed)?;
    let line_start = rest[..colon]
        .iter()
        .rposition(|&b| is_line_break(b))
        .map_or(0, |p| p + 1);
    if !trim(&rest[line_start..colon]).eq_ignore_ascii_case(label.as_bytes()) {
        return Err(Error::Malformed);
    }

    let start = colon + 1;
    if start >= rest.len() {
        return Err(Error::Truncated);
    }
    let end = line_end(rest, start);
    *cursor += end;
    Ok(&rest[start..end])
}

fn token_value<T: ProtocolToken>(value: &[u8]) -> Result<T, Error> {
    T::ALL
        .iter()
        .copied()
        .find(|candidate| contains_token(value, candidate.response_token().as_bytes()))
        .ok_or(Error::UnrecognizedToken)
}

fn name_value(value: &[u8]) -> Result<String<{ lengths::MAX_NAME_LEN }>, Error> {
    if value.is_empty() {
        return Err(Error::Malformed);
    }
    let len = value.len().min(lengths::MAX_NAME_LEN);
    // Cut back to a character boundary when the limit splits one
    let utf8 = match core::str::from_utf8(&value[..len]) {
        Ok(utf8) => utf8,
        Err(e) if len < value.len() && e.error_len().is_none() => {
            core::str::from_utf8(&value[..e.valid_up_to()]).map_err(|_| Error::Malformed)?
        }
        Err(_) => return Err(Error::Malformed),
    };
    if utf8.is_empty() {
        return Err(Error::Malformed);
    }

    let mut name = String::new();
    name.push_str(utf8).map_err(|_| Error::Malformed)?;
    Ok(name)
}

fn baud_parity_value(value: &[u8]) -> Result<(BaudRate, Parity), Error> {
    let comma = value
        .iter()
        .position(|&b| b == text::COMMA)
        .ok_or(Error::Malformed)?;

    let baud = token_value(&value[..comma])?;
    let parity = token_value(&value[comma + 1..])?;
    Ok((baud, parity))
}

fn address_value(value: &[u8]) -> Result<[u8; lengths::ADDRESS_LEN], Error> {
    let value = trim(value);
    let separated = value.get(2) == Some(&text::COMMA);
    let stride = if separated { 3 } else { 2 };

    // Last group has no trailing separator
    let span = lengths::ADDRESS_LEN * stride - (stride - 2);
    if value.len() < span {
        return Err(Error::Truncated);
    }
    if value.len() > span {
        return Err(Error::Malformed);
    }

    let mut address = [0u8; lengths::ADDRESS_LEN];
    for (i, byte) in address.iter_mut().enumerate() {
        let at = i * stride;
        *byte = (hex_digit(value[at])? << 4) | hex_digit(value[at + 1])?;
        if separated && i + 1 < lengths::ADDRESS_LEN && value[at + 2] != text::COMMA {
            return Err(Error::Malformed);
        }
    }
    Ok(address)
}

fn pin_value(value: &[u8]) -> Result<[u8; lengths::PIN_LEN], Error> {
    let value = trim(value);
    if value.len() < lengths::PIN_LEN {
        return Err(Error::Truncated);
    }
    if value.len() > lengths::PIN_LEN {
        return Err(Error::Malformed);
    }

    let mut pin = [0u8; lengths::PIN_LEN];
    for (digit, &b) in pin.iter_mut().zip(value) {
        if !b.is_ascii_digit() {
            return Err(Error::Malformed);
        }
        *digit = b - b'0';
    }
    Ok(pin)
}

fn bounded_decimal(data: &[u8], min: u16, max: u16) -> Result<u16, Error> {
    let (value, _) = decimal(field_value(data)?)?;
    in_range(value, min, max)
}

fn in_range(value: u32, min: u16, max: u16) -> Result<u16, Error> {
    u16::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or(Error::OutOfRange)
}

/// Leading decimal run and the bytes after it
fn decimal(value: &[u8]) -> Result<(u32, &[u8]), Error> {
    let value = trim(value);
    let len = value.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return Err(Error::Malformed);
    }

    let mut result: u32 = 0;
    for &b in &value[..len] {
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(u32::from(b - b'0')))
            .ok_or(Error::OutOfRange)?;
    }
    Ok((result, &value[len..]))
}

/// Leading hex run and the bytes after it
fn hex_run(value: &[u8]) -> Result<(u32, &[u8]), Error> {
    let len = value.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    if len == 0 {
        return Err(Error::Malformed);
    }

    let mut result: u32 = 0;
    for &b in &value[..len] {
        let digit = u32::from(hex_digit(b)?);
        result = result
            .checked_mul(16)
            .and_then(|r| r.checked_add(digit))
            .ok_or(Error::OutOfRange)?;
    }
    Ok((result, &value[len..]))
}

fn hex_digit(b: u8) -> Result<u8, Error> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(Error::Malformed),
    }
}

fn is_line_break(b: u8) -> bool {
    b == text::CR || b == text::LF
}

fn line_end(data: &[u8], from: usize) -> usize {
    data[from..]
        .iter()
        .position(|&b| is_line_break(b))
        .map_or(data.len(), |p| from + p)
}

fn trim(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|&b| b != b' ').unwrap_or(value.len());
    let end = value.iter().rposition(|&b| b != b' ').map_or(start, |p| p + 1);
    &value[start..end]
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Bytes that continue a token; `-` so `Connectable` does not match
/// inside `Non-Connectable`
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

/// `needle` occurs in `haystack` as a whole token
fn contains_token(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .any(|(i, window)| {
            let end = i + needle.len();
            window == needle
                && (i == 0 || !is_token_byte(haystack[i - 1]))
                && (end == haystack.len() || !is_token_byte(haystack[end]))
        })
}
