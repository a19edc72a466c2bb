//! Date packing
//!
//! Dates are written as the decimal digits `MMDDYYYY` read as one unsigned
//! integer and stored big-endian:
//!
//! - fixed date: `MMDDYYYY` in 3 bytes
//! - date-time: `MMDDYYYYHHMMSS` in 6 bytes
//! - masked date: mask byte + `MMDDYYYY` in 3 bytes, where bit `7-i` of the
//!   mask marks digit `i` as unknown (unknown digits are packed as `0`)

use crate::binary::read_u24_be;
use crate::error::{ProtocolError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Encoded size of a fixed date
pub const DATE_LEN: usize = 3;

/// Encoded size of a date-time
pub const DATE_TIME_LEN: usize = 6;

/// Encoded size of a masked date
pub const MASKED_DATE_LEN: usize = 4;

/// Pack a calendar date into 3 bytes
pub fn encode_date(date: NaiveDate) -> Result<[u8; DATE_LEN]> {
    let year = checked_year(date.year())?;
    let value = date.month() * 1_000_000 + date.day() * 10_000 + year;
    let bytes = value.to_be_bytes();
    Ok([bytes[1], bytes[2], bytes[3]])
}

/// Unpack a 3-byte date
pub fn decode_date(bytes: &[u8]) -> Result<NaiveDate> {
    if bytes.len() != DATE_LEN {
        return Err(ProtocolError::InvalidLength {
            what: "date",
            got: bytes.len(),
        });
    }
    let value = read_u24_be(&mut &bytes[..], "date")?;
    let month = value / 1_000_000;
    let day = (value / 10_000) % 100;
    let year = value % 10_000;
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
        ProtocolError::InvalidFormat(format!("{:08} is not a valid MMDDYYYY date", value))
    })
}

/// Pack a date and time (second precision) into 6 bytes
pub fn encode_date_time(date_time: NaiveDateTime) -> Result<[u8; DATE_TIME_LEN]> {
    let year = checked_year(date_time.year())? as u64;
    let value = date_time.month() as u64 * 1_000_000_000_000
        + date_time.day() as u64 * 10_000_000_000
        + year * 1_000_000
        + date_time.hour() as u64 * 10_000
        + date_time.minute() as u64 * 100
        + date_time.second() as u64;
    let bytes = value.to_be_bytes();
    let mut out = [0u8; DATE_TIME_LEN];
    out.copy_from_slice(&bytes[8 - DATE_TIME_LEN..]);
    Ok(out)
}

/// Unpack a 6-byte date-time
pub fn decode_date_time(bytes: &[u8]) -> Result<NaiveDateTime> {
    if bytes.len() != DATE_TIME_LEN {
        return Err(ProtocolError::InvalidLength {
            what: "date-time",
            got: bytes.len(),
        });
    }
    let value = bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);
    let invalid =
        || ProtocolError::InvalidFormat(format!("{:014} is not a valid MMDDYYYYHHMMSS", value));

    let month = (value / 1_000_000_000_000) as u32;
    let day = ((value / 10_000_000_000) % 100) as u32;
    let year = ((value / 1_000_000) % 10_000) as i32;
    let hour = ((value / 10_000) % 100) as u32;
    let minute = ((value / 100) % 100) as u32;
    let second = (value % 100) as u32;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(invalid)
}

/// A date whose individual digits may be unknown
///
/// The textual form is `yyyy-MM-dd` with `x` in every unknown digit
/// position, e.g. `19xx-12-xx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskedDate {
    /// Digits in `yyyyMMdd` order, `None` where unknown
    digits: [Option<u8>; 8],
}

impl MaskedDate {
    /// A fully known date
    pub fn from_date(date: NaiveDate) -> Result<Self> {
        let text = format!("{:04}{:02}{:02}", checked_year(date.year())?, date.month(), date.day());
        let mut digits = [None; 8];
        for (slot, b) in digits.iter_mut().zip(text.bytes()) {
            *slot = Some(b - b'0');
        }
        Ok(Self { digits })
    }

    /// True if at least one digit is unknown
    pub fn is_masked(&self) -> bool {
        self.digits.iter().any(Option::is_none)
    }

    /// The calendar date, if every digit is known and forms a valid date
    pub fn to_date(&self) -> Option<NaiveDate> {
        if self.is_masked() {
            return None;
        }
        NaiveDate::parse_from_str(&self.to_string(), "%Y-%m-%d").ok()
    }

    /// Encode as mask byte followed by the packed `MMDDYYYY` value
    pub fn encode(&self) -> [u8; MASKED_DATE_LEN] {
        let wire = self.wire_order();
        let mut mask = 0u8;
        let mut value = 0u32;
        for (i, digit) in wire.iter().enumerate() {
            if digit.is_none() {
                mask |= 1 << (7 - i);
            }
            value = value * 10 + digit.unwrap_or(0) as u32;
        }
        let bytes = value.to_be_bytes();
        [mask, bytes[1], bytes[2], bytes[3]]
    }

    /// Decode mask byte and packed value
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != MASKED_DATE_LEN {
            return Err(ProtocolError::InvalidLength {
                what: "masked date",
                got: bytes.len(),
            });
        }
        let mask = bytes[0];
        let value = read_u24_be(&mut &bytes[1..], "masked date")?;
        let text = format!("{:08}", value);
        let mut wire = [None; 8];
        for (i, (slot, b)) in wire.iter_mut().zip(text.bytes()).enumerate() {
            if mask & (1 << (7 - i)) == 0 {
                *slot = Some(b - b'0');
            }
        }
        // MMDDYYYY → yyyyMMdd
        let mut digits = [None; 8];
        digits[..4].copy_from_slice(&wire[4..]);
        digits[4..6].copy_from_slice(&wire[..2]);
        digits[6..].copy_from_slice(&wire[2..4]);
        Ok(Self { digits })
    }

    fn wire_order(&self) -> [Option<u8>; 8] {
        let mut wire = [None; 8];
        wire[..2].copy_from_slice(&self.digits[4..6]);
        wire[2..4].copy_from_slice(&self.digits[6..]);
        wire[4..].copy_from_slice(&self.digits[..4]);
        wire
    }
}

impl FromStr for MaskedDate {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ProtocolError::InvalidFormat(format!("'{}' is not yyyy-MM-dd", s));
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }

        let mut digits = [None; 8];
        let slots = bytes[..4].iter().chain(&bytes[5..7]).chain(&bytes[8..]);
        for (digit, b) in digits.iter_mut().zip(slots) {
            *digit = match b {
                b'0'..=b'9' => Some(b - b'0'),
                b'x' => None,
                _ => return Err(invalid()),
            };
        }
        // month ≤ 12 also keeps the packed MMDDYYYY value within 24 bits
        if !known_pair_within(digits[4], digits[5], 12)
            || !known_pair_within(digits[6], digits[7], 31)
        {
            return Err(invalid());
        }
        Ok(Self { digits })
    }
}

impl fmt::Display for MaskedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, digit) in self.digits.iter().enumerate() {
            if i == 4 || i == 6 {
                f.write_str("-")?;
            }
            match digit {
                Some(d) => write!(f, "{}", d)?,
                None => f.write_str("x")?,
            }
        }
        Ok(())
    }
}

/// Encode a textual masked date (`yyyy-MM-dd` with `x` placeholders)
pub fn encode_masked_date(text: &str) -> Result<[u8; MASKED_DATE_LEN]> {
    Ok(text.parse::<MaskedDate>()?.encode())
}

/// Decode a masked date to its textual form
pub fn decode_masked_date(bytes: &[u8]) -> Result<String> {
    Ok(MaskedDate::decode(bytes)?.to_string())
}

/// Check a two digit field against `max`, treating unknown digits as their
/// smallest value
fn known_pair_within(tens: Option<u8>, units: Option<u8>, max: u8) -> bool {
    match (tens, units) {
        (Some(t), Some(u)) => t * 10 + u <= max,
        (Some(t), None) => t * 10 <= max,
        (None, _) => true,
    }
}

fn checked_year(year: i32) -> Result<u32> {
    u32::try_from(year)
        .ok()
        .filter(|y| *y <= 9999)
        .ok_or(ProtocolError::OutOfRange {
            field: "year",
            value: year.clamp(0, u16::MAX as i32) as u16,
        })
}
