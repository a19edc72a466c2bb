//! C40 text compaction (ICAO 9303 Part 13)
//!
//! Three characters of the reduced alphabet are packed into two bytes:
//!
//! ```text
//! value = 1600·c1 + 40·c2 + c3 + 1        (big-endian u16)
//!
//! space → 3   '0'..'9' → 4..13   'A'..'Z' → 14..39
//! ```
//!
//! A trailing pair uses `c3 = 0`. A trailing single character is written as
//! the escape `0xFE` followed by its ASCII code plus one. Inside a triplet a
//! sub-value of zero stands for "no character".

use crate::error::{ProtocolError, Result};

/// Escape marker for a trailing single character
pub const SHIFT_ESCAPE: u8 = 0xFE;

/// MRZ filler character, carried as a space in C40
pub const FILLER: char = '<';

/// Upper-case, map the filler to space and drop line breaks
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| match c.to_ascii_uppercase() {
            FILLER => ' ',
            other => other,
        })
        .collect()
}

/// Number of bytes `char_count` characters occupy once encoded
pub fn encoded_len(char_count: usize) -> usize {
    char_count.div_ceil(3) * 2
}

/// Encode text as C40, normalizing it first
pub fn encode(text: &str) -> Result<Vec<u8>> {
    let values = normalize(text)
        .chars()
        .map(|c| char_value(c).map(|v| (c, v)))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(encoded_len(values.len()));
    for chunk in values.chunks(3) {
        match *chunk {
            [(_, c1), (_, c2), (_, c3)] => push_triplet(&mut out, c1, c2, c3),
            [(_, c1), (_, c2)] => push_triplet(&mut out, c1, c2, 0),
            [(c, _)] => {
                out.push(SHIFT_ESCAPE);
                out.push(c as u8 + 1);
            }
            _ => unreachable!("chunks(3) yields one to three elements"),
        }
    }
    Ok(out)
}

/// Decode C40 bytes back to text (the filler stays a space)
pub fn decode(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(ProtocolError::InvalidLength {
            what: "C40 data",
            got: bytes.len(),
        });
    }

    let mut out = String::with_capacity(bytes.len() / 2 * 3);
    for pair in bytes.chunks_exact(2) {
        if pair[0] == SHIFT_ESCAPE {
            let code = pair[1]
                .checked_sub(1)
                .ok_or(ProtocolError::InvalidCharacter(char::from(pair[1])))?;
            out.push(char::from(code));
            continue;
        }
        let value = u16::from_be_bytes([pair[0], pair[1]])
            .checked_sub(1)
            .ok_or(ProtocolError::InvalidFormat(
                "C40 word 0x0000 is not valid".to_string(),
            ))?;
        for sub in [value / 1600, (value % 1600) / 40, value % 40] {
            if sub != 0 {
                out.push(value_char(sub)?);
            }
        }
    }
    Ok(out)
}

fn push_triplet(out: &mut Vec<u8>, c1: u16, c2: u16, c3: u16) {
    let sum = 1600 * c1 + 40 * c2 + c3 + 1;
    out.extend_from_slice(&sum.to_be_bytes());
}

fn char_value(c: char) -> Result<u16> {
    match c {
        ' ' => Ok(3),
        '0'..='9' => Ok(c as u16 - '0' as u16 + 4),
        'A'..='Z' => Ok(c as u16 - 'A' as u16 + 14),
        _ => Err(ProtocolError::InvalidCharacter(c)),
    }
}

fn value_char(value: u16) -> Result<char> {
    match value {
        3 => Ok(' '),
        4..=13 => Ok(char::from(b'0' + (value - 4) as u8)),
        14..=39 => Ok(char::from(b'A' + (value - 14) as u8)),
        // 1 and 2 are shift sets, and anything ≥ 40 cannot come out of a valid word
        _ => Err(ProtocolError::InvalidFormat(format!(
            "C40 value {} is outside the basic set",
            value
        ))),
    }
}
