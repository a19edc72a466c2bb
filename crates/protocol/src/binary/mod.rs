//! Binary read/write helpers
//!
//! Fixed-width fields of seal and barcode headers are read from and written to
//! in-memory streams. All multi-byte integers are big-endian.

use crate::error::{ProtocolError, Result};
use std::io::{Read, Write};

pub mod traits;

pub use traits::{BinaryRead, BinaryWrite};

/// Read a single byte, naming the field in the truncation error
pub fn read_u8<R: Read>(reader: &mut R, what: &'static str) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .map_err(|_| ProtocolError::TruncatedInput(what))?;
    Ok(buf[0])
}

/// Read a u24 (big-endian, 3 bytes)
/// Returns as u32 since Rust doesn't have a u24 type
pub fn read_u24_be<R: Read>(reader: &mut R, what: &'static str) -> Result<u32> {
    let buf: [u8; 3] = read_array(reader, what)?;
    Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
}

/// Read exactly `N` bytes into an array
pub fn read_array<R: Read, const N: usize>(reader: &mut R, what: &'static str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|_| ProtocolError::TruncatedInput(what))?;
    Ok(buf)
}

/// Read exactly n bytes
pub fn read_bytes<R: Read>(reader: &mut R, n: usize, what: &'static str) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    reader
        .read_exact(&mut buf)
        .map_err(|_| ProtocolError::TruncatedInput(what))?;
    Ok(buf)
}

/// Write a single byte
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> Result<()> {
    writer.write_all(&[value])?;
    Ok(())
}

/// Write bytes verbatim
pub fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    writer.write_all(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_u24_read() {
        let mut cursor = Cursor::new(vec![0x12, 0x34, 0x56, 0x78]);
        assert_eq!(read_u24_be(&mut cursor, "test").unwrap(), 0x12_3456);
        assert_eq!(read_u8(&mut cursor, "test").unwrap(), 0x78);
    }

    #[test]
    fn test_write_helpers() {
        let mut buf = Vec::new();
        write_u8(&mut buf, 0xDC).unwrap();
        write_bytes(&mut buf, &[0x03, 0x04]).unwrap();
        assert_eq!(buf, vec![0xDC, 0x03, 0x04]);
    }

    #[test]
    fn test_truncated_read_names_field() {
        let mut cursor = Cursor::new(vec![0x01]);
        let err = read_array::<_, 2>(&mut cursor, "country code").unwrap_err();
        assert_eq!(err, ProtocolError::TruncatedInput("country code"));
    }
}
