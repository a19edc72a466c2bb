//! Traits for binary serialization and deserialization

use crate::error::Result;
use std::io::{Read, Write};

/// Trait for types that can be read from binary format
pub trait BinaryRead: Sized {
    /// Read this type from a binary reader, consuming exactly its own bytes
    fn read_from<R: Read>(reader: &mut R) -> Result<Self>;
}

/// Trait for types that can be written to binary format
pub trait BinaryWrite {
    /// Write this type to a binary writer
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;

    /// Get the size in bytes when serialized
    fn serialized_size(&self) -> usize;

    /// Serialize into a freshly allocated buffer
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}
