// I/O utilities for reading metadata blocks
//
// Every helper here either returns exactly the requested number of bytes or
// fails with `MetadataError::UnexpectedEnd`. A short read is never returned.

use std::io::{self, Read};

use crate::error::{MetadataError, Result};

fn map_read_error(err: io::Error) -> MetadataError {
    if err.kind() != io::ErrorKind::UnexpectedEof {
        log::debug!("read failed: {}", err);
    }
    MetadataError::UnexpectedEnd
}

/// Read a fixed-size array
pub fn read_exact_array<R: Read + ?Sized, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut buffer = [0u8; N];
    reader.read_exact(&mut buffer).map_err(map_read_error)?;
    Ok(buffer)
}

/// Read exactly `len` bytes into a new buffer
pub fn read_bytes<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer).map_err(map_read_error)?;
    Ok(buffer)
}

/// Read `len` bytes and decode them as (lossy) UTF-8 text
pub fn read_string<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<String> {
    let bytes = read_bytes(reader, len)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Consume and discard exactly `len` bytes without buffering them all.
pub fn skip_bytes<R: Read + ?Sized>(reader: &mut R, len: u64) -> Result<()> {
    let copied = io::copy(&mut reader.take(len), &mut io::sink()).map_err(map_read_error)?;
    if copied != len {
        return Err(MetadataError::UnexpectedEnd);
    }
    Ok(())
}

/// Read big-endian 32-bit integer
pub fn read_be_u32<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    Ok(u32::from_be_bytes(read_exact_array(reader)?))
}

/// Read big-endian 48-bit integer
pub fn read_be_u48<R: Read + ?Sized>(reader: &mut R) -> Result<u64> {
    let bytes: [u8; 6] = read_exact_array(reader)?;
    let mut wide = [0u8; 8];
    wide[2..].copy_from_slice(&bytes);
    Ok(u64::from_be_bytes(wide))
}

/// Read big-endian 64-bit integer
pub fn read_be_u64<R: Read + ?Sized>(reader: &mut R) -> Result<u64> {
    Ok(u64::from_be_bytes(read_exact_array(reader)?))
}

/// Read little-endian 32-bit integer
pub fn read_le_u32<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    Ok(u32::from_le_bytes(read_exact_array(reader)?))
}
