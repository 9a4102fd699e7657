//! ECMA-335 compressed unsigned integers.
//!
//! Length prefixes of the `#Blob` and `#US` heaps use the variable-length encoding from
//! ECMA-335 II.23.2:
//! - Values 0-0x7F: 1 byte (0xxxxxxx)
//! - Values 0x80-0x3FFF: 2 bytes (10xxxxxx xxxxxxxx)
//! - Values 0x4000-0x1FFFFFFF: 4 bytes (110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx)
//!
//! All multi-byte forms are big-endian.

use crate::{Error::OutOfBounds, Result};

/// Largest value representable as a compressed unsigned integer.
pub const MAX_COMPRESSED_UINT: u32 = 0x1FFF_FFFF;

/// Returns the number of bytes (1, 2 or 4) needed to encode `value`.
///
/// The size only depends on the magnitude of the value.
#[must_use]
pub fn compressed_uint_size(value: u32) -> u32 {
    if value < 0x80 {
        1
    } else if value < 0x4000 {
        2
    } else {
        4
    }
}

/// Appends `value` as a compressed unsigned integer to `buffer`.
///
/// Values above [`MAX_COMPRESSED_UINT`] have no valid encoding; callers are expected to
/// reject them beforehand. The top bits of such a value are masked off.
#[allow(clippy::cast_possible_truncation)]
pub fn write_compressed_uint(value: u32, buffer: &mut Vec<u8>) {
    if value < 0x80 {
        buffer.push(value as u8);
    } else if value < 0x4000 {
        buffer.extend_from_slice(&[0x80 | (value >> 8) as u8, value as u8]);
    } else {
        let bytes = (value & MAX_COMPRESSED_UINT).to_be_bytes();
        buffer.extend_from_slice(&[0xC0 | bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
}

/// Reads a compressed unsigned integer from `data` at `offset`, advancing `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the encoding runs past the end of `data`, or
/// [`crate::Error::Malformed`] if the first byte does not start a valid encoding.
pub fn read_compressed_uint(data: &[u8], offset: &mut usize) -> Result<u32> {
    let first_byte = *data.get(*offset).ok_or(OutOfBounds)?;

    // 1-byte encoding: 0xxxxxxx
    if (first_byte & 0x80) == 0 {
        *offset += 1;
        return Ok(u32::from(first_byte));
    }

    // 2-byte encoding: 10xxxxxx xxxxxxxx
    if (first_byte & 0xC0) == 0x80 {
        let second_byte = *data.get(*offset + 1).ok_or(OutOfBounds)?;
        *offset += 2;
        return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
    }

    // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
    if (first_byte & 0xE0) == 0xC0 {
        let bytes = data.get(*offset..*offset + 4).ok_or(OutOfBounds)?;
        *offset += 4;
        return Ok(((u32::from(bytes[0]) & 0x1F) << 24)
            | (u32::from(bytes[1]) << 16)
            | (u32::from(bytes[2]) << 8)
            | u32::from(bytes[3]));
    }

    Err(malformed_error!("Invalid compressed uint - {}", first_byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        write_compressed_uint(value, &mut buffer);
        buffer
    }

    #[test]
    fn test_compressed_uint_size() {
        // Single byte range (0-127)
        assert_eq!(compressed_uint_size(0), 1);
        assert_eq!(compressed_uint_size(0x7F), 1);

        // Two byte range (128-16383)
        assert_eq!(compressed_uint_size(0x80), 2);
        assert_eq!(compressed_uint_size(0x3FFF), 2);

        // Four byte range (16384+)
        assert_eq!(compressed_uint_size(0x4000), 4);
        assert_eq!(compressed_uint_size(MAX_COMPRESSED_UINT), 4);
    }

    #[test]
    fn test_write_compressed_uint() {
        // Examples from ECMA-335 II.23.2
        assert_eq!(encode(0x03), [0x03]);
        assert_eq!(encode(0x7F), [0x7F]);
        assert_eq!(encode(0x80), [0x80, 0x80]);
        assert_eq!(encode(0x2E57), [0xAE, 0x57]);
        assert_eq!(encode(0x3FFF), [0xBF, 0xFF]);
        assert_eq!(encode(0x4000), [0xC0, 0x00, 0x40, 0x00]);
        assert_eq!(encode(0x1FFF_FFFF), [0xDF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_size_matches_encoding() {
        for value in [0, 1, 0x7F, 0x80, 0x1234, 0x3FFF, 0x4000, 0x12_3456, MAX_COMPRESSED_UINT] {
            assert_eq!(compressed_uint_size(value) as usize, encode(value).len());
        }
    }

    #[test]
    fn test_read_compressed_uint() {
        #[rustfmt::skip]
        let data = [
            0x03,
            0xAE, 0x57,
            0xC0, 0x00, 0x40, 0x00,
        ];

        let mut offset = 0;
        assert_eq!(read_compressed_uint(&data, &mut offset).unwrap(), 0x03);
        assert_eq!(offset, 1);
        assert_eq!(read_compressed_uint(&data, &mut offset).unwrap(), 0x2E57);
        assert_eq!(offset, 3);
        assert_eq!(read_compressed_uint(&data, &mut offset).unwrap(), 0x4000);
        assert_eq!(offset, 7);
    }

    #[test]
    fn test_read_compressed_uint_invalid() {
        let mut offset = 0;
        assert!(matches!(
            read_compressed_uint(&[0xFF], &mut offset),
            Err(crate::Error::Malformed { .. })
        ));

        let mut offset = 0;
        assert!(matches!(
            read_compressed_uint(&[0xC0, 0x00], &mut offset),
            Err(crate::Error::OutOfBounds)
        ));

        let mut offset = 1;
        assert!(matches!(
            read_compressed_uint(&[0x00], &mut offset),
            Err(crate::Error::OutOfBounds)
        ));
    }
}
