//! RDB size and string encodings.
//!
//! The top two bits of the first byte select the size format:
//!
//! - `00` - 6-bit size in the low bits of this byte
//! - `01` - 14-bit size: low 6 bits of this byte, then the next byte
//! - `10` - low 6 bits ignored; the next 4 bytes are a big-endian
//!   32-bit size
//! - `11` - a special-format string; the low 6 bits select the subtype

use crate::rdb::get_slice::get_buffer_slice;

#[derive(Debug, PartialEq)]
enum ValueEncoding {
    /// Plain string of the given length
    String(usize),
    /// 8-bit little-endian integer
    Int8,
    /// 16-bit little-endian integer
    Int16,
    /// 32-bit little-endian integer
    Int32,
    LzfCompressedString,
}

fn parse_length_encoding(bytes: &[u8], cursor: usize) -> tokio::io::Result<(ValueEncoding, usize)> {
    let mut temp_cursor = cursor;
    let byte = get_buffer_slice(bytes, temp_cursor, 1)?[0];
    temp_cursor += 1;

    let first_two_bits = byte >> 6;

    let value_encoding = match first_two_bits {
        0b00 => {
            let last_six_bits = byte & 0b0011_1111;

            Ok(ValueEncoding::String(last_six_bits as usize))
        }
        0b01 => {
            // 14-bit size: the low 6 bits of this byte are the high bits
            let second_byte = get_buffer_slice(bytes, temp_cursor, 1)?[0];
            temp_cursor += 1;

            let high_6_bits = ((byte & 0b0011_1111) as u16) << 8;
            let length = high_6_bits | second_byte as u16;

            Ok(ValueEncoding::String(length as usize))
        }
        0b10 => {
            // the low 6 bits of the first byte carry no information here
            let byte_slice: [u8; 4] =
                get_buffer_slice(bytes, temp_cursor, 4)?.try_into().map_err(|_| {
                    tokio::io::Error::new(
                        tokio::io::ErrorKind::UnexpectedEof,
                        "Not enough bytes for u32",
                    )
                })?;
            temp_cursor += 4;

            Ok(ValueEncoding::String(u32::from_be_bytes(byte_slice) as usize))
        }
        0b11 => {
            let last_six_bits = byte & 0b0011_1111;

            match last_six_bits {
                0 => Ok(ValueEncoding::Int8),
                1 => Ok(ValueEncoding::Int16),
                2 => Ok(ValueEncoding::Int32),
                3 => Ok(ValueEncoding::LzfCompressedString),
                _ => Err(tokio::io::Error::new(
                    tokio::io::ErrorKind::InvalidData,
                    "Invalid special string encoding",
                )),
            }
        }
        _ => unreachable!("two bits"),
    }?;

    Ok((value_encoding, temp_cursor - cursor))
}

/// Decodes a size-encoded integer, as used by the database selector and
/// hash table size blocks. Special string formats are not valid here.
pub fn parse_length_encoded_integer(
    bytes: &[u8],
    cursor: usize,
) -> tokio::io::Result<(usize, usize)> {
    let (value_encoding, bytes_read) = parse_length_encoding(bytes, cursor)?;

    match value_encoding {
        ValueEncoding::String(value) => Ok((value, bytes_read)),
        _ => Err(tokio::io::Error::new(
            tokio::io::ErrorKind::InvalidData,
            "Expected a length encoded integer",
        )),
    }
}

/// Decodes a string-encoded value: a size followed by that many raw
/// bytes, or a special-format integer rendered as its decimal text form.
/// Values are byte strings; no UTF-8 is assumed. LZF-compressed strings
/// are rejected.
pub fn parse_value(bytes: &[u8], cursor: usize) -> tokio::io::Result<(Vec<u8>, usize)> {
    let mut temp_cursor = cursor;
    let (value_encoding, length_cursor) = parse_length_encoding(bytes, temp_cursor)?;
    temp_cursor += length_cursor;

    let value = match value_encoding {
        ValueEncoding::String(length) => {
            let byte_slice = get_buffer_slice(bytes, temp_cursor, length)?;
            temp_cursor += length;

            Ok(byte_slice.to_vec())
        }
        ValueEncoding::Int8 => {
            let byte = get_buffer_slice(bytes, temp_cursor, 1)?[0];
            temp_cursor += 1;

            Ok((byte as i8).to_string().into_bytes())
        }
        ValueEncoding::Int16 => {
            let byte_slice: [u8; 2] =
                get_buffer_slice(bytes, temp_cursor, 2)?.try_into().map_err(|_| {
                    tokio::io::Error::new(
                        tokio::io::ErrorKind::UnexpectedEof,
                        "Not enough bytes for i16",
                    )
                })?;
            temp_cursor += 2;

            Ok(i16::from_le_bytes(byte_slice).to_string().into_bytes())
        }
        ValueEncoding::Int32 => {
            let byte_slice: [u8; 4] =
                get_buffer_slice(bytes, temp_cursor, 4)?.try_into().map_err(|_| {
                    tokio::io::Error::new(
                        tokio::io::ErrorKind::UnexpectedEof,
                        "Not enough bytes for i32",
                    )
                })?;
            temp_cursor += 4;

            Ok(i32::from_le_bytes(byte_slice).to_string().into_bytes())
        }
        ValueEncoding::LzfCompressedString => Err(tokio::io::Error::new(
            tokio::io::ErrorKind::Unsupported,
            "LZF compressed strings are not supported",
        )),
    }?;

    Ok((value, temp_cursor - cursor))
}

#[cfg(test)]
mod tests {
    use super::{parse_length_encoded_integer, parse_value};

    #[test]
    fn test_parse_value_string_lengths() {
        let test_cases: Vec<(Vec<u8>, &[u8], usize)> = vec![
            // 6-bit length
            ([&[0x05][..], &b"mango"[..]].concat(), b"mango", 6),
            // 14-bit length: 0b01 prefix, value 5
            ([&[0b0100_0000, 0x05][..], &b"apple"[..]].concat(), b"apple", 7),
            // 32-bit big-endian length
            (
                [&[0x80, 0x00, 0x00, 0x00, 0x06][..], &b"orange"[..]].concat(),
                b"orange",
                11,
            ),
            // the low 6 bits of a 0b10 byte are ignored; still 4 length bytes
            (
                [&[0xBF, 0x00, 0x00, 0x00, 0x06][..], &b"cherry"[..]].concat(),
                b"cherry",
                11,
            ),
            (
                [&[0x81, 0x00, 0x00, 0x00, 0x04][..], &b"pear"[..]].concat(),
                b"pear",
                9,
            ),
        ];

        for (input, expected, expected_read) in test_cases {
            let (value, bytes_read) = parse_value(&input, 0).unwrap();
            assert_eq!(value, expected.to_vec());
            assert_eq!(
                bytes_read, expected_read,
                "cursor advance for {:?}",
                String::from_utf8_lossy(expected)
            );
        }
    }

    #[test]
    fn test_parse_value_binary_payload() {
        let input = [&[0x04][..], &[0xFF, 0x00, 0x0D, 0x0A][..]].concat();
        let (value, bytes_read) = parse_value(&input, 0).unwrap();

        assert_eq!(value, vec![0xFF, 0x00, 0x0D, 0x0A]);
        assert_eq!(bytes_read, 5);
    }

    #[test]
    fn test_parse_value_integer_subtypes_are_little_endian() {
        let test_cases: Vec<(Vec<u8>, &[u8], usize)> = vec![
            (vec![0xC0, 0x7B], b"123", 2),
            (vec![0xC0, 0xFF], b"-1", 2),
            (vec![0xC1, 0x39, 0x30], b"12345", 3),
            (vec![0xC2, 0x87, 0xD6, 0x12, 0x00], b"1234567", 5),
        ];

        for (input, expected, expected_read) in test_cases {
            let (value, bytes_read) = parse_value(&input, 0).unwrap();
            assert_eq!(value, expected.to_vec());
            assert_eq!(
                bytes_read, expected_read,
                "cursor advance for {:?}",
                String::from_utf8_lossy(expected)
            );
        }
    }

    #[test]
    fn test_parse_value_rejects_lzf() {
        let result = parse_value(&[0xC3, 0x01, 0x01, 0x61], 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_value_truncated_payload() {
        let result = parse_value(&[0x05, b'm', b'a'], 0);
        assert_eq!(
            result.unwrap_err().kind(),
            tokio::io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_parse_length_encoded_integer() {
        assert_eq!(parse_length_encoded_integer(&[0x00], 0).unwrap(), (0, 1));
        assert_eq!(parse_length_encoded_integer(&[0x0A], 0).unwrap(), (10, 1));
        assert_eq!(
            parse_length_encoded_integer(&[0b0100_0001, 0x00], 0).unwrap(),
            (256, 2)
        );

        // a special-format string is not a size
        assert!(parse_length_encoded_integer(&[0xC0, 0x05], 0).is_err());
    }
}
