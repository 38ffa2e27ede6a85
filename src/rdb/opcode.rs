use crate::rdb::{
    encoding::{parse_length_encoded_integer, parse_value},
    get_slice::get_buffer_slice,
};

const AUXILIARY_OPCODE: u8 = 0xFA;
const RESIZE_DB_OPCODE: u8 = 0xFB;
const EXPIRATION_MILLISECONDS_OPCODE: u8 = 0xFC;
const EXPIRATION_SECONDS_OPCODE: u8 = 0xFD;
const DATABASE_OPCODE: u8 = 0xFE;
const END_OF_FILE_OPCODE: u8 = 0xFF;
const STRING_VALUE_TYPE: u8 = 0x00;

/// One decoded block of an RDB file. Keys and values are byte strings.
#[derive(Debug, PartialEq)]
pub enum OpCodeResponse {
    Auxiliary {
        key: Vec<u8>,
        value: Vec<u8>,
    },
    ResizeDb {
        db_hash_table_size: usize,
        expiry_hash_table_size: usize,
    },
    Database {
        database_number: usize,
    },
    /// A key-value pair with an absolute expiration in unix seconds
    ExpirationSeconds {
        key: Vec<u8>,
        value: Vec<u8>,
        expiration: i64,
    },
    /// A key-value pair with an absolute expiration in unix milliseconds
    ExpirationMilliseconds {
        key: Vec<u8>,
        value: Vec<u8>,
        expiration: i64,
    },
    EndOfFile,
    KeyValuePair {
        key: Vec<u8>,
        value: Vec<u8>,
    },
}

/// Parses one tagged block starting at `cursor`.
///
/// An expiry tag consumes the key-value pair that follows it, so the
/// expiration never dangles in parser state across blocks.
///
/// # Returns
///
/// * `Ok((OpCodeResponse, usize))` - The decoded block and how many
///   bytes it occupied
/// * `Err` - On an unknown tag, an unsupported value type, or a
///   truncated payload
pub fn parse_opcode(bytes: &[u8], cursor: usize) -> tokio::io::Result<(OpCodeResponse, usize)> {
    let mut temp_cursor = cursor;
    let opcode = get_buffer_slice(bytes, temp_cursor, 1)?[0];
    temp_cursor += 1;

    let response = match opcode {
        AUXILIARY_OPCODE => {
            let (key, key_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += key_cursor;
            let (value, value_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += value_cursor;

            Ok(OpCodeResponse::Auxiliary { key, value })
        }
        RESIZE_DB_OPCODE => {
            let (db_hash_table_size, db_size_cursor) =
                parse_length_encoded_integer(bytes, temp_cursor)?;
            temp_cursor += db_size_cursor;

            let (expiry_hash_table_size, expiry_size_cursor) =
                parse_length_encoded_integer(bytes, temp_cursor)?;
            temp_cursor += expiry_size_cursor;

            Ok(OpCodeResponse::ResizeDb {
                db_hash_table_size,
                expiry_hash_table_size,
            })
        }
        DATABASE_OPCODE => {
            let (database_number, database_number_cursor) =
                parse_length_encoded_integer(bytes, temp_cursor)?;
            temp_cursor += database_number_cursor;

            Ok(OpCodeResponse::Database { database_number })
        }
        EXPIRATION_SECONDS_OPCODE => {
            let byte_slice: [u8; 4] =
                get_buffer_slice(bytes, temp_cursor, 4)?.try_into().map_err(|_| {
                    tokio::io::Error::new(
                        tokio::io::ErrorKind::UnexpectedEof,
                        "Not enough bytes for u32",
                    )
                })?;
            temp_cursor += 4;

            let expiration = u32::from_le_bytes(byte_slice) as i64;

            let (key_value_pair, key_value_cursor) = parse_opcode(bytes, temp_cursor)?;
            temp_cursor += key_value_cursor;

            match key_value_pair {
                OpCodeResponse::KeyValuePair { key, value } => {
                    Ok(OpCodeResponse::ExpirationSeconds {
                        key,
                        value,
                        expiration,
                    })
                }
                _ => Err(tokio::io::Error::new(
                    tokio::io::ErrorKind::InvalidData,
                    "Expected a key-value pair after an expiry tag",
                )),
            }
        }
        EXPIRATION_MILLISECONDS_OPCODE => {
            let byte_slice: [u8; 8] =
                get_buffer_slice(bytes, temp_cursor, 8)?.try_into().map_err(|_| {
                    tokio::io::Error::new(
                        tokio::io::ErrorKind::UnexpectedEof,
                        "Not enough bytes for u64",
                    )
                })?;
            temp_cursor += 8;

            let expiration = u64::from_le_bytes(byte_slice) as i64;

            let (key_value_pair, key_value_cursor) = parse_opcode(bytes, temp_cursor)?;
            temp_cursor += key_value_cursor;

            match key_value_pair {
                OpCodeResponse::KeyValuePair { key, value } => {
                    Ok(OpCodeResponse::ExpirationMilliseconds {
                        key,
                        value,
                        expiration,
                    })
                }
                _ => Err(tokio::io::Error::new(
                    tokio::io::ErrorKind::InvalidData,
                    "Expected a key-value pair after an expiry tag",
                )),
            }
        }
        END_OF_FILE_OPCODE => Ok(OpCodeResponse::EndOfFile),
        STRING_VALUE_TYPE => {
            let (key, key_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += key_cursor;
            let (value, value_cursor) = parse_value(bytes, temp_cursor)?;
            temp_cursor += value_cursor;

            Ok(OpCodeResponse::KeyValuePair { key, value })
        }
        opcode => Err(tokio::io::Error::new(
            tokio::io::ErrorKind::InvalidData,
            format!("Unknown value type: 0x{:02X}", opcode),
        )),
    }?;

    Ok((response, temp_cursor - cursor))
}
