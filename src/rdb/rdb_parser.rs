use std::collections::HashMap;

use jiff::Timestamp;

use crate::{
    keyspace::{DataType, Entry},
    rdb::opcode::{OpCodeResponse, parse_opcode},
};

const MAGIC_STRING: &[u8] = b"REDIS";
const HEADER_LENGTH: usize = 9;

/// Parses an RDB snapshot held fully in memory.
///
/// The parser is a cursor over the byte slice. After the 9-byte header
/// it consumes one tagged block per iteration until the end-of-file tag;
/// auxiliary fields, the database selector and hash table sizes are
/// decoded but not retained beyond metadata. Keys and values are byte
/// strings. Keys whose expiration is already in the past at parse time
/// are dropped.
#[derive(Debug)]
pub struct RdbParser {
    buffer: Vec<u8>,
    cursor: usize,
    pub redis_version: Option<String>,
    pub metadata: HashMap<Vec<u8>, Vec<u8>>,
    pub entries: HashMap<Vec<u8>, Entry>,
}

impl RdbParser {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            cursor: 0,
            redis_version: None,
            metadata: HashMap::new(),
            entries: HashMap::new(),
        }
    }

    /// Parses the whole snapshot.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The snapshot was parsed up to its end-of-file tag
    ///   (or the end of the buffer); `self.entries` holds the live keys
    /// * `Err` - On a bad magic string, an unknown tag or a truncated
    ///   block; `self.entries` keeps whatever was decoded before the
    ///   failure
    pub fn parse(&mut self) -> tokio::io::Result<()> {
        self.parse_header()?;

        let now = Timestamp::now();

        while self.cursor < self.buffer.len() {
            let (response, bytes_read) = parse_opcode(&self.buffer, self.cursor)?;
            self.cursor += bytes_read;

            match response {
                OpCodeResponse::Auxiliary { key, value } => {
                    self.metadata.insert(key, value);
                }
                OpCodeResponse::ResizeDb { .. } => {}
                OpCodeResponse::Database { .. } => {}
                OpCodeResponse::ExpirationSeconds {
                    key,
                    value,
                    expiration,
                } => {
                    let expiration = Timestamp::from_second(expiration).map_err(|e| {
                        tokio::io::Error::new(
                            tokio::io::ErrorKind::InvalidData,
                            format!("Invalid expiration timestamp: {}", e),
                        )
                    })?;

                    self.insert(key, value, Some(expiration), now);
                }
                OpCodeResponse::ExpirationMilliseconds {
                    key,
                    value,
                    expiration,
                } => {
                    let expiration = Timestamp::from_millisecond(expiration).map_err(|e| {
                        tokio::io::Error::new(
                            tokio::io::ErrorKind::InvalidData,
                            format!("Invalid expiration timestamp: {}", e),
                        )
                    })?;

                    self.insert(key, value, Some(expiration), now);
                }
                OpCodeResponse::KeyValuePair { key, value } => {
                    self.insert(key, value, None, now);
                }
                OpCodeResponse::EndOfFile => break,
            }
        }

        Ok(())
    }

    fn parse_header(&mut self) -> tokio::io::Result<()> {
        if self.buffer.len() < HEADER_LENGTH {
            return Err(tokio::io::Error::new(
                tokio::io::ErrorKind::UnexpectedEof,
                "Snapshot shorter than the header",
            ));
        }

        if &self.buffer[..MAGIC_STRING.len()] != MAGIC_STRING {
            return Err(tokio::io::Error::new(
                tokio::io::ErrorKind::InvalidData,
                "Invalid magic string",
            ));
        }

        let version = &self.buffer[MAGIC_STRING.len()..HEADER_LENGTH];

        if !version.iter().all(|byte| byte.is_ascii_digit()) {
            return Err(tokio::io::Error::new(
                tokio::io::ErrorKind::InvalidData,
                "Invalid version in header",
            ));
        }

        self.redis_version = Some(String::from_utf8_lossy(version).to_string());
        self.cursor = HEADER_LENGTH;

        Ok(())
    }

    fn insert(
        &mut self,
        key: Vec<u8>,
        value: Vec<u8>,
        expiration: Option<Timestamp>,
        now: Timestamp,
    ) {
        // a key that expired before the snapshot was loaded is dead
        if let Some(expiration) = expiration {
            if expiration <= now {
                return;
            }
        }

        self.entries.insert(
            key,
            Entry {
                data: DataType::String(value),
                expiration,
            },
        );
    }
}
