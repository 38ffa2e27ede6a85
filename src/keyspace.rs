//! The in-memory keyspace: string and stream values with TTL metadata.
//!
//! Keys and string values are raw byte strings, exactly as they arrive
//! in bulk-string payloads; nothing in the keyspace assumes text. A key
//! holds exactly one [`DataType`] variant at a time, so the
//! string-xor-stream invariant is structural. Expiration is an absolute
//! [`Timestamp`] stored on the entry; a key without one never expires.
//!
//! Every public operation is a single critical section under one
//! readers-writer lock. Reads take the shared mode; mutations take the
//! exclusive mode. Lazy expiry never upgrades a shared lock: it releases
//! the shared guard, reacquires exclusive and re-checks before deleting.

use std::collections::HashMap;

use jiff::Timestamp;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, PartialEq)]
pub enum KeyspaceError {
    #[error("operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("stream entry ID must be greater than 0-0")]
    StreamIdZero,
    #[error("stream entry ID is not greater than the last entry")]
    StreamIdTooSmall,
}

/// A stream entry identifier: a millisecond time component and a
/// sequence component, rendered as `"<ms>-<seq>"`.
///
/// The derived ordering compares `(ms, seq)` numerically, which is the
/// ordering the monotonicity rule for appends is defined over.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub const ZERO: StreamId = StreamId { ms: 0, seq: 0 };

    pub fn as_string(&self) -> String {
        format!("{}-{}", self.ms, self.seq)
    }
}

/// One appended stream entry. Field pairs keep the insertion order of
/// the XADD call; names and values are raw bytes.
#[derive(Debug, PartialEq, Clone)]
pub struct StreamEntry {
    pub id: StreamId,
    pub fields: Vec<(Vec<u8>, Vec<u8>)>,
}

/// The requested ID of an XADD call, before resolution against the
/// stream's last entry.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum IdSpec {
    /// `*` - both components auto-generated
    Auto,
    /// `T-*` - explicit time, auto sequence
    Partial(u64),
    /// `T-S` - both components explicit
    Explicit(u64, u64),
}

#[derive(Debug, PartialEq, Clone)]
pub enum DataType {
    String(Vec<u8>),
    Stream(Vec<StreamEntry>),
}

/// A keyspace entry: one value variant plus optional expiration.
#[derive(Debug, PartialEq, Clone)]
pub struct Entry {
    pub data: DataType,
    pub expiration: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self, now: Timestamp) -> bool {
        match self.expiration {
            Some(expiration) => now > expiration,
            None => false,
        }
    }
}

/// The value variant a key currently holds, as reported by TYPE.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum KeyType {
    String,
    Stream,
    None,
}

impl KeyType {
    pub fn as_string(&self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::Stream => "stream",
            KeyType::None => "none",
        }
    }
}

/// The shared keyspace, guarded by a single readers-writer lock.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: RwLock<HashMap<Vec<u8>, Entry>>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the string value stored at `key`.
    ///
    /// An expired entry is deleted in place and reported as absent. The
    /// deletion reacquires the lock in exclusive mode and re-checks the
    /// expiration, because another task may have replaced the entry in
    /// the window between the two critical sections.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The key holds a live string value
    /// * `Ok(None)` - The key is absent or expired
    /// * `Err(KeyspaceError::WrongType)` - The key holds a stream
    pub async fn get_string(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KeyspaceError> {
        let now = Timestamp::now();

        {
            let entries = self.entries.read().await;

            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => {
                    return match &entry.data {
                        DataType::String(value) => Ok(Some(value.clone())),
                        DataType::Stream(_) => Err(KeyspaceError::WrongType),
                    };
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;

        match entries.get(key) {
            None => Ok(None),
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => match &entry.data {
                DataType::String(value) => Ok(Some(value.clone())),
                DataType::Stream(_) => Err(KeyspaceError::WrongType),
            },
        }
    }

    /// Stores a string value at `key`, replacing any existing value of
    /// either variant. The previous TTL is always discarded; the new
    /// entry carries `expiration` (or none).
    pub async fn set_string(&self, key: Vec<u8>, value: Vec<u8>, expiration: Option<Timestamp>) {
        let mut entries = self.entries.write().await;

        entries.insert(
            key,
            Entry {
                data: DataType::String(value),
                expiration,
            },
        );
    }

    /// Removes `key` from the keyspace. Returns whether it was present.
    pub async fn delete(&self, key: &[u8]) -> bool {
        let mut entries = self.entries.write().await;

        entries.remove(key).is_some()
    }

    /// Reports the variant stored at `key`, expiring it lazily with the
    /// same two-phase pattern as [`Self::get_string`].
    pub async fn type_of(&self, key: &[u8]) -> KeyType {
        let now = Timestamp::now();

        {
            let entries = self.entries.read().await;

            match entries.get(key) {
                None => return KeyType::None,
                Some(entry) if !entry.is_expired(now) => {
                    return match entry.data {
                        DataType::String(_) => KeyType::String,
                        DataType::Stream(_) => KeyType::Stream,
                    };
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;

        match entries.get(key) {
            None => KeyType::None,
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                KeyType::None
            }
            Some(entry) => match entry.data {
                DataType::String(_) => KeyType::String,
                DataType::Stream(_) => KeyType::Stream,
            },
        }
    }

    /// Lists every live key. Expired entries are excluded but not
    /// deleted; the reaper and lazy expiry handle deletion.
    pub async fn list_keys(&self) -> Vec<Vec<u8>> {
        let now = Timestamp::now();
        let entries = self.entries.read().await;

        entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Returns the ID of the last entry in the stream at `key`.
    pub async fn stream_last_id(&self, key: &[u8]) -> Result<Option<StreamId>, KeyspaceError> {
        let entries = self.entries.read().await;

        match entries.get(key) {
            None => Ok(None),
            Some(entry) => match &entry.data {
                DataType::Stream(stream) => Ok(stream.last().map(|entry| entry.id)),
                DataType::String(_) => Err(KeyspaceError::WrongType),
            },
        }
    }

    /// Appends an entry to the stream at `key`, creating the stream if
    /// the key is absent.
    ///
    /// ID resolution, validation and the append happen in one exclusive
    /// critical section, so concurrent appends to the same stream are
    /// totally ordered and the stored IDs are strictly increasing.
    ///
    /// # Returns
    ///
    /// * `Ok(StreamId)` - The assigned entry ID
    /// * `Err(KeyspaceError::WrongType)` - The key holds a string value
    /// * `Err(KeyspaceError::StreamIdZero)` - The resolved ID is `0-0`
    /// * `Err(KeyspaceError::StreamIdTooSmall)` - The resolved ID is not
    ///   greater than the stream's last entry ID
    pub async fn stream_append(
        &self,
        key: &[u8],
        id_spec: IdSpec,
        fields: Vec<(Vec<u8>, Vec<u8>)>,
    ) -> Result<StreamId, KeyspaceError> {
        let mut entries = self.entries.write().await;

        let last_id = match entries.get(key) {
            Some(entry) => match &entry.data {
                DataType::Stream(stream) => stream.last().map(|entry| entry.id),
                DataType::String(_) => return Err(KeyspaceError::WrongType),
            },
            None => None,
        };

        let now_ms = Timestamp::now().as_millisecond().max(0) as u64;

        // Resolve before touching the map: a rejected ID must not leave
        // an empty stream behind at a previously absent key.
        let id = resolve_stream_id(id_spec, last_id, now_ms)?;
        let entry = StreamEntry { id, fields };

        match entries.get_mut(key) {
            Some(Entry {
                data: DataType::Stream(stream),
                ..
            }) => stream.push(entry),
            Some(_) => return Err(KeyspaceError::WrongType),
            None => {
                entries.insert(
                    key.to_vec(),
                    Entry {
                        data: DataType::Stream(vec![entry]),
                        expiration: None,
                    },
                );
            }
        }

        Ok(id)
    }

    /// Deletes every expired entry. Used by the reaper; the lock is
    /// taken once per sweep and released before the next tick.
    pub async fn remove_expired(&self) -> usize {
        let now = Timestamp::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();

        entries.retain(|_, entry| !entry.is_expired(now));

        before - entries.len()
    }

    /// Bulk-loads snapshot entries without per-operation locking.
    ///
    /// Only callable on an exclusively owned store, which is how startup
    /// seeds the keyspace before the listener accepts connections.
    pub fn seed(&mut self, entries: HashMap<Vec<u8>, Entry>) {
        self.entries.get_mut().extend(entries);
    }

    /// Number of live plus expired-but-unreaped entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Resolves an [`IdSpec`] against the last entry ID of the target
/// stream, then validates the result.
///
/// Auto time is `max(now_ms, last.ms)` so a wall-clock regression still
/// yields a strictly increasing ID. A partial ID derives its sequence
/// from the last entry when the time components collide; otherwise the
/// sequence starts at 0, except time 0 where it starts at 1 (so the
/// first derived ID is never the forbidden `0-0`).
fn resolve_stream_id(
    id_spec: IdSpec,
    last_id: Option<StreamId>,
    now_ms: u64,
) -> Result<StreamId, KeyspaceError> {
    let id = match id_spec {
        IdSpec::Explicit(ms, seq) => StreamId { ms, seq },
        IdSpec::Partial(ms) => {
            let seq = match last_id {
                Some(last) if last.ms == ms => last.seq + 1,
                _ if ms == 0 => 1,
                _ => 0,
            };

            StreamId { ms, seq }
        }
        IdSpec::Auto => {
            let ms = match last_id {
                Some(last) => now_ms.max(last.ms),
                None => now_ms,
            };
            let seq = match last_id {
                Some(last) if last.ms == ms => last.seq + 1,
                _ => 0,
            };

            StreamId { ms, seq }
        }
    };

    if id == StreamId::ZERO {
        return Err(KeyspaceError::StreamIdZero);
    }

    if let Some(last) = last_id {
        if id <= last {
            return Err(KeyspaceError::StreamIdTooSmall);
        }
    }

    Ok(id)
}
