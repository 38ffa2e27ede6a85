use crate::{
    commands::command_error::CommandError,
    keyspace::KeyValueStore,
    resp::RespValue,
};

/// Handles the GET command.
///
/// Absent and expired keys reply with a null bulk string; an expired key
/// is deleted by the keyspace as a side effect of the read. A key
/// holding a stream replies with a WRONGTYPE error.
pub async fn get(store: &KeyValueStore, arguments: &[Vec<u8>]) -> Result<Vec<u8>, CommandError> {
    if arguments.len() != 1 {
        return Err(CommandError::WrongNumberOfArguments("get"));
    }

    match store.get_string(&arguments[0]).await? {
        Some(value) => Ok(RespValue::BulkString(value).encode()),
        None => Ok(RespValue::Null.encode()),
    }
}
