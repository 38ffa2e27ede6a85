use std::str;

use globset::Glob;

use crate::{
    commands::command_error::CommandError,
    keyspace::KeyValueStore,
    resp::RespValue,
};

/// Handles the KEYS command.
///
/// Matches every live key against the glob pattern; expired keys are
/// excluded. The pattern itself must be text; keys are raw bytes and are
/// matched through a lossy text view, which leaves `*` matching every
/// key, binary or not. Key order in the reply is unspecified.
pub async fn keys(store: &KeyValueStore, arguments: &[Vec<u8>]) -> Result<Vec<u8>, CommandError> {
    if arguments.len() != 1 {
        return Err(CommandError::WrongNumberOfArguments("keys"));
    }

    let pattern =
        str::from_utf8(&arguments[0]).map_err(|_| CommandError::InvalidGlobPattern)?;

    let matcher = Glob::new(pattern)
        .map_err(|_| CommandError::InvalidGlobPattern)?
        .compile_matcher();

    let mut response = Vec::new();

    for key in store.list_keys().await {
        if matcher.is_match(String::from_utf8_lossy(&key).as_ref()) {
            response.push(RespValue::BulkString(key));
        }
    }

    Ok(RespValue::Array(response).encode())
}
