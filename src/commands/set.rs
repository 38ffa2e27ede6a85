use std::str;

use jiff::{SignedDuration, Timestamp};

use crate::{
    commands::command_error::CommandError,
    keyspace::KeyValueStore,
    resp::RespValue,
};

/// Represents the parsed arguments for the SET command.
pub struct SetArguments {
    key: Vec<u8>,
    value: Vec<u8>,
    expiration: Option<Timestamp>,
}

impl SetArguments {
    /// Parses `SET key value [PX ms | EX s]`.
    ///
    /// Key and value stay raw bytes; only the option names and their
    /// durations are parsed as text. `PX` and `EX` are mutually
    /// exclusive; supplying both, an unknown option, or an option
    /// without its value is a syntax error. A non-integer duration is a
    /// value error.
    ///
    /// # Returns
    ///
    /// * `Ok(SetArguments)` - Successfully parsed arguments; the
    ///   expiration is already resolved to an absolute instant
    /// * `Err(CommandError)` - On arity, syntax or integer errors
    pub fn parse(arguments: &[Vec<u8>]) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments("set"));
        }

        let mut expiration: Option<Timestamp> = None;
        let mut options = arguments[2..].iter();

        while let Some(option) = options.next() {
            let option = str::from_utf8(option).map_err(|_| CommandError::SyntaxError)?;

            let duration = match option.to_uppercase().as_str() {
                "PX" => {
                    let Some(ms) = options.next() else {
                        return Err(CommandError::SyntaxError);
                    };

                    SignedDuration::from_millis(parse_integer(ms)?)
                }
                "EX" => {
                    let Some(seconds) = options.next() else {
                        return Err(CommandError::SyntaxError);
                    };

                    SignedDuration::from_secs(parse_integer(seconds)?)
                }
                _ => return Err(CommandError::SyntaxError),
            };

            if expiration.is_some() {
                return Err(CommandError::SyntaxError);
            }

            expiration = Some(
                Timestamp::now()
                    .checked_add(duration)
                    .map_err(|_| CommandError::ValueNotInteger)?,
            );
        }

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
            expiration,
        })
    }
}

fn parse_integer(bytes: &[u8]) -> Result<i64, CommandError> {
    str::from_utf8(bytes)
        .map_err(|_| CommandError::ValueNotInteger)?
        .parse::<i64>()
        .map_err(|_| CommandError::ValueNotInteger)
}

/// Handles the SET command.
///
/// Unconditionally overwrites whatever the key holds, including a
/// stream. The previous TTL is always discarded; a new one is attached
/// only when `PX`/`EX` was supplied.
pub async fn set(store: &KeyValueStore, arguments: &[Vec<u8>]) -> Result<Vec<u8>, CommandError> {
    let set_arguments = SetArguments::parse(arguments)?;

    store
        .set_string(
            set_arguments.key,
            set_arguments.value,
            set_arguments.expiration,
        )
        .await;

    Ok(RespValue::SimpleString("OK".to_string()).encode())
}
