use thiserror::Error;

use crate::keyspace::KeyspaceError;
use crate::resp::RespValue;

/// Client-visible command failures.
///
/// Each variant maps to exactly one wire error frame; the connection
/// stays open after any of them.
#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("invalid command format")]
    InvalidCommandFormat,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(&'static str),
    #[error("syntax error")]
    SyntaxError,
    #[error("value is not an integer or out of range")]
    ValueNotInteger,
    #[error("invalid stream ID")]
    InvalidStreamId,
    #[error("stream ID must be greater than 0-0")]
    StreamIdZero,
    #[error("stream ID is equal or smaller than the last entry")]
    StreamIdTooSmall,
    #[error("wrong kind of value for key")]
    WrongType,
    #[error("invalid glob pattern")]
    InvalidGlobPattern,
}

impl CommandError {
    /// Encodes this error as the RESP error frame written to the wire.
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            CommandError::InvalidCommandFormat => {
                RespValue::Error("ERR Invalid command format".to_string()).encode()
            }
            CommandError::UnknownCommand(name) => {
                RespValue::Error(format!("ERR unknown command '{}'", name)).encode()
            }
            CommandError::WrongNumberOfArguments(name) => RespValue::Error(format!(
                "ERR wrong number of arguments for '{}' command",
                name
            ))
            .encode(),
            CommandError::SyntaxError => {
                RespValue::Error("ERR syntax error".to_string()).encode()
            }
            CommandError::ValueNotInteger => {
                RespValue::Error("ERR value is not an integer or out of range".to_string())
                    .encode()
            }
            CommandError::InvalidStreamId => RespValue::Error(
                "ERR Invalid stream ID specified as stream command argument".to_string(),
            )
            .encode(),
            CommandError::StreamIdZero => RespValue::Error(
                "ERR The ID specified in XADD must be greater than 0-0".to_string(),
            )
            .encode(),
            CommandError::StreamIdTooSmall => RespValue::Error(
                "ERR The ID specified in XADD is equal or smaller than the target stream top item"
                    .to_string(),
            )
            .encode(),
            CommandError::WrongType => RespValue::Error(
                "WRONGTYPE Operation against a key holding the wrong kind of value".to_string(),
            )
            .encode(),
            CommandError::InvalidGlobPattern => {
                RespValue::Error("ERR invalid pattern".to_string()).encode()
            }
        }
    }
}

impl From<KeyspaceError> for CommandError {
    fn from(error: KeyspaceError) -> Self {
        match error {
            KeyspaceError::WrongType => CommandError::WrongType,
            KeyspaceError::StreamIdZero => CommandError::StreamIdZero,
            KeyspaceError::StreamIdTooSmall => CommandError::StreamIdTooSmall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CommandError;

    #[test]
    fn test_as_bytes() {
        let test_cases: Vec<(CommandError, &[u8])> = vec![
            (
                CommandError::UnknownCommand("FOOBAR".to_string()),
                b"-ERR unknown command 'FOOBAR'\r\n",
            ),
            (
                CommandError::WrongNumberOfArguments("set"),
                b"-ERR wrong number of arguments for 'set' command\r\n",
            ),
            (CommandError::SyntaxError, b"-ERR syntax error\r\n"),
            (
                CommandError::ValueNotInteger,
                b"-ERR value is not an integer or out of range\r\n",
            ),
            (
                CommandError::InvalidStreamId,
                b"-ERR Invalid stream ID specified as stream command argument\r\n",
            ),
            (
                CommandError::StreamIdZero,
                b"-ERR The ID specified in XADD must be greater than 0-0\r\n",
            ),
            (
                CommandError::StreamIdTooSmall,
                b"-ERR The ID specified in XADD is equal or smaller than the target stream top item\r\n",
            ),
            (
                CommandError::WrongType,
                b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n",
            ),
            (
                CommandError::InvalidCommandFormat,
                b"-ERR Invalid command format\r\n",
            ),
        ];

        for (error, expected) in test_cases {
            assert_eq!(error.as_bytes(), expected.to_vec(), "encoding {:?}", error);
        }
    }
}
