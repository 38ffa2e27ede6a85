use crate::{
    commands::{
        command_error::CommandError,
        config_get::config_get,
        echo::echo,
        get::get,
        keys::keys,
        ping::ping,
        set::set,
        type_command::type_command,
        xadd::xadd,
    },
    config::Config,
    keyspace::KeyValueStore,
    resp::RespValue,
};

/// A parsed client command: the command name plus its arguments.
///
/// Built from one decoded RESP array frame and dispatched by name to the
/// command handlers. Arguments stay raw bytes; only the command name is
/// treated as text (lossily, so an unknown binary name can still be
/// echoed back in the error).
#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    /// The command name as sent by the client
    pub name: String,
    /// The arguments following the command name
    pub arguments: Vec<Vec<u8>>,
}

impl CommandHandler {
    /// Creates a command from a decoded frame.
    ///
    /// The frame must be a non-empty array of bulk strings: the first
    /// element is the command name, the rest are its arguments.
    ///
    /// # Returns
    ///
    /// * `Ok(CommandHandler)` - Successfully parsed command
    /// * `Err(CommandError::InvalidCommandFormat)` - If the frame is not
    ///   an array, is empty, or contains a non-bulk-string element
    pub fn new(input: &RespValue) -> Result<Self, CommandError> {
        let RespValue::Array(elements) = input else {
            return Err(CommandError::InvalidCommandFormat);
        };

        let name = match elements.first() {
            Some(RespValue::BulkString(bytes)) => {
                Ok(String::from_utf8_lossy(bytes).to_string())
            }
            _ => Err(CommandError::InvalidCommandFormat),
        }?;

        let mut arguments: Vec<Vec<u8>> = Vec::new();

        for element in elements[1..].iter() {
            let arg = match element {
                RespValue::BulkString(bytes) => Ok(bytes.clone()),
                _ => Err(CommandError::InvalidCommandFormat),
            }?;
            arguments.push(arg);
        }

        Ok(Self { name, arguments })
    }

    /// Executes the command against the keyspace and returns the
    /// RESP-encoded response.
    ///
    /// Command names are case-insensitive. Unknown names echo the
    /// client's spelling back in the error.
    pub async fn handle_command(
        &self,
        config: &Config,
        store: &KeyValueStore,
    ) -> Result<Vec<u8>, CommandError> {
        match self.name.to_uppercase().as_str() {
            "PING" => ping(&self.arguments),
            "ECHO" => echo(&self.arguments),
            "GET" => get(store, &self.arguments).await,
            "SET" => set(store, &self.arguments).await,
            "TYPE" => type_command(store, &self.arguments).await,
            "KEYS" => keys(store, &self.arguments).await,
            "CONFIG" => config_get(config, &self.arguments),
            "XADD" => xadd(store, &self.arguments).await,
            _ => Err(CommandError::UnknownCommand(self.name.clone())),
        }
    }
}
