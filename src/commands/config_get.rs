use crate::{
    commands::command_error::CommandError,
    config::Config,
    resp::RespValue,
};

/// Handles `CONFIG GET <parameter>`.
///
/// Recognized parameters are `dir` and `dbfilename`, answered from the
/// parsed configuration record as a two-element array of parameter name
/// and value. Unknown parameters reply with an empty array. Subcommand
/// and parameter names are configuration text, read lossily from the
/// argument bytes.
pub fn config_get(config: &Config, arguments: &[Vec<u8>]) -> Result<Vec<u8>, CommandError> {
    if arguments.len() != 2 {
        return Err(CommandError::WrongNumberOfArguments("config"));
    }

    let subcommand = String::from_utf8_lossy(&arguments[0]);

    if subcommand.to_uppercase() != "GET" {
        return Err(CommandError::UnknownCommand(format!(
            "CONFIG {}",
            subcommand
        )));
    }

    let parameter = String::from_utf8_lossy(&arguments[1]).to_lowercase();

    let value = match parameter.as_str() {
        "dir" => config.dir.clone(),
        "dbfilename" => config.dbfilename.clone(),
        _ => return Ok(RespValue::Array(vec![]).encode()),
    };

    let response = vec![
        RespValue::BulkString(parameter.into_bytes()),
        RespValue::BulkString(value.unwrap_or_default().into_bytes()),
    ];

    Ok(RespValue::Array(response).encode())
}

#[cfg(test)]
mod tests {
    use super::config_get;
    use crate::{commands::CommandError, config::Config};

    fn config() -> Config {
        Config {
            port: 6379,
            dir: Some("/tmp/redis-files".to_string()),
            dbfilename: Some("dump.rdb".to_string()),
        }
    }

    fn args(list: &[&str]) -> Vec<Vec<u8>> {
        list.iter().map(|s| s.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_config_get() {
        let test_cases = vec![
            (
                args(&["GET", "dir"]),
                Ok(b"*2\r\n$3\r\ndir\r\n$16\r\n/tmp/redis-files\r\n".to_vec()),
            ),
            (
                args(&["get", "dbfilename"]),
                Ok(b"*2\r\n$10\r\ndbfilename\r\n$8\r\ndump.rdb\r\n".to_vec()),
            ),
            (args(&["GET", "maxmemory"]), Ok(b"*0\r\n".to_vec())),
            (
                args(&["GET"]),
                Err(CommandError::WrongNumberOfArguments("config")),
            ),
            (
                args(&["SET", "dir", "/tmp"]),
                Err(CommandError::WrongNumberOfArguments("config")),
            ),
            (
                args(&["RESETSTAT", "x"]),
                Err(CommandError::UnknownCommand("CONFIG RESETSTAT".to_string())),
            ),
        ];

        for (arguments, expected) in test_cases {
            let result = config_get(&config(), &arguments);
            assert_eq!(result, expected, "running CONFIG {:?}", arguments);
        }
    }

    #[test]
    fn test_config_get_unset_parameter_value() {
        let config = Config {
            port: 6379,
            dir: None,
            dbfilename: None,
        };

        assert_eq!(
            config_get(&config, &args(&["GET", "dir"])),
            Ok(b"*2\r\n$3\r\ndir\r\n$0\r\n\r\n".to_vec())
        );
    }
}
