//! Server configuration parsed from command-line flags.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during command-line argument parsing.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum CliError {
    #[error("Invalid command line flag")]
    InvalidCommandLineFlag,
    #[error("Invalid port flag value")]
    InvalidPortFlagValue,
}

/// Configuration for a server instance.
///
/// `dir` and `dbfilename` locate the RDB snapshot; a snapshot load is
/// attempted only when both are present. `CONFIG GET` reads from this
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The TCP port number the server listens on
    pub port: u16,
    /// Directory containing the RDB snapshot file
    pub dir: Option<String>,
    /// File name of the RDB snapshot inside `dir`
    pub dbfilename: Option<String>,
}

impl Config {
    /// Creates a configuration from command-line arguments.
    ///
    /// # Supported Arguments
    ///
    /// * `--port <port>` - Port number to listen on (default: 6379)
    /// * `--dir <path>` - Snapshot directory
    /// * `--dbfilename <name>` - Snapshot file name
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully parsed configuration
    /// * `Err(CliError)` - If a flag is unknown, a value is missing or the
    ///   port is not a valid number
    pub fn new<I: IntoIterator<Item = String>>(command_line_args: I) -> Result<Self, CliError> {
        let mut iter = command_line_args.into_iter().skip(1);
        let mut port: Option<u16> = None;
        let mut dir: Option<String> = None;
        let mut dbfilename: Option<String> = None;

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--port" => {
                    let Some(port_str) = iter.next() else {
                        return Err(CliError::InvalidCommandLineFlag);
                    };

                    port = Some(validate_port_flag(&port_str)?);
                }
                "--dir" => {
                    let Some(dir_str) = iter.next() else {
                        return Err(CliError::InvalidCommandLineFlag);
                    };

                    dir = Some(dir_str);
                }
                "--dbfilename" => {
                    let Some(file_str) = iter.next() else {
                        return Err(CliError::InvalidCommandLineFlag);
                    };

                    dbfilename = Some(file_str);
                }
                _ => return Err(CliError::InvalidCommandLineFlag),
            }
        }

        Ok(Config {
            port: port.unwrap_or(6379),
            dir,
            dbfilename,
        })
    }

    /// Returns the snapshot file path when both `dir` and `dbfilename`
    /// are configured.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        match (&self.dir, &self.dbfilename) {
            (Some(dir), Some(file)) => Some(PathBuf::from(dir).join(file)),
            _ => None,
        }
    }
}

fn validate_port_flag(port_str: &str) -> Result<u16, CliError> {
    let port = port_str
        .parse::<u16>()
        .map_err(|_| CliError::InvalidPortFlagValue)?;

    if port == 0 {
        return Err(CliError::InvalidPortFlagValue);
    }

    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::{CliError, Config};

    fn args(list: &[&str]) -> Vec<String> {
        let mut full = vec!["rudis".to_string()];
        full.extend(list.iter().map(|s| s.to_string()));
        full
    }

    #[test]
    fn test_config_new() {
        let test_cases = vec![
            (
                args(&[]),
                Ok(Config {
                    port: 6379,
                    dir: None,
                    dbfilename: None,
                }),
            ),
            (
                args(&["--port", "7000"]),
                Ok(Config {
                    port: 7000,
                    dir: None,
                    dbfilename: None,
                }),
            ),
            (
                args(&["--dir", "/tmp/redis-files", "--dbfilename", "dump.rdb"]),
                Ok(Config {
                    port: 6379,
                    dir: Some("/tmp/redis-files".to_string()),
                    dbfilename: Some("dump.rdb".to_string()),
                }),
            ),
            (
                args(&["--dbfilename", "dump.rdb", "--dir", "/data", "--port", "6380"]),
                Ok(Config {
                    port: 6380,
                    dir: Some("/data".to_string()),
                    dbfilename: Some("dump.rdb".to_string()),
                }),
            ),
            (args(&["--port"]), Err(CliError::InvalidCommandLineFlag)),
            (
                args(&["--port", "not-a-port"]),
                Err(CliError::InvalidPortFlagValue),
            ),
            (args(&["--port", "0"]), Err(CliError::InvalidPortFlagValue)),
            (
                args(&["--port", "70000"]),
                Err(CliError::InvalidPortFlagValue),
            ),
            (args(&["--dir"]), Err(CliError::InvalidCommandLineFlag)),
            (
                args(&["--replicaof", "localhost 6379"]),
                Err(CliError::InvalidCommandLineFlag),
            ),
        ];

        for (input, expected) in test_cases {
            let result = Config::new(input.clone());
            assert_eq!(result, expected, "parsing args {:?}", &input[1..]);
        }
    }

    #[test]
    fn test_snapshot_path() {
        let config = Config {
            port: 6379,
            dir: Some("/data".to_string()),
            dbfilename: Some("dump.rdb".to_string()),
        };
        assert_eq!(
            config.snapshot_path(),
            Some(std::path::PathBuf::from("/data/dump.rdb"))
        );

        let config = Config {
            port: 6379,
            dir: Some("/data".to_string()),
            dbfilename: None,
        };
        assert_eq!(config.snapshot_path(), None);
    }
}
