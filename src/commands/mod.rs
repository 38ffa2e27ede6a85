mod command_error;
mod command_handler;
mod config_get;
mod echo;
mod get;
mod keys;
mod ping;
mod set;
mod stream_utils;
mod type_command;
mod xadd;

pub use command_error::CommandError;
pub use command_handler::CommandHandler;
pub use stream_utils::parse_id_spec;
