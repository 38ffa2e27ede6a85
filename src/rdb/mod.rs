mod encoding;
mod get_slice;
mod loader;
mod opcode;
mod rdb_parser;

pub use loader::load_snapshot;
pub use rdb_parser::RdbParser;
