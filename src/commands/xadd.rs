use std::str;

use crate::{
    commands::{command_error::CommandError, stream_utils::parse_id_spec},
    keyspace::{IdSpec, KeyValueStore},
    resp::RespValue,
};

/// Represents the parsed arguments for the XADD command.
pub struct XaddArguments {
    /// The stream key the entry will be appended to
    key: Vec<u8>,
    /// The requested entry ID, before resolution against the stream
    id_spec: IdSpec,
    /// Field-value pairs in argument order
    fields: Vec<(Vec<u8>, Vec<u8>)>,
}

impl XaddArguments {
    /// Parses `XADD key id field value [field value ...]`.
    ///
    /// At least one field-value pair is required and pairs must be
    /// complete. The ID argument must be `*`, `T-*` or `T-S`; the key
    /// and the field pairs stay raw bytes.
    pub fn parse(arguments: &[Vec<u8>]) -> Result<Self, CommandError> {
        if arguments.len() < 4 || arguments[2..].len() % 2 != 0 {
            return Err(CommandError::WrongNumberOfArguments("xadd"));
        }

        let id = str::from_utf8(&arguments[1]).map_err(|_| CommandError::InvalidStreamId)?;
        let id_spec = parse_id_spec(id)?;

        let fields = arguments[2..]
            .chunks(2)
            .map(|chunk| (chunk[0].clone(), chunk[1].clone()))
            .collect::<Vec<(Vec<u8>, Vec<u8>)>>();

        Ok(Self {
            key: arguments[0].clone(),
            id_spec,
            fields,
        })
    }
}

/// Handles the XADD command.
///
/// Appends an entry to the stream at the given key, creating the stream
/// if the key is absent. ID resolution and the monotonicity check happen
/// inside the keyspace's exclusive critical section; the reply is the
/// assigned ID as a bulk string.
pub async fn xadd(store: &KeyValueStore, arguments: &[Vec<u8>]) -> Result<Vec<u8>, CommandError> {
    let xadd_arguments = XaddArguments::parse(arguments)?;

    let id = store
        .stream_append(
            &xadd_arguments.key,
            xadd_arguments.id_spec,
            xadd_arguments.fields,
        )
        .await?;

    Ok(RespValue::BulkString(id.as_string().into_bytes()).encode())
}
