use crate::{
    commands::command_error::CommandError,
    keyspace::KeyValueStore,
    resp::RespValue,
};

/// Handles the TYPE command.
///
/// Replies `string`, `stream` or `none`; an expired key counts as
/// `none` and is deleted in place.
pub async fn type_command(
    store: &KeyValueStore,
    arguments: &[Vec<u8>],
) -> Result<Vec<u8>, CommandError> {
    if arguments.len() != 1 {
        return Err(CommandError::WrongNumberOfArguments("type"));
    }

    let key_type = store.type_of(&arguments[0]).await;

    Ok(RespValue::SimpleString(key_type.as_string().to_string()).encode())
}

#[cfg(test)]
mod tests {
    use super::type_command;
    use crate::{
        commands::CommandError,
        keyspace::{IdSpec, KeyValueStore},
    };

    #[tokio::test]
    async fn test_type_command() {
        let store = KeyValueStore::new();
        store.set_string(b"s".to_vec(), b"v".to_vec(), None).await;
        store
            .stream_append(b"x", IdSpec::Explicit(1, 1), vec![])
            .await
            .unwrap();

        let test_cases = vec![
            (vec![b"s".to_vec()], Ok(b"+string\r\n".to_vec())),
            (vec![b"x".to_vec()], Ok(b"+stream\r\n".to_vec())),
            (vec![b"missing".to_vec()], Ok(b"+none\r\n".to_vec())),
            (vec![], Err(CommandError::WrongNumberOfArguments("type"))),
        ];

        for (arguments, expected) in test_cases {
            let result = type_command(&store, &arguments).await;
            assert_eq!(result, expected, "typing {:?}", arguments);
        }
    }
}
