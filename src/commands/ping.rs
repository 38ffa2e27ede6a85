use crate::{commands::command_error::CommandError, resp::RespValue};

pub fn ping(arguments: &[Vec<u8>]) -> Result<Vec<u8>, CommandError> {
    if !arguments.is_empty() {
        return Err(CommandError::WrongNumberOfArguments("ping"));
    }

    Ok(RespValue::SimpleString("PONG".to_string()).encode())
}

#[cfg(test)]
mod tests {
    use super::ping;
    use crate::commands::CommandError;

    #[test]
    fn test_ping() {
        assert_eq!(ping(&[]), Ok(b"+PONG\r\n".to_vec()));
        assert_eq!(
            ping(&[b"extra".to_vec()]),
            Err(CommandError::WrongNumberOfArguments("ping"))
        );
    }
}
