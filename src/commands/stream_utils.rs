use crate::{commands::command_error::CommandError, keyspace::IdSpec};

/// Parses the ID argument of a stream command into an [`IdSpec`].
///
/// Accepted forms are `*` (fully auto), `T-*` (explicit time, auto
/// sequence) and `T-S` (fully explicit) where `T` and `S` are decimal
/// digits. Anything else, including components that overflow `u64`, is
/// rejected.
///
/// # Examples
///
/// ```
/// use rudis::commands::parse_id_spec;
/// use rudis::keyspace::IdSpec;
///
/// assert_eq!(parse_id_spec("*"), Ok(IdSpec::Auto));
/// assert_eq!(parse_id_spec("5-*"), Ok(IdSpec::Partial(5)));
/// assert_eq!(parse_id_spec("1526919030474-0"), Ok(IdSpec::Explicit(1526919030474, 0)));
/// ```
pub fn parse_id_spec(argument: &str) -> Result<IdSpec, CommandError> {
    if argument == "*" {
        return Ok(IdSpec::Auto);
    }

    let Some((time_part, seq_part)) = argument.split_once('-') else {
        return Err(CommandError::InvalidStreamId);
    };

    if time_part.is_empty() || seq_part.is_empty() {
        return Err(CommandError::InvalidStreamId);
    }

    let time = time_part
        .parse::<u64>()
        .map_err(|_| CommandError::InvalidStreamId)?;

    if seq_part == "*" {
        return Ok(IdSpec::Partial(time));
    }

    let seq = seq_part
        .parse::<u64>()
        .map_err(|_| CommandError::InvalidStreamId)?;

    Ok(IdSpec::Explicit(time, seq))
}

#[cfg(test)]
mod tests {
    use super::parse_id_spec;
    use crate::{commands::CommandError, keyspace::IdSpec};

    #[test]
    fn test_parse_id_spec() {
        let test_cases = vec![
            ("*", Ok(IdSpec::Auto)),
            ("0-0", Ok(IdSpec::Explicit(0, 0))),
            ("1-1", Ok(IdSpec::Explicit(1, 1))),
            ("1526919030474-12", Ok(IdSpec::Explicit(1526919030474, 12))),
            ("0-*", Ok(IdSpec::Partial(0))),
            ("1526919030474-*", Ok(IdSpec::Partial(1526919030474))),
            ("invalid", Err(CommandError::InvalidStreamId)),
            ("", Err(CommandError::InvalidStreamId)),
            ("123", Err(CommandError::InvalidStreamId)),
            ("-1", Err(CommandError::InvalidStreamId)),
            ("1-", Err(CommandError::InvalidStreamId)),
            ("1-2-3", Err(CommandError::InvalidStreamId)),
            ("a-1", Err(CommandError::InvalidStreamId)),
            ("1-b", Err(CommandError::InvalidStreamId)),
            ("*-1", Err(CommandError::InvalidStreamId)),
            ("99999999999999999999-0", Err(CommandError::InvalidStreamId)),
        ];

        for (input, expected) in test_cases {
            let result = parse_id_spec(input);
            assert_eq!(result, expected, "parsing stream ID {:?}", input);
        }
    }
}
