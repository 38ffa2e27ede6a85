/// Reads `len` bytes starting at `cursor`, failing with `UnexpectedEof`
/// when the buffer ends first.
pub fn get_buffer_slice(buffer: &[u8], cursor: usize, len: usize) -> tokio::io::Result<&[u8]> {
    if cursor + len > buffer.len() {
        return Err(tokio::io::Error::new(
            tokio::io::ErrorKind::UnexpectedEof,
            "snapshot ends inside a value",
        ));
    }

    Ok(&buffer[cursor..cursor + len])
}
