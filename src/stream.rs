//! Buffering adapter for inputs without random access.

use std::io::{self, Cursor, Read};
use tracing::{debug, warn};

/// Read the remainder of a sequential input into memory and expose it as a
/// seekable source.
///
/// Used when the underlying input cannot seek (a pipe, stdin) or when
/// seeking is disabled: the scanner and the word reconstruction loop both
/// need random access. Memory use is proportional to the remaining stream
/// size, so prefer [`decode_seekable`](crate::codec::decode_seekable) for
/// file-backed sources.
pub fn buffer_remaining<R: Read>(input: &mut R) -> io::Result<Cursor<Vec<u8>>> {
    warn!("input not seekable, buffering entire remainder into memory");

    let mut data = Vec::new();
    input.read_to_end(&mut data)?;

    debug!(bytes = data.len(), "input buffered, proceeding");
    Ok(Cursor::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom};

    #[test]
    fn test_buffers_remaining_bytes() {
        let mut input = &b"abcdef"[..];
        let mut prefix = [0u8; 2];
        input.read_exact(&mut prefix).unwrap();

        let mut source = buffer_remaining(&mut input).unwrap();
        assert_eq!(source.get_ref().as_slice(), b"cdef");

        // The wrapped source supports seeking.
        source.seek(SeekFrom::Start(2)).unwrap();
        let mut rest = Vec::new();
        source.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"ef");
    }

    #[test]
    fn test_empty_input() {
        let mut input = &b""[..];
        let source = buffer_remaining(&mut input).unwrap();
        assert!(source.get_ref().is_empty());
    }
}
