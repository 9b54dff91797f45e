//! Encoding data into a redundant stream.

use crate::codec::{length::write_length_header, padded_length};
use crate::config::{CodecConfig, MIN_COPIES};
use crate::error::{Error, Result};
use std::io::{self, Read, Write};
use tracing::{debug, info, warn};

/// Outcome of an encode invocation.
#[derive(Debug, Clone)]
pub struct EncodeReport {
    /// True (unpadded) byte length of the input.
    pub data_length: u64,
    /// Input length rounded up to a word boundary; the unit replicated in
    /// the body.
    pub padded_length: u64,
    /// Number of complete payload copies written after the header.
    pub copies_written: u64,
    /// Whether the copy loop ended because the medium filled up (as opposed
    /// to reaching the configured cap).
    pub medium_exhausted: bool,
}

/// Encode `input` into a redundant stream on `output`.
///
/// Reads the input to completion, pads it with zero bytes to a word
/// boundary, writes the length header, then writes full copies of the
/// padded payload until the medium is exhausted or the configured copy cap
/// is reached. The copy count is never stored; it is implicit in how much
/// fits, and the decoder rediscovers it by scanning.
///
/// Fails with [`Error::InsufficientRedundancy`] if the medium fills before
/// 3 full copies were written.
///
/// # Example
///
/// ```
/// use bitvote::{codec, CodecConfig};
///
/// let mut encoded = Vec::new();
/// let report = codec::encode(
///     &mut &b"hello"[..],
///     &mut encoded,
///     &CodecConfig::with_max_copies(4),
/// )
/// .unwrap();
///
/// assert_eq!(report.data_length, 5);
/// assert_eq!(report.padded_length, 8);
/// assert_eq!(report.copies_written, 4);
/// ```
pub fn encode<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    config: &CodecConfig,
) -> Result<EncodeReport> {
    config.validate().map_err(Error::InvalidConfig)?;

    let mut data = Vec::new();
    input.read_to_end(&mut data)?;

    let data_length = data.len() as u64;
    let padded = padded_length(data_length);

    // Pad to word length so the decoder only ever handles whole words.
    data.resize(padded as usize, 0);

    debug!(
        data_length,
        pad_bytes = padded - data_length,
        "input read and padded"
    );

    write_length_header(output, data_length)?;

    if data.is_empty() {
        // A zero-length payload has nothing to replicate; every copy would
        // be empty and the loop below would never terminate on its own.
        output.flush()?;
        info!(copies = 0, "write completed for empty input");
        return Ok(EncodeReport {
            data_length,
            padded_length: padded,
            copies_written: 0,
            medium_exhausted: false,
        });
    }

    let mut copies_written = 0u64;
    let mut medium_exhausted = false;

    while copies_written < config.max_copies {
        if !write_copy(output, &data)? {
            medium_exhausted = true;
            break;
        }
        copies_written += 1;
    }

    // A buffering sink may still hold the tail of the last copy.
    output.flush()?;

    if medium_exhausted {
        if copies_written < MIN_COPIES {
            warn!(
                copies = copies_written,
                "medium exhausted below the minimum viable copy count; \
                 reduce the input size or use a larger volume"
            );
            return Err(Error::InsufficientRedundancy {
                written: copies_written,
                required: MIN_COPIES,
            });
        }
        info!(copies = copies_written, "write truncated by medium capacity");
    } else {
        info!(copies = copies_written, "write completed at copy cap");
    }

    Ok(EncodeReport {
        data_length,
        padded_length: padded,
        copies_written,
        medium_exhausted,
    })
}

/// Write one full copy of the payload.
///
/// Returns `Ok(false)` when the medium is exhausted mid-copy, the one write
/// failure that is normal control flow rather than an error.
fn write_copy<W: Write>(output: &mut W, payload: &[u8]) -> Result<bool> {
    let mut written = 0;

    while written < payload.len() {
        match output.write(&payload[written..]) {
            Ok(0) => return Ok(false),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WriteZero
                        | io::ErrorKind::StorageFull
                        | io::ErrorKind::BrokenPipe
                ) =>
            {
                return Ok(false)
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(true)
}
