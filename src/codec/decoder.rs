//! Decoding a redundant stream back to the original bytes.
//!
//! The pipeline is strictly sequential: consume the length header, obtain a
//! random-access source (directly or through the buffering adapter), scan
//! for the copy count, then reconstruct each word by majority vote.

use crate::codec::{length::read_length_header, padded_length, DecodeSession};
use crate::config::{MIN_COPIES, WORD_BYTES};
use crate::error::{Error, Result};
use crate::stream::buffer_remaining;
use crate::voting::BitVoter;
use std::io::{self, Read, Seek, SeekFrom, Write};
use tracing::{debug, info, trace, warn};

/// Outcome of a decode invocation.
#[derive(Debug, Clone)]
pub struct DecodeReport {
    /// Reconstructed true byte length of the payload.
    pub data_length: u64,
    /// Length of one replicated copy on the medium.
    pub padded_length: u64,
    /// Number of complete copies discovered in the body region.
    pub copy_count: u64,
    /// Total per-bit observations that disagreed with a decided majority,
    /// across the header and every body word. A lower bound on the bit
    /// errors physically present; there may be more.
    pub disagreements: u64,
}

/// Decode a redundant stream from a sequential source.
///
/// The remainder of the input after the header is buffered into memory to
/// give the scanner and the word reconstruction loop random access. Memory
/// use is proportional to the remaining stream size; use
/// [`decode_seekable`] for sources that support seeking.
///
/// # Example
///
/// ```
/// use bitvote::{codec, CodecConfig};
/// use std::io::Cursor;
///
/// let mut encoded = Vec::new();
/// codec::encode(
///     &mut &b"majority rules"[..],
///     &mut encoded,
///     &CodecConfig::with_max_copies(5),
/// )
/// .unwrap();
///
/// let mut decoded = Vec::new();
/// let report = codec::decode(&mut Cursor::new(encoded), &mut decoded).unwrap();
///
/// assert_eq!(decoded, b"majority rules");
/// assert_eq!(report.copy_count, 5);
/// assert_eq!(report.disagreements, 0);
/// ```
pub fn decode<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<DecodeReport> {
    let mut session = DecodeSession::new();
    let data_length = read_length_header(input, &mut session)?;

    let mut source = buffer_remaining(input)?;
    decode_with_source(&mut source, output, data_length, session)
}

/// Decode a redundant stream from a random-access source.
///
/// Identical to [`decode`] but skips the buffering adapter, keeping memory
/// use at one word regardless of stream size.
pub fn decode_seekable<R: Read + Seek, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<DecodeReport> {
    let mut session = DecodeSession::new();
    let data_length = read_length_header(input, &mut session)?;

    decode_with_source(input, output, data_length, session)
}

fn decode_with_source<R: Read + Seek, W: Write>(
    source: &mut R,
    output: &mut W,
    data_length: u64,
    mut session: DecodeSession,
) -> Result<DecodeReport> {
    let padded = padded_length(data_length);

    if padded == 0 {
        info!(data_length, "empty payload, nothing to reconstruct");
        return Ok(DecodeReport {
            data_length,
            padded_length: padded,
            copy_count: 0,
            disagreements: session.disagreements(),
        });
    }

    let data_start = source.stream_position()?;
    let copy_count = scan_copies(source, padded)?;

    if copy_count == 0 {
        return Err(Error::NoCopies);
    }
    if copy_count < MIN_COPIES {
        warn!(
            copies = copy_count,
            "fewer copies survived than majority voting needs; output is best-effort"
        );
    }
    info!(copies = copy_count, "found full copies of data on media");

    reconstruct_words(
        source,
        output,
        data_start,
        data_length,
        padded,
        copy_count,
        &mut session,
    )?;
    output.flush()?;

    let report = DecodeReport {
        data_length,
        padded_length: padded,
        copy_count,
        disagreements: session.disagreements(),
    };
    info!(
        data_length = report.data_length,
        copies = report.copy_count,
        disagreements = report.disagreements,
        "decode complete"
    );

    Ok(report)
}

/// Count the complete copies physically present in the body region.
///
/// The source must be positioned at the start of the body. Each iteration
/// skips to the final word of the next copy and attempts to read it; a full
/// read means the entire copy lies behind it, a short read means that copy
/// was cut off by a truncated write. The probe must be a read, not a seek:
/// seeking past the end of a stream does not fail, and only an attempted
/// read reveals the end of the data.
///
/// A source with a known total size could instead compute
/// `(size - header) / padded_length`; that is an equivalent shortcut, but
/// skip-then-read works on any stream, so it is the one used everywhere.
fn scan_copies<R: Read + Seek>(source: &mut R, padded: u64) -> Result<u64> {
    let skip = padded as i64 - WORD_BYTES as i64;
    let mut copies = 0u64;

    loop {
        source.seek(SeekFrom::Current(skip))?;
        if try_read_word(source)?.is_none() {
            break;
        }
        copies += 1;
    }

    debug!(copies, skip, "body scan finished");
    Ok(copies)
}

/// Reconstruct every word position by majority vote across all copies and
/// stream the original bytes to `output`.
fn reconstruct_words<R: Read + Seek, W: Write>(
    source: &mut R,
    output: &mut W,
    data_start: u64,
    data_length: u64,
    padded: u64,
    copy_count: u64,
    session: &mut DecodeSession,
) -> Result<()> {
    let words = padded / WORD_BYTES as u64;
    let skip = padded as i64 - WORD_BYTES as i64;

    for j in 0..words {
        source.seek(SeekFrom::Start(data_start + j * WORD_BYTES as u64))?;

        let mut voter = BitVoter::new();
        for _ in 0..copy_count {
            voter.observe(read_word(source)?);
            source.seek(SeekFrom::Current(skip))?;
        }

        let (word, disagreements) = voter.decide();
        session.record_disagreements(disagreements);
        trace!(word_index = j, disagreements, "word reconstructed");

        let bytes = word.to_be_bytes();
        if j != words - 1 || data_length == padded {
            output.write_all(&bytes)?;
        } else {
            // Final word with padding: emit only the original bytes.
            let keep = WORD_BYTES - (padded - data_length) as usize;
            debug!(keep, "truncating final word");
            output.write_all(&bytes[..keep])?;
        }
    }

    Ok(())
}

/// Read one full word, or `None` at the end of the data.
///
/// A short read is the expected signal that no further complete copy
/// exists; any other failure is a real error.
fn try_read_word<R: Read>(source: &mut R) -> Result<Option<u64>> {
    let mut buf = [0u8; WORD_BYTES];
    match source.read_exact(&mut buf) {
        Ok(()) => Ok(Some(u64::from_be_bytes(buf))),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read one full word from a region the scanner has already verified.
fn read_word<R: Read>(source: &mut R) -> Result<u64> {
    let mut buf = [0u8; WORD_BYTES];
    source.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}
