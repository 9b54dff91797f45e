//! The self-describing length header.
//!
//! The true payload length is serialized as one big-endian word and repeated
//! [`LENGTH_REDUNDANCY`] times at the front of the stream, protected by its
//! own redundancy independent of the body copies.

use crate::codec::DecodeSession;
use crate::config::{LENGTH_REDUNDANCY, WORD_BYTES};
use crate::error::Result;
use crate::voting::BitVoter;
use std::io::{Read, Write};
use tracing::debug;

/// Write the length header: `LENGTH_REDUNDANCY` consecutive copies of the
/// data length as a big-endian word.
///
/// Any failure here is fatal; unlike the body copies, a stream without an
/// intact header region is not decodable at all.
pub fn write_length_header<W: Write>(output: &mut W, data_length: u64) -> Result<()> {
    let word = data_length.to_be_bytes();
    for _ in 0..LENGTH_REDUNDANCY {
        output.write_all(&word)?;
    }
    Ok(())
}

/// Read the length header and reconstruct the data length by majority vote.
///
/// Consumes exactly `LENGTH_REDUNDANCY * 8` bytes from the front of the
/// stream. This must be the first operation performed on a stream being
/// decoded. A stream shorter than the header is an I/O error, not an
/// expected boundary condition.
pub fn read_length_header<R: Read>(input: &mut R, session: &mut DecodeSession) -> Result<u64> {
    let mut voter = BitVoter::new();
    let mut buf = [0u8; WORD_BYTES];

    for _ in 0..LENGTH_REDUNDANCY {
        input.read_exact(&mut buf)?;
        voter.observe(u64::from_be_bytes(buf));
    }

    let (data_length, disagreements) = voter.decide();
    session.record_disagreements(disagreements);

    debug!(
        observations = voter.observations(),
        disagreements, data_length, "length header decoded"
    );

    Ok(data_length)
}
