//! Resilience tests - corrupt and truncate streams, then verify recovery.

use bitvote::codec;
use bitvote::config::{LENGTH_REDUNDANCY, WORD_BYTES};
use bitvote::{CodecConfig, Error};
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::{self, Cursor, Write};

const HEADER_BYTES: usize = LENGTH_REDUNDANCY * WORD_BYTES;

/// Encode `data` with a fixed copy count and return the raw stream.
fn encode_to_vec(data: &[u8], copies: u64) -> Vec<u8> {
    let mut encoded = Vec::new();
    codec::encode(
        &mut &data[..],
        &mut encoded,
        &CodecConfig::with_max_copies(copies),
    )
    .expect("Failed to encode");
    encoded
}

/// Flip every bit of copy `index` in the body region.
fn corrupt_whole_copy(stream: &mut [u8], padded_length: usize, index: usize) {
    let start = HEADER_BYTES + index * padded_length;
    for byte in &mut stream[start..start + padded_length] {
        *byte ^= 0xFF;
    }
}

/// A sink that accepts at most `capacity` bytes, simulating a small medium.
struct LimitedSink {
    buf: Vec<u8>,
    capacity: usize,
}

impl LimitedSink {
    fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::new(),
            capacity,
        }
    }
}

impl Write for LimitedSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.buf.len();
        let n = room.min(data.len());
        self.buf.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_survives_minority_copy_corruption() {
    let data = b"This is important data that must survive corruption!";
    let mut encoded = encode_to_vec(data, 7);
    let padded = 56; // 52 bytes rounded up

    // Fully corrupt floor(7/2) - 1 = 2 copies.
    corrupt_whole_copy(&mut encoded, padded, 1);
    corrupt_whole_copy(&mut encoded, padded, 5);

    let mut decoded = Vec::new();
    let report = codec::decode(&mut Cursor::new(encoded), &mut decoded)
        .expect("Failed to decode corrupted stream");

    assert_eq!(decoded, data);
    assert_eq!(report.copy_count, 7);
    // Every bit of both corrupted copies dissented.
    assert_eq!(report.disagreements, 2 * 56 * 8);
}

#[test]
fn test_survives_corruption_at_voting_bound() {
    let data = b"pushed right to the edge of the voting bound";
    let mut encoded = encode_to_vec(data, 9);
    let padded = 48; // 44 bytes rounded up

    // floor(9/2) - 1 = 3 fully corrupted copies must still decode.
    for index in [0, 4, 8] {
        corrupt_whole_copy(&mut encoded, padded, index);
    }

    let mut decoded = Vec::new();
    codec::decode(&mut Cursor::new(encoded), &mut decoded).expect("Failed to decode at bound");

    assert_eq!(decoded, data);
}

#[test]
fn test_header_tolerates_minority_corruption() {
    let data = b"length survives a half-shredded header";
    let mut encoded = encode_to_vec(data, 3);

    // Flip every bit in floor(LENGTH_REDUNDANCY / 2) - 1 header words.
    let corrupt_words = LENGTH_REDUNDANCY / 2 - 1;
    for byte in encoded.iter_mut().take(corrupt_words * WORD_BYTES) {
        *byte ^= 0xFF;
    }

    let mut decoded = Vec::new();
    let report = codec::decode(&mut Cursor::new(encoded), &mut decoded)
        .expect("Failed to decode with corrupted header");

    assert_eq!(report.data_length, data.len() as u64);
    assert_eq!(decoded, data);
}

#[test]
fn test_scattered_bit_flips_across_copies() {
    let data = b"scattered single-bit damage, different spot per copy";
    let padded = 56;
    let mut encoded = encode_to_vec(data, 5);

    // One flipped bit in each copy, at five different word positions. Every
    // position still has a 4-of-5 majority.
    for (copy, offset) in [(0, 3), (1, 11), (2, 19), (3, 27), (4, 35)] {
        encoded[HEADER_BYTES + copy * padded + offset] ^= 0x10;
    }

    let mut decoded = Vec::new();
    let report = codec::decode(&mut Cursor::new(encoded), &mut decoded)
        .expect("Failed to decode scattered damage");

    assert_eq!(decoded, data);
    assert_eq!(report.disagreements, 5);
}

#[test]
fn test_random_whole_copy_corruption() {
    let data: Vec<u8> = (0..4096).map(|i| (i % 253) as u8).collect();
    let copies = 9usize;
    let padded = 4096;
    let mut encoded = encode_to_vec(&data, copies as u64);

    // Overwrite floor(9/2) - 1 = 3 randomly chosen copies with random
    // garbage. Whichever copies are hit, 6 intact copies outvote 3.
    let mut rng = rand::thread_rng();
    let mut indices: Vec<usize> = (0..copies).collect();
    indices.shuffle(&mut rng);

    for &index in indices.iter().take(3) {
        let start = HEADER_BYTES + index * padded;
        for byte in &mut encoded[start..start + padded] {
            *byte = rng.gen();
        }
    }

    let mut decoded = Vec::new();
    codec::decode(&mut Cursor::new(encoded), &mut decoded)
        .expect("Failed to decode randomly corrupted stream");

    assert_eq!(decoded, data);
}

#[test]
fn test_truncated_fourth_copy_not_counted() {
    // A medium with room for the header, 3 full copies, and part of a 4th.
    let data = b"truncate me";
    let padded = 16;
    let mut sink = LimitedSink::new(HEADER_BYTES + 3 * padded + 10);

    let report = codec::encode(&mut &data[..], &mut sink, &CodecConfig::default())
        .expect("Failed to encode onto limited medium");

    assert_eq!(report.copies_written, 3);
    assert!(report.medium_exhausted);

    let mut decoded = Vec::new();
    let decode_report = codec::decode(&mut Cursor::new(sink.buf), &mut decoded)
        .expect("Failed to decode truncated stream");

    assert_eq!(decode_report.copy_count, 3);
    assert_eq!(decoded, data);
}

#[test]
fn test_two_copies_is_insufficient_redundancy() {
    let data = b"does not fit three times";
    let padded = 24;
    let mut sink = LimitedSink::new(HEADER_BYTES + 2 * padded + 7);

    let result = codec::encode(&mut &data[..], &mut sink, &CodecConfig::default());

    match result {
        Err(Error::InsufficientRedundancy { written, required }) => {
            assert_eq!(written, 2);
            assert_eq!(required, 3);
        }
        other => panic!("Expected InsufficientRedundancy, got {:?}", other),
    }
}

#[test]
fn test_exactly_three_copies_succeeds() {
    let data = b"fits exactly three times";
    let padded = 24;
    let mut sink = LimitedSink::new(HEADER_BYTES + 3 * padded);

    let report = codec::encode(&mut &data[..], &mut sink, &CodecConfig::default())
        .expect("Three full copies must satisfy the minimum");

    assert_eq!(report.copies_written, 3);
    assert!(report.medium_exhausted);

    let mut decoded = Vec::new();
    codec::decode(&mut Cursor::new(sink.buf), &mut decoded).expect("Failed to decode");
    assert_eq!(decoded, data);
}

#[test]
fn test_two_surviving_copies_decode_best_effort() {
    // The >= 3 policy binds the encoder. A decoder handed a stream where
    // only 2 copies survived still reconstructs what it can.
    let data = [b'a'; 16];
    let mut stream = Vec::new();
    codec::write_length_header(&mut stream, 16).expect("Failed to write header");
    stream.extend_from_slice(&data);
    stream.extend_from_slice(&data);

    let mut decoded = Vec::new();
    let report = codec::decode(&mut Cursor::new(stream), &mut decoded)
        .expect("Two clean copies still decode");

    assert_eq!(report.copy_count, 2);
    assert_eq!(decoded, data);
}

#[test]
fn test_tie_break_is_reproducible() {
    // Two surviving copies that disagree everywhere: every bit ties and
    // must resolve to 0, run after run.
    let mut stream = Vec::new();
    codec::write_length_header(&mut stream, 8).expect("Failed to write header");
    stream.extend_from_slice(&[0xFF; 8]);
    stream.extend_from_slice(&[0x00; 8]);

    for _ in 0..3 {
        let mut decoded = Vec::new();
        let report = codec::decode(&mut Cursor::new(stream.clone()), &mut decoded)
            .expect("Failed to decode tied stream");

        assert_eq!(decoded, [0u8; 8]);
        assert_eq!(report.disagreements, 64);
    }
}
