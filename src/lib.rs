//! Bit-error-resistant codec using massive repetition and majority voting.
//!
//! Protects arbitrary byte data against physical-media bit corruption on
//! write-once sequential media (optical discs, tape, degraded flash) where
//! read errors are frequent but uncorrelated across widely separated copies.
//!
//! # Features
//!
//! - **Self-describing length header**: the payload length is repeated
//!   10000 times so it survives very high corruption rates cheaply
//! - **Massive body redundancy**: the padded payload is written
//!   back-to-back until the medium is full
//! - **Per-bit majority voting**: each word is reconstructed from every
//!   surviving copy, with a disagreement tally as a corruption diagnostic
//! - **Copy discovery**: no copy count is stored anywhere; the decoder
//!   rediscovers how many complete copies the medium holds by scanning
//!
//! # Architecture
//!
//! ```text
//! encode: read all → pad to word boundary → length header → copies until medium full
//! decode: length header → seekable source (direct or buffered) → scan copies → vote per word
//! ```
//!
//! # Example
//!
//! ```rust
//! use bitvote::{codec, CodecConfig};
//! use std::io::Cursor;
//!
//! let mut encoded = Vec::new();
//! codec::encode(
//!     &mut &b"survives bit rot"[..],
//!     &mut encoded,
//!     &CodecConfig::with_max_copies(5),
//! )
//! .unwrap();
//!
//! // Flip every bit of one whole copy; the other four outvote it.
//! let body = encoded.len() - 2 * 16;
//! for byte in &mut encoded[body..body + 16] {
//!     *byte ^= 0xFF;
//! }
//!
//! let mut decoded = Vec::new();
//! let report = codec::decode(&mut Cursor::new(encoded), &mut decoded).unwrap();
//! assert_eq!(decoded, b"survives bit rot");
//! assert!(report.disagreements > 0);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod stream;
pub mod voting;

pub use config::CodecConfig;
pub use error::{Error, Result};
