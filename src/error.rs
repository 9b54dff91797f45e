//! Error types for the bitvote codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding a redundant stream.
#[derive(Error, Debug)]
pub enum Error {
    /// Unexpected I/O failure reading, writing, or seeking the stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The medium filled up before the minimum viable number of copies
    /// was written.
    #[error(
        "Insufficient redundancy: only {written} complete copies fit, \
         at least {required} are needed for any error protection"
    )]
    InsufficientRedundancy { written: u64, required: u64 },

    /// The body region contained no complete copy of the payload.
    #[error("No complete copies found on media: cannot reconstruct")]
    NoCopies,

    /// Rejected codec configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
