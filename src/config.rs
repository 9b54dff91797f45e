//! Configuration constants and types for the bitvote codec.

/// Number of bits in a word, the atomic unit of voting and positioning.
pub const WORD_BITS: usize = 64;

/// Number of bytes in a word.
pub const WORD_BYTES: usize = 8;

/// How many times the data length is repeated at the front of the stream.
///
/// This is a compile-time constant rather than a configuration field so it
/// cannot drift from stream to stream. 10000 repetitions consume only 80 KB
/// but let the length survive random bit error rates approaching 48%.
pub const LENGTH_REDUNDANCY: usize = 10_000;

/// Minimum number of complete payload copies for majority voting to have
/// any corrective power at all.
pub const MIN_COPIES: u64 = 3;

/// Configuration for one encode invocation.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Maximum number of payload copies to write.
    ///
    /// Normally you want to keep writing until the medium is full,
    /// regardless of how many copies that turns out to be. A finite cap is
    /// mostly useful for controlled testing.
    pub max_copies: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_copies: u64::MAX,
        }
    }
}

impl CodecConfig {
    /// Create a configuration with a bounded copy count.
    pub fn with_max_copies(max_copies: u64) -> Self {
        Self { max_copies }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_copies < MIN_COPIES {
            return Err(format!(
                "max_copies must be at least {} (got {})",
                MIN_COPIES, self.max_copies
            ));
        }
        Ok(())
    }
}
