//! Decoder configuration

/// yEnc decoder configuration
///
/// The defaults reproduce the lenient behavior most posters rely on:
/// a header or trailer value that is not a valid number is treated as `0`
/// (and logged at `warn`) instead of aborting the decode.
///
/// # Example
///
/// ```
/// use yenc_rs::{Decoder, DecoderConfig};
///
/// let input: &[u8] = b"=ybegin line=128 size=x name=a.bin\n=yend size=0\n";
///
/// // Lenient: size=x becomes 0 and decoding continues
/// assert!(Decoder::new(input).decode().is_ok());
///
/// // Strict: size=x is rejected
/// assert!(Decoder::with_config(input, DecoderConfig::strict()).decode().is_err());
/// ```
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Reject malformed `size`, `line`, `part`, `total`, `begin`, `end`,
    /// `pcrc32` and `crc32` values instead of defaulting them to zero
    ///
    /// Default: `false`
    #[cfg_attr(feature = "serde", serde(default))]
    pub strict_fields: bool,
}

impl DecoderConfig {
    /// Lenient configuration (same as `Default`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that fails on any malformed numeric field
    pub fn strict() -> Self {
        Self {
            strict_fields: true,
        }
    }
}
