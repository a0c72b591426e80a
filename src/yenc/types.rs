use crc32fast::Hasher;

use crate::{Result, YencError};

/// One decoded yEnc segment
///
/// Single-part posts produce one `Part` with `number == 0`. Multi-part posts
/// carry `part=`, `begin=` and `end=` so the caller can place `body` at the
/// right offset of the reassembled file.
#[derive(Debug, Clone, Default)]
pub struct Part {
    /// Part number from `part=` (0 when absent)
    pub number: u32,
    /// Size declared in the `=yend` trailer
    pub size: u64,
    /// First byte of this part in the whole file (1-based, from `=ypart`)
    pub begin: u64,
    /// Last byte of this part in the whole file (from `=ypart`)
    pub end: u64,
    /// Filename from `name=` (may contain spaces)
    pub name: String,
    /// Decoded data
    pub body: Vec<u8>,
    /// Size declared in `=ybegin` (whole file size for multi-part posts)
    pub(crate) header_size: u64,
    /// Line length from `line=`
    pub(crate) line_length: usize,
    /// `total=` seen so far in this stream
    pub(crate) total: Option<u32>,
    /// Whether the stream was multi-part when this part was read
    pub(crate) multipart: bool,
    /// `pcrc32=` from the trailer, if it parsed
    pub(crate) expected_crc32: Option<u32>,
    pub(crate) hasher: Hasher,
}

impl Part {
    /// Size declared in `=ybegin`
    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    /// Encoded line length declared in `=ybegin` (informational)
    pub fn line_length(&self) -> usize {
        self.line_length
    }

    /// Total number of parts declared by `total=`, if any
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    /// Part CRC32 declared by `pcrc32=`, if present and valid hex
    pub fn expected_crc32(&self) -> Option<u32> {
        self.expected_crc32
    }

    /// CRC32 of the decoded body
    pub fn crc32(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Check the body against `pcrc32`
    ///
    /// Returns `true` when no part CRC was declared.
    pub fn verify_crc32(&self) -> bool {
        self.expected_crc32
            .is_none_or(|expected| expected == self.crc32())
    }

    /// Check if this part came from a multi-part stream
    pub fn is_multipart(&self) -> bool {
        self.multipart
    }

    /// Take ownership of the decoded data
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    pub(crate) fn update(&mut self, decoded: &[u8]) {
        self.hasher.update(decoded);
        self.body.extend_from_slice(decoded);
    }

    /// Length and CRC checks run once the trailer has been read
    pub(crate) fn validate(&self) -> Result<()> {
        let actual = self.body.len() as u64;
        if actual != self.size {
            return Err(YencError::SizeMismatch {
                part: self.number,
                expected: self.size,
                actual,
            });
        }

        if let Some(expected) = self.expected_crc32 {
            let actual = self.crc32();
            if actual != expected {
                return Err(YencError::PartCrcMismatch {
                    part: self.number,
                    expected,
                    actual,
                });
            }
        }

        Ok(())
    }
}
