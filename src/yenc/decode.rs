use std::io::{BufRead, BufReader, ErrorKind, Read};

use crc32fast::Hasher;
use tracing::{debug, trace, warn};

use crate::error::Stage;
use crate::{DecoderConfig, Result, YencError};

use super::params::{YBEGIN, YEND, YPART, parse_ybegin, parse_yend, parse_ypart};
use super::types::Part;

/// Initial capacity for a line buffer (yEnc lines are typically 128 bytes)
const LINE_CAPACITY: usize = 256;

/// Decode the first yEnc part from a byte stream
///
/// Every part in the stream is decoded and validated; the first one is
/// returned. Input without any `=ybegin` line is an error.
///
/// # Example
/// ```
/// let input: &[u8] = b"=ybegin line=128 size=4 name=test.txt\r\n\
///                      ~\x8f\x9d\x9e\r\n\
///                      =yend size=4 crc32=784dd132\r\n";
/// let part = yenc_rs::decode(input)?;
/// assert_eq!(part.body, b"Test");
/// assert_eq!(part.name, "test.txt");
/// # Ok::<(), yenc_rs::YencError>(())
/// ```
pub fn decode<R: Read>(input: R) -> Result<Part> {
    Decoder::new(BufReader::new(input)).decode()
}

/// Decode every yEnc part from a byte stream, in stream order
pub fn decode_all<R: Read>(input: R) -> Result<Vec<Part>> {
    Decoder::new(BufReader::new(input)).decode_all()
}

/// yEnc decoding session over one input stream
///
/// Reads `=ybegin` / `=ypart` / body / `=yend` blocks until the input is
/// exhausted, validating each part as it is finished and the `crc32` over
/// all parts at the end.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    config: DecoderConfig,
    /// Set once any header carried `part=`
    multipart: bool,
    /// Last `total=` seen
    total: Option<u32>,
    parts: Vec<Part>,
    /// `crc32=` from the most recent trailer that had one
    crc32: Option<u32>,
    hasher: Hasher,
    /// Previous byte was `=`; survives line breaks within a part
    escaped: bool,
    line: Vec<u8>,
}

impl<R: BufRead> Decoder<R> {
    /// Create a decoder with the default (lenient) configuration
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    /// Create a decoder with an explicit configuration
    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            reader,
            config,
            multipart: false,
            total: None,
            parts: Vec::new(),
            crc32: None,
            hasher: Hasher::new(),
            escaped: false,
            line: Vec::with_capacity(LINE_CAPACITY),
        }
    }

    /// Decode the stream and return the first part
    pub fn decode(self) -> Result<Part> {
        let mut parts = self.decode_all()?;
        // decode_all never returns an empty list
        Ok(parts.swap_remove(0))
    }

    /// Decode the stream and return all parts in the order they appeared
    pub fn decode_all(mut self) -> Result<Vec<Part>> {
        self.run()?;

        let Some(last) = self.parts.last() else {
            return Err(YencError::NoParts);
        };

        // Only check the file CRC when the stream looks complete. This
        // compares the part count to the last part number, not to total=,
        // so sparse or reordered sets can slip through unchecked.
        if !self.multipart || self.parts.len() == last.number as usize {
            self.validate()?;
        } else {
            debug!(
                "Skipping yEnc crc32 check: {} parts decoded, last part is {}",
                self.parts.len(),
                last.number
            );
        }

        Ok(self.parts)
    }

    fn run(&mut self) -> Result<()> {
        while let Some(mut part) = self.read_header()? {
            if self.multipart {
                self.read_part_header(&mut part)?;
            }
            self.read_body(&mut part)?;

            debug!(
                "Decoded yEnc part {} of {:?}: {} bytes",
                part.number,
                part.name,
                part.body.len()
            );
            part.validate()?;
            self.parts.push(part);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(expected) = self.crc32 {
            let actual = self.hasher.clone().finalize();
            if actual != expected {
                return Err(YencError::CrcMismatch { expected, actual });
            }
        }
        Ok(())
    }

    /// Read the next line into `self.line` without its line terminators
    ///
    /// Returns `false` at end of input. A last line without `\n` is still
    /// returned.
    fn next_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = loop {
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if n == 0 {
            return Ok(false);
        }
        while let Some(b'\r' | b'\n') = self.line.last() {
            self.line.pop();
        }
        Ok(true)
    }

    /// Skip to the next `=ybegin` line and start a new part from it
    ///
    /// End of input here means there are no more parts. So does a read
    /// error, since no part is in progress yet.
    fn read_header(&mut self) -> Result<Option<Part>> {
        loop {
            match self.next_line() {
                Ok(true) => {}
                Ok(false) => return Ok(None),
                Err(e) => {
                    warn!("Stopping yEnc header search on read error: {}", e);
                    return Ok(None);
                }
            }
            if self.line.starts_with(YBEGIN) {
                break;
            }
            trace!("Skipping {} byte line before =ybegin", self.line.len());
        }

        let rest = String::from_utf8_lossy(&self.line[YBEGIN.len()..]);
        let header = parse_ybegin(&rest, &self.config)?;

        if header.part.is_some() {
            self.multipart = true;
        }
        if header.total.is_some() {
            self.total = header.total;
        }

        debug!(
            "Found =ybegin part={:?} size={} name={:?}",
            header.part, header.size, header.name
        );

        Ok(Some(Part {
            number: header.part.unwrap_or_default(),
            name: header.name,
            header_size: header.size,
            line_length: header.line,
            total: self.total,
            multipart: self.multipart,
            ..Default::default()
        }))
    }

    fn read_part_header(&mut self, part: &mut Part) -> Result<()> {
        loop {
            if !self.next_line()? {
                return Err(YencError::UnexpectedEof {
                    stage: Stage::PartHeader,
                });
            }
            if self.line.starts_with(YPART) {
                break;
            }
        }

        let rest = String::from_utf8_lossy(&self.line[YPART.len()..]);
        let range = parse_ypart(&rest, &self.config)?;
        part.begin = range.begin;
        part.end = range.end;
        Ok(())
    }

    /// Decode data lines into `part` until `=yend`, then apply the trailer
    fn read_body(&mut self, part: &mut Part) -> Result<()> {
        self.escaped = false;
        let mut decoded = Vec::with_capacity(LINE_CAPACITY);

        loop {
            if !self.next_line()? {
                return Err(YencError::UnexpectedEof { stage: Stage::Body });
            }
            if self.line.starts_with(YEND) {
                break;
            }

            decoded.clear();
            decode_line(&self.line, &mut self.escaped, &mut decoded);
            trace!("Decoded {} -> {} bytes", self.line.len(), decoded.len());

            self.hasher.update(&decoded);
            part.update(&decoded);
        }

        let rest = String::from_utf8_lossy(&self.line[YEND.len()..]);
        let trailer = parse_yend(&rest, &self.config)?;

        part.size = trailer.size;
        if trailer.pcrc32.is_some() {
            part.expected_crc32 = trailer.pcrc32;
        }
        if trailer.crc32.is_some() {
            self.crc32 = trailer.crc32;
        }
        if let Some(got) = trailer.part
            && got != part.number
        {
            return Err(YencError::PartOutOfOrder {
                expected: part.number,
                got,
            });
        }

        Ok(())
    }
}

/// Decode one yEnc data line (without its line terminator)
///
/// yEnc decoding: output = (input - 42) mod 256
///
/// Escape sequences: =X means (X - 42 - 64) mod 256. `escaped` carries a
/// trailing `=` over to the next line.
pub(crate) fn decode_line(line: &[u8], escaped: &mut bool, output: &mut Vec<u8>) {
    output.reserve(line.len());

    for &byte in line {
        if *escaped {
            output.push(byte.wrapping_sub(42).wrapping_sub(64));
            *escaped = false;
        } else if byte == b'=' {
            *escaped = true;
        } else {
            output.push(byte.wrapping_sub(42));
        }
    }
}
