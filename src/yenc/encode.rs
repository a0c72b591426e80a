use crc32fast::Hasher;

use crate::{Result, YencError};

/// Longest data line allowed by the yEnc draft
const MAX_LINE_LENGTH: usize = 997;

/// Multi-part information for [`encode`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartSpec {
    /// Part number, starting at 1
    pub number: u32,
    /// Total number of parts
    pub total: u32,
    /// First byte of this part in the whole file (1-based)
    pub begin: u64,
    /// Last byte of this part in the whole file
    pub end: u64,
    /// Size of the whole file
    pub file_size: u64,
    /// CRC32 of the whole file, written as `crc32=` (usually on the last part)
    pub file_crc32: Option<u32>,
}

/// Encode binary data to yEnc format
///
/// # Arguments
/// * `data` - Binary data to encode (the part data)
/// * `filename` - Original filename
/// * `line_length` - Maximum line length (typically 128, max 997)
/// * `part` - Multi-part information, `None` for a single-part post
///
/// # Returns
/// yEnc encoded data as bytes including =ybegin, data lines, and =yend
///
/// # Example
/// ```
/// let encoded = yenc_rs::encode(b"Hello", "test.bin", 128, None)?;
/// let part = yenc_rs::decode(encoded.as_slice())?;
/// assert_eq!(part.body, b"Hello");
/// # Ok::<(), yenc_rs::YencError>(())
/// ```
pub fn encode(
    data: &[u8],
    filename: &str,
    line_length: usize,
    part: Option<&PartSpec>,
) -> Result<Vec<u8>> {
    if line_length == 0 || line_length > MAX_LINE_LENGTH {
        return Err(YencError::InvalidLineLength(line_length));
    }

    let mut output = Vec::new();

    if let Some(part) = part {
        // For multi-part files, size in =ybegin header is the TOTAL file size
        output.extend_from_slice(
            format!(
                "=ybegin part={} total={} line={} size={} name={}\r\n",
                part.number, part.total, line_length, part.file_size, filename
            )
            .as_bytes(),
        );
        output.extend_from_slice(
            format!("=ypart begin={} end={}\r\n", part.begin, part.end).as_bytes(),
        );
    } else {
        output.extend_from_slice(
            format!(
                "=ybegin line={} size={} name={}\r\n",
                line_length,
                data.len(),
                filename
            )
            .as_bytes(),
        );
    }

    encode_data(data, line_length, &mut output);

    let mut hasher = Hasher::new();
    hasher.update(data);
    let crc32 = hasher.finalize();

    let trailer = match part {
        Some(PartSpec {
            number,
            file_crc32: Some(file_crc32),
            ..
        }) => format!(
            "=yend size={} part={} pcrc32={:08x} crc32={:08x}\r\n",
            data.len(),
            number,
            crc32,
            file_crc32
        ),
        Some(PartSpec { number, .. }) => format!(
            "=yend size={} part={} pcrc32={:08x}\r\n",
            data.len(),
            number,
            crc32
        ),
        None => format!("=yend size={} crc32={:08x}\r\n", data.len(), crc32),
    };
    output.extend_from_slice(trailer.as_bytes());

    Ok(output)
}

/// Encode binary data with escaping and CRLF line breaks
///
/// yEnc encoding: output = (input + 42) mod 256
/// Critical bytes that must be escaped:
/// - NUL (0x00)
/// - TAB (0x09) - at line start/end
/// - LF (0x0A)
/// - CR (0x0D)
/// - SPACE (0x20) - at line start/end
/// - '=' (0x3D)
///
/// Escape sequence: = followed by (byte + 64). An escape pair is never
/// split across two lines.
fn encode_data(data: &[u8], line_length: usize, output: &mut Vec<u8>) {
    let mut line = Vec::with_capacity(line_length + 1);

    for (i, &byte) in data.iter().enumerate() {
        let encoded = byte.wrapping_add(42);
        let is_last = i + 1 == data.len();

        let mut escape = needs_escape(encoded, line.len(), line_length, is_last);
        let width = if escape { 2 } else { 1 };
        if !line.is_empty() && line.len() + width > line_length {
            flush_line(&mut line, output);
            escape = needs_escape(encoded, 0, line_length, is_last);
        }

        if escape {
            line.push(b'=');
            line.push(encoded.wrapping_add(64));
        } else {
            line.push(encoded);
        }
    }

    if !line.is_empty() {
        flush_line(&mut line, output);
    }
}

/// TAB and SPACE are escaped wherever they could end up first or last on a
/// line. A raw one always leaves room for a two byte escape after it.
fn needs_escape(encoded: u8, column: usize, line_length: usize, is_last: bool) -> bool {
    is_critical_byte(encoded)
        || (is_whitespace(encoded) && (column == 0 || column + 2 >= line_length || is_last))
}

fn flush_line(line: &mut Vec<u8>, output: &mut Vec<u8>) {
    output.extend_from_slice(line);
    output.extend_from_slice(b"\r\n");
    line.clear();
}

/// Check if a byte is a critical byte that must always be escaped
fn is_critical_byte(byte: u8) -> bool {
    matches!(
        byte,
        0x00 |  // NUL
        0x0A |  // LF
        0x0D |  // CR
        0x3D // '='
    )
}

fn is_whitespace(byte: u8) -> bool {
    byte == b'\t' || byte == b' '
}
