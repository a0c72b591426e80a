//! Encode then decode

use yenc_rs::{PartSpec, decode, decode_all, encode};

use crate::{crc32, encode_line};

#[test]
fn test_all_byte_values() {
    let data: Vec<u8> = (0..=255).collect();

    let encoded = encode(&data, "allbytes.bin", 128, None).unwrap();
    let part = decode(encoded.as_slice()).unwrap();

    assert_eq!(part.body, data);
    assert_eq!(part.crc32(), crc32(&data));
}

#[test]
fn test_runs_of_critical_values() {
    // These encode to NUL, LF, CR, '=', TAB and SPACE
    let critical = [0xd6u8, 0xe0, 0xe3, 0x13, 0xdf, 0xf6];
    let data: Vec<u8> = critical
        .iter()
        .flat_map(|&b| std::iter::repeat_n(b, 300))
        .collect();

    for line_length in [1, 2, 7, 128, 997] {
        let encoded = encode(&data, "critical.bin", line_length, None).unwrap();
        let part = decode(encoded.as_slice()).unwrap();
        assert_eq!(part.body, data, "line length {}", line_length);
    }
}

#[test]
fn test_hand_encoded_lines() {
    // Escapes split over every possible line boundary decode the same
    let data: Vec<u8> = (0..=255).rev().collect();
    let encoded = encode_line(&data);

    for width in [1, 3, 16, 77] {
        let mut input = format!("=ybegin line={} size=256 name=x\n", width).into_bytes();
        for chunk in encoded.chunks(width) {
            input.extend_from_slice(chunk);
            input.push(b'\n');
        }
        input.extend_from_slice(format!("=yend size=256 crc32={:08x}\n", crc32(&data)).as_bytes());

        let part = decode(input.as_slice()).unwrap();
        assert_eq!(part.body, data, "width {}", width);
    }
}

#[test]
fn test_multipart_roundtrip() {
    let file: Vec<u8> = (0..=255).cycle().take(1000).collect();
    let file_crc32 = crc32(&file);

    let mut stream = Vec::new();
    for (i, chunk) in file.chunks(250).enumerate() {
        let begin = i as u64 * 250 + 1;
        let spec = PartSpec {
            number: i as u32 + 1,
            total: 4,
            begin,
            end: begin + chunk.len() as u64 - 1,
            file_size: file.len() as u64,
            file_crc32: (i == 3).then_some(file_crc32),
        };
        stream.extend(encode(chunk, "large.bin", 128, Some(&spec)).unwrap());
    }

    let parts = decode_all(stream.as_slice()).unwrap();
    assert_eq!(parts.len(), 4);

    // Place each part at its offset, as a downloader would
    let mut assembled = vec![0u8; file.len()];
    for part in &parts {
        let begin = (part.begin - 1) as usize;
        assembled[begin..part.end as usize].copy_from_slice(&part.body);
    }
    assert_eq!(assembled, file);
}
