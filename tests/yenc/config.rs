//! Lenient and strict field parsing

use yenc_rs::{Decoder, DecoderConfig, YencError};

use crate::init_tracing;

const MALFORMED_LINE: &[u8] = b"=ybegin line=wide size=1 name=a\nk\n=yend size=1\n";
const MALFORMED_PART: &[u8] = b"=ybegin part=first line=128 size=1 name=a\n\
                                =ypart begin=1 end=1\n\
                                k\n\
                                =yend size=1\n";
const MALFORMED_CRC: &[u8] = b"=ybegin line=128 size=1 name=a\nk\n=yend size=1 crc32=nothex\n";

#[test]
fn test_lenient_defaults_to_zero() {
    init_tracing();
    let part = Decoder::new(MALFORMED_LINE).decode().unwrap();
    assert_eq!(part.line_length(), 0);
    assert_eq!(part.body, b"A");
}

#[test]
fn test_lenient_malformed_part_number() {
    // part=first still marks the stream multi-part, with number 0
    let part = Decoder::new(MALFORMED_PART).decode().unwrap();
    assert!(part.is_multipart());
    assert_eq!(part.number, 0);
    assert_eq!((part.begin, part.end), (1, 1));
}

#[test]
fn test_lenient_bad_crc_skips_check() {
    let part = Decoder::new(MALFORMED_CRC).decode().unwrap();
    assert_eq!(part.body, b"A");
}

#[test]
fn test_strict_rejects_malformed_fields() {
    for (input, key) in [
        (MALFORMED_LINE, "line"),
        (MALFORMED_PART, "part"),
        (MALFORMED_CRC, "crc32"),
    ] {
        match Decoder::with_config(input, DecoderConfig::strict()).decode() {
            Err(YencError::InvalidField { key: got, .. }) => assert_eq!(got, key),
            other => panic!("expected invalid {}, got {:?}", key, other),
        }
    }
}

#[test]
fn test_strict_accepts_valid_input() {
    let input: &[u8] = b"=ybegin part=1 total=1 line=128 size=1 name=a\n\
                         =ypart begin=1 end=1\n\
                         k\n\
                         =yend size=1 part=1 pcrc32=d3d99e8b crc32=d3d99e8b\n";
    let part = Decoder::with_config(input, DecoderConfig::strict())
        .decode()
        .unwrap();
    assert_eq!(part.body, b"A");
}

#[cfg(feature = "serde")]
#[test]
fn test_config_serde() {
    let config: DecoderConfig = serde_json::from_str(r#"{"strict_fields": true}"#).unwrap();
    assert_eq!(config, DecoderConfig::strict());

    // Missing fields fall back to defaults
    let config: DecoderConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, DecoderConfig::default());

    let json = serde_json::to_string(&DecoderConfig::strict()).unwrap();
    assert_eq!(json, r#"{"strict_fields":true}"#);
}
