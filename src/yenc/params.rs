use std::str::FromStr;

use tracing::warn;

use crate::{DecoderConfig, Result, YencError};

pub(crate) const YBEGIN: &[u8] = b"=ybegin";
pub(crate) const YPART: &[u8] = b"=ypart";
pub(crate) const YEND: &[u8] = b"=yend";

/// Values from a =ybegin line
///
/// Format: =ybegin [part=1 total=5] line=128 size=123456 name=file.bin
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BeginLine {
    pub size: u64,
    pub line: usize,
    /// `Some` whenever `part=` was present, even if its value was garbage
    pub part: Option<u32>,
    pub total: Option<u32>,
    pub name: String,
}

/// Values from a =ypart line
///
/// Format: =ypart begin=1 end=384000
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PartLine {
    pub begin: u64,
    pub end: u64,
}

/// Values from a =yend line
///
/// Format: =yend size=384000 [part=1] [pcrc32=abcd1234] [crc32=12345678]
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EndLine {
    pub size: u64,
    pub part: Option<u32>,
    pub pcrc32: Option<u32>,
    pub crc32: Option<u32>,
}

/// Parse the text after `=ybegin`
///
/// `name=` must be the last keyword; everything after it is the filename.
pub(crate) fn parse_ybegin(rest: &str, config: &DecoderConfig) -> Result<BeginLine> {
    let mut header = BeginLine::default();

    let (params, name) = match rest.split_once("name=") {
        Some((params, name)) => (params, Some(name)),
        None => (rest, None),
    };
    if let Some(name) = name {
        header.name = name.trim().to_string();
    }

    for (key, value) in yenc_params(params) {
        match key {
            "size" => header.size = number(key, value, config)?,
            "line" => header.line = number(key, value, config)?,
            "part" => header.part = Some(number(key, value, config)?),
            "total" => header.total = Some(number(key, value, config)?),
            _ => {}
        }
    }

    Ok(header)
}

/// Parse the text after `=ypart`
pub(crate) fn parse_ypart(rest: &str, config: &DecoderConfig) -> Result<PartLine> {
    let mut part = PartLine::default();

    for (key, value) in yenc_params(rest) {
        match key {
            "begin" => part.begin = number(key, value, config)?,
            "end" => part.end = number(key, value, config)?,
            _ => {}
        }
    }

    Ok(part)
}

/// Parse the text after `=yend`
///
/// Unparsable CRC values are left unset, which skips that check.
pub(crate) fn parse_yend(rest: &str, config: &DecoderConfig) -> Result<EndLine> {
    let mut end = EndLine::default();

    for (key, value) in yenc_params(rest) {
        match key {
            "size" => end.size = number(key, value, config)?,
            "part" => end.part = Some(number(key, value, config)?),
            "pcrc32" => end.pcrc32 = crc(key, value, config)?,
            "crc32" => end.crc32 = crc(key, value, config)?,
            _ => {}
        }
    }

    Ok(end)
}

/// Split space separated key=value tokens
///
/// Tokens without '=' are skipped. For `a=b=c` the value is `b`.
fn yenc_params(params: &str) -> impl Iterator<Item = (&str, &str)> {
    params.split(' ').filter_map(|token| {
        let mut kv = token.trim().split('=');
        match (kv.next(), kv.next()) {
            (Some(key), Some(value)) => Some((key, value)),
            _ => None,
        }
    })
}

fn number<T>(key: &str, value: &str, config: &DecoderConfig) -> Result<T>
where
    T: FromStr + Default,
{
    match value.parse() {
        Ok(n) => Ok(n),
        Err(_) if config.strict_fields => Err(invalid(key, value)),
        Err(_) => {
            warn!("yEnc field {}={:?} is not a number, using 0", key, value);
            Ok(T::default())
        }
    }
}

fn crc(key: &str, value: &str, config: &DecoderConfig) -> Result<Option<u32>> {
    // Up to 64 bits of hex are accepted and truncated to the low 32
    match u64::from_str_radix(value, 16) {
        Ok(n) => Ok(Some(n as u32)),
        Err(_) if config.strict_fields => Err(invalid(key, value)),
        Err(_) => {
            warn!("yEnc field {}={:?} is not hex, skipping check", key, value);
            Ok(None)
        }
    }
}

fn invalid(key: &str, value: &str) -> YencError {
    YencError::InvalidField {
        key: key.to_string(),
        value: value.to_string(),
    }
}
