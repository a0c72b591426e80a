#![doc = include_str!("../README.md")]

mod config;
mod error;
/// yEnc binary decoding for Usenet
pub mod yenc;

pub use config::DecoderConfig;
pub use error::{Result, Stage, YencError};
pub use yenc::{Decoder, Part, PartSpec, decode, decode_all, encode};
