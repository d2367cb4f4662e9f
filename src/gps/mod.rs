// src/gps/mod.rs
//! GPS sentence handling: tokenizing, decoding and the latest-values store

pub mod data;
pub mod nmea;
pub mod source;
pub mod tokenizer;

pub use data::{Coordinate, FixRecord, LatestValues};
pub use nmea::{decode_sentence, Sentence};
pub use source::{ChannelLines, LineSource};
pub use tokenizer::TokenSequence;
