//! Keyword tagging through a vision API.
//!
//! - **parse**: Turn a free-text answer into a normalized keyword list
//! - **tagger**: Cache-first tagging of single photos and batches

pub mod parse;
pub mod tagger;

pub use parse::parse_tags;
pub use tagger::{TagOptions, Tagger};
