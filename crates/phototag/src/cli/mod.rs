//! Command implementations.

pub mod cache;
pub mod config;
pub mod inspect;
pub mod tag;
pub mod types;
