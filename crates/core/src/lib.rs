//! Corpus preparation for TTS training: alignment export lines in,
//! frame-aligned training records out.

pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod types;

pub use config::PrepConfig;
pub use error::PrepError;
