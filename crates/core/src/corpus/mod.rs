//! Alignment correction and frame-mapping pipeline.
//!
//! Stages run strictly forward over an ordered utterance list:
//! [`parse`] → [`boundary`] → [`merge`] → [`context`] → [`split`], driven by
//! [`pipeline::prepare`].

pub mod boundary;
pub mod context;
pub mod frames;
pub mod merge;
pub mod parse;
pub mod pipeline;
pub mod split;
pub mod words;
