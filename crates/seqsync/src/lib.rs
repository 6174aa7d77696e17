#![forbid(unsafe_code)]

//! `seqsync` keeps a structured sequence-diagram model and its PlantUML text in step.
//!
//! The parsing, generation and merge policy live in `seqsync-core` and are re-exported here;
//! this crate adds the [`sync`] layer that hosts wire their editors to.

pub use seqsync_core::*;

pub mod sync;
