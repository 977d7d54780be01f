//! Word-level Markov chain text model.
//!
//! This crate provides a compressed Markov chain over interned word tokens:
//! - Tokenization of raw chat text into words and isolated punctuation
//! - Incremental ingestion into a weighted transition graph
//! - Weighted random walks that synthesize new sentences
//! - JSON persistence and migration from the legacy uncompressed format
//!
//! The entry point is [`model::markov_model::MarkovModel`], a lock-guarded
//! handle that can be shared between threads.

/// Tokenizer, vocabulary, transition graph, generator and persistence.
pub mod model;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// I/O utilities (text loading, save path resolution, directory listing).
pub mod io;

pub use error::{MarkovError, Result};
pub use model::markov_model::MarkovModel;
