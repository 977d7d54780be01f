//! Top-level module for the word chain model.
//!
//! This module provides:
//! - Raw text normalization (`tokenizer`)
//! - Interned word tables (`Vocabulary`)
//! - Per-word outgoing edges (`State`)
//! - The unlocked chain and its ingestion state machine (`WordChain`)
//! - Weighted random walks (`Generator`)
//! - The lock-guarded, shareable model (`MarkovModel`)
//! - JSON persistence and legacy migration

/// Lock-guarded model handed to collaborators.
///
/// Exposes ingestion, generation, save and load with the
/// readers-writer discipline applied.
pub mod markov_model;

/// Unlocked chain: vocabulary, transition graph and start words.
///
/// Handles token interning and the ingestion state machine.
pub mod word_chain;

/// Weighted random walk producing sentences from a `WordChain`.
pub mod generator;

/// Raw text to token pipeline.
pub mod tokenizer;

/// Bidirectional token text ↔ id table.
pub mod vocabulary;

/// Outgoing edges of a single word.
///
/// Tracks transition weights and supports weighted random sampling.
pub mod state;

/// JSON record of a chain, with validation on load.
pub mod persistence;

/// Conversion from the legacy uncompressed format.
pub mod legacy;
