//! Top-level module for the trigram generation system.
//!
//! This module provides a word-level trigram text generator, including:
//! - Whitespace/alphanumeric text normalization (`tokenizer`)
//! - The trained model with its frequency table (`TrigramModel`)
//! - Internal per-context transition tracking (`State`)

/// Text normalization into lowercase alphanumeric tokens.
///
/// Exposes the token type and the pure `tokenize` function.
pub mod tokenizer;

/// Third-order Markov model over tokens.
///
/// Handles training, frequency-table construction and probabilistic
/// sequence generation.
pub mod trigram_model;

/// Internal representation of a single context's transition table.
///
/// Tracks outgoing transitions and supports weighted random sampling.
/// This module is not exposed publicly.
mod state;
