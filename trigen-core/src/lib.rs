//! Trigram-based text generation library.
//!
//! This crate provides a minimal statistical language model including:
//! - Whitespace/alphanumeric tokenization
//! - Word-level trigram frequency accumulation
//! - Probabilistic generation with weighted sampling
//! - A stand-alone scaled dot-product attention utility
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core trigram model and generation logic.
///
/// This module exposes the high-level model interface while keeping
/// internal state representations private.
pub mod model;

/// Scaled dot-product attention over small fixed matrices.
///
/// A pure numeric utility, consumed independently of the trigram model.
pub mod attention;
