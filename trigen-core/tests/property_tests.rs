//! Property-based tests for tokenization and generation.
//!
//! These tests verify invariants that must hold for arbitrary input text,
//! not just hand-picked examples.

use proptest::prelude::*;

use trigen_core::model::tokenizer::tokenize;
use trigen_core::model::trigram_model::TrigramModel;

proptest! {
	#[test]
	fn tokens_are_lowercase_alphanumeric(text in ".*") {
		for token in tokenize(&text) {
			prop_assert!(!token.is_empty());
			prop_assert!(
				token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
				"token {:?} contains a character outside [a-z0-9]",
				token
			);
		}
	}

	#[test]
	fn retokenizing_joined_output_is_identity(text in ".*") {
		let tokens = tokenize(&text);
		let joined = tokens.join(" ");
		prop_assert_eq!(tokenize(&joined), tokens);
	}

	#[test]
	fn fit_then_generate_never_panics(text in ".*", max_length in 0usize..32) {
		let mut model = TrigramModel::new();
		model.fit(&text);
		let out = model.generate(max_length);

		// Outside the degenerate-vocabulary short-circuit, max_length
		// bounds the number of generated tokens
		if model.vocabulary().len() > 3 {
			prop_assert!(out.split_whitespace().count() <= max_length);
		}
	}
}
