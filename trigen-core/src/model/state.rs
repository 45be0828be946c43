use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::tokenizer::Token;

/// Represents one state of the trigram chain.
///
/// A `State` corresponds to a fixed two-token context and stores all
/// observed transitions from this context to the next token.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Predict the next token using weighted random sampling
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct State {
	/// Outgoing transitions indexed by the next token.
	/// The value represents how many times this transition was observed.
	/// Example: { "dog" => 42, "cat" => 3 }
	transitions: FxHashMap<Token, usize>,
}

impl State {
	/// Creates a new empty state.
	pub fn new() -> Self {
		Self { transitions: FxHashMap::default() }
	}

	/// Records an occurrence of a transition toward `next_token`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next_token: &str) {
		*self.transitions.entry(next_token.to_owned()).or_insert(0) += 1;
	}

	/// Returns the recorded occurrence count for `next_token` (0 if unseen).
	pub fn count(&self, next_token: &str) -> usize {
		self.transitions.get(next_token).copied().unwrap_or(0)
	}

	/// Returns the total number of recorded occurrences.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count; tokens never observed after this context have
	/// probability exactly 0.
	///
	/// This method performs:
	/// - an O(n) scan over the transitions
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Token> {
		if self.transitions.is_empty() {
			return None;
		}

		// Compute the total number of occurrences
		let total = self.total();
		if total == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		// Randomly select a token
		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&Token> = None;
		for (next_token, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_token.clone());
			}
			r -= *occurrence;
			fallback = Some(next_token);
		}

		// Fallback: should not happen, but kept for safety.
		fallback.cloned()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn empty_state_predicts_nothing() {
		let state = State::new();
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(state.predict(&mut rng), None);
	}

	#[test]
	fn counts_accumulate_per_transition() {
		let mut state = State::new();
		state.add_transition("dog");
		state.add_transition("dog");
		state.add_transition("cat");
		assert_eq!(state.count("dog"), 2);
		assert_eq!(state.count("cat"), 1);
		assert_eq!(state.count("bird"), 0);
		assert_eq!(state.total(), 3);
	}

	#[test]
	fn single_transition_is_always_predicted() {
		let mut state = State::new();
		state.add_transition("dog");
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..100 {
			assert_eq!(state.predict(&mut rng).as_deref(), Some("dog"));
		}
	}

	#[test]
	fn draw_frequencies_follow_recorded_counts() {
		// {a: 3, b: 1} sampled 10 000 times should converge to 0.75 / 0.25
		let mut state = State::new();
		for _ in 0..3 {
			state.add_transition("a");
		}
		state.add_transition("b");

		let mut rng = StdRng::seed_from_u64(42);
		let draws = 10_000;
		let mut a_count = 0usize;
		for _ in 0..draws {
			match state.predict(&mut rng).as_deref() {
				Some("a") => a_count += 1,
				Some("b") => {}
				other => panic!("unexpected draw: {:?}", other),
			}
		}

		let a_ratio = a_count as f64 / draws as f64;
		assert!((a_ratio - 0.75).abs() < 0.05, "a drawn with ratio {}", a_ratio);
	}
}
