use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::state::State;
use super::tokenizer::{Token, tokenize};

/// Sentinel marking the start of a sequence, injected before counting.
///
/// Tokenization strips angle brackets, so no cleaned token can ever
/// collide with a sentinel.
pub const START_TOKEN: &str = "<s>";

/// Sentinel marking the end of a sequence.
pub const END_TOKEN: &str = "</s>";

/// Default number of sampling steps for [`TrigramModel::generate`].
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// The two tokens immediately preceding a prediction point.
///
/// `Context` is the composite key into the frequency table: an ordered
/// pair of tokens with structural equality and hashing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Context(Token, Token);

impl Context {
	/// Creates a context from the two tokens preceding a prediction point.
	pub fn new(first: &str, second: &str) -> Self {
		Self(first.to_owned(), second.to_owned())
	}

	/// The initial generation context: two start-of-sequence sentinels.
	pub fn start() -> Self {
		Self::new(START_TOKEN, START_TOKEN)
	}

	/// Shifts the context forward by one position.
	///
	/// The previous second token becomes the first; `next` becomes the second.
	pub fn advance(&self, next: &str) -> Self {
		Self(self.1.clone(), next.to_owned())
	}
}

/// A third-order Markov model over whitespace/alphanumeric tokens.
///
/// The `TrigramModel` records, for every observed two-token context, how
/// often each token followed it, and generates new sequences by
/// repeatedly drawing from those conditional distributions.
///
/// # Responsibilities
/// - Build the frequency table and vocabulary from a single training text
/// - Sample token sequences from the learned distributions
///
/// # Invariants
/// - Every recorded transition count is strictly positive
/// - The frequency table only contains contexts observed during training
/// - `trained` is the single lifecycle flag: created untrained, trained as
///   a side effect of a successful `fit`, never destroyed
///
/// # Notes
/// - Not designed for concurrent mutation: `fit` from two threads, or
///   `fit` concurrently with `generate`, requires external
///   synchronization.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TrigramModel {
	/// Mapping from a two-token context to its observed next-token counts.
	transitions: FxHashMap<Context, State>,

	/// Unique tokens observed during the most recent training call,
	/// sentinels included when padding was applied. Rebuilt on every call.
	vocab: FxHashSet<Token>,

	/// Whether the model has been trained since creation.
	trained: bool,
}

impl TrigramModel {
	/// Creates a new, untrained model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether the model has been trained since creation.
	pub fn is_trained(&self) -> bool {
		self.trained
	}

	/// Unique tokens observed during the most recent training call.
	pub fn vocabulary(&self) -> &FxHashSet<Token> {
		&self.vocab
	}

	/// Recorded occurrence count of `next` after `context` (0 if unseen).
	pub fn transition_count(&self, context: &Context, next: &str) -> usize {
		self.transitions.get(context).map_or(0, |state| state.count(next))
	}

	/// Trains (or retrains) the model in place on a single text.
	///
	/// # Behavior
	/// - Empty or whitespace-only text: marks the model untrained and
	///   leaves the frequency table and vocabulary from any prior call
	///   untouched.
	/// - Fewer than 2 tokens: replaces the vocabulary with the observed
	///   tokens and marks the model trained. No trigram can exist with
	///   fewer than 2 tokens of context, so the frequency table is left
	///   as-is.
	/// - Otherwise: pads the sequence with two start sentinels and one end
	///   sentinel, replaces the vocabulary with the padded token set, and
	///   recounts every consecutive (w1, w2, w3) triple. The frequency
	///   table is rebuilt from scratch; previous counts do not accumulate
	///   across calls.
	///
	/// # Notes
	/// - Total: no input can make this fail, the model is always left in a
	///   defined state.
	pub fn fit(&mut self, text: &str) {
		if text.trim().is_empty() {
			self.trained = false;
			return;
		}

		let tokens = tokenize(text);

		// Too short to form any context, keep the vocabulary only
		if tokens.len() < 2 {
			self.vocab = tokens.into_iter().collect();
			self.trained = true;
			return;
		}

		// Padding for start + end of sequence
		let mut padded: Vec<Token> = Vec::with_capacity(tokens.len() + 3);
		padded.push(START_TOKEN.to_owned());
		padded.push(START_TOKEN.to_owned());
		padded.extend(tokens);
		padded.push(END_TOKEN.to_owned());

		self.vocab = padded.iter().cloned().collect();

		// Recount from scratch, one sliding window of width 3 at a time
		self.transitions.clear();
		for window in padded.windows(3) {
			let context = Context::new(&window[0], &window[1]);
			let state = self.transitions.entry(context).or_insert_with(State::new);
			state.add_transition(&window[2]);
		}

		self.trained = true;
	}

	/// Draws the next token for `context`.
	///
	/// An unknown context, or a context with no recorded transitions, is a
	/// normal termination signal and yields the end sentinel, not an error.
	fn sample<R: Rng + ?Sized>(&self, context: &Context, rng: &mut R) -> Token {
		self.transitions
			.get(context)
			.and_then(|state| state.predict(rng))
			.unwrap_or_else(|| END_TOKEN.to_owned())
	}

	/// Generates a sequence of up to `max_length` tokens, space-joined.
	///
	/// Draws from the thread-local generator; see
	/// [`TrigramModel::generate_with`] for a seeded, reproducible variant.
	pub fn generate(&self, max_length: usize) -> String {
		self.generate_with(&mut rand::rng(), max_length)
	}

	/// Generates a sequence of up to `max_length` tokens using `rng`.
	///
	/// # Behavior
	/// - Untrained model: returns the empty string.
	/// - Vocabulary of at most 3 members: returns the space-joined
	///   non-sentinel members, ignoring `max_length`. Trigram sampling is
	///   meaningless on such degenerate training data, so this guard stays
	///   outside the sampling loop.
	/// - Otherwise: starts from the (start, start) context and repeatedly
	///   draws the next token, advancing the context each step, until the
	///   end sentinel is drawn or `max_length` tokens were produced.
	///
	/// # Notes
	/// - With a seeded `rng` the output is fully reproducible: the
	///   frequency table iterates in a deterministic order and the draw
	///   itself is the only source of randomness.
	pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, max_length: usize) -> String {
		if !self.trained {
			return String::new();
		}

		// Degenerate training data, no sampling
		if self.vocab.len() <= 3 {
			let words: Vec<&str> = self
				.vocab
				.iter()
				.map(Token::as_str)
				.filter(|token| *token != START_TOKEN && *token != END_TOKEN)
				.collect();
			return words.join(" ");
		}

		let mut context = Context::start();
		let mut generated: Vec<Token> = Vec::new();

		for _ in 0..max_length {
			let next = self.sample(&context, rng);
			if next == END_TOKEN {
				break;
			}
			context = context.advance(&next);
			generated.push(next);
		}

		generated.join(" ")
	}
}
