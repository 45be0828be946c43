/// Smallest unit of text after normalization: either a cleaned
/// word/number or a boundary sentinel injected by the model.
pub type Token = String;

/// Normalizes raw text into a sequence of lowercase alphanumeric tokens.
///
/// # Behavior
/// - Lowercases the input.
/// - Removes every character that is not a lowercase ASCII letter,
///   a digit, or whitespace.
/// - Splits on runs of whitespace, discarding empty fragments.
///
/// # Notes
/// - Pure and total: empty or whitespace-only input produces an empty
///   sequence, nothing is ever raised.
/// - Characters are removed, not replaced: "don't" becomes "dont".
pub fn tokenize(text: &str) -> Vec<Token> {
	let cleaned: String = text
		.to_lowercase()
		.chars()
		.filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
		.collect();

	cleaned.split_whitespace().map(str::to_owned).collect()
}
