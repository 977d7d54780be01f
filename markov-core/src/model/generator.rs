use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::word_chain::{WordChain, is_terminator};
use crate::error::{MarkovError, Result};

/// Weighted random walk over a `WordChain`.
///
/// # Responsibilities
/// - Pick an opener uniformly among the start words
/// - Follow outgoing edges proportionally to their weights
/// - Reassemble the visited tokens into text
///
/// The generator only borrows the chain; it never mutates it.
pub struct Generator<'a> {
	chain: &'a WordChain,
}

impl<'a> Generator<'a> {
	pub fn new(chain: &'a WordChain) -> Self {
		Self { chain }
	}

	/// Generates one sentence of at most `limit` tokens after the opener.
	///
	/// # Behavior
	/// - Starts from a uniformly chosen start word
	/// - Stops early on a word without outgoing edges
	/// - After a terminator, the next token is glued on without a space and
	///   the walk stops
	/// - Reaching `limit` returns the truncated text as-is
	///
	/// # Errors
	/// `EmptyModel` if no sentence has been ingested yet.
	pub fn sentence<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Result<String> {
		let Some(&start) = self.chain.start_words().choose(rng) else {
			return Err(MarkovError::EmptyModel);
		};

		let mut current = start;
		let mut current_text = self.chain.text(current)?;
		let mut output = current_text.to_owned();

		for _ in 0..limit {
			let next = match self.chain.state(current).and_then(|state| state.predict(rng)) {
				Some(next) => next,
				// Dead end
				None => break,
			};
			let next_text = self.chain.text(next)?;

			if is_terminator(current_text) {
				output.push_str(next_text);
				break;
			}
			output.push(' ');
			output.push_str(next_text);
			current = next;
			current_text = next_text;
		}

		debug!("generated {} chars from start word {start}", output.len());
		Ok(output)
	}
}
