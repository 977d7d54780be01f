use log::debug;

use super::state::State;
use super::tokenizer::normalize;
use super::vocabulary::{Vocabulary, WordId};
use crate::error::{MarkovError, Result};

/// Reserved token used as the source of "sentence starts with" edges.
///
/// The character filter of the tokenizer drops `§`, so ingested text can
/// never produce this token.
pub const START_SENTINEL: &str = "\u{a7}";

/// Canonical terminator used to force-close unfinished sentences.
pub const FULL_STOP: &str = ".";

/// Tokens that end a sentence.
pub const TERMINATORS: [&str; 3] = [".", "!", "?"];

/// Characters that, on their own, can never open a sentence.
const PUNCTUATION: [char; 4] = ['.', '!', '?', ','];

/// Returns `true` if `token` ends a sentence.
pub fn is_terminator(token: &str) -> bool {
	TERMINATORS.contains(&token)
}

/// Bare punctuation such as `,`, `!` or `...`.
fn is_punctuation(token: &str) -> bool {
	!token.is_empty() && token.chars().all(|c| PUNCTUATION.contains(&c))
}

/// Where the ingestion state machine stands in the token stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
	StartOfSentence,
	MidSentence(WordId),
}

/// Summary counters of a chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainStats {
	/// Interned tokens, start sentinel included.
	pub words: usize,
	/// Tokens eligible to open a sentence.
	pub start_words: usize,
	/// Distinct `(source, destination)` pairs.
	pub edges: usize,
	/// Sum of every edge weight, saturating at `u64::MAX`.
	pub total_weight: u64,
}

/// The unlocked Markov chain: vocabulary, transition graph and start words.
///
/// # Responsibilities
/// - Intern tokens while keeping the graph in lockstep with the vocabulary
/// - Run the ingestion state machine over tokenized text
/// - Expose read access for generation and persistence
///
/// # Invariants
/// - `graph.len() == vocabulary.len()`
/// - Every destination id and every start word is `< vocabulary.len()`
/// - `start_words` holds no duplicate and never the start sentinel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordChain {
	vocabulary: Vocabulary,
	graph: Vec<State>,
	start_words: Vec<WordId>,
}

impl WordChain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Assembles a chain from already validated parts.
	pub(crate) fn from_parts(vocabulary: Vocabulary, graph: Vec<State>, start_words: Vec<WordId>) -> Self {
		debug_assert_eq!(vocabulary.len(), graph.len());
		Self { vocabulary, graph, start_words }
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	/// Outgoing edges of every word, indexed by id.
	pub fn graph(&self) -> &[State] {
		&self.graph
	}

	pub fn start_words(&self) -> &[WordId] {
		&self.start_words
	}

	/// Outgoing edges of `id`.
	pub fn state(&self, id: WordId) -> Option<&State> {
		self.graph.get(id as usize)
	}

	/// Text of `id`, or `CorruptData` if the id was never issued.
	pub(crate) fn text(&self, id: WordId) -> Result<&str> {
		self.vocabulary
			.text_of(id)
			.ok_or_else(|| MarkovError::corrupt(format!("word id {id} is out of range")))
	}

	/// Weight of the edge `from -> to`, looked up by text.
	///
	/// Returns 0 when either word or the edge is unknown.
	pub fn edge_weight(&self, from: &str, to: &str) -> u64 {
		match (self.vocabulary.id_of(from), self.vocabulary.id_of(to)) {
			(Some(from), Some(to)) => self.graph[from as usize].weight(to),
			_ => 0,
		}
	}

	/// Returns `true` if nothing has ever been ingested.
	pub fn is_empty(&self) -> bool {
		self.vocabulary.is_empty()
	}

	pub fn stats(&self) -> ChainStats {
		ChainStats {
			words: self.vocabulary.len(),
			start_words: self.start_words.len(),
			edges: self.graph.iter().map(State::len).sum(),
			total_weight: self.graph.iter().map(State::total).fold(0, u64::saturating_add),
		}
	}

	/// Returns the id of `text`, allocating it if needed.
	///
	/// A new id always comes with a fresh empty graph entry at the same index.
	pub fn intern(&mut self, text: &str) -> WordId {
		let (id, created) = self.vocabulary.insert(text);
		if created {
			self.graph.push(State::new());
		}
		id
	}

	/// Adds `weight` to the edge `from -> to`.
	///
	/// Fails with `CorruptData` if the outgoing weight of `from` would overflow.
	pub(crate) fn add_edge(&mut self, from: WordId, to: WordId, weight: u64) -> Result<()> {
		self.graph[from as usize].add_weight(to, weight)
	}

	/// Marks `id` as a legal sentence opener.
	pub(crate) fn add_start_word(&mut self, id: WordId) {
		if !self.start_words.contains(&id) {
			self.start_words.push(id);
		}
	}

	/// Tokenizes `raw` and feeds every token through the ingestion state machine.
	///
	/// - Bare punctuation at the start of a sentence is skipped
	/// - A sentence opener becomes a start word and gets an edge from the
	///   start sentinel
	/// - Every following token gets an edge from its predecessor; a
	///   terminator sends the machine back to the start of a sentence
	/// - A sentence still open at the end of the input is closed with `.`
	///
	/// # Errors
	/// `EmptyInput` if `raw` is empty. Unsupported characters are dropped
	/// silently by the tokenizer.
	pub fn add_text(&mut self, raw: &str) -> Result<()> {
		if raw.is_empty() {
			return Err(MarkovError::EmptyInput);
		}

		let tokens = normalize(raw);
		let mut position = Position::StartOfSentence;
		for token in &tokens {
			position = match position {
				Position::StartOfSentence => {
					if is_punctuation(token) {
						continue;
					}
					let id = self.intern(token);
					self.add_start_word(id);
					let sentinel = self.intern(START_SENTINEL);
					self.add_edge(sentinel, id, 1)?;
					Position::MidSentence(id)
				}
				Position::MidSentence(previous) => {
					let current = self.intern(token);
					self.add_edge(previous, current, 1)?;
					if is_terminator(token) {
						Position::StartOfSentence
					} else {
						Position::MidSentence(current)
					}
				}
			};
		}

		if let Position::MidSentence(previous) = position {
			let stop = self.intern(FULL_STOP);
			self.add_edge(previous, stop, 1)?;
		}

		debug!("ingested {} tokens, vocabulary now {} words", tokens.len(), self.vocabulary.len());
		Ok(())
	}
}
