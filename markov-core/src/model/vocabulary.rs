use std::collections::HashMap;

/// Dense identifier of an interned token.
pub type WordId = u32;

/// Append-only bidirectional table between token text and `WordId`.
///
/// # Invariants
/// - Ids are contiguous from `0` to `len - 1`
/// - `text_of(id_of(t)) == t` for every interned token
/// - An id is never reassigned once issued
///
/// Growing the vocabulary alone would break the lockstep with the transition
/// graph, so new words only enter through `WordChain::intern`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
	words: Vec<String>,
	ids: HashMap<String, WordId>,
}

impl Vocabulary {
	/// Creates an empty vocabulary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of interned tokens.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Returns the text of `id`, or `None` if the id was never issued.
	pub fn text_of(&self, id: WordId) -> Option<&str> {
		self.words.get(id as usize).map(String::as_str)
	}

	/// Returns the id of `text`, or `None` if it is not interned.
	pub fn id_of(&self, text: &str) -> Option<WordId> {
		self.ids.get(text).copied()
	}

	/// Iterates over `(id, text)` pairs in id order.
	pub fn iter(&self) -> impl Iterator<Item = (WordId, &str)> {
		self.words.iter().enumerate().map(|(id, word)| (id as WordId, word.as_str()))
	}

	/// Appends `text` under the next free id, or returns its existing id.
	///
	/// The boolean is `true` when a new id was allocated.
	pub(crate) fn insert(&mut self, text: &str) -> (WordId, bool) {
		if let Some(&id) = self.ids.get(text) {
			return (id, false);
		}
		let id = self.words.len() as WordId;
		self.words.push(text.to_owned());
		self.ids.insert(text.to_owned(), id);
		(id, true)
	}

	/// Builds a vocabulary from an id-ordered word list.
	///
	/// Returns `None` if the list contains a duplicate.
	pub(crate) fn from_words(words: Vec<String>) -> Option<Self> {
		let mut ids = HashMap::with_capacity(words.len());
		for (id, word) in words.iter().enumerate() {
			if ids.insert(word.clone(), id as WordId).is_some() {
				return None;
			}
		}
		Some(Self { words, ids })
	}

	/// Word → id table, as persisted under `WordMap`.
	pub(crate) fn ids(&self) -> &HashMap<String, WordId> {
		&self.ids
	}

	/// Id-ordered word list, as persisted under `WordVals`.
	pub(crate) fn words(&self) -> &[String] {
		&self.words
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_issues_dense_stable_ids() {
		let mut vocabulary = Vocabulary::new();
		assert_eq!(vocabulary.insert("hello"), (0, true));
		assert_eq!(vocabulary.insert("world"), (1, true));
		assert_eq!(vocabulary.insert("hello"), (0, false));
		assert_eq!(vocabulary.len(), 2);
		assert_eq!(vocabulary.text_of(1), Some("world"));
		assert_eq!(vocabulary.id_of("hello"), Some(0));
		assert_eq!(vocabulary.id_of("missing"), None);
		assert_eq!(vocabulary.text_of(2), None);
	}

	#[test]
	fn from_words_rejects_duplicates() {
		assert!(Vocabulary::from_words(vec!["a".into(), "a".into()]).is_none());
		let vocabulary = Vocabulary::from_words(vec!["a".into(), "b".into()]).unwrap();
		assert_eq!(vocabulary.id_of("b"), Some(1));
		assert_eq!(vocabulary.iter().collect::<Vec<_>>(), vec![(0, "a"), (1, "b")]);
	}
}
