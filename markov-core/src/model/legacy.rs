use std::collections::HashMap;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::persistence::{encode, nullable, read_json, write_record};
use super::word_chain::{FULL_STOP, WordChain};
use crate::error::Result;

/// Destination key marking the end of a sentence in the legacy format.
pub const LEGACY_END: &str = "\\end";

/// The legacy uncompressed chain: word text mapped to `{next word: count}`.
///
/// ```json
/// { "Startwords": ["Hello"], "Wordmaps": { "Hello": { "world": 1 }, "world": { "\\end": 1 } } }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LegacyChain {
	#[serde(rename = "Startwords", default, deserialize_with = "nullable")]
	pub start_words: Vec<String>,
	#[serde(rename = "Wordmaps", default, deserialize_with = "nullable")]
	pub word_maps: HashMap<String, HashMap<String, u64>>,
}

impl LegacyChain {
	/// Reads a legacy record from disk.
	pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
		read_json(path)
	}

	/// Converts the legacy chain into the compressed form.
	///
	/// # Behavior
	/// - Every source word gets an id, in sorted order so the output is reproducible
	/// - `.` is interned as the terminator and replaces every `\end` destination
	/// - Destinations and start words that are not source words are interned too
	/// - Weights landing on the same destination are summed, zero counts dropped
	///
	/// The total outgoing weight of every source word is conserved.
	///
	/// # Errors
	/// `CorruptData` if the outgoing weight of a word does not fit in a `u64`.
	pub fn into_chain(self) -> Result<WordChain> {
		let mut chain = WordChain::new();

		let mut sources: Vec<(String, HashMap<String, u64>)> = self.word_maps.into_iter().collect();
		sources.sort_by(|a, b| a.0.cmp(&b.0));
		for (word, _) in &sources {
			chain.intern(word);
		}
		let stop = chain.intern(FULL_STOP);

		for (word, next_words) in sources {
			let from = chain.intern(&word);
			let mut next_words: Vec<(String, u64)> = next_words.into_iter().collect();
			next_words.sort();
			for (next, count) in next_words {
				if count == 0 {
					continue;
				}
				let to = if next == LEGACY_END { stop } else { chain.intern(&next) };
				chain.add_edge(from, to, count)?;
			}
		}

		for word in &self.start_words {
			let id = chain.intern(word);
			chain.add_start_word(id);
		}

		Ok(chain)
	}
}

/// Migrates the legacy record at `input` into a compressed record at `output`.
///
/// Returns the migrated chain.
pub fn migrate_file<PI: AsRef<Path>, PO: AsRef<Path>>(input: PI, output: PO) -> Result<WordChain> {
	let chain = LegacyChain::load_from(&input)?.into_chain()?;
	let written = write_record(output, &encode(&chain)?)?;
	info!(
		"migrated {} into {} ({} words)",
		input.as_ref().display(),
		written.display(),
		chain.vocabulary().len()
	);
	Ok(chain)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn legacy(json: &str) -> LegacyChain {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn end_marker_becomes_full_stop() {
		let chain = legacy(r#"{"Startwords":["Hello"],"Wordmaps":{"Hello":{"world":2},"world":{"\\end":2}}}"#)
			.into_chain()
			.unwrap();
		assert_eq!(chain.edge_weight("Hello", "world"), 2);
		assert_eq!(chain.edge_weight("world", "."), 2);
		assert_eq!(chain.vocabulary().id_of(LEGACY_END), None);

		let hello = chain.vocabulary().id_of("Hello").unwrap();
		assert_eq!(chain.start_words(), &[hello]);
	}

	#[test]
	fn ids_follow_sorted_source_words() {
		let chain = legacy(r#"{"Startwords":[],"Wordmaps":{"b":{},"a":{},"c":{}}}"#).into_chain().unwrap();
		let words: Vec<&str> = chain.vocabulary().iter().map(|(_, w)| w).collect();
		assert_eq!(words, vec!["a", "b", "c", "."]);
	}

	#[test]
	fn outgoing_weight_is_conserved() {
		let old = legacy(
			r#"{"Startwords":["x","ghost"],"Wordmaps":{
				"x":{"y":3,"\\end":4,"z":0},
				"y":{"x":1,".":2,"\\end":5},
				".":{"x":1}
			}}"#,
		);
		let expected: HashMap<String, u64> = old
			.word_maps
			.iter()
			.map(|(word, next)| (word.clone(), next.values().sum()))
			.collect();

		let chain = old.into_chain().unwrap();
		for (word, total) in expected {
			let id = chain.vocabulary().id_of(&word).unwrap();
			assert_eq!(chain.state(id).unwrap().total(), total, "weight of {word:?}");
		}
		// `.` and `\end` land on the same destination
		assert_eq!(chain.edge_weight("y", "."), 7);
		// start words missing from the key set are interned, not aliased
		assert_eq!(chain.vocabulary().id_of("z"), None);
		assert!(chain.vocabulary().id_of("ghost").is_some());
		assert_eq!(chain.start_words().len(), 2);
	}

	#[test]
	fn migrate_file_writes_a_loadable_record() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("old.json");
		let output = dir.path().join("new.json");
		std::fs::write(&input, r#"{"Startwords":["Hi"],"Wordmaps":{"Hi":{"\\end":1}}}"#).unwrap();

		let chain = migrate_file(&input, &output).unwrap();
		assert_eq!(crate::model::persistence::read_chain(&output).unwrap(), chain);
	}

	#[test]
	fn overflowing_weights_fail_the_migration() {
		let max = u64::MAX;
		let old = legacy(&format!(r#"{{"Startwords":["y"],"Wordmaps":{{"y":{{".":{max},"\\end":1}}}}}}"#));
		assert!(matches!(old.into_chain(), Err(crate::MarkovError::CorruptData(_))));

		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("old.json");
		let output = dir.path().join("new.json");
		std::fs::write(&input, format!(r#"{{"Wordmaps":{{"y":{{"a":{max},"b":1}}}}}}"#)).unwrap();
		assert!(migrate_file(&input, &output).is_err());
		assert!(!output.exists());
	}
}
