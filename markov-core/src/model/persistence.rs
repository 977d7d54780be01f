//! JSON record of a `WordChain`.
//!
//! One object per model, here after ingesting "Cats run. Dogs jump.":
//!
//! ```json
//! {
//!   "StartWords": [0, 4],
//!   "WordCount": 6,
//!   "WordMap":   { "Cats": 0, "§": 1, "run": 2, ".": 3, "Dogs": 4, "jump": 5 },
//!   "WordVals":  ["Cats", "§", "run", ".", "Dogs", "jump"],
//!   "WordGraph": [ { "2": 1 }, { "0": 1, "4": 1 }, { "3": 1 }, {}, { "5": 1 }, { "3": 1 } ]
//! }
//! ```
//!
//! Loading validates every structural invariant and refuses to repair.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;

use super::state::State;
use super::vocabulary::{Vocabulary, WordId};
use super::word_chain::WordChain;
use crate::error::{MarkovError, Result};
use crate::io::resolve_save_path;

/// Borrowed view written by `encode`.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RecordView<'a> {
	start_words: &'a [WordId],
	word_count: usize,
	word_map: &'a HashMap<String, WordId>,
	word_vals: &'a [String],
	word_graph: &'a [State],
}

/// Owned record read by `decode`.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChainRecord {
	#[serde(default, deserialize_with = "nullable")]
	start_words: Vec<WordId>,
	word_count: usize,
	#[serde(default, deserialize_with = "nullable")]
	word_map: HashMap<String, WordId>,
	#[serde(default, deserialize_with = "nullable")]
	word_vals: Vec<String>,
	#[serde(default, deserialize_with = "nullable")]
	word_graph: Vec<State>,
}

/// Accepts `null` wherever an empty array or object is expected.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TryFrom<ChainRecord> for WordChain {
	type Error = MarkovError;

	fn try_from(record: ChainRecord) -> Result<Self> {
		let count = record.word_count;
		if record.word_vals.len() != count || record.word_graph.len() != count {
			return Err(MarkovError::corrupt(format!(
				"WordCount is {count} but WordVals has {} entries and WordGraph {}",
				record.word_vals.len(),
				record.word_graph.len()
			)));
		}

		let vocabulary = Vocabulary::from_words(record.word_vals)
			.ok_or_else(|| MarkovError::corrupt("WordVals contains a duplicate word"))?;
		if *vocabulary.ids() != record.word_map {
			return Err(MarkovError::corrupt("WordMap disagrees with WordVals"));
		}

		let in_range = |id: WordId| (id as usize) < count;
		for (source, state) in record.word_graph.iter().enumerate() {
			for (next, weight) in state.transitions() {
				if !in_range(next) {
					return Err(MarkovError::corrupt(format!("edge {source} -> {next} leaves the vocabulary")));
				}
				if weight == 0 {
					return Err(MarkovError::corrupt(format!("edge {source} -> {next} has a zero weight")));
				}
			}
			if state.checked_total().is_none() {
				return Err(MarkovError::corrupt(format!("outgoing weight of {source} overflows")));
			}
		}

		let mut seen = HashSet::with_capacity(record.start_words.len());
		for &id in &record.start_words {
			if !in_range(id) {
				return Err(MarkovError::corrupt(format!("start word {id} leaves the vocabulary")));
			}
			if !seen.insert(id) {
				return Err(MarkovError::corrupt(format!("start word {id} is listed twice")));
			}
		}

		Ok(WordChain::from_parts(vocabulary, record.word_graph, record.start_words))
	}
}

/// Serializes `chain` into its JSON record.
pub fn encode(chain: &WordChain) -> Result<Vec<u8>> {
	let view = RecordView {
		start_words: chain.start_words(),
		word_count: chain.vocabulary().len(),
		word_map: chain.vocabulary().ids(),
		word_vals: chain.vocabulary().words(),
		word_graph: chain.graph(),
	};
	serde_json::to_vec(&view).map_err(|e| MarkovError::corrupt(e.to_string()))
}

/// Parses and validates a JSON record.
pub fn decode(bytes: &[u8]) -> Result<WordChain> {
	let record: ChainRecord = serde_json::from_slice(bytes).map_err(|e| MarkovError::corrupt(e.to_string()))?;
	WordChain::try_from(record)
}

/// Writes `bytes` to `path` through a temporary file in the same directory.
///
/// An empty path resolves to `output.json` in the working directory.
/// Returns the path actually written.
pub fn write_record<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<PathBuf> {
	let target = resolve_save_path(path)?;
	let dir = match target.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
		_ => PathBuf::from("."),
	};

	let mut temp_file = NamedTempFile::new_in(&dir).map_err(|e| MarkovError::io(&dir, e))?;
	temp_file.write_all(bytes).map_err(|e| MarkovError::io(&target, e))?;
	temp_file.persist(&target).map_err(|e| MarkovError::io(&target, e.error))?;
	Ok(target)
}

/// Reads a JSON document from `path`.
pub(crate) fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
	let path = path.as_ref();
	if path.as_os_str().is_empty() {
		return Err(MarkovError::InvalidPath(path.to_path_buf()));
	}
	let bytes = fs::read(path).map_err(|e| MarkovError::io(path, e))?;
	serde_json::from_slice(&bytes).map_err(|e| MarkovError::corrupt(format!("{}: {e}", path.display())))
}

/// Reads and validates the chain stored at `path`.
pub fn read_chain<P: AsRef<Path>>(path: P) -> Result<WordChain> {
	let record: ChainRecord = read_json(path)?;
	WordChain::try_from(record)
}
