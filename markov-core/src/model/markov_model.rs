use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};
use rand::Rng;

use super::generator::Generator;
use super::persistence::{encode, read_chain, write_record};
use super::word_chain::{ChainStats, WordChain};
use crate::error::{MarkovError, Result};
use crate::io::read_text;

/// A Markov chain guarded by a single readers-writer lock.
///
/// This is the unit of ownership handed to collaborators: one instance per
/// conversation, shared across threads by reference or `Arc`.
///
/// # Locking
/// - `ingest` and `reload_from` take the lock exclusively
/// - `generate`, `save_to`, `snapshot` and `stats` share it
///
/// Files are not locked: two saves to the same path race on the
/// filesystem and the last writer wins.
#[derive(Debug, Default)]
pub struct MarkovModel {
	chain: RwLock<WordChain>,
}

impl MarkovModel {
	/// Creates an empty model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps an existing chain.
	pub fn from_chain(chain: WordChain) -> Self {
		Self { chain: RwLock::new(chain) }
	}

	fn read(&self) -> Result<RwLockReadGuard<'_, WordChain>> {
		self.chain.read().map_err(|_| MarkovError::LockPoisoned)
	}

	fn write(&self) -> Result<RwLockWriteGuard<'_, WordChain>> {
		self.chain.write().map_err(|_| MarkovError::LockPoisoned)
	}

	/// Ingests one piece of raw text.
	///
	/// The whole call runs under the exclusive lock, so readers never see a
	/// half-ingested message.
	///
	/// # Errors
	/// `EmptyInput` if `text` is empty.
	pub fn ingest(&self, text: &str) -> Result<()> {
		self.write()?.add_text(text)
	}

	/// Ingests a whole text file as a single call.
	pub fn ingest_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let text = read_text(&path)?;
		self.ingest(&text)?;
		info!("ingested {}", path.as_ref().display());
		Ok(())
	}

	/// Generates a sentence of at most `limit` tokens after the opener.
	///
	/// # Errors
	/// `EmptyModel` if nothing has been ingested yet.
	pub fn generate(&self, limit: usize) -> Result<String> {
		self.generate_with(limit, &mut rand::rng())
	}

	/// Same as `generate`, drawing from `rng`.
	pub fn generate_with<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Result<String> {
		let chain = self.read()?;
		Generator::new(&chain).sentence(limit, rng)
	}

	/// Writes the model to `path` and returns the path written.
	///
	/// An empty path writes `output.json` in the working directory.
	///
	/// # Errors
	/// `InvalidPath` if the target cannot be a file, `Io` if writing fails.
	pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
		let bytes = encode(&*self.read()?)?;
		let written = write_record(path, &bytes)?;
		info!("saved model to {} ({} bytes)", written.display(), bytes.len());
		Ok(written)
	}

	/// Loads a model previously written by `save_to`.
	///
	/// # Errors
	/// `Io` if the file cannot be read, `CorruptData` if the record violates
	/// any structural invariant.
	pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
		let chain = read_chain(&path)?;
		info!("loaded model from {} ({} words)", path.as_ref().display(), chain.vocabulary().len());
		Ok(Self::from_chain(chain))
	}

	/// Replaces the content of a live model with the record at `path`.
	///
	/// The file is read and validated before the exclusive lock is taken;
	/// on failure the model is left untouched.
	pub fn reload_from<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let chain = read_chain(&path)?;
		*self.write()? = chain;
		debug!("reloaded model from {}", path.as_ref().display());
		Ok(())
	}

	/// Returns a copy of the current chain.
	pub fn snapshot(&self) -> Result<WordChain> {
		Ok(self.read()?.clone())
	}

	pub fn stats(&self) -> Result<ChainStats> {
		Ok(self.read()?.stats())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::sync::Arc;
	use std::thread;

	#[test]
	fn fresh_model_cannot_generate() {
		let model = MarkovModel::new();
		assert!(matches!(model.generate(10), Err(MarkovError::EmptyModel)));
	}

	#[test]
	fn generate_with_seeded_rng_is_reproducible() {
		let model = MarkovModel::new();
		model.ingest("the cat sat on the mat. the dog sat on the cat.").unwrap();

		let first = model.generate_with(30, &mut StdRng::seed_from_u64(99)).unwrap();
		let second = model.generate_with(30, &mut StdRng::seed_from_u64(99)).unwrap();
		assert_eq!(first, second);
		assert!(first.starts_with("the"));
	}

	#[test]
	fn reload_keeps_model_on_failure() {
		let model = MarkovModel::new();
		model.ingest("keep me").unwrap();
		let before = model.snapshot().unwrap();

		assert!(model.reload_from("no/such/file.json").is_err());
		assert_eq!(model.snapshot().unwrap(), before);
	}

	#[test]
	fn concurrent_ingestion_is_serialized() {
		let model = Arc::new(MarkovModel::new());
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let model = Arc::clone(&model);
				thread::spawn(move || {
					for _ in 0..50 {
						model.ingest("alpha beta gamma").unwrap();
						model.generate(10).unwrap();
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().unwrap();
		}

		let chain = model.snapshot().unwrap();
		assert_eq!(chain.edge_weight("alpha", "beta"), 400);
		assert_eq!(chain.edge_weight("gamma", "."), 400);
		assert_eq!(chain.graph().len(), chain.vocabulary().len());
	}
}
