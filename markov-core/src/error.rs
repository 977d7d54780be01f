use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the Markov model.
///
/// Nothing here is fatal to the process: every variant is an outcome the
/// caller is expected to log and recover from.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// `ingest` was called with an empty string.
	#[error("nothing passed, nothing to ingest")]
	EmptyInput,

	/// `generate` was called before any sentence was ingested.
	#[error("no data in markov model")]
	EmptyModel,

	/// The save or load target cannot be used (missing parent, directory, ...).
	#[error("invalid path: {}", .0.display())]
	InvalidPath(PathBuf),

	/// Reading or writing the target failed.
	#[error("i/o failure on {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A persisted record is structurally invalid.
	#[error("corrupt model data: {0}")]
	CorruptData(String),

	/// Another caller panicked while holding the model lock.
	#[error("model lock poisoned")]
	LockPoisoned,
}

impl MarkovError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		MarkovError::Io { path: path.into(), source }
	}

	pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
		MarkovError::CorruptData(reason.into())
	}
}

pub type Result<T> = std::result::Result<T, MarkovError>;
