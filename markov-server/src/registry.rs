use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::{fs, io};

use log::{info, warn};
use markov_core::MarkovModel;
use markov_core::io::{get_filename, list_files};

/// Extension of guild model files.
const MODEL_EXTENSION: &str = "json";

/// Returns `true` if `id` can name a guild (and therefore a file stem).
pub fn is_valid_guild_id(id: &str) -> bool {
	!id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// One conversation: its model, where it is saved, and how many messages
/// arrived since the last checkpoint.
#[derive(Debug)]
pub struct Guild {
	pub model: MarkovModel,
	pub file: PathBuf,
	message_count: AtomicU64,
}

impl Guild {
	pub fn new(model: MarkovModel, file: PathBuf) -> Self {
		Self { model, file, message_count: AtomicU64::new(0) }
	}

	/// Counts one ingested message and returns the new count.
	pub fn record_message(&self) -> u64 {
		self.message_count.fetch_add(1, Ordering::Relaxed) + 1
	}

	/// Writes the model to the guild file and resets the message counter.
	pub fn save(&self) -> markov_core::Result<PathBuf> {
		let written = self.model.save_to(&self.file)?;
		self.message_count.store(0, Ordering::Relaxed);
		Ok(written)
	}
}

/// Guild id → model routing table.
///
/// Each guild owns exactly one `MarkovModel`; models are never shared
/// between guilds.
#[derive(Debug)]
pub struct GuildRegistry {
	data_dir: PathBuf,
	guilds: RwLock<HashMap<String, Arc<Guild>>>,
}

impl GuildRegistry {
	/// Creates an empty registry saving into `data_dir`.
	pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
		Self { data_dir: data_dir.as_ref().to_path_buf(), guilds: RwLock::new(HashMap::new()) }
	}

	/// Creates `data_dir` if needed and loads every `<guild>.json` it holds.
	///
	/// A file that fails to load is logged and its guild starts empty; the
	/// file itself is left alone until the next checkpoint.
	pub fn load_dir<P: AsRef<Path>>(data_dir: P) -> io::Result<Self> {
		let registry = Self::new(&data_dir);
		fs::create_dir_all(&registry.data_dir)?;

		for file in list_files(&registry.data_dir, MODEL_EXTENSION)? {
			let id = get_filename(&file)?;
			if !is_valid_guild_id(&id) {
				warn!("skipping {}: not a guild file", file.display());
				continue;
			}
			let model = MarkovModel::load_from(&file).unwrap_or_else(|e| {
				warn!("guild {id} starts empty, failed to load {}: {e}", file.display());
				MarkovModel::new()
			});
			registry.insert(id, Guild::new(model, file));
		}

		info!("loaded {} guilds from {}", registry.len(), registry.data_dir.display());
		Ok(registry)
	}

	fn insert(&self, id: String, guild: Guild) -> Arc<Guild> {
		let guild = Arc::new(guild);
		self.guilds.write().unwrap_or_else(PoisonError::into_inner).insert(id, Arc::clone(&guild));
		guild
	}

	pub fn get(&self, id: &str) -> Option<Arc<Guild>> {
		self.guilds.read().unwrap_or_else(PoisonError::into_inner).get(id).cloned()
	}

	/// Returns the guild, creating an empty one saved as `<data_dir>/<id>.json`.
	pub fn get_or_create(&self, id: &str) -> Arc<Guild> {
		let mut guilds = self.guilds.write().unwrap_or_else(PoisonError::into_inner);
		let guild = guilds.entry(id.to_owned()).or_insert_with(|| {
			info!("new guild {id}");
			let file = self.data_dir.join(format!("{id}.{MODEL_EXTENSION}"));
			Arc::new(Guild::new(MarkovModel::new(), file))
		});
		Arc::clone(guild)
	}

	/// Forgets a guild. Its file stays on disk.
	pub fn remove(&self, id: &str) -> Option<Arc<Guild>> {
		self.guilds.write().unwrap_or_else(PoisonError::into_inner).remove(id)
	}

	/// Guild ids in sorted order.
	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.guilds.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.guilds.read().unwrap_or_else(PoisonError::into_inner).len()
	}

	/// Saves every guild; failures are logged and counted.
	///
	/// Returns the number of guilds that failed to save.
	pub fn save_all(&self) -> usize {
		let guilds: Vec<(String, Arc<Guild>)> = self
			.guilds
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.map(|(id, guild)| (id.clone(), Arc::clone(guild)))
			.collect();

		let mut failures = 0;
		for (id, guild) in guilds {
			if let Err(e) = guild.save() {
				warn!("failed to save guild {id}: {e}");
				failures += 1;
			}
		}
		failures
	}
}
