use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server settings, read from an optional TOML file then overridden by
/// `MARKOV_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Directory holding one `<guild>.json` file per guild.
	pub data_dir: String,
	/// Checkpoint a guild every n ingested messages (0 disables).
	pub backup_every: u64,
	/// When false, nothing is ever written to disk.
	pub save: bool,
	/// Token limit of `/generate` when the query does not set one.
	pub reply_limit: usize,
	pub log_level: String,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".into(),
			port: 5000,
			data_dir: "./data".into(),
			backup_every: 100,
			save: true,
			reply_limit: 50,
			log_level: "info".into(),
		}
	}
}

impl ServerConfig {
	/// Load from `path` (defaults when absent), then apply env var overrides.
	pub fn load_from(path: Option<&Path>) -> Result<Self> {
		let mut config = match path {
			Some(path) => {
				let contents = std::fs::read_to_string(path)
					.with_context(|| format!("failed to read config file {}", path.display()))?;
				toml::from_str(&contents).context("failed to parse config TOML")?
			}
			None => ServerConfig::default(),
		};

		config.apply_overrides(|key| std::env::var(key).ok())?;
		Ok(config)
	}

	/// Apply `MARKOV_HOST`, `MARKOV_PORT`, `MARKOV_DATA_DIR`, `MARKOV_LOG_LEVEL`.
	fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
		if let Some(val) = lookup("MARKOV_HOST") {
			self.host = val;
		}
		if let Some(val) = lookup("MARKOV_PORT") {
			self.port = val.parse().with_context(|| format!("MARKOV_PORT is not a port: {val}"))?;
		}
		if let Some(val) = lookup("MARKOV_DATA_DIR") {
			self.data_dir = val;
		}
		if let Some(val) = lookup("MARKOV_LOG_LEVEL") {
			self.log_level = val;
		}
		Ok(())
	}

	pub fn data_dir(&self) -> PathBuf {
		markov_core::io::normalize_folder(&self.data_dir)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn default_config_is_valid() {
		let config = ServerConfig::default();
		assert_eq!(config.port, 5000);
		assert_eq!(config.backup_every, 100);
		assert_eq!(config.reply_limit, 50);
		assert!(config.save);
	}

	#[test]
	fn parse_toml_config() {
		let toml_str = r#"
host = "0.0.0.0"
data_dir = "/var/lib/markov"
backup_every = 10
"#;
		let config: ServerConfig = toml::from_str(toml_str).unwrap();
		assert_eq!(config.host, "0.0.0.0");
		assert_eq!(config.data_dir, "/var/lib/markov");
		assert_eq!(config.backup_every, 10);
		// defaults still apply for unset fields
		assert_eq!(config.port, 5000);
		assert_eq!(config.log_level, "info");
	}

	#[test]
	fn env_overrides_win() {
		let env: HashMap<&str, &str> =
			[("MARKOV_PORT", "8080"), ("MARKOV_LOG_LEVEL", "debug"), ("MARKOV_DATA_DIR", "/srv/markov")].into();
		let mut config = ServerConfig::default();
		config.apply_overrides(|key| env.get(key).map(|v| v.to_string())).unwrap();
		assert_eq!(config.port, 8080);
		assert_eq!(config.log_level, "debug");
		assert_eq!(config.data_dir, "/srv/markov");
		assert_eq!(config.host, "127.0.0.1");
	}

	#[test]
	fn bad_port_override_is_an_error() {
		let mut config = ServerConfig::default();
		assert!(config.apply_overrides(|key| (key == "MARKOV_PORT").then(|| "http".to_string())).is_err());
	}

	#[test]
	fn load_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("markov.toml");
		std::fs::write(&path, "reply_limit = 12\nsave = false\n").unwrap();

		let config = ServerConfig::load_from(Some(path.as_path())).unwrap();
		assert_eq!(config.reply_limit, 12);
		assert!(!config.save);
		assert!(ServerConfig::load_from(Some(dir.path().join("missing.toml").as_path())).is_err());
	}
}
