mod config;
mod registry;
mod routes;

use std::path::PathBuf;

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use config::ServerConfig;
use registry::GuildRegistry;
use routes::AppState;

#[derive(Parser)]
#[command(name = "markov-server", version, about = "Per-guild Markov chain chat model over HTTP")]
struct Cli {
	/// TOML configuration file
	#[arg(long)]
	config: Option<PathBuf>,
}

/// Main entry point for the server.
///
/// Loads every guild model from the data directory, serves the HTTP API,
/// and saves every guild once the server stops (Ctrl-C / SIGTERM).
#[actix_web::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	let config = ServerConfig::load_from(cli.config.as_deref())?;

	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level)).init();
	info!("{config:?}");

	let registry = GuildRegistry::load_dir(config.data_dir())
		.with_context(|| format!("failed to open data directory {}", config.data_dir))?;
	let shared_state = web::Data::new(AppState { registry, config: config.clone() });

	let app_state = shared_state.clone();
	HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes::configure))
		.bind((config.host.as_str(), config.port))
		.with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
		.run()
		.await?;

	info!("shutting down");
	if config.save {
		let failures = shared_state.registry.save_all();
		if failures > 0 {
			warn!("{failures} guilds could not be saved");
		}
	}
	Ok(())
}
