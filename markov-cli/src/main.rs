use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use markov_core::MarkovModel;

/// Train a Markov chain on a text file and print sample sentences.
#[derive(Parser)]
#[command(name = "markov-cli", version)]
struct Cli {
	/// Existing model to extend (a new one is created when omitted)
	#[arg(long)]
	data: Option<PathBuf>,

	/// Text file used to extend the model
	#[arg(long)]
	input: PathBuf,

	/// Number of sentences to print
	#[arg(long, default_value_t = 10)]
	count: usize,

	/// Maximum number of tokens per sentence
	#[arg(long, default_value_t = 999)]
	limit: usize,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let cli = Cli::parse();

	// Load the model if it already exists, start empty otherwise
	let model = match &cli.data {
		Some(path) if path.exists() => MarkovModel::load_from(path)
			.with_context(|| format!("failed to load model {}", path.display()))?,
		_ => MarkovModel::new(),
	};

	model
		.ingest_file(&cli.input)
		.with_context(|| format!("failed to ingest {}", cli.input.display()))?;

	// Empty path means `output.json` in the working directory
	let target = cli.data.clone().unwrap_or_default();
	let written = model.save_to(&target).context("failed to save model")?;
	info!("model written to {}", written.display());

	for i in 0..cli.count {
		println!("Generated sentence {}: {}", i + 1, model.generate(cli.limit)?);
	}

	Ok(())
}
