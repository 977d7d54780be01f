use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use log::{info, warn};
use serde::Deserialize;

use markov_core::MarkovError;

use crate::config::ServerConfig;
use crate::registry::{GuildRegistry, is_valid_guild_id};

/// State shared by every worker.
pub struct AppState {
	pub registry: GuildRegistry,
	pub config: ServerConfig,
}

/// Struct representing query parameters for the `/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	limit: Option<usize>,
}

/// Maps a model error onto an HTTP status.
fn error_response(e: &MarkovError) -> HttpResponse {
	match e {
		MarkovError::EmptyInput => HttpResponse::BadRequest().body(e.to_string()),
		MarkovError::EmptyModel => HttpResponse::NotFound().body(e.to_string()),
		MarkovError::InvalidPath(_)
		| MarkovError::Io { .. }
		| MarkovError::CorruptData(_)
		| MarkovError::LockPoisoned => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

fn check_guild(guild: &str) -> Result<(), HttpResponse> {
	if is_valid_guild_id(guild) {
		Ok(())
	} else {
		Err(HttpResponse::BadRequest().body("Guild id must be alphanumeric, '-' or '_'"))
	}
}

/// HTTP PUT endpoint `/v1/guilds/{guild}/messages`
///
/// Ingests the raw request body into the guild's model, creating the guild
/// on its first message, and checkpoints every `backup_every` messages.
#[put("/v1/guilds/{guild}/messages")]
async fn put_message(data: web::Data<AppState>, path: web::Path<String>, body: String) -> impl Responder {
	let guild_id = path.into_inner();
	if let Err(response) = check_guild(&guild_id) {
		return response;
	}

	let guild = data.registry.get_or_create(&guild_id);
	if let Err(e) = guild.model.ingest(&body) {
		warn!("guild {guild_id}: {e}");
		return error_response(&e);
	}

	let count = guild.record_message();
	let config = &data.config;
	if config.save && config.backup_every > 0 && count >= config.backup_every {
		match guild.save() {
			Ok(file) => info!("saving checkpoint of guild {guild_id} to {}", file.display()),
			Err(e) => warn!("guild {guild_id}: checkpoint failed: {e}"),
		}
	}

	HttpResponse::Ok().finish()
}

/// HTTP GET endpoint `/v1/guilds/{guild}/generate`
///
/// Returns a generated sentence as the response body.
#[get("/v1/guilds/{guild}/generate")]
async fn get_generated(data: web::Data<AppState>, path: web::Path<String>, query: web::Query<GenerateParams>) -> impl Responder {
	let guild_id = path.into_inner();
	let Some(guild) = data.registry.get(&guild_id) else {
		return HttpResponse::NotFound().body("Unknown guild");
	};

	let limit = query.limit.unwrap_or(data.config.reply_limit);
	match guild.model.generate(limit) {
		Ok(sentence) => HttpResponse::Ok().body(sentence),
		Err(e) => error_response(&e),
	}
}

/// HTTP POST endpoint `/v1/guilds/{guild}/save`: forced checkpoint.
#[post("/v1/guilds/{guild}/save")]
async fn post_save(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
	if !data.config.save {
		return HttpResponse::Conflict().body("Saving is disabled");
	}
	let guild_id = path.into_inner();
	let Some(guild) = data.registry.get(&guild_id) else {
		return HttpResponse::NotFound().body("Unknown guild");
	};

	match guild.save() {
		Ok(file) => HttpResponse::Ok().body(file.display().to_string()),
		Err(e) => error_response(&e),
	}
}

#[delete("/v1/guilds/{guild}")]
async fn delete_guild(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
	match data.registry.remove(&path.into_inner()) {
		Some(_) => HttpResponse::Ok().finish(),
		None => HttpResponse::NotFound().body("Unknown guild"),
	}
}

/// One line per guild: `id words start_words edges`.
#[get("/v1/guilds")]
async fn get_guilds(data: web::Data<AppState>) -> impl Responder {
	let mut lines = Vec::new();
	for id in data.registry.ids() {
		let Some(guild) = data.registry.get(&id) else { continue };
		match guild.model.stats() {
			Ok(stats) => lines.push(format!("{id} {} {} {}", stats.words, stats.start_words, stats.edges)),
			Err(e) => return error_response(&e),
		}
	}
	HttpResponse::Ok().body(lines.join("\n"))
}

/// Registers every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(put_message)
		.service(get_generated)
		.service(post_save)
		.service(delete_guild)
		.service(get_guilds);
}
