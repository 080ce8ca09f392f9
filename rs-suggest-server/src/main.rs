use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;

use rs_suggest_core::{NGramModel, SqliteStore};
use rs_suggest_server::api::{self, AppState};
use rs_suggest_server::config::Cli;

/// Main entry point for the server.
///
/// Opens the store, loads the persisted model once, wraps it in a `Mutex`
/// and serves the `/ngram/*` endpoints.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let store = SqliteStore::open(&cli.database).map_err(std::io::Error::other)?;
	let mut model = NGramModel::new(store, cli.model_config()).map_err(std::io::Error::other)?;
	model.load().map_err(std::io::Error::other)?;
	log::info!(
		"Model loaded from {}: {} entries, datasets {:?}",
		cli.database.display(),
		model.len(),
		model.datasets()
	);

	let shared_state = web::Data::new(Mutex::new(AppState::new(model, &cli.default_dataset)));

	log::info!("Listening on {}:{}", cli.host, cli.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_state.clone())
			.configure(api::configure)
	})
		.bind((cli.host.as_str(), cli.port))?
		.run()
		.await
}
