use std::sync::{Mutex, MutexGuard};

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use rs_suggest_core::{NGramModel, SqliteStore};

/// Application-scoped state shared by every handler.
///
/// Built once in `main` and injected as `web::Data<Mutex<AppState>>`;
/// the mutex serializes training, persistence and queries.
pub struct AppState {
	pub model: NGramModel<SqliteStore>,
	/// Dataset used when a request does not name one.
	pub default_dataset: String,
}

impl AppState {
	pub fn new(model: NGramModel<SqliteStore>, default_dataset: &str) -> Self {
		Self { model, default_dataset: default_dataset.to_owned() }
	}
}

pub type SharedState = web::Data<Mutex<AppState>>;

/// Query parameters of `GET /ngram/suggest/`.
#[derive(Deserialize)]
pub struct SuggestParams {
	text: Option<String>,
	dataset: Option<String>,
	k: Option<usize>,
}

/// Body of `POST /ngram/add/`.
#[derive(Deserialize)]
pub struct AddParams {
	text: Option<String>,
	dataset_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SuggestResponse {
	pub suggestions: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ResultResponse {
	pub result: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct DatasetsResponse {
	pub datasets: Vec<String>,
}

fn lock(data: &SharedState) -> Result<MutexGuard<'_, AppState>, HttpResponse> {
	data.lock().map_err(|_| HttpResponse::InternalServerError().body("Model lock failed"))
}

/// HTTP GET endpoint `/ngram/suggest/`
///
/// Returns the most frequent next words after the trailing context of `text`.
#[get("/ngram/suggest/")]
async fn suggest_word(data: SharedState, query: web::Query<SuggestParams>) -> impl Responder {
	let mut state = match lock(&data) {
		Ok(s) => s,
		Err(e) => return e,
	};

	let text = query.text.as_deref().unwrap_or("");
	let dataset = query.dataset.clone().unwrap_or_else(|| state.default_dataset.clone());
	let k = query.k.unwrap_or(state.model.config().default_k);

	match state.model.suggest(text, &dataset, k) {
		Ok(suggestions) => HttpResponse::Ok().json(SuggestResponse { suggestions }),
		Err(e) => {
			log::error!("Suggestion failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP POST endpoint `/ngram/add/`
///
/// Trains the model on one phrase.
#[post("/ngram/add/")]
async fn add_ngram(data: SharedState, body: web::Json<AddParams>) -> impl Responder {
	let text = match &body.text {
		Some(t) => t,
		None => return HttpResponse::BadRequest().body("Missing text"),
	};

	let mut state = match lock(&data) {
		Ok(s) => s,
		Err(e) => return e,
	};
	let dataset = body.dataset_name.clone().unwrap_or_else(|| state.default_dataset.clone());

	match state.model.train(text, &dataset) {
		Ok(result) => HttpResponse::Ok().json(ResultResponse { result }),
		Err(e) => {
			log::error!("Training failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP POST endpoint `/ngram/persist/`
#[post("/ngram/persist/")]
async fn persist(data: SharedState) -> impl Responder {
	let mut state = match lock(&data) {
		Ok(s) => s,
		Err(e) => return e,
	};
	match state.model.persist() {
		Ok(()) => HttpResponse::Ok().json(ResultResponse { result: true }),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP POST endpoint `/ngram/reload/`
#[post("/ngram/reload/")]
async fn reload(data: SharedState) -> impl Responder {
	let mut state = match lock(&data) {
		Ok(s) => s,
		Err(e) => return e,
	};
	match state.model.refresh() {
		Ok(()) => HttpResponse::Ok().json(ResultResponse { result: true }),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/ngram/datasets/")]
async fn datasets(data: SharedState) -> impl Responder {
	let state = match lock(&data) {
		Ok(s) => s,
		Err(e) => return e,
	};
	HttpResponse::Ok().json(DatasetsResponse { datasets: state.model.datasets() })
}

/// Registers every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(suggest_word)
		.service(add_ngram)
		.service(persist)
		.service(reload)
		.service(datasets);
}
