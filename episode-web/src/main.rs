//! Servidor web Axum que expõe os taggers como endpoints JSON

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use episode_core::{
    Event, EventSequence, EventTagger, KeywordMatch, KeywordTagger, RegexMatch, RegexTagger, TaggerConfig,
    TaggerError, TimeScale, Vocabulary, VocabularyRecord, WordTable,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

type ApiError = (StatusCode, Json<Value>);

#[derive(Deserialize)]
struct KeywordsRequest {
    text: String,
    #[serde(default)]
    vocabulary: Option<Vocabulary>,
    #[serde(default)]
    config: Option<TaggerConfig>,
}

#[derive(Deserialize)]
struct RegexRequest {
    text: String,
    #[serde(default)]
    vocabulary: Option<Vec<VocabularyRecord>>,
    #[serde(default)]
    config: Option<TaggerConfig>,
}

#[derive(Deserialize)]
struct EventsRequest {
    text: String,
    #[serde(default)]
    vocabulary: Option<Vec<VocabularyRecord>>,
    #[serde(default)]
    config: Option<TaggerConfig>,
    /// Início de cada palavra; derivado do texto quando ausente
    #[serde(default)]
    word_starts: Option<Vec<usize>>,
}

#[derive(Deserialize)]
struct SequenceRequest {
    #[serde(flatten)]
    events: EventsRequest,
    #[serde(default = "default_classificator")]
    classificator: String,
    #[serde(default)]
    time_scale: TimeScale,
}

fn default_classificator() -> String {
    "term".to_string()
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router().layer(cors);

    let addr = std::env::var("EPISODE_WEB_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor de taggers iniciado em http://{addr}");
    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/tag/keywords", post(keywords_handler))
        .route("/tag/regex", post(regex_handler))
        .route("/tag/events", post(events_handler))
        .route("/sequence", post(sequence_handler))
}

fn bad_request(err: TaggerError) -> ApiError {
    warn!(error = %err, "requisição rejeitada");
    (StatusCode::BAD_REQUEST, Json(json!({"error": err.to_string()})))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Marca palavras-chave de um vocabulário simples ou rotulado
async fn keywords_handler(Json(req): Json<KeywordsRequest>) -> Result<Json<Vec<KeywordMatch>>, ApiError> {
    let vocabulary = req.vocabulary.ok_or(TaggerError::MissingVocabulary).map_err(bad_request)?;
    let tagger = KeywordTagger::new(vocabulary, req.config.unwrap_or_default()).map_err(bad_request)?;
    Ok(Json(tagger.tag(&req.text)))
}

/// Marca expressões regulares com seus grupos nomeados
async fn regex_handler(Json(req): Json<RegexRequest>) -> Result<Json<Vec<RegexMatch>>, ApiError> {
    let records = req.vocabulary.ok_or(TaggerError::MissingVocabulary).map_err(bad_request)?;
    let tagger = RegexTagger::new(records, req.config.unwrap_or_default()).map_err(bad_request)?;
    Ok(Json(tagger.tag(&req.text)))
}

fn event_tagger(req: &mut EventsRequest) -> Result<(EventTagger, WordTable), ApiError> {
    let records = req.vocabulary.take().ok_or(TaggerError::MissingVocabulary).map_err(bad_request)?;
    let tagger = EventTagger::new(records, req.config.take().unwrap_or_default()).map_err(bad_request)?;
    let words = match req.word_starts.take() {
        Some(starts) => WordTable::try_new(starts).map_err(bad_request)?,
        None => WordTable::from_text(&req.text),
    };
    Ok((tagger, words))
}

/// Marca eventos com coordenadas de palavra e compactadas
async fn events_handler(Json(mut req): Json<EventsRequest>) -> Result<Json<Vec<Event>>, ApiError> {
    let (tagger, words) = event_tagger(&mut req)?;
    Ok(Json(tagger.tag(&req.text, &words)))
}

/// Monta a sequência de eventos do texto
async fn sequence_handler(Json(mut req): Json<SequenceRequest>) -> Result<Json<EventSequence>, ApiError> {
    let (tagger, words) = event_tagger(&mut req.events)?;
    let sequence = tagger
        .sequence(&req.events.text, &words, &req.classificator, req.time_scale)
        .map_err(bad_request)?;
    Ok(Json(sequence))
}
