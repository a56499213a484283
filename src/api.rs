//! JSON HTTP API.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/sources` | all sources |
//! | GET | `/sources/{id}` | one source, 404 if unknown |
//! | POST | `/sources` | 201 + created source; 400 on invalid JSON or missing `url`/`selector` |
//! | GET | `/scrape/all` | run a fetch cycle, cache it, `{message, count}` |
//! | GET | `/scrape/{id}` | fetch one source (not cached), `{message, source, headlines}` |
//! | GET | `/headlines` | cached headlines, `[]` when empty |
//! | GET | `/search?keyword=K[&whole_word=true]` | `{keyword, total, found, results}` |
//! | GET | `/health` | `ok` |
//!
//! Errors are returned as `{"error": "..."}` with a 4xx status for bad input
//! and 5xx for internal faults. A panicking handler becomes a 500; the server
//! keeps running.

use crate::error::Error;
use crate::models::{Headline, NewSource, SourceDescriptor};
use crate::state::{AppState, SearchOutcome};
use crate::search::MatchMode;
use crate::utils::truncate_for_log;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, RawQuery, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sources", get(list_sources).post(add_source))
        .route("/sources/{id}", get(get_source))
        .route("/scrape/all", get(scrape_all))
        .route("/scrape/{id}", get(scrape_source))
        .route("/headlines", get(cached_headlines))
        .route("/search", get(search_headlines))
        .fallback(not_found)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, Error>;

async fn not_found() -> Error {
    Error::NotFound("Not Found".to_string())
}

fn parse_id(path: Result<Path<String>, PathRejection>) -> ApiResult<u64> {
    let Path(raw) = path.map_err(|e| Error::Validation(format!("Invalid source id: {e}")))?;
    raw.parse()
        .map_err(|_| Error::Validation(format!("Invalid source id: {raw}")))
}

async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceDescriptor>> {
    Json(state.registry.list().await)
}

async fn get_source(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<SourceDescriptor>> {
    let id = parse_id(id)?;
    Ok(Json(state.registry.get(id).await?))
}

async fn add_source(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<SourceDescriptor>)> {
    let new: NewSource = serde_json::from_slice(&body).map_err(|e| {
        warn!(
            error = %e,
            body = %truncate_for_log(&String::from_utf8_lossy(&body), 200),
            "Rejected source payload"
        );
        Error::Validation("Invalid JSON".to_string())
    })?;
    let source = state.registry.add(new).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

#[derive(Debug, Serialize)]
struct ScrapeAllResponse {
    message: String,
    count: usize,
}

async fn scrape_all(State(state): State<AppState>) -> ApiResult<Json<ScrapeAllResponse>> {
    let entry = state.run_cycle().await?;
    let count = entry.headlines.len();
    Ok(Json(ScrapeAllResponse {
        message: format!("Scraped {count} headlines"),
        count,
    }))
}

#[derive(Debug, Serialize)]
struct ScrapeSourceResponse {
    message: String,
    source: SourceDescriptor,
    headlines: Vec<Headline>,
}

async fn scrape_source(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ScrapeSourceResponse>> {
    let id = parse_id(id)?;
    let (source, headlines) = state.fetch_one(id).await?;
    Ok(Json(ScrapeSourceResponse {
        message: format!("Scraped {} headlines from {}", headlines.len(), source.name),
        source,
        headlines,
    }))
}

async fn cached_headlines(State(state): State<AppState>) -> Json<Vec<Headline>> {
    Json(state.cache.headlines().await)
}

/// Query string of `/search`. Parsed by hand so that odd input degrades
/// instead of failing: the first `keyword` wins and an unrecognized
/// `whole_word` value falls back to the configured match mode.
#[derive(Debug, Default, PartialEq, Eq)]
struct SearchParams {
    keyword: String,
    mode: Option<MatchMode>,
}

impl SearchParams {
    fn parse(query: Option<&str>) -> Self {
        let mut keyword = None;
        let mut whole_word = None;
        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match &*key {
                "keyword" if keyword.is_none() => keyword = Some(value.into_owned()),
                "whole_word" if whole_word.is_none() => whole_word = Some(value.into_owned()),
                _ => {}
            }
        }

        let mode = whole_word.and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(MatchMode::WholeWord),
            "false" | "0" | "no" => Some(MatchMode::Contains),
            _ => {
                warn!(whole_word = %truncate_for_log(&raw, 50), "Ignoring unrecognized whole_word flag");
                None
            }
        });

        Self {
            keyword: keyword.unwrap_or_default(),
            mode,
        }
    }
}

async fn search_headlines(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<SearchOutcome> {
    let params = SearchParams::parse(query.as_deref());
    let headlines = state.cache.headlines().await;
    Json(state.search_in(&headlines, &params.keyword, params.mode))
}
