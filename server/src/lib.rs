use anyhow::Result;
use axum::{extract::{Query, State}, routing::get, Json, Router};
use moviesearch_core::persist::{load_index, IndexPaths};
use moviesearch_core::query::search_postings;
use moviesearch_core::InvertedIndex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub movie_id: String,
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and never mutated, so handlers share it
    /// without locking.
    pub index: Arc<InvertedIndex>,
}

pub fn build_app(index_dir: String) -> Result<Router> {
    let paths = IndexPaths::new(&index_dir);
    let index = load_index(&paths)?;
    tracing::info!(
        index_dir,
        num_movies = index.num_movies(),
        num_tokens = index.num_tokens(),
        "index loaded"
    );
    let app_state = AppState { index: Arc::new(index) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let mut results: Vec<SearchHit> = search_postings(&state.index, &params.q)
        .into_iter()
        .map(|p| SearchHit { movie_id: p.movie_id, title: p.title })
        .collect();
    // Posting-set order is unspecified; sort for a stable response.
    results.sort_by(|a, b| a.title.cmp(&b.title));
    let took_s = start.elapsed().as_secs_f64();
    Json(SearchResponse {
        query: params.q,
        took_s,
        total_hits: results.len(),
        results,
    })
}
