pub mod comments;
pub mod error;
pub mod movies;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{AppState, health::health_check};
use error::ApiError;

pub const ENTRIES_PER_PAGE: i64 = 20;

/// Builds the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/search", get(movies::search_movies))
        .route("/movies/id/{id}", get(movies::get_movie))
        .route("/movies/countries", get(movies::movies_by_country))
        .route("/movies/facet-search", get(movies::facet_search))
        .route(
            "/movies/comment",
            post(comments::add_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/comments/{id}", get(comments::get_comment))
        .route("/user/comment-report", get(comments::comment_report))
        .layer(cors);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Number of movies to skip for `page`. The driver sends skip as an `i64`.
pub(crate) fn skip_for_page(page: u64) -> Result<u64, ApiError> {
    page.checked_mul(ENTRIES_PER_PAGE as u64)
        .filter(|skip| *skip <= i64::MAX as u64)
        .ok_or_else(|| ApiError::BadRequest(format!("page {} is out of range", page)))
}

/// Splits a comma separated query value, dropping blanks.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
