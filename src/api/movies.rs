use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::error::ApiError;
use super::{ENTRIES_PER_PAGE, skip_for_page, split_list};
use crate::AppState;
use crate::db_mongo::models::{Bucket, Movie, MovieTitle};
use crate::db_mongo::pipelines::DEFAULT_SORT_KEY;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub cast: Option<String>,
    pub genre: Option<String>,
    pub text: Option<String>,
    pub page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CountriesQuery {
    pub countries: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FacetQuery {
    pub cast: Option<String>,
    pub page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<Movie>,
    pub page: u64,
    pub filters: Map<String, Value>,
    pub entries_per_page: i64,
    pub total_results: u64,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub movie: Movie,
}

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<MovieTitle>,
}

#[derive(Debug, Serialize)]
pub struct Facets {
    pub runtime: Vec<Bucket>,
    pub rating: Vec<Bucket>,
}

#[derive(Debug, Serialize)]
pub struct FacetSearchResponse {
    pub movies: Vec<Movie>,
    pub facets: Facets,
    pub page: u64,
    pub filters: Map<String, Value>,
    pub entries_per_page: i64,
    pub total_results: u64,
}

/// Which search a query asks for. Cast wins over genre, genre over text.
#[derive(Debug, PartialEq, Eq)]
enum SearchFilter {
    Cast(Vec<String>),
    Genre(Vec<String>),
    Text(String),
    All,
}

impl SearchFilter {
    fn from_query(query: &SearchQuery) -> Self {
        if let Some(cast) = query.cast.as_deref().map(split_list).filter(|v| !v.is_empty()) {
            return SearchFilter::Cast(cast);
        }
        if let Some(genres) = query.genre.as_deref().map(split_list).filter(|v| !v.is_empty()) {
            return SearchFilter::Genre(genres);
        }
        match query.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => SearchFilter::Text(text.to_string()),
            _ => SearchFilter::All,
        }
    }

    fn to_filters(&self) -> Map<String, Value> {
        let mut filters = Map::new();
        match self {
            SearchFilter::Cast(cast) => {
                filters.insert("cast".to_string(), json!(cast));
            }
            SearchFilter::Genre(genres) => {
                filters.insert("genres".to_string(), json!(genres));
            }
            SearchFilter::Text(text) => {
                filters.insert("text".to_string(), json!(text));
            }
            SearchFilter::All => {}
        }
        filters
    }
}

pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let page = query.page.unwrap_or(0);
    let movies = state
        .movies
        .get_movies(ENTRIES_PER_PAGE, skip_for_page(page)?)
        .await?;
    let total_results = state.movies.get_movies_count().await?;

    Ok(Json(MoviesResponse {
        movies,
        page,
        filters: Map::new(),
        entries_per_page: ENTRIES_PER_PAGE,
        total_results,
    }))
}

pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let page = query.page.unwrap_or(0);
    let skip = skip_for_page(page)?;
    let filter = SearchFilter::from_query(&query);
    tracing::debug!("Movie search {:?} page {}", filter, page);

    let dao = &state.movies;
    let (movies, total_results) = match &filter {
        SearchFilter::Cast(cast) => (
            dao.get_movies_by_cast(DEFAULT_SORT_KEY, ENTRIES_PER_PAGE, skip, cast).await?,
            dao.get_cast_search_count(cast).await?,
        ),
        SearchFilter::Genre(genres) => (
            dao.get_movies_by_genre(DEFAULT_SORT_KEY, ENTRIES_PER_PAGE, skip, genres).await?,
            dao.get_genres_search_count(genres).await?,
        ),
        SearchFilter::Text(text) => (
            dao.get_movies_by_text(ENTRIES_PER_PAGE, skip, text).await?,
            dao.get_text_search_count(text).await?,
        ),
        SearchFilter::All => (
            dao.get_movies(ENTRIES_PER_PAGE, skip).await?,
            dao.get_movies_count().await?,
        ),
    };

    Ok(Json(MoviesResponse {
        movies,
        page,
        filters: filter.to_filters(),
        entries_per_page: ENTRIES_PER_PAGE,
        total_results,
    }))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieResponse>, ApiError> {
    match state.movies.get_movie(&id).await? {
        Some(movie) => Ok(Json(MovieResponse { movie })),
        None => Err(ApiError::NotFound(format!("movie {} not found", id))),
    }
}

pub async fn movies_by_country(
    State(state): State<AppState>,
    Query(query): Query<CountriesQuery>,
) -> Result<Json<TitlesResponse>, ApiError> {
    let countries = query.countries.as_deref().map(split_list).unwrap_or_default();
    if countries.is_empty() {
        return Err(ApiError::BadRequest("at least one country is required".to_string()));
    }

    let titles = state.movies.get_movies_by_country(&countries).await?;
    Ok(Json(TitlesResponse { titles }))
}

pub async fn facet_search(
    State(state): State<AppState>,
    Query(query): Query<FacetQuery>,
) -> Result<Json<FacetSearchResponse>, ApiError> {
    let cast = query.cast.as_deref().map(split_list).unwrap_or_default();
    if cast.is_empty() {
        return Err(ApiError::BadRequest("cast is required for faceted search".to_string()));
    }

    let page = query.page.unwrap_or(0);
    let skip = skip_for_page(page)?;
    let faceted = state
        .movies
        .get_movies_cast_faceted(ENTRIES_PER_PAGE, skip, &cast)
        .await?;
    let total_results = state.movies.get_cast_search_count(&cast).await?;

    let mut filters = Map::new();
    filters.insert("cast".to_string(), json!(cast));

    Ok(Json(FacetSearchResponse {
        movies: faceted.movies,
        facets: Facets {
            runtime: faceted.runtime,
            rating: faceted.rating,
        },
        page,
        filters,
        entries_per_page: ENTRIES_PER_PAGE,
        total_results,
    }))
}
