use mongodb::{
    Collection, Database,
    bson::{Document, doc, oid::ObjectId},
};

use super::collect;
use super::error::DaoResult;
use super::models::{FacetedMovies, Movie, MovieTitle};
use super::pipelines::{self, DEFAULT_SORT_KEY};

pub const MOVIES_COLLECTION: &str = "movies";

/// Movie lookups, searches and counts over the `movies` collection.
#[derive(Clone)]
pub struct MovieDao {
    collection: Collection<Movie>,
}

impl MovieDao {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(MOVIES_COLLECTION),
        }
    }

    /// Fetches one movie with its comments, newest comment first.
    ///
    /// Ids that are not 24 hex characters never reach the database and yield `None`.
    pub async fn get_movie(&self, movie_id: &str) -> DaoResult<Option<Movie>> {
        let Some(id) = parse_object_id(movie_id) else {
            tracing::error!("Not a valid movie id: {}", movie_id);
            return Ok(None);
        };

        let pipeline = vec![pipelines::match_id(id), pipelines::comments_lookup()];
        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .with_type::<Movie>()
            .await?;

        if cursor.advance().await? {
            return Ok(Some(cursor.deserialize_current()?));
        }
        Ok(None)
    }

    /// Whether a movie with `id` exists. Stops counting at the first match.
    pub async fn movie_exists(&self, id: ObjectId) -> DaoResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "_id": id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    /// Movies sorted by `tomatoes.viewer.numReviews`, most reviewed first.
    pub async fn get_movies(&self, limit: i64, skip: u64) -> DaoResult<Vec<Movie>> {
        self.get_movies_sorted(limit, skip, pipelines::descending(DEFAULT_SORT_KEY))
            .await
    }

    pub async fn get_movies_sorted(
        &self,
        limit: i64,
        skip: u64,
        sort: Document,
    ) -> DaoResult<Vec<Movie>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(sort)
            .skip(skip)
            .limit(limit)
            .await?;

        collect(cursor).await
    }

    /// Titles of the movies released in any of `countries`.
    pub async fn get_movies_by_country<S: AsRef<str>>(
        &self,
        countries: &[S],
    ) -> DaoResult<Vec<MovieTitle>> {
        let cursor = self
            .collection
            .clone_with_type::<MovieTitle>()
            .find(pipelines::in_filter("countries", countries))
            .projection(doc! { "title": 1 })
            .await?;

        collect(cursor).await
    }

    /// Full text search, best matches first. Each movie carries its `score`.
    pub async fn get_movies_by_text(
        &self,
        limit: i64,
        skip: u64,
        keywords: &str,
    ) -> DaoResult<Vec<Movie>> {
        let cursor = self
            .collection
            .find(pipelines::text_filter(keywords))
            .projection(pipelines::text_score_projection())
            .sort(pipelines::text_score_sort())
            .skip(skip)
            .limit(limit)
            .await?;

        collect(cursor).await
    }

    pub async fn get_movies_by_cast<S: AsRef<str>>(
        &self,
        sort_key: &str,
        limit: i64,
        skip: u64,
        cast: &[S],
    ) -> DaoResult<Vec<Movie>> {
        self.find_in("cast", cast, sort_key, limit, skip).await
    }

    pub async fn get_movies_by_genre<S: AsRef<str>>(
        &self,
        sort_key: &str,
        limit: i64,
        skip: u64,
        genres: &[S],
    ) -> DaoResult<Vec<Movie>> {
        self.find_in("genres", genres, sort_key, limit, skip).await
    }

    async fn find_in<S: AsRef<str>>(
        &self,
        field: &str,
        values: &[S],
        sort_key: &str,
        limit: i64,
        skip: u64,
    ) -> DaoResult<Vec<Movie>> {
        let cursor = self
            .collection
            .find(pipelines::in_filter(field, values))
            .sort(pipelines::descending(sort_key))
            .skip(skip)
            .limit(limit)
            .await?;

        collect(cursor).await
    }

    /// Cast search that also buckets the selected page by runtime and metacritic rating.
    pub async fn get_movies_cast_faceted<S: AsRef<str>>(
        &self,
        limit: i64,
        skip: u64,
        cast: &[S],
    ) -> DaoResult<FacetedMovies> {
        let mut cursor = self
            .collection
            .aggregate(pipelines::cast_faceted(cast, limit, skip))
            .with_type::<FacetedMovies>()
            .await?;

        if cursor.advance().await? {
            return Ok(cursor.deserialize_current()?);
        }
        Ok(FacetedMovies::default())
    }

    pub async fn get_movies_count(&self) -> DaoResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    pub async fn get_text_search_count(&self, keywords: &str) -> DaoResult<u64> {
        Ok(self
            .collection
            .count_documents(pipelines::text_filter(keywords))
            .await?)
    }

    pub async fn get_cast_search_count<S: AsRef<str>>(&self, cast: &[S]) -> DaoResult<u64> {
        Ok(self
            .collection
            .count_documents(pipelines::in_filter("cast", cast))
            .await?)
    }

    pub async fn get_genres_search_count<S: AsRef<str>>(&self, genres: &[S]) -> DaoResult<u64> {
        Ok(self
            .collection
            .count_documents(pipelines::in_filter("genres", genres))
            .await?)
    }
}

/// Parses a 24 character hex string into an `ObjectId`.
pub fn parse_object_id(value: &str) -> Option<ObjectId> {
    ObjectId::parse_str(value).ok()
}
