pub mod api;
pub mod auth;
pub mod config;
pub mod db_mongo;
pub mod health;

use mongodb::Database;

use crate::db_mongo::{CommentDao, MovieDao};

/// Shared handles for every request. Cloning is cheap: the DAOs wrap driver handles.
#[derive(Clone)]
pub struct AppState {
    pub movies: MovieDao,
    pub comments: CommentDao,
    pub database: String,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(db: &Database, jwt_secret: String) -> Self {
        Self {
            movies: MovieDao::new(db),
            comments: CommentDao::new(db),
            database: db.name().to_string(),
            jwt_secret,
        }
    }
}
