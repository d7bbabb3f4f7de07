pub mod comment_dao;
pub mod error;
pub mod models;
pub mod movie_dao;
pub mod pipelines;

pub use comment_dao::CommentDao;
pub use error::{DaoError, DaoResult};
pub use movie_dao::MovieDao;

use anyhow::{Context, Result};
use mongodb::{Client, Cursor, Database};
use serde::de::DeserializeOwned;

/// Create MongoDB connection
pub async fn create_client(uri: &str) -> Result<Client> {
    let client = create_client_lazy(uri).await?;

    // Ping to verify connection
    client
        .database("admin")
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
        .context("Failed to ping MongoDB")?;

    tracing::info!("Successfully connected to MongoDB");
    Ok(client)
}

/// Create a client without contacting the server. Connections are opened on first use.
pub async fn create_client_lazy(uri: &str) -> Result<Client> {
    Client::with_uri_str(uri)
        .await
        .context("Failed to parse MongoDB connection string")
}

/// Get database handle
pub fn get_database(client: &Client, db_name: &str) -> Database {
    client.database(db_name)
}

/// Drains a cursor into a vector.
pub(crate) async fn collect<T>(mut cursor: Cursor<T>) -> DaoResult<Vec<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let mut items = Vec::new();
    while cursor.advance().await? {
        items.push(cursor.deserialize_current()?);
    }
    Ok(items)
}
