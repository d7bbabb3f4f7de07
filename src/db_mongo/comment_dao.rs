use mongodb::{
    Collection, Database,
    bson::{DateTime, Document, doc, oid::ObjectId},
    options::{CollectionOptions, ReadConcern},
};

use super::collect;
use super::error::{DaoError, DaoResult, is_duplicate_key, is_write_failure};
use super::models::{Comment, Critic};
use super::pipelines;

pub const COMMENTS_COLLECTION: &str = "comments";

const MOST_ACTIVE_LIMIT: i64 = 20;

/// Comment reads and owner-scoped writes over the `comments` collection.
#[derive(Clone)]
pub struct CommentDao {
    db: Database,
    collection: Collection<Comment>,
}

impl CommentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection(COMMENTS_COLLECTION),
        }
    }

    pub async fn get_comment(&self, comment_id: &str) -> DaoResult<Option<Comment>> {
        let id = object_id(comment_id)?;
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Comments on one movie, newest first.
    pub async fn get_comments_for_movie(&self, movie_id: ObjectId) -> DaoResult<Vec<Comment>> {
        let cursor = self
            .collection
            .find(doc! { "movie_id": movie_id })
            .sort(doc! { "date": -1 })
            .await?;

        collect(cursor).await
    }

    /// Inserts `comment`. The caller assigns the id; comments without one are refused.
    pub async fn add_comment(&self, comment: Comment) -> DaoResult<Comment> {
        if comment.id.is_none() {
            return Err(DaoError::IncorrectOperation("no id provided".to_string()));
        }

        if let Err(e) = self.collection.insert_one(&comment).await {
            if is_duplicate_key(&e) {
                tracing::warn!("Comment {:?} already exists", comment.id);
            } else {
                tracing::error!("Failed to insert comment: {}", e);
            }
            return Err(DaoError::IncorrectOperation(e.to_string()));
        }

        Ok(comment)
    }

    /// Replaces the text of a comment owned by `email` and bumps its date.
    ///
    /// Returns `false` when no comment with that id belongs to `email`.
    pub async fn update_comment(
        &self,
        comment_id: &str,
        text: &str,
        email: &str,
    ) -> DaoResult<bool> {
        let filter = owner_filter(object_id(comment_id)?, email);
        let update = doc! { "$set": { "text": text, "date": DateTime::now() } };

        let result = self
            .collection
            .update_one(filter, update)
            .await
            .map_err(translate_write_error)?;

        Ok(result.modified_count == 1)
    }

    /// Deletes a comment owned by `email`. Returns `false` when nothing matched.
    pub async fn delete_comment(&self, comment_id: &str, email: &str) -> DaoResult<bool> {
        let filter = owner_filter(object_id(comment_id)?, email);

        let result = self
            .collection
            .delete_one(filter)
            .await
            .map_err(translate_write_error)?;

        Ok(result.deleted_count == 1)
    }

    /// The 20 users with the most comments. Read with majority read concern so
    /// the report only reflects acknowledged writes.
    pub async fn most_active_commenters(&self) -> DaoResult<Vec<Critic>> {
        let options = CollectionOptions::builder()
            .read_concern(ReadConcern::majority())
            .build();
        let comments = self
            .db
            .collection_with_options::<Document>(COMMENTS_COLLECTION, options);

        let cursor = comments
            .aggregate(pipelines::most_active_commenters(MOST_ACTIVE_LIMIT))
            .with_type::<Critic>()
            .await?;

        collect(cursor).await
    }
}

fn object_id(value: &str) -> DaoResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| DaoError::InvalidId(value.to_string()))
}

fn owner_filter(id: ObjectId, email: &str) -> Document {
    doc! { "_id": id, "email": email }
}

fn translate_write_error(e: mongodb::error::Error) -> DaoError {
    if is_write_failure(&e) {
        tracing::error!("Comment write rejected: {}", e);
        DaoError::IncorrectOperation("not a valid comment for the given user".to_string())
    } else {
        DaoError::Database(e)
    }
}
