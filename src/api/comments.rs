use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::AppState;
use crate::auth::AuthUser;
use crate::db_mongo::models::{Comment, Critic};

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    pub movie_id: String,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub comment_id: String,
    pub updated_comment: String,
    pub movie_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCommentRequest {
    pub comment_id: String,
    pub movie_id: String,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: Vec<Critic>,
}

fn movie_object_id(movie_id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(movie_id)
        .map_err(|_| ApiError::BadRequest(format!("not a valid movie id: {}", movie_id)))
}

fn non_empty(text: &str) -> Result<&str, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("comment text cannot be empty".to_string()));
    }
    Ok(text)
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentResponse>, ApiError> {
    match state.comments.get_comment(&id).await? {
        Some(comment) => Ok(Json(CommentResponse { comment })),
        None => Err(ApiError::NotFound(format!("comment {} not found", id))),
    }
}

pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewCommentRequest>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let movie_id = movie_object_id(&payload.movie_id)?;
    let text = non_empty(&payload.comment)?;

    if !state.movies.movie_exists(movie_id).await? {
        return Err(ApiError::NotFound(format!("movie {} not found", payload.movie_id)));
    }

    let comment = Comment::new(
        movie_id,
        user.name.clone(),
        user.email.clone(),
        text.to_string(),
    );
    let comment = state.comments.add_comment(comment).await?;
    tracing::info!("{} commented on movie {} ({:?})", user, movie_id, comment.id);

    let comments = state.comments.get_comments_for_movie(movie_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

pub async fn update_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let movie_id = movie_object_id(&payload.movie_id)?;
    let text = non_empty(&payload.updated_comment)?;

    let updated = state
        .comments
        .update_comment(&payload.comment_id, text, &user.email)
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "comment {} not found for {}",
            payload.comment_id, user.email
        )));
    }

    let comments = state.comments.get_comments_for_movie(movie_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DeleteCommentRequest>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let movie_id = movie_object_id(&payload.movie_id)?;

    let deleted = state
        .comments
        .delete_comment(&payload.comment_id, &user.email)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "comment {} not found for {}",
            payload.comment_id, user.email
        )));
    }

    let comments = state.comments.get_comments_for_movie(movie_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

pub async fn comment_report(
    State(state): State<AppState>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = state.comments.most_active_commenters().await?;
    Ok(Json(ReportResponse { report }))
}
