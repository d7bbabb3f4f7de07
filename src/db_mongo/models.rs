use serde::{Deserialize, Serialize};
use mongodb::bson::{Bson, DateTime, Document, oid::ObjectId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
    // The dataset stores some years as strings ("2006è"), so keep it loose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullplot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tomatoes: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_mflix_comments: Option<i32>,
    /// Text search relevance, only set by `$meta: "textScore"` projections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Filled by the comments lookup on single-movie fetches.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Projection returned by the country search: `_id` and `title` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieTitle {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub movie_id: ObjectId,
    pub text: String,
    pub date: DateTime,
}

impl Comment {
    pub fn new(movie_id: ObjectId, name: String, email: String, text: String) -> Self {
        Self {
            id: Some(ObjectId::new()),
            name,
            email,
            movie_id,
            text,
            date: DateTime::now(),
        }
    }
}

/// A commenter ranked by how many comments they left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critic {
    #[serde(rename = "_id")]
    pub email: String,
    #[serde(rename = "count")]
    pub num_comments: i64,
}

/// One `$bucket` output row. `_id` is the lower boundary, or "other".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(rename = "_id")]
    pub id: Bson,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetedMovies {
    #[serde(default)]
    pub runtime: Vec<Bucket>,
    #[serde(default)]
    pub rating: Vec<Bucket>,
    #[serde(default)]
    pub movies: Vec<Movie>,
}
