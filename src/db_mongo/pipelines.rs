//! Filter, sort and aggregation stage builders for the movie and comment DAOs.
//!
//! Everything here only builds BSON; the pipelines run on the server.

use mongodb::bson::{Bson, Document, doc, oid::ObjectId};

pub const DEFAULT_SORT_KEY: &str = "tomatoes.viewer.numReviews";

const RUNTIME_BOUNDARIES: [i32; 5] = [0, 60, 90, 120, 180];
const RATING_BOUNDARIES: [i32; 5] = [0, 50, 70, 90, 100];
const DEFAULT_BUCKET: &str = "other";

pub fn descending(key: &str) -> Document {
    doc! { key: -1 }
}

/// `{ field: { $in: values } }`
pub fn in_filter<S: AsRef<str>>(field: &str, values: &[S]) -> Document {
    let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    doc! { field: { "$in": values } }
}

pub fn text_filter(keywords: &str) -> Document {
    doc! { "$text": { "$search": keywords } }
}

pub fn text_score_projection() -> Document {
    doc! { "score": { "$meta": "textScore" } }
}

pub fn text_score_sort() -> Document {
    doc! { "score": { "$meta": "textScore" } }
}

pub fn match_id(id: ObjectId) -> Document {
    doc! { "$match": { "_id": id } }
}

/// Joins a movie with its comments, newest first.
pub fn comments_lookup() -> Document {
    doc! {
        "$lookup": {
            "from": "comments",
            "let": { "the_movie_id": "$_id" },
            "pipeline": [
                { "$match": { "$expr": { "$eq": ["$movie_id", "$$the_movie_id"] } } },
                { "$sort": { "date": -1 } },
            ],
            "as": "comments",
        }
    }
}

fn bucket(group_by: &str, boundaries: &[i32]) -> Document {
    doc! {
        "$bucket": {
            "groupBy": group_by,
            "boundaries": boundaries.to_vec(),
            "default": DEFAULT_BUCKET,
            "output": { "count": { "$sum": 1 } },
        }
    }
}

pub fn runtime_bucket() -> Document {
    bucket("$runtime", &RUNTIME_BOUNDARIES)
}

pub fn rating_bucket() -> Document {
    bucket("$metacritic", &RATING_BOUNDARIES)
}

pub fn facet_stage() -> Document {
    doc! {
        "$facet": {
            "runtime": [runtime_bucket()],
            "rating": [rating_bucket()],
            "movies": [{ "$addFields": { "title": "$title" } }],
        }
    }
}

/// Cast search with runtime and rating facets. Stage order matters: the
/// facets only see the page selected by skip/limit.
pub fn cast_faceted<S: AsRef<str>>(cast: &[S], limit: i64, skip: u64) -> Vec<Document> {
    vec![
        doc! { "$match": in_filter("cast", cast) },
        doc! { "$sort": descending(DEFAULT_SORT_KEY) },
        doc! { "$skip": to_bson_count(skip) },
        doc! { "$limit": limit },
        facet_stage(),
    ]
}

/// Expansion of `$sortByCount`.
pub fn sort_by_count(field: &str) -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": field, "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1 } },
    ]
}

pub fn most_active_commenters(limit: i64) -> Vec<Document> {
    let mut pipeline = sort_by_count("$email");
    pipeline.push(doc! { "$limit": limit });
    pipeline
}

fn to_bson_count(n: u64) -> Bson {
    Bson::Int64(i64::try_from(n).unwrap_or(i64::MAX))
}
