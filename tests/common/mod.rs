//! MongoDB test container and a small seeded catalog.

use mflix_server::db_mongo;
use mongodb::{
    Database, IndexModel,
    bson::{DateTime, Document, doc, oid::ObjectId},
};
use testcontainers_modules::{
    mongo::Mongo,
    testcontainers::{ContainerAsync, runners::AsyncRunner},
};

pub struct TestDatabase {
    _container: ContainerAsync<Mongo>,
    db: Database,
}

pub struct Seed {
    pub godfather: ObjectId,
    pub heat: ObjectId,
    pub toy_story: ObjectId,
}

impl TestDatabase {
    /// Starts a fresh MongoDB container and seeds `movies` and `comments`.
    pub async fn new() -> (Self, Seed) {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");
        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let uri = format!("mongodb://127.0.0.1:{}", port);
        let client = db_mongo::create_client(&uri)
            .await
            .expect("Failed to connect to MongoDB");
        let db = db_mongo::get_database(&client, "mflix_test");

        let seed = seed(&db).await;

        (
            Self {
                _container: container,
                db,
            },
            seed,
        )
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// `[runtime, metacritic, viewer reviews]` for a seeded movie.
type Scores = [i32; 3];

fn movie(id: ObjectId, title: &str, cast: &[&str], genres: &[&str], scores: Scores) -> Document {
    let [runtime, metacritic, reviews] = scores;
    doc! {
        "_id": id,
        "title": title,
        "plot": format!("{} is a movie", title),
        "cast": cast.to_vec(),
        "genres": genres.to_vec(),
        "countries": ["USA"],
        "runtime": runtime,
        "metacritic": metacritic,
        "tomatoes": { "viewer": { "numReviews": reviews } },
    }
}

async fn seed(db: &Database) -> Seed {
    let seed = Seed {
        godfather: ObjectId::new(),
        heat: ObjectId::new(),
        toy_story: ObjectId::new(),
    };

    let movies = db.collection::<Document>("movies");
    movies
        .insert_many(vec![
            movie(
                seed.godfather,
                "The Godfather",
                &["Marlon Brando", "Al Pacino"],
                &["Crime", "Drama"],
                [175, 100, 700],
            ),
            movie(
                seed.heat,
                "Heat",
                &["Al Pacino", "Robert De Niro"],
                &["Crime", "Action"],
                [170, 76, 500],
            ),
            movie(
                seed.toy_story,
                "Toy Story",
                &["Tom Hanks", "Tim Allen"],
                &["Animation", "Comedy"],
                [81, 95, 900],
            ),
        ])
        .await
        .expect("Failed to seed movies");
    movies
        .update_one(
            doc! { "_id": seed.toy_story },
            doc! { "$set": { "countries": ["Canada"] } },
        )
        .await
        .expect("Failed to update seed movie");
    movies
        .create_index(
            IndexModel::builder()
                .keys(doc! { "title": "text", "plot": "text" })
                .build(),
        )
        .await
        .expect("Failed to create text index");

    let comments = db.collection::<Document>("comments");
    let comment = |movie_id: ObjectId, email: &str, text: &str, millis: i64| {
        doc! {
            "_id": ObjectId::new(),
            "name": email.split('@').next().unwrap_or(email),
            "email": email,
            "movie_id": movie_id,
            "text": text,
            "date": DateTime::from_millis(millis),
        }
    };
    comments
        .insert_many(vec![
            comment(seed.godfather, "ann@example.com", "older", 1_000),
            comment(seed.godfather, "bob@example.com", "newer", 2_000),
            comment(seed.heat, "ann@example.com", "great", 3_000),
            comment(seed.toy_story, "ann@example.com", "fun", 4_000),
        ])
        .await
        .expect("Failed to seed comments");

    seed
}
