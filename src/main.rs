use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mflix_server::{
    AppState,
    api::create_app,
    auth,
    config::{AppConfig, JwtConfig},
    db_mongo,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // `mflix-server token <email> <name>` prints a bearer token for local testing.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [command, email, name] = args.as_slice()
        && command == "token"
    {
        let jwt = JwtConfig::from_env()?;
        let token = auth::issue_token(email, name, &jwt.secret, jwt.ttl_hours)?;
        println!("{}", token);
        return Ok(());
    }

    let config = AppConfig::from_env()?;

    let client = db_mongo::create_client(&config.mongodb_uri).await?;
    let db = db_mongo::get_database(&client, &config.database);
    tracing::info!("Using database {}", config.database);

    let app = create_app(AppState::new(&db, config.jwt_secret.clone()));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
