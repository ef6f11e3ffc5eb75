mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod posters;
mod routes;
mod store;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::Catalog, config::Config, posters::PosterStore, store::MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,filmshelf=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let posters = PosterStore::open(&config.poster_dir).await?;
    let catalog = Catalog::new(MovieStore::new(db), posters, config.base_url.clone());

    let state = Arc::new(AppState { catalog });

    let app = Router::new()
        .route("/api/v1/movie/add-movie", post(routes::add_movie))
        .route("/api/v1/movie/all", get(routes::get_all_movies))
        .route("/api/v1/movie/paged", get(routes::get_movies_page))
        .route("/api/v1/movie/{movie_id}", get(routes::get_movie))
        .route("/api/v1/movie/update/{movie_id}", put(routes::update_movie))
        .route("/api/v1/movie/delete/{movie_id}", delete(routes::delete_movie))
        .route("/file/{name}", get(routes::serve_poster))
        .with_state(state)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, base_url = %config.base_url, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
