use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    /// Directory posters are written to.
    pub poster_dir: PathBuf,
    /// Public base address used to derive poster URLs.
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://filmshelf.db?mode=rwc".to_string());

        let poster_dir: PathBuf =
            std::env::var("POSTER_DIR").unwrap_or_else(|_| "posters".to_string()).into();

        let base_url =
            std::env::var("BASE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            poster_dir,
            base_url,
        })
    }
}
