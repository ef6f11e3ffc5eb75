use sea_orm::Order;
use serde::{Deserialize, Serialize};

use crate::{
    entities::movie,
    error::{CatalogError, CatalogResult},
};

/// Caller-supplied movie fields. The poster never arrives here; it travels
/// as a separate multipart file part.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    pub title: String,
    pub director: String,
    pub studio: String,
    #[serde(default)]
    pub movie_cast: Vec<String>,
    pub release_year: i32,
}

/// Read-side projection of a movie. `poster_url` is derived on every read
/// from the configured base URL; it is never stored.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub movie_id: i32,
    pub title: String,
    pub director: String,
    pub studio: String,
    pub movie_cast: Vec<String>,
    pub release_year: i32,
    pub poster: String,
    pub poster_url: String,
}

impl MovieView {
    pub fn from_model(model: movie::Model, base_url: &str) -> Self {
        let poster_url = poster_url(base_url, &model.poster);
        Self {
            movie_id: model.movie_id,
            title: model.title,
            director: model.director,
            studio: model.studio,
            movie_cast: model.movie_cast.0,
            release_year: model.release_year,
            poster: model.poster,
            poster_url,
        }
    }
}

/// Derives the public URL for a stored poster name.
pub fn poster_url(base_url: &str, poster: &str) -> String {
    format!("{}/file/{}", base_url.trim_end_matches('/'), poster)
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<MovieView>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub is_last: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortKey {
    MovieId,
    Title,
    Director,
    Studio,
    ReleaseYear,
}

impl SortKey {
    /// Accepts the caller-facing camelCase field names. Anything else is an
    /// error rather than a silent fallback.
    pub fn parse(s: &str) -> CatalogResult<Self> {
        match s {
            "movieId" => Ok(SortKey::MovieId),
            "title" => Ok(SortKey::Title),
            "director" => Ok(SortKey::Director),
            "studio" => Ok(SortKey::Studio),
            "releaseYear" => Ok(SortKey::ReleaseYear),
            other => Err(CatalogError::InvalidSortKey(other.to_string())),
        }
    }

    pub fn column(self) -> movie::Column {
        match self {
            SortKey::MovieId => movie::Column::MovieId,
            SortKey::Title => movie::Column::Title,
            SortKey::Director => movie::Column::Director,
            SortKey::Studio => movie::Column::Studio,
            SortKey::ReleaseYear => movie::Column::ReleaseYear,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> CatalogResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(CatalogError::InvalidSortDirection(other.to_string())),
        }
    }

    pub fn order(self) -> Order {
        match self {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_accepts_record_fields_only() {
        assert_eq!(SortKey::parse("title").unwrap(), SortKey::Title);
        assert_eq!(SortKey::parse("releaseYear").unwrap(), SortKey::ReleaseYear);
        assert!(matches!(
            SortKey::parse("rating"),
            Err(CatalogError::InvalidSortKey(_))
        ));
        // snake_case is not the caller-facing spelling
        assert!(matches!(
            SortKey::parse("release_year"),
            Err(CatalogError::InvalidSortKey(_))
        ));
    }

    #[test]
    fn sort_dir_is_case_insensitive() {
        assert_eq!(SortDir::parse("DESC").unwrap(), SortDir::Desc);
        assert_eq!(SortDir::parse("asc").unwrap(), SortDir::Asc);
        assert!(matches!(
            SortDir::parse("sideways"),
            Err(CatalogError::InvalidSortDirection(_))
        ));
    }

    #[test]
    fn poster_url_joins_base_and_name() {
        assert_eq!(
            poster_url("http://localhost:8080", "inception.jpg"),
            "http://localhost:8080/file/inception.jpg"
        );
        assert_eq!(
            poster_url("http://localhost:8080/", "inception.jpg"),
            "http://localhost:8080/file/inception.jpg"
        );
    }
}
