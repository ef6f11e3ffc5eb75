use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("movie not found with id = {0}")]
    NotFound(i32),

    #[error("poster already exists: {0}")]
    ArtifactCollision(String),

    #[error("poster store failure: {0}")]
    ArtifactStore(#[from] std::io::Error),

    /// The poster was removed but the record delete failed, so the record
    /// is still present. Retrying the delete is safe: the poster delete
    /// treats an absent file as done.
    #[error("record delete failed after poster removal for id = {0}: {1}")]
    PartialDelete(i32, #[source] sea_orm::DbErr),

    #[error("invalid page request: page = {page}, size = {size}")]
    InvalidPageRequest { page: i64, size: i64 },

    #[error("unknown sort key: {0}")]
    InvalidSortKey(String),

    #[error("unknown sort direction: {0}")]
    InvalidSortDirection(String),

    #[error("poster file is empty")]
    EmptyFile,

    #[error("unusable poster filename: {0}")]
    UnsafeName(String),

    #[error("poster not found: {0}")]
    PosterNotFound(String),

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl CatalogError {
    fn status(&self) -> StatusCode {
        match self {
            CatalogError::NotFound(_) | CatalogError::PosterNotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::ArtifactCollision(_) => StatusCode::CONFLICT,
            CatalogError::InvalidPageRequest { .. }
            | CatalogError::InvalidSortKey(_)
            | CatalogError::InvalidSortDirection(_)
            | CatalogError::EmptyFile
            | CatalogError::UnsafeName(_)
            | CatalogError::Malformed(_) => StatusCode::BAD_REQUEST,
            CatalogError::ArtifactStore(_)
            | CatalogError::PartialDelete(_, _)
            | CatalogError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
