use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{CatalogError, CatalogResult},
    models::{MovieInput, MoviePage, MovieView},
};

/// Multipart create: a `file` part with the poster bytes (its filename is
/// the desired poster name) and a `movieDto` part with the JSON fields.
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> CatalogResult<impl IntoResponse> {
    let (input, file) = read_movie_form(multipart).await?;
    let (name, bytes) = file.ok_or(CatalogError::EmptyFile)?;
    let view = state.catalog.add_movie(input, &name, &bytes).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> CatalogResult<Json<MovieView>> {
    Ok(Json(state.catalog.get_movie(movie_id).await?))
}

pub async fn get_all_movies(
    State(state): State<Arc<AppState>>,
) -> CatalogResult<Json<Vec<MovieView>>> {
    Ok(Json(state.catalog.get_all_movies().await?))
}

/// Multipart update; an absent or empty `file` part keeps the current
/// poster.
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
    multipart: Multipart,
) -> CatalogResult<Json<MovieView>> {
    let (input, file) = read_movie_form(multipart).await?;
    let file = file.as_ref().map(|(name, bytes)| (name.as_str(), bytes.as_slice()));
    Ok(Json(state.catalog.update_movie(movie_id, input, file).await?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> CatalogResult<String> {
    state.catalog.delete_movie(movie_id).await
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    page: i64,
    #[serde(default = "default_page_size")]
    size: i64,
    sort: Option<String>,
    dir: Option<String>,
}

fn default_page_size() -> i64 {
    10
}

pub async fn get_movies_page(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PageQuery>,
) -> CatalogResult<Json<MoviePage>> {
    let page =
        state.catalog.get_movies_page(q.page, q.size, q.sort.as_deref(), q.dir.as_deref()).await?;
    Ok(Json(page))
}

pub async fn serve_poster(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> CatalogResult<Response> {
    let bytes = state
        .catalog
        .poster_bytes(&name)
        .await?
        .ok_or_else(|| CatalogError::PosterNotFound(name.clone()))?;

    let headers = [(header::CONTENT_TYPE, content_type_for(&name))];
    Ok((headers, bytes).into_response())
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn read_movie_form(
    mut multipart: Multipart,
) -> CatalogResult<(MovieInput, Option<(String, Vec<u8>)>)> {
    let mut input: Option<MovieInput> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) =
        multipart.next_field().await.map_err(|e| CatalogError::Malformed(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or("").to_string();
                let bytes =
                    field.bytes().await.map_err(|e| CatalogError::Malformed(e.to_string()))?;
                if bytes.is_empty() {
                    continue;
                }
                if name.is_empty() {
                    return Err(CatalogError::Malformed(
                        "file part is missing a filename".to_string(),
                    ));
                }
                file = Some((name, bytes.to_vec()));
            }
            "movieDto" => {
                let raw =
                    field.bytes().await.map_err(|e| CatalogError::Malformed(e.to_string()))?;
                let parsed = serde_json::from_slice(&raw)
                    .map_err(|e| CatalogError::Malformed(format!("movieDto: {e}")))?;
                input = Some(parsed);
            }
            _ => {}
        }
    }

    let input =
        input.ok_or_else(|| CatalogError::Malformed("movieDto part is required".to_string()))?;
    Ok((input, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_follow_the_extension() {
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("poster"), "application/octet-stream");
    }
}
