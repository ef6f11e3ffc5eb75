//! The catalog core: keeps each movie record and its poster file in step
//! across create, read, update, delete and listing.
//!
//! The record store and the poster store are independent systems, so there
//! is no cross-store transaction. Instead every operation sequences its
//! effects so that the reachable bad state is an orphan poster file (which
//! a sweep can clean up) rather than a record pointing at a missing file:
//! poster write before record insert on create, poster delete before
//! record delete on delete, new-poster write before record save on a
//! poster swap.

use crate::{
    entities::movie,
    error::{CatalogError, CatalogResult},
    models::{MovieInput, MoviePage, MovieView, SortDir, SortKey},
    posters::PosterStore,
    store::MovieStore,
};

#[derive(Clone)]
pub struct Catalog {
    movies: MovieStore,
    posters: PosterStore,
    base_url: String,
}

impl Catalog {
    pub fn new(movies: MovieStore, posters: PosterStore, base_url: impl Into<String>) -> Self {
        Self { movies, posters, base_url: base_url.into() }
    }

    pub async fn poster_bytes(&self, name: &str) -> CatalogResult<Option<Vec<u8>>> {
        self.posters.read(name).await
    }

    fn view(&self, model: movie::Model) -> MovieView {
        MovieView::from_model(model, &self.base_url)
    }

    /// Poster first, record second: a failed upload leaves nothing behind,
    /// and a failed insert leaves only an orphan file.
    pub async fn add_movie(
        &self,
        input: MovieInput,
        file_name: &str,
        bytes: &[u8],
    ) -> CatalogResult<MovieView> {
        if self.posters.exists(file_name).await {
            return Err(CatalogError::ArtifactCollision(file_name.to_string()));
        }
        // store() rejects atomically as well, covering a race past the check
        let stored = self.posters.store(file_name, bytes).await?;

        let saved = self.movies.insert(&input, &stored).await.inspect_err(|e| {
            tracing::warn!(poster = %stored, error = %e, "insert failed after poster store, file left for sweep");
        })?;

        tracing::debug!(movie_id = saved.movie_id, poster = %saved.poster, "movie added");
        Ok(self.view(saved))
    }

    pub async fn get_movie(&self, id: i32) -> CatalogResult<MovieView> {
        let model = self.movies.find_by_id(id).await?.ok_or(CatalogError::NotFound(id))?;
        Ok(self.view(model))
    }

    pub async fn get_all_movies(&self) -> CatalogResult<Vec<MovieView>> {
        let models = self.movies.find_all().await?;
        Ok(models.into_iter().map(|m| self.view(m)).collect())
    }

    /// Replaces every field except the id. Without a new file the poster
    /// store is not touched at all; with one, the old file is removed
    /// best-effort and the new bytes land under a fresh name before the
    /// record is saved.
    pub async fn update_movie(
        &self,
        id: i32,
        input: MovieInput,
        file: Option<(&str, &[u8])>,
    ) -> CatalogResult<MovieView> {
        let existing = self.movies.find_by_id(id).await?.ok_or(CatalogError::NotFound(id))?;

        let poster = match file {
            Some((name, bytes)) => {
                if let Err(e) = self.posters.delete(&existing.poster).await {
                    tracing::warn!(poster = %existing.poster, error = %e, "could not remove replaced poster");
                }
                self.posters.store_replacement(name, &existing.poster, bytes).await?
            }
            None => existing.poster.clone(),
        };

        let saved = self.movies.update(id, &input, &poster).await?;
        Ok(self.view(saved))
    }

    /// Poster first, record second. A record-delete failure after the
    /// poster is gone surfaces as `PartialDelete` so the caller can retry
    /// the record cleanup without caring about the file.
    pub async fn delete_movie(&self, id: i32) -> CatalogResult<String> {
        let existing = self.movies.find_by_id(id).await?.ok_or(CatalogError::NotFound(id))?;

        if let Err(e) = self.posters.delete(&existing.poster).await {
            tracing::warn!(poster = %existing.poster, error = %e, "could not remove poster of deleted movie");
        }

        self.movies.delete(id).await.map_err(|e| match e {
            CatalogError::Db(db) => CatalogError::PartialDelete(id, db),
            other => other,
        })?;

        tracing::debug!(movie_id = id, "movie deleted");
        Ok(format!("movie deleted with id = {id}"))
    }

    pub async fn get_movies_page(
        &self,
        page: i64,
        size: i64,
        sort_by: Option<&str>,
        dir: Option<&str>,
    ) -> CatalogResult<MoviePage> {
        if page < 0 || size < 1 {
            return Err(CatalogError::InvalidPageRequest { page, size });
        }

        // the direction is validated even when no sort key is given, so a
        // bad value never passes silently
        let dir = dir.map(SortDir::parse).transpose()?.unwrap_or_default();
        let sort = sort_by.map(SortKey::parse).transpose()?.map(|key| (key, dir));

        let page = page as u64;
        let size = size as u64;
        let rows = self.movies.find_page(page, size, sort).await?;
        let movies: Vec<MovieView> = rows.rows.into_iter().map(|m| self.view(m)).collect();

        Ok(MoviePage {
            movies,
            page_number: page,
            page_size: size,
            total_elements: rows.total_elements,
            total_pages: rows.total_pages,
            is_last: page + 1 >= rows.total_pages,
        })
    }
}
