//! Record storage for movies, a thin layer over sea-orm.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::{
    entities::movie::{self, CastList},
    error::CatalogResult,
    models::{MovieInput, SortDir, SortKey},
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

/// One page of rows together with the totals sea-orm reports for the
/// whole result set.
pub struct PageRows {
    pub rows: Vec<movie::Model>,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> CatalogResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_all(&self) -> CatalogResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().all(&self.db).await?)
    }

    pub async fn insert(&self, input: &MovieInput, poster: &str) -> CatalogResult<movie::Model> {
        let model = movie::ActiveModel {
            movie_id: Default::default(),
            title: Set(input.title.clone()),
            director: Set(input.director.clone()),
            studio: Set(input.studio.clone()),
            movie_cast: Set(CastList(input.movie_cast.clone())),
            release_year: Set(input.release_year),
            poster: Set(poster.to_string()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Full replace of every field except the id.
    pub async fn update(
        &self,
        id: i32,
        input: &MovieInput,
        poster: &str,
    ) -> CatalogResult<movie::Model> {
        let model = movie::ActiveModel {
            movie_id: Set(id),
            title: Set(input.title.clone()),
            director: Set(input.director.clone()),
            studio: Set(input.studio.clone()),
            movie_cast: Set(CastList(input.movie_cast.clone())),
            release_year: Set(input.release_year),
            poster: Set(poster.to_string()),
        };
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> CatalogResult<()> {
        movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Windowing and totals are owned here. Rows always come back in a
    /// deterministic order: the requested sort column (if any) with ties
    /// broken by ascending id, or plain ascending id otherwise.
    pub async fn find_page(
        &self,
        page: u64,
        size: u64,
        sort: Option<(SortKey, SortDir)>,
    ) -> CatalogResult<PageRows> {
        let mut query = movie::Entity::find();
        if let Some((key, dir)) = sort {
            query = query.order_by(key.column(), dir.order());
        }
        query = query.order_by_asc(movie::Column::MovieId);

        let paginator = query.paginate(&self.db, size);
        let totals = paginator.num_items_and_pages().await?;
        let rows = paginator.fetch_page(page).await?;

        Ok(PageRows {
            rows,
            total_elements: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }
}
