use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::movie,
    error::{StoreError, StoreResult},
    models::{Movie, NewMovie, RatingUpdate},
};

/// Persistence operations for the movie list.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Inserts a new, unrated movie. The title is trimmed and must not be blank;
    /// fails with `DuplicateTitle` if the exact title exists.
    async fn create(&self, movie: NewMovie) -> StoreResult<Movie>;

    async fn get(&self, id: i32) -> StoreResult<Movie>;

    /// Sets rating and review; no other field changes.
    async fn update(&self, id: i32, update: RatingUpdate) -> StoreResult<Movie>;

    /// Removes the movie and returns what was removed.
    async fn delete(&self, id: i32) -> StoreResult<Movie>;

    /// Every movie ordered by rating ascending, unrated first, ties by id.
    async fn list_all(&self) -> StoreResult<Vec<Movie>>;
}

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepository for MovieStore {
    async fn create(&self, mut new: NewMovie) -> StoreResult<Movie> {
        new.title = new.title.trim().to_string();
        if new.title.is_empty() {
            return Err(StoreError::InvalidTitle);
        }

        let txn = self.db.begin().await?;

        let existing = movie::Entity::find()
            .filter(movie::Column::Title.eq(new.title.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            txn.rollback().await?;
            return Err(StoreError::DuplicateTitle(new.title));
        }

        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(new.title.clone()),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(None),
            review: Set(None),
            poster_url: Set(new.poster_url),
        };
        let inserted = model.insert(&txn).await.map_err(|err| duplicate_or(err, &new.title))?;
        txn.commit().await?;

        debug!(id = inserted.id, title = %inserted.title, "movie created");
        Ok(inserted.into())
    }

    async fn get(&self, id: i32) -> StoreResult<Movie> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Movie::from)
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: i32, update: RatingUpdate) -> StoreResult<Movie> {
        let txn = self.db.begin().await?;

        let Some(existing) = movie::Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Err(StoreError::NotFound(id));
        };

        let mut active: movie::ActiveModel = existing.into();
        active.rating = Set(Some(update.rating));
        active.review = Set(update.review);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        debug!(id, rating = update.rating, "movie rated");
        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> StoreResult<Movie> {
        let txn = self.db.begin().await?;

        let Some(existing) = movie::Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Err(StoreError::NotFound(id));
        };

        movie::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        debug!(id, title = %existing.title, "movie deleted");
        Ok(existing.into())
    }

    async fn list_all(&self) -> StoreResult<Vec<Movie>> {
        let rows = movie::Entity::find()
            .order_by_asc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }
}

fn duplicate_or(err: DbErr, title: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateTitle(title.to_string()),
        _ => StoreError::Db(err),
    }
}
