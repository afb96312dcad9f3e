use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

/// Failures raised by the movie store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("movie title must not be blank")]
    InvalidTitle,
    #[error("\"{0}\" is already in your list")]
    DuplicateTitle(String),
    #[error("movie {0} not found")]
    NotFound(i32),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// Failures talking to the external movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("movie catalog unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("movie catalog returned an unexpected response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::InvalidTitle) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(StoreError::DuplicateTitle(_)) => StatusCode::CONFLICT,
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Db(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Catalog(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Something went wrong. Please try again.".to_string()
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };
        (status, Html(crate::templates::error_page(&message))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
