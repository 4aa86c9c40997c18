use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(err) => error!("database error: {}", err),
            AppError::Internal(err) => error!("internal error: {:#}", err),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
