use models::errors::{ModelError, ValidationError};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i32) -> Self { Self::NotFound(format!("{} with id '{}' was not found", entity, id)) }
    pub fn conflict(entity: &str, id: i32) -> Self { Self::Conflict(format!("{} with id '{}' already exists", entity, id)) }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(v) => ServiceError::Validation(v),
            ModelError::Duplicate(msg) => ServiceError::Conflict(msg),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self { ModelError::from(err).into() }
}
