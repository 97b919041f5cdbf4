use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// A request body that could not be turned into a cart or product.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid {entity}: body of request contained bad or no data")]
    NotAnObject { entity: &'static str },
    #[error("Invalid {entity}: missing {field}")]
    MissingField { entity: &'static str, field: &'static str },
    #[error("Invalid {entity}: {field} must be {expected}")]
    WrongType { entity: &'static str, field: &'static str, expected: &'static str },
    #[error("Invalid {entity}: {field} {reason}")]
    InvalidValue { entity: &'static str, field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::Duplicate(msg),
            _ => ModelError::Db(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let missing = ValidationError::MissingField { entity: "Product", field: "name" };
        assert_eq!(missing.to_string(), "Invalid Product: missing name");

        let wrong = ValidationError::WrongType { entity: "Product", field: "price", expected: "a number" };
        assert_eq!(wrong.to_string(), "Invalid Product: price must be a number");

        let body = ValidationError::NotAnObject { entity: "Shopcart" };
        assert_eq!(body.to_string(), "Invalid Shopcart: body of request contained bad or no data");
    }

    #[test]
    fn non_constraint_db_errors_stay_db_errors() {
        let err = ModelError::from(DbErr::Custom("boom".into()));
        assert!(matches!(err, ModelError::Db(msg) if msg.contains("boom")));
    }
}
