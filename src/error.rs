//! Error taxonomy for the job tracker store.
//!
//! Constraint failures coming back from SQLite are sorted into three buckets:
//! - ReferentialIntegrity: a foreign key points at a missing parent
//! - DuplicateKey: a uniqueness constraint was violated
//! - DomainConstraint: a value is outside its allowed domain (enum, range, blank)
//!
//! Everything else is passed through as `Sql` or `Io`.

use rusqlite::ffi;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Referential integrity violated: {0}")]
    ReferentialIntegrity(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Domain constraint violated: {0}")]
    DomainConstraint(String),

    #[error("Database not initialized. Run 'jobtrack init' first.")]
    NotInitialized,

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sql(rusqlite::Error),
}

impl StoreError {
    /// True for the three integrity classes a caller can act on.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            StoreError::ReferentialIntegrity(_)
                | StoreError::DuplicateKey(_)
                | StoreError::DomainConstraint(_)
        )
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let rusqlite::Error::SqliteFailure(failure, message) = &err else {
            return StoreError::Sql(err);
        };
        if failure.code != rusqlite::ErrorCode::ConstraintViolation {
            return StoreError::Sql(err);
        }

        let code = failure.extended_code;
        let detail = message
            .clone()
            .unwrap_or_else(|| "constraint failed".to_string());

        match code {
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreError::ReferentialIntegrity(detail),
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                StoreError::DuplicateKey(detail)
            }
            ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
                StoreError::DomainConstraint(detail)
            }
            _ => StoreError::Sql(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_failure(extended_code: i32, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error::new(extended_code),
            Some(message.to_string()),
        )
    }

    #[test]
    fn test_classifies_foreign_key_failure() {
        let err: StoreError = constraint_failure(
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            "FOREIGN KEY constraint failed",
        )
        .into();
        assert!(matches!(err, StoreError::ReferentialIntegrity(_)));
        assert!(err.is_constraint());
    }

    #[test]
    fn test_classifies_unique_and_check_failures() {
        let dup: StoreError =
            constraint_failure(ffi::SQLITE_CONSTRAINT_UNIQUE, "UNIQUE constraint failed: company.name")
                .into();
        assert!(matches!(dup, StoreError::DuplicateKey(ref msg) if msg.contains("company.name")));

        let check: StoreError =
            constraint_failure(ffi::SQLITE_CONSTRAINT_CHECK, "CHECK constraint failed: priority").into();
        assert!(matches!(check, StoreError::DomainConstraint(_)));

        let not_null: StoreError =
            constraint_failure(ffi::SQLITE_CONSTRAINT_NOTNULL, "NOT NULL constraint failed").into();
        assert!(matches!(not_null, StoreError::DomainConstraint(_)));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Sql(_)));
        assert!(!err.is_constraint());
    }

    #[test]
    fn test_serialization_errors_are_not_constraints() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StoreError = parse.into();
        assert!(matches!(err, StoreError::Json(_)));
        assert!(!err.is_constraint());
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
