//! Database repositories.

mod alcohol_record;
mod alcohol_type;
mod comment;
mod post;
mod user;

pub use alcohol_record::{AlcoholRecordRepository, RecordWithType};
pub use alcohol_type::AlcoholTypeRepository;
pub use comment::CommentRepository;
pub use post::PostRepository;
pub use user::UserRepository;

use drinklog_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a write error, turning a unique index violation into a conflict.
pub(crate) fn write_error(err: DbErr, conflict: impl FnOnce() -> String) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(conflict()),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_constraint_error_stays_database_error() {
        let err = write_error(DbErr::Custom("connection reset".to_string()), || {
            "taken".to_string()
        });
        assert!(matches!(err, AppError::Database(m) if m.contains("connection reset")));
    }

    #[test]
    fn test_record_not_inserted_is_database_error() {
        let err = write_error(DbErr::RecordNotInserted, || "taken".to_string());
        assert!(matches!(err, AppError::Database(_)));
    }
}
