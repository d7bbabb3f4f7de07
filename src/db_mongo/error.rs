use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("not a valid object id: {0}")]
    InvalidId(String),

    /// A write the database refused, or one this layer refuses to issue.
    #[error("incorrect dao operation: {0}")]
    IncorrectOperation(String),

    #[error(transparent)]
    Database(#[from] MongoError),
}

pub type DaoResult<T> = Result<T, DaoError>;

/// True when the server rejected a write because of a unique index.
pub fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

/// True for failures reported by the server for a specific write.
pub fn is_write_failure(err: &MongoError) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Write(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_message() {
        let err = DaoError::InvalidId("abc".to_string());
        assert_eq!(err.to_string(), "not a valid object id: abc");
    }

    #[test]
    fn test_incorrect_operation_message() {
        let err = DaoError::IncorrectOperation("no id provided".to_string());
        assert_eq!(err.to_string(), "incorrect dao operation: no id provided");
    }
}
