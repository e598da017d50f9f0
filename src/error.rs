use std::fmt;
use std::io;

/// Failure codes surfaced across the core's boundary (spec.md section 6).
///
/// `TxnAborted` is kept as its own variant rather than folded into a generic
/// "aborted" string so callers can match on it without inspecting text --
/// the only cause inside the core is deadlock victimization.
#[derive(Debug)]
pub enum DbError {
    TxnAborted,
    CacheFull,
    NoSpace,
    SchemaMismatch,
    NotFound,
    Io(io::Error),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DbError::TxnAborted => write!(f, "transaction aborted (deadlock victim)"),
            DbError::CacheFull => write!(f, "buffer pool is full of dirty pages"),
            DbError::NoSpace => write!(f, "page has no free slot"),
            DbError::SchemaMismatch => write!(f, "tuple schema does not match page schema"),
            DbError::NotFound => write!(f, "record not found"),
            DbError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DbError {
    fn from(e: io::Error) -> Self {
        DbError::Io(e)
    }
}

pub type DbResult<T> = Result<T, DbError>;
