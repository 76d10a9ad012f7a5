use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Error taxonomy shared by both execution modes so the same logical failure
/// maps to the same HTTP status regardless of mode.
#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("invalid payment method: {0}")]
    InvalidPaymentMethod(String),
    #[error("failed to enrich expense {0}: dangling user or category reference")]
    Enrichment(String),
    #[error("notification error: {0}")]
    Notification(String),
    #[error("store error: {0}")]
    Store(String),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for ExpenseError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Store(e.to_string())
    }
}
