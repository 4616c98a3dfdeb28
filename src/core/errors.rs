use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: &str, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize, PartialEq)]
pub enum RupeeError {
    #[error("Invalid input for field `{0}`: {1:?}")]
    Validation(String, FieldError),
    #[error("Friend {0} not found")]
    FriendNotFound(String),
    #[error("Friend transaction {0} not found")]
    EntryNotFound(String),
    #[error("Split group {0} not found")]
    GroupNotFound(String),
    #[error("Split expense {0} not found")]
    ExpenseNotFound(String),
    #[error("Transaction {0} not found")]
    TransactionNotFound(String),
    #[error("Budget {0} not found")]
    BudgetNotFound(String),
    #[error("Budget transaction {0} not found")]
    BudgetTransactionNotFound(String),
    #[error("Category {0} not found")]
    CategoryNotFound(String),
    #[error("Malformed import: {reason} ({valid} valid, {dropped} dropped)")]
    MalformedImport {
        reason: String,
        valid: usize,
        dropped: usize,
    },
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl RupeeError {
    pub fn validation(field: &str, title: &str, description: impl Into<String>) -> Self {
        RupeeError::Validation(field.to_string(), FieldError::new(field, title, description))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RupeeError::FriendNotFound(_)
                | RupeeError::EntryNotFound(_)
                | RupeeError::GroupNotFound(_)
                | RupeeError::ExpenseNotFound(_)
                | RupeeError::TransactionNotFound(_)
                | RupeeError::BudgetNotFound(_)
                | RupeeError::BudgetTransactionNotFound(_)
                | RupeeError::CategoryNotFound(_)
        )
    }
}

impl From<serde_json::Error> for RupeeError {
    fn from(err: serde_json::Error) -> Self {
        RupeeError::SerializationError(err.to_string())
    }
}
