use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::RupeeError;
use crate::core::models::transaction::TransactionType;
use crate::core::money::Money;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// A document previously produced by the export endpoint.
    #[schema(value_type = Object)]
    pub document: serde_json::Value,
    /// Apply the import even when some records had to be dropped.
    #[serde(default)]
    pub allow_partial: bool,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub friend_id: String,
    /// Positive when the friend owes the user.
    pub balance: Money,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for RupeeError to implement IntoResponse
pub struct ApiError(pub RupeeError);

impl From<RupeeError> for ApiError {
    fn from(err: RupeeError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            RupeeError::Validation(field, detail) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input for {}: {}", field, detail.description),
            ),
            RupeeError::MalformedImport { reason, valid, dropped } => (
                StatusCode::BAD_REQUEST,
                format!("Malformed import: {} ({} valid, {} dropped)", reason, valid, dropped),
            ),
            err if err.is_not_found() => (StatusCode::NOT_FOUND, err.to_string()),
            RupeeError::SerializationError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Serialization error: {}", msg),
            ),
            RupeeError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg)),
            RupeeError::LoggingError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Logging error: {}", msg)),
            err => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
