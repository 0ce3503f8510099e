//! Error handling module for the council backend.
//!
//! Two propagation shapes: field-scoped errors render inline next to a form
//! field and map to HTTP 400 with an `{"errors": {field: message}}` body;
//! everything else is a fatal error with a coded envelope.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const DIRECTORY_ERROR: &str = "DIRECTORY_ERROR";
    pub const MALFORMED_UPSTREAM: &str = "MALFORMED_UPSTREAM";
}

/// Form field names used for field-scoped errors.
pub mod fields {
    pub const NEW_LOGIN: &str = "newLogin";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Caller session missing, unknown, or not an administrator
    Unauthorized(String),
    /// Client input failed validation; no outbound call was made
    Validation {
        field: &'static str,
        message: String,
    },
    /// Directory lookup did not find the candidate login (add path)
    UserNotFound,
    /// A member row with this login already exists (add path)
    DuplicateMember,
    /// Database error
    Database(String),
    /// Transport or token failure talking to the directory
    Directory(String),
    /// Directory answered success but the body did not match the contract
    MalformedUpstream(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::UserNotFound => StatusCode::BAD_REQUEST,
            AppError::DuplicateMember => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedUpstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Field name and message for errors the frontend renders inline.
    /// `None` for fatal errors.
    pub fn field_error(&self) -> Option<(&'static str, String)> {
        match self {
            AppError::Validation { field, message } => Some((field, message.clone())),
            AppError::UserNotFound => Some((fields::NEW_LOGIN, "User not found".to_string())),
            AppError::DuplicateMember => Some((
                fields::NEW_LOGIN,
                "Council member already exists".to_string(),
            )),
            _ => None,
        }
    }

    /// Error code for fatal errors.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Directory(_) => codes::DIRECTORY_ERROR,
            AppError::MalformedUpstream(_) => codes::MALFORMED_UPSTREAM,
            // Field-scoped errors never render through the coded envelope.
            AppError::Validation { .. } | AppError::UserNotFound | AppError::DuplicateMember => {
                codes::BAD_REQUEST
            }
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::UserNotFound => "User not found".to_string(),
            AppError::DuplicateMember => "Council member already exists".to_string(),
            AppError::Database(msg) => msg.clone(),
            AppError::Directory(msg) => msg.clone(),
            AppError::MalformedUpstream(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Directory request error: {:?}", err);
        AppError::Directory(format!("Directory request error: {}", err))
    }
}

/// Body for field-scoped errors: `{"errors": {"newLogin": "User not found"}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub errors: BTreeMap<String, String>,
}

impl FieldErrorResponse {
    pub fn new(field: &str, message: String) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message);
        Self { errors }
    }
}

/// Error details in the fatal-error envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Fatal-error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.field_error() {
            Some((field, message)) => {
                (status, Json(FieldErrorResponse::new(field, message))).into_response()
            }
            None => (status, Json(ErrorResponse::new(&self))).into_response(),
        }
    }
}
