//! Error types for the protocol server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared_types::UploadResponse;
use thiserror::Error;
use tracing::error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("No file part")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Only .docx files are accepted")]
    UnsupportedFileType,

    #[error("Document is too short")]
    DocumentTooShort,

    #[error("No problematic clauses found for analysis")]
    NoRiskyClauses,

    #[error("Cannot read document: {0}")]
    InvalidDocument(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::MissingFile => (StatusCode::BAD_REQUEST, "NO_FILE"),
            ServerError::EmptyFilename => (StatusCode::BAD_REQUEST, "NO_FILENAME"),
            ServerError::UnsupportedFileType => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE_TYPE"),
            ServerError::DocumentTooShort => (StatusCode::BAD_REQUEST, "DOCUMENT_TOO_SHORT"),
            ServerError::NoRiskyClauses => (StatusCode::BAD_REQUEST, "NO_CLAUSES_FOUND"),
            ServerError::InvalidDocument(_) => (StatusCode::BAD_REQUEST, "INVALID_DOCUMENT"),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        (status, Json(UploadResponse::failed(self.to_string(), code))).into_response()
    }
}

impl From<shared_docx::DocxError> for ServerError {
    fn from(err: shared_docx::DocxError) -> Self {
        use shared_docx::DocxError;
        match err {
            DocxError::Io(e) => ServerError::Internal(e.to_string()),
            other => ServerError::InvalidDocument(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
