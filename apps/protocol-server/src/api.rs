//! API handlers for the protocol server
//!
//! Provides endpoints for:
//! - The upload page
//! - Contract upload and analysis
//! - Protocol download

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use shared_docx::{extract_text, ProtocolWriter, DOCX_MIME_TYPE};
use shared_types::{ProtocolReport, UploadResponse};
use tracing::{info, warn};

use crate::error::ServerError;
use crate::pipeline::analyze_contract;
use crate::storage::{has_docx_extension, is_plain_file_name, sanitize_filename};
use crate::AppState;

/// Multipart part carrying the contract
pub const CONTRACT_FIELD: &str = "contract";

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "protocol-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

async fn read_contract_part(mut multipart: Multipart) -> Result<UploadedFile, ServerError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(CONTRACT_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedFile {
            name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ServerError::MissingFile)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge
    } else {
        ServerError::InvalidRequest(err.body_text())
    }
}

/// `protocol_<YYYYMMDD_HHMMSS>_<8 hex>.docx`; the suffix keeps uploads in the
/// same second apart.
pub fn protocol_file_name(generated_at: &NaiveDateTime) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "protocol_{}_{}.docx",
        generated_at.format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}

/// Handler: POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ServerError> {
    let multipart = multipart.map_err(|_| ServerError::MissingFile)?;
    let upload = read_contract_part(multipart).await?;

    if upload.name.is_empty() {
        return Err(ServerError::EmptyFilename);
    }
    if !has_docx_extension(&upload.name) {
        return Err(ServerError::UnsupportedFileType);
    }

    let stored_name = sanitize_filename(&upload.name)
        .unwrap_or_else(|| format!("contract_{}.docx", uuid::Uuid::new_v4()));
    state.storage.save_upload(&stored_name, &upload.bytes).await?;

    let text = extract_text(&upload.bytes)?;
    if !contract_engine::is_substantial(&text) {
        return Err(ServerError::DocumentTooShort);
    }
    info!("Document loaded: {} characters", text.chars().count());

    let clauses = analyze_contract(&text, state.advisor.as_ref()).await;
    if clauses.is_empty() {
        return Err(ServerError::NoRiskyClauses);
    }
    info!("Analyzed {} clauses", clauses.len());

    let report = ProtocolReport {
        generated_at: Local::now().naive_local(),
        clauses,
    };

    let protocol_name = protocol_file_name(&report.generated_at);
    let protocol_bytes =
        ProtocolWriter::write(&report).map_err(|e| ServerError::Internal(e.to_string()))?;
    state
        .storage
        .save_protocol(&protocol_name, &protocol_bytes)
        .await?;
    info!("Protocol of disagreements ready: {}", protocol_name);

    let text_report = contract_engine::render_text_report(&report);
    Ok(Json(UploadResponse::completed(
        text_report.clone(),
        text_report,
        format!("/download/{}", protocol_name),
        report.clauses.len(),
    )))
}

/// Handler: GET /download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ServerError> {
    if !is_plain_file_name(&filename) {
        warn!("Rejected download name: {}", filename);
        return Err(ServerError::InvalidRequest(format!(
            "Invalid file name '{}'",
            filename
        )));
    }

    let bytes = state
        .storage
        .read_protocol(&filename)
        .await?
        .ok_or_else(|| ServerError::NotFound(filename.clone()))?;

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = handle_health().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "protocol-server");
    }

    #[test]
    fn test_protocol_names_differ_within_a_second() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        let first = protocol_file_name(&at);
        let second = protocol_file_name(&at);

        assert!(first.starts_with("protocol_20240305_140709_"));
        assert!(first.ends_with(".docx"));
        assert_eq!(first.len(), "protocol_20240305_140709_".len() + 8 + ".docx".len());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_index_has_upload_form() {
        let Html(page) = handle_index().await;
        assert!(page.contains("AI Contract Analyzer"));
        for id in [
            "uploadForm",
            "contractFile",
            "analyzeBtn",
            "btnText",
            "btnSpinner",
            "results",
            "analysisText",
            "protocolText",
            "downloadLink",
            "error",
        ] {
            assert!(page.contains(&format!("id=\"{}\"", id)), "missing #{}", id);
        }
    }
}
