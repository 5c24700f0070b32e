//! Image analysis endpoint (/analyze)

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    routing::post,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::analysis::AnalysisResult;
use crate::constants::{UNSUPPORTED_MEDIA_MESSAGE, UPLOAD_FIELD};
use crate::services::error::LogErr;
use crate::services::{analyzer, uploads};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze", post(analyze))
}

/// Either a full result or the soft error object. Both are sent with 200.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Result(AnalysisResult),
    Error { error: &'static str },
}

struct Upload {
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// Log a multipart failure and keep axum's status for it: 413 when the body
/// limit was hit, 400 for a malformed form.
fn reject_multipart(context: &str, err: MultipartError) -> StatusCode {
    let status = err.status();
    tracing::warn!("{}: {} ({})", context, err, status);
    status
}

/// Pull the `file` field out of the form, skipping anything else
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject_multipart("[analyze] Multipart field error", e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| reject_multipart("[analyze] Failed to read field bytes", e))?;

        return Ok(Some(Upload {
            filename,
            content_type,
            data,
        }));
    }
    Ok(None)
}

/// POST /analyze - Score an uploaded image
/// Accepts multipart form data with a single "file" field. The file is
/// stored before its content type is checked.
async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, StatusCode> {
    let Some(upload) = read_upload(&mut multipart).await? else {
        tracing::warn!("[analyze] Request had no \"{}\" field", UPLOAD_FIELD);
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };

    let stored = uploads::save_upload(
        &state.upload_dir,
        upload.filename.as_deref(),
        &upload.data,
    )
    .await
    .log_500("[analyze] Failed to store upload")?;

    if !uploads::is_image_content_type(upload.content_type.as_deref()) {
        tracing::info!(
            "[analyze] Rejected {:?} with content type {:?}",
            stored,
            upload.content_type
        );
        return Ok(Json(AnalyzeResponse::Error {
            error: UNSUPPORTED_MEDIA_MESSAGE,
        }));
    }

    let result = analyzer::analyze_file(state.classifier.clone(), stored.clone())
        .await
        .log_500("[analyze] Analysis failed")?;

    tracing::info!(
        "[analyze] {:?} ({} bytes) scored {} via {} - {}",
        stored,
        upload.data.len(),
        result.overall_score,
        state.classifier.name(),
        result.risk_level
    );

    Ok(Json(AnalyzeResponse::Result(result)))
}
