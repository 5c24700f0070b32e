//! Error handling utilities for route handlers

use axum::http::StatusCode;
use thiserror::Error;

/// Failures after an upload has been stored and accepted as an image
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Failed to read stored upload: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Inference failed: {0:#}")]
    Inference(anyhow::Error),
    #[error("Inference worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Extension trait for logging errors and converting to StatusCode
pub trait LogErr<T> {
    /// Log error with context and return INTERNAL_SERVER_ERROR
    fn log_500(self, context: &str) -> Result<T, StatusCode>;

    /// Log error with context and return a custom StatusCode
    fn log_status(self, context: &str, status: StatusCode) -> Result<T, StatusCode>;
}

impl<T, E: std::fmt::Display> LogErr<T> for Result<T, E> {
    fn log_500(self, context: &str) -> Result<T, StatusCode> {
        self.log_status(context, StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn log_status(self, context: &str, status: StatusCode) -> Result<T, StatusCode> {
        self.map_err(|e| {
            if status.is_server_error() {
                tracing::error!("{}: {}", context, e);
            } else {
                tracing::warn!("{}: {}", context, e);
            }
            status
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_500_maps_any_error() {
        let res: Result<(), &str> = Err("boom");
        assert_eq!(res.log_500("ctx"), Err(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn log_status_passes_through_ok() {
        let res: Result<u8, &str> = Ok(7);
        assert_eq!(res.log_status("ctx", StatusCode::BAD_REQUEST), Ok(7));
    }
}
