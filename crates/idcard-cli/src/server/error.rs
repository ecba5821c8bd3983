//! Error responses for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use idcard_core::{IdCardError, OcrError};

/// Errors a request handler can end with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("upload an image file or provide a base64-encoded image")]
    MissingImage,

    #[error("missing image_base64 parameter")]
    MissingImageBase64,

    #[error("base64 image decoding failed: {0}")]
    Base64Decode(String),

    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("invalid multipart body: {0}")]
    Multipart(String),

    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFileSelected
            | ApiError::MissingImage
            | ApiError::MissingImageBase64
            | ApiError::Base64Decode(_)
            | ApiError::InvalidJson(_)
            | ApiError::Multipart(_)
            | ApiError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            ApiError::Ocr(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IdCardError> for ApiError {
    fn from(err: IdCardError) -> Self {
        match err {
            IdCardError::Image(e) => ApiError::ImageDecode(e.to_string()),
            IdCardError::Ocr(e) => ApiError::Ocr(e),
            IdCardError::Io(e) => ApiError::Internal(e.to_string()),
            IdCardError::Json(e) => ApiError::Internal(e.to_string()),
            IdCardError::Config(msg) => ApiError::Internal(msg),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    data: Option<()>,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = Json(ErrorResponse {
            success: false,
            data: None,
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
