//! Request handlers.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Multipart, Request, State},
    http::header,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use idcard_core::{Fragment, IdCardFields, Recognition, RecognitionStatus};

use super::{ApiError, AppState};

/// JSON body for base64 uploads.
#[derive(Debug, Deserialize)]
pub struct RecognizeRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// JSON body for fragment extraction.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

/// Baidu-compatible recognition envelope.
#[derive(Debug, Serialize)]
pub struct RecognitionResponse {
    pub success: bool,
    pub data: Option<IdCardFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words_result: Option<BTreeMap<&'static str, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words_result_num: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idcard_number_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub message: &'static str,
}

impl From<&Recognition> for RecognitionResponse {
    fn from(recognition: &Recognition) -> Self {
        let status = recognition.status();
        match status {
            RecognitionStatus::NoText => Self {
                success: false,
                data: None,
                words_result: None,
                words_result_num: None,
                image_status: None,
                idcard_number_type: None,
                confidence: None,
                message: status.message(),
            },
            RecognitionStatus::Complete | RecognitionStatus::MissingIdNumber => Self {
                success: status.is_success(),
                data: Some(recognition.fields.clone()),
                words_result: Some(recognition.fields.labeled()),
                words_result_num: Some(recognition.fields.len()),
                image_status: Some("normal"),
                idcard_number_type: status.is_success().then_some(1),
                confidence: Some(recognition.confidence),
                message: status.message(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub engine: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "ID card recognition API is running",
        version: env!("CARGO_PKG_VERSION"),
        engine: state.recognizer.engine_name().to_string(),
    })
}

pub async fn recognize(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<RecognitionResponse>, ApiError> {
    let bytes = read_image(request, &state).await?;
    debug!("Received image of {} bytes", bytes.len());

    // OCR is CPU-bound; keep it off the async workers.
    let recognizer = state.recognizer.clone();
    let recognition = tokio::task::spawn_blocking(move || recognizer.recognize_bytes(&bytes))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(RecognitionResponse::from(&recognition)))
}

pub async fn extract(
    body: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<RecognitionResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::InvalidJson(e.body_text()))?;
    let recognition = Recognition::from_fragments(body.fragments);
    Ok(Json(RecognitionResponse::from(&recognition)))
}

/// Pull the encoded image out of a multipart upload or a base64 JSON body.
async fn read_image(request: Request, state: &AppState) -> Result<Vec<u8>, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::Multipart(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Multipart(e.body_text()))?
        {
            if field.name() != Some("image") {
                continue;
            }
            if field.file_name() == Some("") {
                return Err(ApiError::NoFileSelected);
            }
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Multipart(e.body_text()))?;
            if data.is_empty() {
                return Err(ApiError::NoFileSelected);
            }
            return Ok(data.to_vec());
        }

        Err(ApiError::MissingImage)
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<RecognizeRequest>::from_request(request, state)
            .await
            .map_err(|e| ApiError::InvalidJson(e.body_text()))?;

        let encoded = body
            .image_base64
            .filter(|s| !s.trim().is_empty())
            .ok_or(ApiError::MissingImageBase64)?;

        // Encoders commonly wrap lines; whitespace is not part of the payload.
        let cleaned: String = encoded.split_ascii_whitespace().collect();
        STANDARD
            .decode(cleaned)
            .map_err(|e| ApiError::Base64Decode(e.to_string()))
    } else {
        Err(ApiError::MissingImage)
    }
}
