use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Access-code service error variants.
///
/// Expected redemption outcomes (already used, unknown code) are NOT
/// errors — they travel as `RedemptionOutcome` values and surface as
/// `200 {success: false}`.
#[derive(Debug, thiserror::Error)]
pub enum AccessCodeError {
    #[error("count must be between 1 and 100")]
    InvalidCount,
    #[error("code must not be empty")]
    MissingCode,
    #[error("no codes found for this batch")]
    BatchNotFound,
    #[error("code generation exhausted after creating {created} codes")]
    GenerationExhausted { created: usize },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccessCodeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCount => "INVALID_COUNT",
            Self::MissingCode => "MISSING_CODE",
            Self::BatchNotFound => "BATCH_NOT_FOUND",
            Self::GenerationExhausted { .. } => "GENERATION_EXHAUSTED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AccessCodeError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCount | Self::MissingCode => StatusCode::BAD_REQUEST,
            Self::BatchNotFound => StatusCode::NOT_FOUND,
            Self::GenerationExhausted { .. } => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
