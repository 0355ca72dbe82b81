use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pagination::PageRequest;
use crate::domain::types::{AccessCode, CodeFilter};
use crate::error::AccessCodeError;
use crate::identity::OperatorIdentity;
use crate::state::AppState;
use crate::usecase::generate::{GenerateCodesInput, GenerateCodesUseCase};
use crate::usecase::query::{ExportBatchUseCase, ListCodesUseCase};
use crate::usecase::redeem::{RedeemCodeInput, RedeemCodeUseCase, RedemptionOutcome};
use crate::usecase::stats::GetStatsUseCase;

// ── Response item ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    pub id: String,
    pub code: String,
    pub batch_id: String,
    pub is_used: bool,
    #[serde(serialize_with = "crate::serde::opt_to_rfc3339_ms")]
    pub used_at: Option<chrono::DateTime<Utc>>,
    pub used_by_ip: Option<String>,
    #[serde(serialize_with = "crate::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<Utc>,
}

impl From<AccessCode> for CodeResponse {
    fn from(code: AccessCode) -> Self {
        Self {
            id: code.id.to_string(),
            code: code.code,
            batch_id: code.batch_id,
            is_used: code.is_used,
            used_at: code.used_at,
            used_by_ip: code.used_by_ip,
            created_at: code.created_at,
        }
    }
}

// ── POST /access-codes/generate ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub count: u32,
    pub batch_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub codes: Vec<String>,
    pub count: usize,
    pub batch_id: String,
}

pub async fn generate_codes(
    _identity: OperatorIdentity,
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AccessCodeError> {
    let usecase = GenerateCodesUseCase::new(state.code_repo());
    let output = usecase
        .execute(GenerateCodesInput {
            count: body.count,
            batch_id: body.batch_id,
        })
        .await?;
    Ok(Json(GenerateResponse {
        success: true,
        count: output.codes.len(),
        codes: output.codes,
        batch_id: output.batch_id,
    }))
}

// ── POST /access-codes/verify ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Public endpoint. Business outcomes are never 4xx: an unknown or
/// already-used code is `200 {success: false, message}`.
pub async fn verify_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AccessCodeError> {
    let usecase = RedeemCodeUseCase {
        repo: state.code_repo(),
    };
    let outcome = usecase
        .execute(RedeemCodeInput {
            code: body.code,
            client_ip: client_ip(&headers),
        })
        .await?;

    let response = match outcome {
        RedemptionOutcome::Success => VerifyResponse {
            success: true,
            message: None,
        },
        RedemptionOutcome::AlreadyUsed => VerifyResponse {
            success: false,
            message: Some("code already used".to_owned()),
        },
        RedemptionOutcome::NotFound => VerifyResponse {
            success: false,
            message: Some("code not found".to_owned()),
        },
    };
    Ok(Json(response))
}

/// Redeeming client origin as forwarded by the gateway. Informational
/// only; absent when no proxy header is present.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_owned());
        }
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|ip| ip.trim().to_owned())
        .filter(|ip| !ip.is_empty())
}

// ── GET /access-codes/list ───────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub filter: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<CodeResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

pub async fn list_codes(
    _identity: OperatorIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AccessCodeError> {
    let usecase = ListCodesUseCase {
        repo: state.code_repo(),
    };
    let filter = CodeFilter::from_query(query.filter.as_deref());
    let page = PageRequest {
        limit: query.limit.unwrap_or(50),
        page: query.page.unwrap_or(1),
    };
    let result = usecase.execute(filter, page).await?;
    Ok(Json(ListResponse {
        items: result.items.into_iter().map(CodeResponse::from).collect(),
        total: result.total,
        page: result.page,
        limit: result.limit,
        total_pages: result.total_pages,
    }))
}

// ── GET /access-codes/stats ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

pub async fn code_stats(
    _identity: OperatorIdentity,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AccessCodeError> {
    let usecase = GetStatsUseCase {
        repo: state.code_repo(),
    };
    let counts = usecase.execute().await?;
    Ok(Json(StatsResponse {
        total: counts.total,
        used: counts.used,
        available: counts.available,
    }))
}

// ── GET /access-codes/export/{batch_id} ──────────────────────────────────────

pub async fn export_batch(
    _identity: OperatorIdentity,
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> Result<Response, AccessCodeError> {
    let usecase = ExportBatchUseCase {
        repo: state.code_repo(),
    };
    let codes = usecase.execute(&batch_id).await?;

    let filename = format!(
        "access-codes_{}_{}_{}.csv",
        batch_id.replace(['"', '/', '\\'], "-"),
        codes.len(),
        Utc::now().format("%Y-%m-%d"),
    );
    let csv = render_csv(&codes);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

fn render_csv(codes: &[AccessCode]) -> String {
    let mut out = String::from("code,status,batchId,createdAt,usedAt\n");
    for code in codes {
        let status = if code.is_used { "used" } else { "available" };
        let used_at = code
            .used_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| "-".to_owned());
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(&code.code),
            status,
            csv_field(&code.batch_id),
            code.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            used_at,
        ));
    }
    out
}

/// Quote a field if it contains a delimiter, quote, or newline.
/// Codes are a fixed alphabet but batch ids are caller-supplied.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
