//! Gateway-injected operator identity extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

/// Operator identity injected by the admin gateway via the
/// `x-bras-operator-id` header. Session issuance and verification live
/// in the gateway; this service only requires the header's presence on
/// operator routes. The public verify route never extracts it.
///
/// Returns 401 if the header is absent or not a UUID.
#[derive(Debug, Clone)]
pub struct OperatorIdentity {
    pub operator_id: Uuid,
}

impl<S> FromRequestParts<S> for OperatorIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let operator_id = parts
            .headers
            .get("x-bras-operator-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        async move {
            let operator_id = operator_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { operator_id })
        }
    }
}
