use crate::domain::repository::AccessCodeRepository;
use crate::domain::types::{ConsumeResult, normalize_code};
use crate::error::AccessCodeError;

/// Business outcome of a redemption attempt. A value, not an error —
/// already-used and unknown codes are expected branches of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionOutcome {
    Success,
    AlreadyUsed,
    NotFound,
}

pub struct RedeemCodeInput {
    pub code: String,
    /// Origin of the redeeming request, when the gateway forwarded one.
    pub client_ip: Option<String>,
}

pub struct RedeemCodeUseCase<R: AccessCodeRepository> {
    pub repo: R,
}

impl<R: AccessCodeRepository> RedeemCodeUseCase<R> {
    pub async fn execute(
        &self,
        input: RedeemCodeInput,
    ) -> Result<RedemptionOutcome, AccessCodeError> {
        let code = normalize_code(&input.code);
        if code.is_empty() {
            return Err(AccessCodeError::MissingCode);
        }

        // Downstream side effects (scoring, report generation) belong to
        // collaborators that run only after Success; this is a pure gate.
        let outcome = match self
            .repo
            .try_consume(&code, input.client_ip.as_deref())
            .await?
        {
            ConsumeResult::Consumed => RedemptionOutcome::Success,
            ConsumeResult::AlreadyUsed => RedemptionOutcome::AlreadyUsed,
            ConsumeResult::NotFound => RedemptionOutcome::NotFound,
        };
        Ok(outcome)
    }
}
