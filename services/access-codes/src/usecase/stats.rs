use crate::domain::repository::AccessCodeRepository;
use crate::domain::types::CodeCounts;
use crate::error::AccessCodeError;

/// Recomputes the aggregate counters from the store on every call.
pub struct GetStatsUseCase<R: AccessCodeRepository> {
    pub repo: R,
}

impl<R: AccessCodeRepository> GetStatsUseCase<R> {
    pub async fn execute(&self) -> Result<CodeCounts, AccessCodeError> {
        self.repo.counts().await
    }
}
