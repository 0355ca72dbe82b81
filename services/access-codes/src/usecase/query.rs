use crate::domain::pagination::PageRequest;
use crate::domain::repository::AccessCodeRepository;
use crate::domain::types::{AccessCode, CodeFilter};
use crate::error::AccessCodeError;

// ── ListCodes ────────────────────────────────────────────────────────────────

pub struct CodePage {
    pub items: Vec<AccessCode>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

pub struct ListCodesUseCase<R: AccessCodeRepository> {
    pub repo: R,
}

impl<R: AccessCodeRepository> ListCodesUseCase<R> {
    pub async fn execute(
        &self,
        filter: CodeFilter,
        page: PageRequest,
    ) -> Result<CodePage, AccessCodeError> {
        let page = page.clamped();
        let (items, total) = self.repo.list(filter, page).await?;
        Ok(CodePage {
            items,
            total,
            page: page.page,
            limit: page.limit,
            total_pages: total.div_ceil(u64::from(page.limit)),
        })
    }
}

// ── ExportBatch ──────────────────────────────────────────────────────────────

pub struct ExportBatchUseCase<R: AccessCodeRepository> {
    pub repo: R,
}

impl<R: AccessCodeRepository> ExportBatchUseCase<R> {
    /// All codes of one batch, newest first. An unknown batch and a
    /// batch with zero codes surface identically as not-found.
    pub async fn execute(&self, batch_id: &str) -> Result<Vec<AccessCode>, AccessCodeError> {
        let codes = self.repo.find_by_batch(batch_id).await?;
        if codes.is_empty() {
            return Err(AccessCodeError::BatchNotFound);
        }
        Ok(codes)
    }
}
