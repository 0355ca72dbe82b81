use std::sync::{Arc, Mutex};

use chrono::Utc;

use bras_access_codes::domain::pagination::PageRequest;
use bras_access_codes::domain::repository::AccessCodeRepository;
use bras_access_codes::domain::types::{AccessCode, CodeCounts, CodeFilter, ConsumeResult};
use bras_access_codes::error::AccessCodeError;

/// In-memory code store with the same atomicity contract as the real
/// one: the mutex spans each whole operation, so `insert_if_absent`
/// and `try_consume` are single atomic steps even across tasks.
#[derive(Clone, Default)]
pub struct InMemoryCodeRepo {
    codes: Arc<Mutex<Vec<AccessCode>>>,
}

impl InMemoryCodeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored records for post-run assertions.
    pub fn snapshot(&self) -> Vec<AccessCode> {
        self.codes.lock().unwrap().clone()
    }
}

impl AccessCodeRepository for InMemoryCodeRepo {
    async fn insert_if_absent(&self, record: &AccessCode) -> Result<bool, AccessCodeError> {
        let mut codes = self.codes.lock().unwrap();
        if codes.iter().any(|c| c.code == record.code) {
            return Ok(false);
        }
        codes.push(record.clone());
        Ok(true)
    }

    async fn try_consume(
        &self,
        code: &str,
        used_by_ip: Option<&str>,
    ) -> Result<ConsumeResult, AccessCodeError> {
        let mut codes = self.codes.lock().unwrap();
        let Some(found) = codes.iter_mut().find(|c| c.code == code) else {
            return Ok(ConsumeResult::NotFound);
        };
        if found.is_used {
            return Ok(ConsumeResult::AlreadyUsed);
        }
        found.is_used = true;
        found.used_at = Some(Utc::now());
        found.used_by_ip = used_by_ip.map(str::to_owned);
        Ok(ConsumeResult::Consumed)
    }

    async fn find_by_batch(&self, batch_id: &str) -> Result<Vec<AccessCode>, AccessCodeError> {
        let codes = self.codes.lock().unwrap();
        // Newest first; insertion order breaks created_at ties.
        Ok(codes
            .iter()
            .rev()
            .filter(|c| c.batch_id == batch_id)
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        filter: CodeFilter,
        page: PageRequest,
    ) -> Result<(Vec<AccessCode>, u64), AccessCodeError> {
        let codes = self.codes.lock().unwrap();
        let matching: Vec<_> = codes
            .iter()
            .rev()
            .filter(|c| match filter {
                CodeFilter::All => true,
                CodeFilter::Used => c.is_used,
                CodeFilter::Available => !c.is_used,
            })
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn counts(&self) -> Result<CodeCounts, AccessCodeError> {
        let codes = self.codes.lock().unwrap();
        let used = codes.iter().filter(|c| c.is_used).count() as u64;
        let available = codes.len() as u64 - used;
        Ok(CodeCounts {
            total: used + available,
            used,
            available,
        })
    }
}
