#![allow(async_fn_in_trait)]

use crate::domain::pagination::PageRequest;
use crate::domain::types::{AccessCode, CodeCounts, CodeFilter, ConsumeResult};
use crate::error::AccessCodeError;

/// Port over the durable code store. All mutation funnels through the
/// two atomic primitives; everything else is read-only.
pub trait AccessCodeRepository: Send + Sync {
    /// Insert a fresh record unless its `code` already exists.
    /// Returns `false` on a unique-constraint collision — a normal
    /// control path during generation, not an error.
    async fn insert_if_absent(&self, record: &AccessCode) -> Result<bool, AccessCodeError>;

    /// Atomically flip `is_used` from `false` to `true`, setting
    /// `used_at` (and `used_by_ip` when given) in the same conditional
    /// write. Never implemented as a read followed by a write.
    async fn try_consume(
        &self,
        code: &str,
        used_by_ip: Option<&str>,
    ) -> Result<ConsumeResult, AccessCodeError>;

    /// All codes of one batch, newest first.
    async fn find_by_batch(&self, batch_id: &str) -> Result<Vec<AccessCode>, AccessCodeError>;

    /// One page of codes matching `filter`, newest first, plus the
    /// total match count.
    async fn list(
        &self,
        filter: CodeFilter,
        page: PageRequest,
    ) -> Result<(Vec<AccessCode>, u64), AccessCodeError>;

    /// Aggregate counters over the whole table.
    async fn counts(&self) -> Result<CodeCounts, AccessCodeError>;
}
