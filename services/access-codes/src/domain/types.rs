use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Single-use redemption token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCode {
    pub id: Uuid,
    pub code: String,
    pub batch_id: String,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub used_by_ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of the atomic conditional consume in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeResult {
    Consumed,
    AlreadyUsed,
    NotFound,
}

/// Listing filter over the `is_used` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeFilter {
    #[default]
    All,
    Used,
    Available,
}

impl CodeFilter {
    /// Parse the `filter` query param; anything unrecognized means "all",
    /// matching the dashboard's behavior.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("used") => Self::Used,
            Some("available") => Self::Available,
            _ => Self::All,
        }
    }
}

/// Aggregate counters. `total == used + available` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeCounts {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

/// Fixed prefix of every issued code.
pub const CODE_PREFIX: &str = "BRAS-";

/// Length of the random suffix following the prefix.
pub const CODE_SUFFIX_LEN: usize = 8;

/// Alphabet the random suffix is drawn from (uppercase alphanumeric).
pub const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Smallest and largest batch a single generate call may request.
pub const MIN_BATCH_SIZE: u32 = 1;
pub const MAX_BATCH_SIZE: u32 = 100;

/// Consecutive insert collisions tolerated before generation aborts
/// with an exhaustion error. Guards against spinning as the keyspace
/// fills up.
pub const MAX_CONSECUTIVE_COLLISIONS: u32 = 64;

/// Canonical form used for storage and lookup: surrounding whitespace
/// stripped, ASCII-uppercased. Matching must not depend on either.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Synthesize a batch id for generate calls that did not supply one.
/// A grouping label, not a security token; millisecond timestamps are
/// unique enough per operator action.
pub fn new_batch_id(now: DateTime<Utc>) -> String {
    format!("BATCH_{}", now.timestamp_millis())
}
