use chrono::Utc;
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::AccessCodeRepository;
use crate::domain::types::{
    AccessCode, CODE_CHARSET, CODE_PREFIX, CODE_SUFFIX_LEN, MAX_BATCH_SIZE,
    MAX_CONSECUTIVE_COLLISIONS, MIN_BATCH_SIZE, new_batch_id,
};
use crate::error::AccessCodeError;

fn random_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect();
    format!("{CODE_PREFIX}{suffix}")
}

pub struct GenerateCodesInput {
    pub count: u32,
    pub batch_id: Option<String>,
}

pub struct GenerateCodesOutput {
    pub codes: Vec<String>,
    pub batch_id: String,
}

pub struct GenerateCodesUseCase<R: AccessCodeRepository> {
    pub repo: R,
    /// Consecutive collisions tolerated before aborting the batch.
    pub max_consecutive_collisions: u32,
}

impl<R: AccessCodeRepository> GenerateCodesUseCase<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            max_consecutive_collisions: MAX_CONSECUTIVE_COLLISIONS,
        }
    }

    pub async fn execute(
        &self,
        input: GenerateCodesInput,
    ) -> Result<GenerateCodesOutput, AccessCodeError> {
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&input.count) {
            return Err(AccessCodeError::InvalidCount);
        }

        let batch_id = input
            .batch_id
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| new_batch_id(Utc::now()));

        let mut codes: Vec<String> = Vec::with_capacity(input.count as usize);
        let mut consecutive_collisions = 0u32;

        while (codes.len() as u32) < input.count {
            let code = random_code();
            let record = AccessCode {
                id: Uuid::now_v7(),
                code: code.clone(),
                batch_id: batch_id.clone(),
                is_used: false,
                used_at: None,
                used_by_ip: None,
                created_at: Utc::now(),
            };

            if self.repo.insert_if_absent(&record).await? {
                codes.push(code);
                consecutive_collisions = 0;
            } else {
                // Collision with an existing code: redraw. Bounded so a
                // depleted keyspace surfaces instead of spinning.
                consecutive_collisions += 1;
                if consecutive_collisions >= self.max_consecutive_collisions {
                    tracing::warn!(
                        created = codes.len(),
                        requested = input.count,
                        batch_id = %batch_id,
                        "code generation exhausted"
                    );
                    return Err(AccessCodeError::GenerationExhausted {
                        created: codes.len(),
                    });
                }
            }
        }

        Ok(GenerateCodesOutput { codes, batch_id })
    }
}
