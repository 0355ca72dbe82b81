use std::collections::HashSet;

use bras_access_codes::error::AccessCodeError;
use bras_access_codes::usecase::generate::{GenerateCodesInput, GenerateCodesUseCase};

use crate::helpers::InMemoryCodeRepo;

#[tokio::test]
async fn should_generate_exact_count_sharing_one_batch() {
    let repo = InMemoryCodeRepo::new();
    let uc = GenerateCodesUseCase::new(repo.clone());

    let out = uc
        .execute(GenerateCodesInput {
            count: 5,
            batch_id: None,
        })
        .await
        .unwrap();

    assert_eq!(out.codes.len(), 5);
    let distinct: HashSet<_> = out.codes.iter().collect();
    assert_eq!(distinct.len(), 5, "returned codes must be distinct");

    let stored = repo.snapshot();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|c| c.batch_id == out.batch_id));
    assert!(stored.iter().all(|c| !c.is_used && c.used_at.is_none()));
}

#[tokio::test]
async fn should_never_persist_duplicate_codes_across_calls() {
    let repo = InMemoryCodeRepo::new();

    for _ in 0..20 {
        let uc = GenerateCodesUseCase::new(repo.clone());
        uc.execute(GenerateCodesInput {
            count: 10,
            batch_id: None,
        })
        .await
        .unwrap();
    }

    let stored = repo.snapshot();
    assert_eq!(stored.len(), 200);
    let distinct: HashSet<_> = stored.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(distinct.len(), 200, "persisted codes must be globally unique");
}

#[tokio::test]
async fn should_enforce_count_bounds_at_the_boundary() {
    let repo = InMemoryCodeRepo::new();

    for count in [0u32, 101] {
        let uc = GenerateCodesUseCase::new(repo.clone());
        let result = uc
            .execute(GenerateCodesInput {
                count,
                batch_id: None,
            })
            .await;
        assert!(
            matches!(result, Err(AccessCodeError::InvalidCount)),
            "count={count} must be rejected"
        );
    }
    assert!(repo.snapshot().is_empty(), "rejected calls must not write");

    for count in [1u32, 100] {
        let uc = GenerateCodesUseCase::new(InMemoryCodeRepo::new());
        let out = uc
            .execute(GenerateCodesInput {
                count,
                batch_id: None,
            })
            .await
            .unwrap();
        assert_eq!(out.codes.len(), count as usize);
    }
}

#[tokio::test]
async fn should_keep_caller_supplied_batch_id() {
    let uc = GenerateCodesUseCase::new(InMemoryCodeRepo::new());
    let out = uc
        .execute(GenerateCodesInput {
            count: 3,
            batch_id: Some("RELEASE-2026-08".into()),
        })
        .await
        .unwrap();
    assert_eq!(out.batch_id, "RELEASE-2026-08");
}
