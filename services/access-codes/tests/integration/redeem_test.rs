use tokio::task::JoinSet;

use bras_access_codes::usecase::generate::{GenerateCodesInput, GenerateCodesUseCase};
use bras_access_codes::usecase::redeem::{RedeemCodeInput, RedeemCodeUseCase, RedemptionOutcome};

use crate::helpers::InMemoryCodeRepo;

async fn generate_one(repo: &InMemoryCodeRepo) -> String {
    let uc = GenerateCodesUseCase::new(repo.clone());
    let out = uc
        .execute(GenerateCodesInput {
            count: 1,
            batch_id: None,
        })
        .await
        .unwrap();
    out.codes.into_iter().next().unwrap()
}

#[tokio::test]
async fn should_redeem_exactly_once_under_concurrency() {
    let repo = InMemoryCodeRepo::new();
    let code = generate_one(&repo).await;

    let mut tasks = JoinSet::new();
    for _ in 0..50 {
        let repo = repo.clone();
        let code = code.clone();
        tasks.spawn(async move {
            let uc = RedeemCodeUseCase { repo };
            uc.execute(RedeemCodeInput {
                code,
                client_ip: None,
            })
            .await
            .unwrap()
        });
    }

    let mut successes = 0;
    let mut already_used = 0;
    while let Some(outcome) = tasks.join_next().await {
        match outcome.unwrap() {
            RedemptionOutcome::Success => successes += 1,
            RedemptionOutcome::AlreadyUsed => already_used += 1,
            RedemptionOutcome::NotFound => panic!("generated code reported NotFound"),
        }
    }

    assert_eq!(successes, 1, "exactly one concurrent redeem may win");
    assert_eq!(already_used, 49);

    let stored = repo.snapshot();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_used);
    assert!(stored[0].used_at.is_some(), "used_at set exactly once");
}

#[tokio::test]
async fn should_return_not_found_without_mutating_storage() {
    let repo = InMemoryCodeRepo::new();
    let _ = generate_one(&repo).await;
    let before = repo.snapshot();

    let uc = RedeemCodeUseCase { repo: repo.clone() };
    let outcome = uc
        .execute(RedeemCodeInput {
            code: "BRAS-ZZZZZZZZ".into(),
            client_ip: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome, RedemptionOutcome::NotFound);
    assert_eq!(repo.snapshot(), before, "a miss must not mutate the store");
}

#[tokio::test]
async fn should_stay_already_used_forever() {
    let repo = InMemoryCodeRepo::new();
    let code = generate_one(&repo).await;

    let uc = RedeemCodeUseCase { repo: repo.clone() };
    let first = uc
        .execute(RedeemCodeInput {
            code: code.clone(),
            client_ip: None,
        })
        .await
        .unwrap();
    assert_eq!(first, RedemptionOutcome::Success);

    for _ in 0..5 {
        let outcome = uc
            .execute(RedeemCodeInput {
                code: code.clone(),
                client_ip: None,
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            RedemptionOutcome::AlreadyUsed,
            "a consumed code must never flip back"
        );
    }
}

#[tokio::test]
async fn should_match_case_insensitively_and_record_ip() {
    let repo = InMemoryCodeRepo::new();
    let code = generate_one(&repo).await;

    let uc = RedeemCodeUseCase { repo: repo.clone() };
    let outcome = uc
        .execute(RedeemCodeInput {
            code: format!("  {} ", code.to_lowercase()),
            client_ip: Some("203.0.113.7".into()),
        })
        .await
        .unwrap();

    assert_eq!(outcome, RedemptionOutcome::Success);
    let stored = repo.snapshot();
    assert_eq!(stored[0].used_by_ip.as_deref(), Some("203.0.113.7"));
}
