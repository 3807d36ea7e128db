//! Integration tests for the certification repositories.
//!
//! Run against a real database via `#[sqlx::test]`:
//! - Guarded skill transitions (compare-and-swap)
//! - One pending upgrade request per skill
//! - Validation queue claims and run completion
//! - Seeded criteria catalog

use sqlx::PgPool;
use clawforge_core::certification::{
    CertificationLevel, CheckStatus, QueueStatus, RequestStatus, SkillStatus,
};
use clawforge_db::models::certification_check::UpsertCertificationCheck;
use clawforge_db::models::certification_request::{
    CreateCertificationRequest, DecideCertificationRequest,
};
use clawforge_db::models::skill::{CreateSkill, Skill, SkillTransition};
use clawforge_db::models::skill_certification::CreateSkillCertification;
use clawforge_db::models::user::CreateUser;
use clawforge_db::models::validation_queue::{
    ClaimValidationRun, CompleteValidationRun, RecordQueueDecision,
};
use clawforge_db::repositories::{
    CertificationCheckRepo, CertificationCriteriaRepo, CertificationRequestRepo,
    SkillCertificationRepo, SkillRepo, UserRepo, ValidationQueueRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_skill(pool: &PgPool, status: SkillStatus) -> (i64, Skill) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("creator-{}@example.com", status.as_str()),
            display_name: "Creator".to_string(),
            role: None,
        },
    )
    .await
    .unwrap();
    let skill = SkillRepo::create(
        pool,
        &CreateSkill {
            creator_id: user.id,
            name: "weather-lookup".to_string(),
            archive_url: Some("https://files.example.com/weather.zip".to_string()),
            status: Some(status.as_str().to_string()),
        },
    )
    .await
    .unwrap();
    (user.id, skill)
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_skill_defaults(pool: PgPool) {
    let (_, skill) = seed_skill(&pool, SkillStatus::Pending).await;
    assert_eq!(skill.status().unwrap(), SkillStatus::Pending);
    assert_eq!(skill.certification_level().unwrap(), CertificationLevel::None);
    assert!(skill.certified_at.is_none());
    assert!(skill.published_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transition_applies_and_stamps_timestamps(pool: PgPool) {
    let (_, skill) = seed_skill(&pool, SkillStatus::Pending).await;

    let updated = SkillRepo::apply_transition(
        &pool,
        skill.id,
        &SkillTransition {
            expected_status: Some(SkillStatus::Pending),
            expected_certification: Some(CertificationLevel::None),
            status: Some(SkillStatus::Published),
            certification: Some(CertificationLevel::Bronze),
            mark_published: true,
        },
    )
    .await
    .unwrap()
    .expect("transition should apply");

    assert_eq!(updated.status, "published");
    assert_eq!(updated.certification, "bronze");
    assert!(updated.certified_at.is_some());
    assert!(updated.published_at.is_some());

    let reset = SkillRepo::apply_transition(
        &pool,
        skill.id,
        &SkillTransition {
            status: Some(SkillStatus::Rejected),
            certification: Some(CertificationLevel::None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(reset.certified_at.is_none());
    assert_eq!(reset.published_at, updated.published_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_transition_is_refused(pool: PgPool) {
    let (_, skill) = seed_skill(&pool, SkillStatus::Pending).await;

    let stale = SkillTransition {
        expected_status: Some(SkillStatus::Draft),
        status: Some(SkillStatus::Published),
        ..Default::default()
    };
    let result = SkillRepo::apply_transition(&pool, skill.id, &stale)
        .await
        .unwrap();
    assert!(result.is_none());

    let unchanged = SkillRepo::find_by_id(&pool, skill.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quality_score_is_clamped(pool: PgPool) {
    let (_, skill) = seed_skill(&pool, SkillStatus::Published).await;
    assert!(SkillRepo::update_quality_score(&pool, skill.id, 140).await.unwrap());
    let stored = SkillRepo::find_by_id(&pool, skill.id).await.unwrap().unwrap();
    assert_eq!(stored.quality_score, 100);
}

// ---------------------------------------------------------------------------
// Criteria and checks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeded_catalog_resolves(pool: PgPool) {
    let silver = CertificationCriteriaRepo::list_by_level(&pool, CertificationLevel::Silver)
        .await
        .unwrap();
    let gold = CertificationCriteriaRepo::list_by_level(&pool, CertificationLevel::Gold)
        .await
        .unwrap();
    assert_eq!(silver.len(), 7);
    assert_eq!(gold.len(), 5);
    assert_eq!(silver[0].name, "quality_score");

    for row in silver.iter().chain(gold.iter()) {
        row.to_definition()
            .unwrap_or_else(|e| panic!("criterion {} failed to resolve: {e}", row.name));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_upsert_overwrites(pool: PgPool) {
    let (reviewer, skill) = seed_skill(&pool, SkillStatus::Published).await;
    let criterion = CertificationCriteriaRepo::list_by_level(&pool, CertificationLevel::Silver)
        .await
        .unwrap()
        .remove(1);

    let mut input = UpsertCertificationCheck {
        skill_id: skill.id,
        criterion_id: criterion.id,
        status: CheckStatus::Failed,
        value: None,
        checked_by: Some(reviewer),
    };
    CertificationCheckRepo::upsert(&pool, &input).await.unwrap();
    input.status = CheckStatus::Passed;
    input.value = Some("README looks complete".to_string());
    CertificationCheckRepo::upsert(&pool, &input).await.unwrap();

    let checks = CertificationCheckRepo::list_for_skill(&pool, skill.id)
        .await
        .unwrap();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].status, "passed");
    assert_eq!(checks[0].to_recorded().unwrap().status, CheckStatus::Passed);
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_one_pending_request_per_skill(pool: PgPool) {
    let (creator, skill) = seed_skill(&pool, SkillStatus::Published).await;
    let input = CreateCertificationRequest {
        skill_id: skill.id,
        requested_level: CertificationLevel::Silver,
        requested_by: creator,
        quality_score_snapshot: 85,
    };

    let first = CertificationRequestRepo::create(&pool, &input).await.unwrap();
    let second = CertificationRequestRepo::create(&pool, &input).await;
    assert!(second.is_err(), "partial unique index must refuse a second pending request");

    let pending = CertificationRequestRepo::find_pending_for_skill(&pool, skill.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pending.id, first.id);

    let decided = CertificationRequestRepo::decide(
        &pool,
        first.id,
        &DecideCertificationRequest {
            status: RequestStatus::Rejected,
            reviewed_by: creator,
            feedback: Some("Add tests".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(decided.status, "rejected");
    assert!(decided.reviewed_at.is_some());

    // Already decided: a second decision does nothing.
    let again = CertificationRequestRepo::decide(
        &pool,
        first.id,
        &DecideCertificationRequest {
            status: RequestStatus::Approved,
            reviewed_by: creator,
            feedback: None,
        },
    )
    .await
    .unwrap();
    assert!(again.is_none());

    // Closing the pending request frees the slot.
    CertificationRequestRepo::create(&pool, &input).await.unwrap();
    let all = CertificationRequestRepo::list_for_skill(&pool, skill.id)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_requests_close_and_claimed_approval_reopens(pool: PgPool) {
    let (creator, skill) = seed_skill(&pool, SkillStatus::Published).await;
    let input = CreateCertificationRequest {
        skill_id: skill.id,
        requested_level: CertificationLevel::Silver,
        requested_by: creator,
        quality_score_snapshot: 85,
    };

    let request = CertificationRequestRepo::create(&pool, &input).await.unwrap();
    CertificationRequestRepo::decide(
        &pool,
        request.id,
        &DecideCertificationRequest {
            status: RequestStatus::Approved,
            reviewed_by: creator,
            feedback: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    // Only the reviewer holding the approval may reopen it.
    let other = CertificationRequestRepo::reopen(&pool, request.id, creator + 1000)
        .await
        .unwrap();
    assert!(other.is_none());
    let reopened = CertificationRequestRepo::reopen(&pool, request.id, creator)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.status, "pending");
    assert!(reopened.reviewed_by.is_none());

    let closed =
        CertificationRequestRepo::reject_pending_for_skill(&pool, skill.id, creator, "Skill rejected: spam")
            .await
            .unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].status, "rejected");
    assert_eq!(closed[0].feedback.as_deref(), Some("Skill rejected: spam"));
    assert!(CertificationRequestRepo::find_pending_for_skill(&pool, skill.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// History and queue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_is_append_only(pool: PgPool) {
    let (reviewer, skill) = seed_skill(&pool, SkillStatus::Published).await;
    for (level, granted_by) in [
        (CertificationLevel::Bronze, None),
        (CertificationLevel::Silver, Some(reviewer)),
    ] {
        SkillCertificationRepo::create(
            &pool,
            &CreateSkillCertification {
                skill_id: skill.id,
                level,
                granted_by,
                notes: None,
                score_snapshot: Some(serde_json::json!({ "silver_score": 82 })),
            },
        )
        .await
        .unwrap();
    }
    let history = SkillCertificationRepo::list_for_skill(&pool, skill.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].level, "silver");
}

fn claim(skill_id: i64, stale_after_secs: i64) -> ClaimValidationRun {
    ClaimValidationRun {
        skill_id,
        expected_status: SkillStatus::Pending,
        expected_certification: CertificationLevel::None,
        stale_after_secs,
    }
}

fn scored_run(skill_id: i64) -> CompleteValidationRun {
    CompleteValidationRun {
        skill_id,
        status: QueueStatus::PendingSilverReview,
        bronze_score: Some(95),
        silver_score: Some(82),
        score_breakdown: Some(serde_json::json!({ "structure": 20 })),
        bronze_errors: serde_json::json!([]),
        bronze_warnings: serde_json::json!([{ "message": "No README.md at archive root" }]),
        archive_sha256: Some("ab".repeat(32)),
        rejection_reason: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn queue_entry_lifecycle(pool: PgPool) {
    let (reviewer, skill) = seed_skill(&pool, SkillStatus::Pending).await;

    let processing = ValidationQueueRepo::mark_processing(&pool, &claim(skill.id, 900))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(processing.status, "processing");

    let scored = ValidationQueueRepo::complete_run(&pool, &scored_run(skill.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scored.id, processing.id);
    assert_eq!(scored.silver_score, Some(82));

    // The claim is spent once the outcome is written.
    let replay = ValidationQueueRepo::complete_run(&pool, &scored_run(skill.id))
        .await
        .unwrap();
    assert!(replay.is_none());

    let decided = ValidationQueueRepo::record_decision(
        &pool,
        &RecordQueueDecision {
            skill_id: skill.id,
            status: QueueStatus::SilverApproved,
            processed_by: reviewer,
            rejection_reason: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(decided.status, "silver_approved");
    assert_eq!(decided.silver_score, Some(82));
    assert_eq!(decided.processed_by, Some(reviewer));

    let rerun = ValidationQueueRepo::mark_processing(&pool, &claim(skill.id, 900))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rerun.silver_score, None);

    let listed = ValidationQueueRepo::list_by_status(&pool, QueueStatus::Processing)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_requires_expected_skill_state_and_no_live_run(pool: PgPool) {
    let (_, skill) = seed_skill(&pool, SkillStatus::Pending).await;

    let wrong_state = ClaimValidationRun {
        expected_status: SkillStatus::ChangesRequested,
        ..claim(skill.id, 900)
    };
    let refused = ValidationQueueRepo::mark_processing(&pool, &wrong_state)
        .await
        .unwrap();
    assert!(refused.is_none());
    assert!(ValidationQueueRepo::find_by_skill(&pool, skill.id)
        .await
        .unwrap()
        .is_none());

    ValidationQueueRepo::mark_processing(&pool, &claim(skill.id, 900))
        .await
        .unwrap()
        .unwrap();
    let duplicate = ValidationQueueRepo::mark_processing(&pool, &claim(skill.id, 900))
        .await
        .unwrap();
    assert!(duplicate.is_none());

    // A reviewer decision ends the claim; the run's outcome is then refused.
    ValidationQueueRepo::record_decision(
        &pool,
        &RecordQueueDecision {
            skill_id: skill.id,
            status: QueueStatus::Rejected,
            processed_by: skill.creator_id,
            rejection_reason: Some("malware".to_string()),
        },
    )
    .await
    .unwrap();
    let late = ValidationQueueRepo::complete_run(&pool, &scored_run(skill.id))
        .await
        .unwrap();
    assert!(late.is_none());
    let entry = ValidationQueueRepo::find_by_skill(&pool, skill.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.status, "rejected");
    assert_eq!(entry.rejection_reason.as_deref(), Some("malware"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn abandoned_claim_can_be_taken_over(pool: PgPool) {
    let (_, skill) = seed_skill(&pool, SkillStatus::Pending).await;

    ValidationQueueRepo::mark_processing(&pool, &claim(skill.id, 900))
        .await
        .unwrap()
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let takeover = ValidationQueueRepo::mark_processing(&pool, &claim(skill.id, 0))
        .await
        .unwrap();
    assert!(takeover.is_some());
}
