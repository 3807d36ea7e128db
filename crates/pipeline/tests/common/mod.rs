//! Test doubles for the certification pipeline: an in-memory store with the
//! same conditional-update semantics as PostgreSQL, a static archive fetcher
//! and a recording notifier.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use clawforge_core::bronze::ManifestValidator;
use clawforge_core::certification::{
    CertificationLevel, QueueStatus, RequestStatus, SkillStatus,
};
use clawforge_core::types::DbId;
use clawforge_db::models::certification_check::{SkillCertificationCheck, UpsertCertificationCheck};
use clawforge_db::models::certification_criteria::CertificationCriterion;
use clawforge_db::models::certification_request::{
    CertificationRequest, CreateCertificationRequest, DecideCertificationRequest,
};
use clawforge_db::models::skill::{Skill, SkillTransition};
use clawforge_db::models::skill_certification::{CreateSkillCertification, SkillCertification};
use clawforge_db::models::validation_queue::{
    ClaimValidationRun, CompleteValidationRun, RecordQueueDecision, ValidationQueueEntry,
};
use clawforge_events::{CertificationNotifier, Notification, NotifyError};
use clawforge_pipeline::{
    ArchiveFetcher, CertificationOrchestrator, CertificationStatusResolver, CertificationStore,
    FetchError, PipelineConfig,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const CREATOR_ID: DbId = 10;
pub const REVIEWER_ID: DbId = 20;

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct State {
    next_id: DbId,
    skills: HashMap<DbId, Skill>,
    queue: HashMap<DbId, ValidationQueueEntry>,
    history: Vec<SkillCertification>,
    criteria: Vec<CertificationCriterion>,
    checks: Vec<SkillCertificationCheck>,
    requests: Vec<CertificationRequest>,
}

impl State {
    fn id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

/// The catalog seeded by the migrations.
const CATALOG: &[(&str, &str, bool)] = &[
    ("silver", "quality_score", true),
    ("silver", "documentation_review", false),
    ("silver", "code_review", false),
    ("silver", "security_review", false),
    ("silver", "test_review", false),
    ("silver", "license_review", false),
    ("silver", "support_contact", false),
    ("gold", "silver_validated", true),
    ("gold", "sales_minimum", true),
    ("gold", "high_rating", true),
    ("gold", "production_review", false),
    ("gold", "support_track_record", false),
];

impl MemoryStore {
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (index, (level, name, auto)) in CATALOG.iter().enumerate() {
                let id = state.id();
                let now = Utc::now();
                state.criteria.push(CertificationCriterion {
                    id,
                    level: level.to_string(),
                    name: name.to_string(),
                    description: None,
                    auto_checkable: *auto,
                    weight: 1,
                    sort_order: index as i32,
                    created_at: now,
                    updated_at: now,
                });
            }
        }
        store
    }

    pub fn insert_skill(
        &self,
        status: SkillStatus,
        certification: CertificationLevel,
        archive_url: Option<&str>,
    ) -> DbId {
        let mut state = self.state.lock().unwrap();
        let id = state.id();
        let now = Utc::now();
        state.skills.insert(
            id,
            Skill {
                id,
                creator_id: CREATOR_ID,
                name: format!("skill-{id}"),
                archive_url: archive_url.map(str::to_string),
                status: status.as_str().to_string(),
                certification: certification.as_str().to_string(),
                quality_score: 0,
                sales_count: 0,
                average_rating: 0.0,
                published_at: None,
                certified_at: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn update_skill(&self, id: DbId, edit: impl FnOnce(&mut Skill)) {
        let mut state = self.state.lock().unwrap();
        edit(state.skills.get_mut(&id).expect("skill exists"));
    }

    pub fn skill(&self, id: DbId) -> Skill {
        self.state.lock().unwrap().skills[&id].clone()
    }

    pub fn queue(&self, skill_id: DbId) -> Option<ValidationQueueEntry> {
        self.state.lock().unwrap().queue.get(&skill_id).cloned()
    }

    pub fn update_queue(&self, skill_id: DbId, edit: impl FnOnce(&mut ValidationQueueEntry)) {
        let mut state = self.state.lock().unwrap();
        edit(state.queue.get_mut(&skill_id).expect("queue entry exists"));
    }

    pub fn request(&self, id: DbId) -> CertificationRequest {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .expect("request exists")
    }

    pub fn update_request(&self, id: DbId, edit: impl FnOnce(&mut CertificationRequest)) {
        let mut state = self.state.lock().unwrap();
        edit(
            state
                .requests
                .iter_mut()
                .find(|r| r.id == id)
                .expect("request exists"),
        );
    }

    /// What a reviewer's rejection leaves behind on the skill and its queue entry.
    pub fn reject_directly(&self, skill_id: DbId, reason: &str) {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        if let Some(skill) = state.skills.get_mut(&skill_id) {
            skill.status = SkillStatus::Rejected.as_str().to_string();
            skill.updated_at = now;
        }
        if let Some(entry) = state.queue.get_mut(&skill_id) {
            entry.status = QueueStatus::Rejected.as_str().to_string();
            entry.rejection_reason = Some(reason.to_string());
            entry.processed_by = Some(REVIEWER_ID);
            entry.processed_at = Some(now);
            entry.updated_at = now;
        }
    }

    pub fn history_for(&self, skill_id: DbId) -> Vec<SkillCertification> {
        self.state
            .lock()
            .unwrap()
            .history
            .iter()
            .filter(|h| h.skill_id == skill_id)
            .cloned()
            .collect()
    }

    pub fn criterion_id(&self, name: &str) -> DbId {
        self.state
            .lock()
            .unwrap()
            .criteria
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .expect("criterion is seeded")
    }

    pub fn criterion_ids(&self, level: CertificationLevel) -> Vec<DbId> {
        self.state
            .lock()
            .unwrap()
            .criteria
            .iter()
            .filter(|c| c.level == level.as_str())
            .map(|c| c.id)
            .collect()
    }
}

#[async_trait]
impl CertificationStore for MemoryStore {
    async fn find_skill(&self, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        Ok(self.state.lock().unwrap().skills.get(&id).cloned())
    }

    async fn apply_transition(
        &self,
        id: DbId,
        transition: &SkillTransition,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let Some(skill) = state.skills.get_mut(&id) else {
            return Ok(None);
        };
        if transition
            .expected_status
            .is_some_and(|s| s.as_str() != skill.status)
            || transition
                .expected_certification
                .is_some_and(|c| c.as_str() != skill.certification)
        {
            return Ok(None);
        }
        let now = Utc::now();
        if let Some(status) = transition.status {
            skill.status = status.as_str().to_string();
        }
        if let Some(level) = transition.certification {
            if level.as_str() != skill.certification {
                skill.certified_at = (level != CertificationLevel::None).then_some(now);
            }
            skill.certification = level.as_str().to_string();
        }
        if transition.mark_published && skill.published_at.is_none() {
            skill.published_at = Some(now);
        }
        skill.updated_at = now;
        Ok(Some(skill.clone()))
    }

    async fn update_quality_score(&self, id: DbId, quality_score: i32) -> Result<(), sqlx::Error> {
        if let Some(skill) = self.state.lock().unwrap().skills.get_mut(&id) {
            skill.quality_score = quality_score.clamp(0, 100);
        }
        Ok(())
    }

    async fn mark_processing(
        &self,
        input: &ClaimValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let skill_matches = state.skills.get(&input.skill_id).is_some_and(|s| {
            s.status == input.expected_status.as_str()
                && s.certification == input.expected_certification.as_str()
        });
        if !skill_matches {
            return Ok(None);
        }
        let now = Utc::now();
        let existing = state.queue.get(&input.skill_id).cloned();
        if let Some(existing) = &existing {
            let live = (now - existing.updated_at).num_seconds() < input.stale_after_secs;
            if existing.status == QueueStatus::Processing.as_str() && live {
                return Ok(None);
            }
        }
        let (id, created_at) = match existing {
            Some(q) => (q.id, q.created_at),
            None => (state.id(), now),
        };
        let entry = ValidationQueueEntry {
            id,
            skill_id: input.skill_id,
            status: QueueStatus::Processing.as_str().to_string(),
            bronze_score: None,
            silver_score: None,
            score_breakdown: None,
            bronze_errors: serde_json::json!([]),
            bronze_warnings: serde_json::json!([]),
            archive_sha256: None,
            rejection_reason: None,
            processed_by: None,
            processed_at: None,
            created_at,
            updated_at: now,
        };
        state.queue.insert(input.skill_id, entry.clone());
        Ok(Some(entry))
    }

    async fn complete_run(
        &self,
        input: &CompleteValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let Some(entry) = state
            .queue
            .get_mut(&input.skill_id)
            .filter(|q| q.status == QueueStatus::Processing.as_str())
        else {
            return Ok(None);
        };
        let now = Utc::now();
        entry.status = input.status.as_str().to_string();
        entry.bronze_score = input.bronze_score;
        entry.silver_score = input.silver_score;
        entry.score_breakdown = input.score_breakdown.clone();
        entry.bronze_errors = input.bronze_errors.clone();
        entry.bronze_warnings = input.bronze_warnings.clone();
        entry.archive_sha256 = input.archive_sha256.clone();
        entry.rejection_reason = input.rejection_reason.clone();
        entry.processed_by = None;
        entry.processed_at = Some(now);
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn record_queue_decision(
        &self,
        input: &RecordQueueDecision,
    ) -> Result<ValidationQueueEntry, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let id = state
            .queue
            .get(&input.skill_id)
            .map(|q| q.id)
            .unwrap_or_else(|| state.id());
        let now = Utc::now();
        let entry = state
            .queue
            .entry(input.skill_id)
            .or_insert_with(|| ValidationQueueEntry {
                id,
                skill_id: input.skill_id,
                status: String::new(),
                bronze_score: None,
                silver_score: None,
                score_breakdown: None,
                bronze_errors: serde_json::json!([]),
                bronze_warnings: serde_json::json!([]),
                archive_sha256: None,
                rejection_reason: None,
                processed_by: None,
                processed_at: None,
                created_at: now,
                updated_at: now,
            });
        entry.status = input.status.as_str().to_string();
        entry.rejection_reason = input.rejection_reason.clone();
        entry.processed_by = Some(input.processed_by);
        entry.processed_at = Some(now);
        entry.updated_at = now;
        Ok(entry.clone())
    }

    async fn find_queue_entry(
        &self,
        skill_id: DbId,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        Ok(self.queue(skill_id))
    }

    async fn append_certification(
        &self,
        input: &CreateSkillCertification,
    ) -> Result<SkillCertification, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let row = SkillCertification {
            id: state.id(),
            skill_id: input.skill_id,
            level: input.level.as_str().to_string(),
            granted_by: input.granted_by,
            notes: input.notes.clone(),
            score_snapshot: input.score_snapshot.clone(),
            created_at: now,
            updated_at: now,
        };
        state.history.push(row.clone());
        Ok(row)
    }

    async fn list_certifications(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertification>, sqlx::Error> {
        let mut rows = self.history_for(skill_id);
        rows.reverse();
        Ok(rows)
    }

    async fn list_criteria(
        &self,
        level: CertificationLevel,
    ) -> Result<Vec<CertificationCriterion>, sqlx::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .criteria
            .iter()
            .filter(|c| c.level == level.as_str())
            .cloned()
            .collect())
    }

    async fn find_criterion(
        &self,
        id: DbId,
    ) -> Result<Option<CertificationCriterion>, sqlx::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .criteria
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_checks(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertificationCheck>, sqlx::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .checks
            .iter()
            .filter(|c| c.skill_id == skill_id)
            .cloned()
            .collect())
    }

    async fn upsert_check(
        &self,
        input: &UpsertCertificationCheck,
    ) -> Result<SkillCertificationCheck, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        state
            .checks
            .retain(|c| !(c.skill_id == input.skill_id && c.criterion_id == input.criterion_id));
        let row = SkillCertificationCheck {
            id: state.id(),
            skill_id: input.skill_id,
            criterion_id: input.criterion_id,
            status: input.status.as_str().to_string(),
            value: input.value.clone(),
            checked_by: input.checked_by,
            checked_at: now,
            created_at: now,
            updated_at: now,
        };
        state.checks.push(row.clone());
        Ok(row)
    }

    async fn find_request(&self, id: DbId) -> Result<Option<CertificationRequest>, sqlx::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_pending_request(
        &self,
        skill_id: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.skill_id == skill_id && r.status == RequestStatus::Pending.as_str())
            .cloned())
    }

    async fn list_pending_requests(&self) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending.as_str())
            .cloned()
            .collect())
    }

    async fn create_request(
        &self,
        input: &CreateCertificationRequest,
    ) -> Result<CertificationRequest, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let row = CertificationRequest {
            id: state.id(),
            skill_id: input.skill_id,
            requested_level: input.requested_level.as_str().to_string(),
            requested_by: input.requested_by,
            quality_score_snapshot: input.quality_score_snapshot,
            status: RequestStatus::Pending.as_str().to_string(),
            reviewed_by: None,
            reviewed_at: None,
            feedback: None,
            created_at: now,
            updated_at: now,
        };
        state.requests.push(row.clone());
        Ok(row)
    }

    async fn decide_request(
        &self,
        id: DbId,
        input: &DecideCertificationRequest,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let Some(request) = state
            .requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending.as_str())
        else {
            return Ok(None);
        };
        request.status = input.status.as_str().to_string();
        request.reviewed_by = Some(input.reviewed_by);
        request.reviewed_at = Some(Utc::now());
        request.feedback = input.feedback.clone();
        Ok(Some(request.clone()))
    }

    async fn reject_pending_requests(
        &self,
        skill_id: DbId,
        reviewed_by: DbId,
        feedback: &str,
    ) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let mut closed = Vec::new();
        for request in state
            .requests
            .iter_mut()
            .filter(|r| r.skill_id == skill_id && r.status == RequestStatus::Pending.as_str())
        {
            request.status = RequestStatus::Rejected.as_str().to_string();
            request.reviewed_by = Some(reviewed_by);
            request.reviewed_at = Some(now);
            request.feedback = Some(feedback.to_string());
            closed.push(request.clone());
        }
        Ok(closed)
    }

    async fn reopen_request(
        &self,
        id: DbId,
        reviewed_by: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        let Some(request) = state.requests.iter_mut().find(|r| {
            r.id == id
                && r.status == RequestStatus::Approved.as_str()
                && r.reviewed_by == Some(reviewed_by)
        }) else {
            return Ok(None);
        };
        request.status = RequestStatus::Pending.as_str().to_string();
        request.reviewed_by = None;
        request.reviewed_at = None;
        request.feedback = None;
        Ok(Some(request.clone()))
    }
}

// ---------------------------------------------------------------------------
// Racing store
// ---------------------------------------------------------------------------

/// Store calls at which a concurrent writer can be made to cut in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePoint {
    MarkProcessing,
    ApplyTransition,
    UpdateQualityScore,
    DecideRequest,
}

type Interleaving = Box<dyn FnOnce(&MemoryStore) + Send>;

/// Wraps a [`MemoryStore`] and runs a one-shot write against it right before
/// the chosen call, emulating another request committing in between.
pub struct RacingStore {
    inner: Arc<MemoryStore>,
    pending: Mutex<Option<(RacePoint, Interleaving)>>,
}

impl RacingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            pending: Mutex::new(None),
        }
    }

    pub fn cut_in(&self, at: RacePoint, write: impl FnOnce(&MemoryStore) + Send + 'static) {
        *self.pending.lock().unwrap() = Some((at, Box::new(write)));
    }

    pub fn has_fired(&self) -> bool {
        self.pending.lock().unwrap().is_none()
    }

    fn reach(&self, point: RacePoint) {
        let write = {
            let mut pending = self.pending.lock().unwrap();
            match pending.take() {
                Some((at, write)) if at == point => Some(write),
                other => {
                    *pending = other;
                    None
                }
            }
        };
        if let Some(write) = write {
            write(&self.inner);
        }
    }
}

#[async_trait]
impl CertificationStore for RacingStore {
    async fn find_skill(&self, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        self.inner.find_skill(id).await
    }

    async fn apply_transition(
        &self,
        id: DbId,
        transition: &SkillTransition,
    ) -> Result<Option<Skill>, sqlx::Error> {
        self.reach(RacePoint::ApplyTransition);
        self.inner.apply_transition(id, transition).await
    }

    async fn update_quality_score(&self, id: DbId, quality_score: i32) -> Result<(), sqlx::Error> {
        self.reach(RacePoint::UpdateQualityScore);
        self.inner.update_quality_score(id, quality_score).await
    }

    async fn mark_processing(
        &self,
        input: &ClaimValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        self.reach(RacePoint::MarkProcessing);
        self.inner.mark_processing(input).await
    }

    async fn complete_run(
        &self,
        input: &CompleteValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        self.inner.complete_run(input).await
    }

    async fn record_queue_decision(
        &self,
        input: &RecordQueueDecision,
    ) -> Result<ValidationQueueEntry, sqlx::Error> {
        self.inner.record_queue_decision(input).await
    }

    async fn find_queue_entry(
        &self,
        skill_id: DbId,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        self.inner.find_queue_entry(skill_id).await
    }

    async fn append_certification(
        &self,
        input: &CreateSkillCertification,
    ) -> Result<SkillCertification, sqlx::Error> {
        self.inner.append_certification(input).await
    }

    async fn list_certifications(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertification>, sqlx::Error> {
        self.inner.list_certifications(skill_id).await
    }

    async fn list_criteria(
        &self,
        level: CertificationLevel,
    ) -> Result<Vec<CertificationCriterion>, sqlx::Error> {
        self.inner.list_criteria(level).await
    }

    async fn find_criterion(
        &self,
        id: DbId,
    ) -> Result<Option<CertificationCriterion>, sqlx::Error> {
        self.inner.find_criterion(id).await
    }

    async fn list_checks(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertificationCheck>, sqlx::Error> {
        self.inner.list_checks(skill_id).await
    }

    async fn upsert_check(
        &self,
        input: &UpsertCertificationCheck,
    ) -> Result<SkillCertificationCheck, sqlx::Error> {
        self.inner.upsert_check(input).await
    }

    async fn find_request(&self, id: DbId) -> Result<Option<CertificationRequest>, sqlx::Error> {
        self.inner.find_request(id).await
    }

    async fn find_pending_request(
        &self,
        skill_id: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        self.inner.find_pending_request(skill_id).await
    }

    async fn list_pending_requests(&self) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        self.inner.list_pending_requests().await
    }

    async fn create_request(
        &self,
        input: &CreateCertificationRequest,
    ) -> Result<CertificationRequest, sqlx::Error> {
        self.inner.create_request(input).await
    }

    async fn decide_request(
        &self,
        id: DbId,
        input: &DecideCertificationRequest,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        self.reach(RacePoint::DecideRequest);
        self.inner.decide_request(id, input).await
    }

    async fn reject_pending_requests(
        &self,
        skill_id: DbId,
        reviewed_by: DbId,
        feedback: &str,
    ) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        self.inner
            .reject_pending_requests(skill_id, reviewed_by, feedback)
            .await
    }

    async fn reopen_request(
        &self,
        id: DbId,
        reviewed_by: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        self.inner.reopen_request(id, reviewed_by).await
    }
}

// ---------------------------------------------------------------------------
// Fetcher and notifier doubles
// ---------------------------------------------------------------------------

/// Serves archives from a fixed URL map; unknown URLs answer HTTP 404.
#[derive(Default)]
pub struct StaticFetcher {
    archives: Mutex<HashMap<String, Vec<u8>>>,
}

impl StaticFetcher {
    pub fn serve(&self, url: &str, bytes: Vec<u8>) {
        self.archives.lock().unwrap().insert(url.to_string(), bytes);
    }
}

#[async_trait]
impl ArchiveFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.archives
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

/// Records every notification; optionally fails each delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.notice.kind())
            .collect()
    }
}

#[async_trait]
impl CertificationNotifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotifyError::UnknownRecipient(notification.creator_id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub fetcher: Arc<StaticFetcher>,
    pub notifier: Arc<RecordingNotifier>,
    pub orchestrator: CertificationOrchestrator,
    pub resolver: CertificationStatusResolver,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(PipelineConfig::default(), RecordingNotifier::default())
    }

    pub fn with(config: PipelineConfig, notifier: RecordingNotifier) -> Self {
        let store = Arc::new(MemoryStore::seeded());
        Self::build(config, notifier, store.clone(), store)
    }

    /// A harness whose orchestrator talks to the store through a [`RacingStore`].
    pub fn racing() -> (Self, Arc<RacingStore>) {
        let store = Arc::new(MemoryStore::seeded());
        let racing = Arc::new(RacingStore::new(store.clone()));
        let harness = Self::build(
            PipelineConfig::default(),
            RecordingNotifier::default(),
            store,
            racing.clone(),
        );
        (harness, racing)
    }

    fn build(
        config: PipelineConfig,
        notifier: RecordingNotifier,
        store: Arc<MemoryStore>,
        backend: Arc<dyn CertificationStore>,
    ) -> Self {
        let fetcher = Arc::new(StaticFetcher::default());
        let notifier = Arc::new(notifier);
        let orchestrator = CertificationOrchestrator::new(
            backend.clone(),
            fetcher.clone(),
            Arc::new(ManifestValidator),
            notifier.clone(),
            config,
        );
        let resolver = CertificationStatusResolver::new(backend);
        Self {
            store,
            fetcher,
            notifier,
            orchestrator,
            resolver,
        }
    }

    /// A pending skill whose archive is served at a unique URL.
    pub fn submit(&self, archive: Vec<u8>) -> DbId {
        let id = self
            .store
            .insert_skill(SkillStatus::Pending, CertificationLevel::None, None);
        let url = format!("https://files.example.com/skill-{id}.zip");
        self.store
            .update_skill(id, |s| s.archive_url = Some(url.clone()));
        self.fetcher.serve(&url, archive);
        id
    }
}

// ---------------------------------------------------------------------------
// Archives
// ---------------------------------------------------------------------------

pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, contents) in entries {
        writer
            .start_file(*path, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn filler_words(n: usize) -> String {
    vec!["lorem"; n].join(" ")
}

/// Passes Bronze and scores 82:
/// structure 20, documentation 18, tests 10, code quality 14, security 20.
pub fn silver_candidate_archive() -> Vec<u8> {
    let readme = format!(
        "# Weather Lookup\n\n## Installation\nCopy the folder.\n\n## Usage\nAsk for the weather.\n\n## Examples\nweather in Paris\n\n## Configuration\nSet the API key.\n\n{}\n",
        filler_words(300)
    );
    build_zip(&[
        (
            "weather/SKILL.md",
            "---\nname: weather-lookup\nversion: 1.0.0\ndescription: Looks up the current weather for a city.\nlicense: MIT\n---\n# Weather\n",
        ),
        ("weather/README.md", &readme),
        ("weather/LICENSE", "MIT License"),
        ("weather/config/default.json", "{\"units\": \"metric\"}"),
        (
            "weather/scripts/run.sh",
            "#!/bin/sh\n# TODO cache responses\n# TODO retry on 429\n# FIXME units\ncurl \"$URL\"\n",
        ),
        (
            "weather/tests/test_run.py",
            "def test_run():\n    assert True\n",
        ),
    ])
}

/// Passes Bronze and scores 45:
/// structure 10, documentation 2, tests 0, code quality 18, security 15.
pub fn bronze_only_archive() -> Vec<u8> {
    build_zip(&[
        (
            "SKILL.md",
            "---\nname: tiny-skill\ndescription: Does exactly one small thing.\nlicense: MIT\n---\n",
        ),
        ("README.md", "# Tiny\nDoes one thing.\n"),
        ("main.py", "# TODO handle errors\nprint('hi')\n"),
        (
            "package.json",
            "{\"dependencies\": {\"colors\": \"1.4.0\", \"left-pad\": \"1.3.0\"}}",
        ),
    ])
}

/// No SKILL.md manifest: fails Bronze.
pub fn missing_manifest_archive() -> Vec<u8> {
    build_zip(&[("README.md", "# Nothing else here\n")])
}
