//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod certification_check_repo;
pub mod certification_criteria_repo;
pub mod certification_request_repo;
pub mod skill_certification_repo;
pub mod skill_repo;
pub mod user_repo;
pub mod validation_queue_repo;

pub use certification_check_repo::CertificationCheckRepo;
pub use certification_criteria_repo::CertificationCriteriaRepo;
pub use certification_request_repo::CertificationRequestRepo;
pub use skill_certification_repo::SkillCertificationRepo;
pub use skill_repo::SkillRepo;
pub use user_repo::UserRepo;
pub use validation_queue_repo::ValidationQueueRepo;
