//! Skill certification pipeline.
//!
//! - [`CertificationOrchestrator`] -- runs the automated Bronze/Silver pass and
//!   applies reviewer decisions (certify, reject, request changes, upgrade
//!   requests, manual criterion grades).
//! - [`CertificationStatusResolver`] -- progress towards the next level.
//! - [`CertificationStore`] -- persistence seam, implemented over PostgreSQL by
//!   [`PgCertificationStore`].
//! - [`ArchiveFetcher`] -- archive download seam, implemented over HTTP by
//!   [`HttpArchiveFetcher`].

pub mod config;
pub mod error;
pub mod fetcher;
pub mod orchestrator;
pub mod resolver;
pub mod store;

pub use config::PipelineConfig;
pub use error::CertificationError;
pub use fetcher::{ArchiveFetcher, FetchError, HttpArchiveFetcher};
pub use orchestrator::{CertificationOrchestrator, RunOutcome};
pub use resolver::{CertificationStatus, CertificationStatusResolver};
pub use store::{CertificationStore, PgCertificationStore};
