//! ClawForge certification domain logic.
//!
//! Pure, I/O-free building blocks shared by the persistence, pipeline and API
//! crates:
//!
//! - [`archive`] -- in-memory skill archive inspection with root resolution.
//! - [`scoring`] -- the five-criterion static Silver quality score.
//! - [`bronze`] -- strict/lenient `SKILL.md` manifest validation.
//! - [`certification`] -- levels, lifecycle statuses and hierarchy rules.
//! - [`criteria`] -- auto-checkable criterion rules resolved at catalog load.
//! - [`status`] -- certification progress and upgrade eligibility math.

pub mod archive;
pub mod bronze;
pub mod certification;
pub mod criteria;
pub mod error;
pub mod roles;
pub mod scoring;
pub mod status;
pub mod types;

#[cfg(test)]
mod test_support;
