//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` or plain DTOs for inserts, upserts and conditional updates

pub mod certification_check;
pub mod certification_criteria;
pub mod certification_request;
pub mod skill;
pub mod skill_certification;
pub mod user;
pub mod validation_queue;
