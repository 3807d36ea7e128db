//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token generation and validation. Tokens are
//!   issued by the marketplace identity service; this server only validates
//!   them (generation is used by tooling and tests).

pub mod jwt;
