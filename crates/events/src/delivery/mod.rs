//! External delivery channels for certification notices.

pub mod email;
