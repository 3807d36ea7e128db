//! Certification notifications.
//!
//! - [`CertificationNotice`] -- what happened to a skill's certification.
//! - [`CertificationNotifier`] -- the delivery seam the pipeline calls.
//! - [`EmailNotifier`] -- SMTP delivery to the skill's creator.
//! - [`LogNotifier`] -- structured-log fallback when SMTP is not configured.
//! - [`build_notifier`] -- picks one of the above once at startup.

pub mod delivery;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use notifier::{
    build_notifier, CertificationNotice, CertificationNotifier, EmailNotifier, LogNotifier,
    Notification, NotifyError,
};
