//! Client side of the portal: a typed HTTP client and the stateful objects
//! behind the registration form, the status checker and the admin dashboard.

pub mod client;
pub mod dashboard;
pub mod presentation;
pub mod status_checker;
pub mod submission;

#[cfg(test)]
mod tests;

pub use client::{ClientError, PortalClient};
pub use dashboard::{AdminSession, DetailView, Notice, NoticeKind};
pub use presentation::{StatusIcon, StatusPresentation, Tone};
pub use status_checker::{StatusChecker, StatusOutcome};
pub use submission::{FormState, PersonalField, Slot, SubmissionForm};
