//! Notification channel - outbound email for intake submissions
//!
//! This crate provides the email interface for the intake pipeline:
//! - **Messages** (`message`) - the outbound email model
//! - **Templates** (`templates`) - HTML bodies for operator and submitter mail
//! - **Transport** (`transport`) - `Mailer` trait, HTTP-API and noop transports
//!
//! # Architecture
//!
//! ```text
//! SubmissionRecord → MailTemplates → OutboundEmail → Mailer → mail API
//! ```
//!
//! Two messages are produced per accepted submission: a notification to the
//! operator address and an acknowledgment to the submitter. Delivery policy
//! (fatal vs. non-fatal) is owned by the orchestrator, not this crate.

pub mod message;
pub mod templates;
pub mod transport;

pub use message::OutboundEmail;
pub use templates::MailTemplates;
pub use transport::{HttpApiMailer, MailError, Mailer, NoopMailer};
