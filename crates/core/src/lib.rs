pub mod config;
pub mod domain;
pub mod errors;

pub use domain::contact::ContactMessage;
pub use domain::delivery::{DeliveryChannel, DeliveryOutcome, DeliveryStatus};
pub use domain::field::{FieldDescriptor, FieldKind, FieldValue};
pub use domain::record::{
    next_application_id, ContactSection, GoalsSection, PropertySection, SubmissionMetadata,
    SubmissionRecord, SUBMISSION_SOURCE, UNKNOWN_SENTINEL,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
