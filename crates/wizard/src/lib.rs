//! Wizard Engine - multi-step intake form state machine
//!
//! This crate drives the guided qualification flow independently of any
//! rendering layer:
//! - **Steps** (`steps`) - static step and field definitions, visibility rules
//! - **State** (`state`) - per-session field values and error marks
//! - **Validation** (`validate`) - per-step, kind-specific field rules
//! - **Engine** (`engine`) - `next` / `back` / `submit` transitions
//! - **Fallback** (`fallback`) - local snapshot written before delivery
//! - **Gateway** (`gateway`) - HTTP submission to the orchestrator
//!
//! # Architecture
//!
//! ```text
//! user input → WizardState → validate(step) → next/back
//!                                 ↓ submit
//!                SnapshotStore ← flatten → SubmissionRecord → SubmissionGateway
//! ```
//!
//! Forward navigation is gated on validation of the current step only;
//! backward navigation is always permitted and preserves entered values.

pub mod engine;
pub mod fallback;
pub mod gateway;
pub mod state;
pub mod steps;
pub mod validate;

pub use engine::{SubmissionReceipt, WizardEngine, WizardError, WizardPhase};
pub use fallback::{FileSnapshotStore, InMemorySnapshotStore, SnapshotError, SnapshotStore, FALLBACK_KEY};
pub use gateway::{GatewayError, HttpSubmissionGateway, SubmissionGateway, SubmitResponse};
pub use state::WizardState;
pub use steps::{qualification_steps, StepDefinition, VisibilityRule};
pub use validate::{validate_step, FieldFailure, StepValidation};
