use chrono::Utc;
use metrohost_core::{FieldKind, FieldValue, SubmissionRecord};
use thiserror::Error;
use tracing::{info, warn};

use crate::fallback::{SnapshotStore, FALLBACK_KEY};
use crate::gateway::SubmissionGateway;
use crate::state::WizardState;
use crate::steps::{qualification_steps, StepDefinition};
use crate::validate::{validate_step, StepValidation};

/// Acknowledgment shown when the orchestrator confirms delivery.
pub const SUCCESS_ACKNOWLEDGMENT: &str = "Thank you for your application! \
    We'll review your space and reach out with a free income projection and next steps.";

/// Acknowledgment shown when delivery failed but the local snapshot holds the
/// input. Deliberately reassuring and non-blocking.
pub const FALLBACK_ACKNOWLEDGMENT: &str = "Application saved locally. We'll contact you soon!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardPhase {
    Collecting,
    Submitted,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {step} has invalid fields")]
    StepInvalid { step: usize, validation: StepValidation },
    #[error("Please check the consent checkbox to continue.")]
    ConsentRequired,
    #[error("submission is only available from the final step")]
    NotAtFinalStep,
    #[error("wizard was already submitted")]
    AlreadySubmitted,
}

/// What the engine reports back to the UI layer after a submission attempt.
/// `delivered` is true only for a server-confirmed success; every other path
/// still acknowledges and relies on the local snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub acknowledgment: &'static str,
    pub delivered: bool,
    pub application_id: Option<String>,
}

/// The multi-step intake state machine. States are step indices `1..=N` plus
/// a terminal submitted phase; transitions are `next`, `back`, and `submit`.
pub struct WizardEngine {
    steps: Vec<StepDefinition>,
    state: WizardState,
    phase: WizardPhase,
}

impl WizardEngine {
    pub fn qualification() -> Self {
        Self::with_steps(qualification_steps())
    }

    pub fn with_steps(steps: Vec<StepDefinition>) -> Self {
        Self { steps, state: WizardState::new(), phase: WizardPhase::Collecting }
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step()
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.state.set_field(name, value);
    }

    /// Run validation for the current step and replace the error set with the
    /// result, so stale marks never survive a pass.
    pub fn validate_current(&mut self) -> StepValidation {
        let step = &self.steps[self.state.current_step() - 1];
        let validation = validate_step(step, &self.state);
        self.state.replace_errors(validation.failed_fields());
        validation
    }

    /// Advance one step. Gated on validation of the current step only; a
    /// no-op at the final step (the UI exposes submit there instead).
    pub fn next(&mut self) -> Result<usize, WizardError> {
        let current = self.state.current_step();
        let validation = self.validate_current();
        if !validation.is_valid() {
            return Err(WizardError::StepInvalid { step: current, validation });
        }

        if current < self.steps.len() {
            self.state.set_current_step(current + 1);
        }
        Ok(self.state.current_step())
    }

    /// Go back one step. Never validates; entered values persist. A no-op at
    /// the first step.
    pub fn back(&mut self) -> usize {
        let current = self.state.current_step();
        if current > 1 {
            self.state.set_current_step(current - 1);
        }
        self.state.current_step()
    }

    /// Finalize the flow: validate the last step, snapshot the collected
    /// answers locally, then deliver the canonical record through the
    /// gateway. Delivery failure degrades to the fallback acknowledgment
    /// instead of surfacing an error to the user.
    pub async fn submit(
        &mut self,
        snapshots: &dyn SnapshotStore,
        gateway: &dyn SubmissionGateway,
    ) -> Result<SubmissionReceipt, WizardError> {
        if self.phase == WizardPhase::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }

        let current = self.state.current_step();
        if current != self.steps.len() {
            return Err(WizardError::NotAtFinalStep);
        }

        let validation = self.validate_current();
        if !validation.is_valid() {
            return Err(WizardError::StepInvalid { step: current, validation });
        }

        let declares_consent = self
            .steps
            .last()
            .is_some_and(|step| step.fields.iter().any(|field| {
                field.name == "consent" && field.kind == FieldKind::Checkbox
            }));
        if declares_consent && !self.state.is_checked("consent") {
            return Err(WizardError::ConsentRequired);
        }

        let flattened = self.state.flatten();
        if let Err(error) = snapshots.save(FALLBACK_KEY, &flattened) {
            warn!(
                event_name = "wizard.submit.snapshot_failed",
                error = %error,
                "local fallback snapshot could not be written; continuing with delivery"
            );
        }

        let record = SubmissionRecord::from_fields(&flattened, Utc::now());
        self.phase = WizardPhase::Submitted;

        match gateway.submit(&record).await {
            Ok(response) if response.success => {
                info!(
                    event_name = "wizard.submit.delivered",
                    application_id = response.application_id.as_deref().unwrap_or("unknown"),
                    "submission confirmed by orchestrator"
                );
                Ok(SubmissionReceipt {
                    acknowledgment: SUCCESS_ACKNOWLEDGMENT,
                    delivered: true,
                    application_id: response.application_id,
                })
            }
            Ok(response) => {
                warn!(
                    event_name = "wizard.submit.rejected",
                    message = %response.message,
                    "orchestrator rejected submission; relying on local snapshot"
                );
                Ok(SubmissionReceipt {
                    acknowledgment: FALLBACK_ACKNOWLEDGMENT,
                    delivered: false,
                    application_id: None,
                })
            }
            Err(error) => {
                warn!(
                    event_name = "wizard.submit.transport_failed",
                    error = %error,
                    "submission delivery failed; relying on local snapshot"
                );
                Ok(SubmissionReceipt {
                    acknowledgment: FALLBACK_ACKNOWLEDGMENT,
                    delivered: false,
                    application_id: None,
                })
            }
        }
    }

    /// Return to step 1 with all values and error marks cleared. The UI
    /// applies its post-acknowledgment delay before calling this.
    pub fn reset(&mut self) {
        self.state = WizardState::new();
        self.phase = WizardPhase::Collecting;
    }
}
