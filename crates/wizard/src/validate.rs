use std::collections::BTreeSet;

use metrohost_core::{FieldDescriptor, FieldKind};

use crate::state::WizardState;
use crate::steps::StepDefinition;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const OPTION_MESSAGE: &str = "Please select an option";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: String,
    pub message: &'static str,
}

/// Outcome of one validation pass over a step. Every failing field is
/// reported; the first failure is the focus target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepValidation {
    pub failures: Vec<FieldFailure>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn focus(&self) -> Option<&str> {
        self.failures.first().map(|failure| failure.field.as_str())
    }

    pub fn failed_fields(&self) -> BTreeSet<String> {
        self.failures.iter().map(|failure| failure.field.clone()).collect()
    }
}

/// A conditional field participates in validation only while visible, decided
/// from the live value of its controlling field on every pass.
pub fn is_visible(step: &StepDefinition, state: &WizardState, field: &str) -> bool {
    step.visibility
        .iter()
        .filter(|rule| rule.field == field)
        .all(|rule| state.text_value(&rule.controller) == rule.visible_when)
}

/// Validate the required, currently visible fields of one step. The step's
/// error set is recomputed from scratch by the caller, never accumulated.
pub fn validate_step(step: &StepDefinition, state: &WizardState) -> StepValidation {
    let mut validation = StepValidation::default();

    for descriptor in &step.fields {
        if !descriptor.required || !is_visible(step, state, &descriptor.name) {
            continue;
        }

        if let Some(message) = field_failure(descriptor, state) {
            validation
                .failures
                .push(FieldFailure { field: descriptor.name.clone(), message });
        }
    }

    validation
}

fn field_failure(descriptor: &FieldDescriptor, state: &WizardState) -> Option<&'static str> {
    match descriptor.kind {
        FieldKind::Checkbox => (!state.is_checked(&descriptor.name)).then_some(REQUIRED_MESSAGE),
        FieldKind::Radio | FieldKind::Select => {
            state.text_value(&descriptor.name).is_empty().then_some(OPTION_MESSAGE)
        }
        FieldKind::Text | FieldKind::Textarea | FieldKind::File => {
            state.text_value(&descriptor.name).trim().is_empty().then_some(REQUIRED_MESSAGE)
        }
        FieldKind::Email => {
            let value = state.text_value(&descriptor.name);
            if value.trim().is_empty() {
                Some(REQUIRED_MESSAGE)
            } else if !value.contains('@') {
                // Shallow on purpose; stricter parsing would reject
                // addresses existing callers rely on.
                Some(EMAIL_MESSAGE)
            } else {
                None
            }
        }
        FieldKind::Tel => {
            let value = state.text_value(&descriptor.name);
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Some(REQUIRED_MESSAGE)
            } else if trimmed.chars().count() < 10 {
                Some(PHONE_MESSAGE)
            } else {
                None
            }
        }
    }
}
