use std::collections::{BTreeMap, BTreeSet};

use metrohost_core::FieldValue;

/// Mutable, session-scoped wizard state: the current step, every entered
/// field value, and the set of fields currently marked errored. Values
/// persist across navigation in both directions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    values: BTreeMap<String, FieldValue>,
    errors: BTreeSet<String>,
}

impl WizardState {
    pub fn new() -> Self {
        Self { current_step: 1, values: BTreeMap::new(), errors: BTreeSet::new() }
    }

    pub fn current_step(&self) -> usize {
        self.current_step.max(1)
    }

    pub(crate) fn set_current_step(&mut self, step: usize) {
        self.current_step = step.max(1);
    }

    /// Record a field edit. Editing a field clears that one field's error
    /// state immediately, independent of the next full validation pass.
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        self.errors.remove(&name);
        self.values.insert(name, value);
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text_value(&self, name: &str) -> &str {
        self.values.get(name).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(FieldValue::is_checked)
    }

    pub fn errors(&self) -> &BTreeSet<String> {
        &self.errors
    }

    pub(crate) fn replace_errors(&mut self, errors: BTreeSet<String>) {
        self.errors = errors;
    }

    /// Flattened `field name -> string` view used for the fallback snapshot
    /// and record assembly.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.flattened()))
            .collect()
    }
}
