use metrohost_core::{FieldDescriptor, FieldKind};

/// A conditional field is visible only while its controlling field currently
/// holds the expected value. Evaluated against live state on every
/// validation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityRule {
    pub field: String,
    pub controller: String,
    pub visible_when: String,
}

impl VisibilityRule {
    pub fn new(
        field: impl Into<String>,
        controller: impl Into<String>,
        visible_when: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            controller: controller.into(),
            visible_when: visible_when.into(),
        }
    }
}

/// One page of the wizard: an ordinal index, its field descriptors, and the
/// visibility rules for conditional fields embedded in it. Defined once at
/// flow construction and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepDefinition {
    pub index: usize,
    pub fields: Vec<FieldDescriptor>,
    pub visibility: Vec<VisibilityRule>,
}

impl StepDefinition {
    pub fn new(index: usize, fields: Vec<FieldDescriptor>) -> Self {
        Self { index, fields, visibility: Vec::new() }
    }

    pub fn with_visibility(mut self, rules: Vec<VisibilityRule>) -> Self {
        self.visibility = rules;
        self
    }
}

fn field(name: &str, kind: FieldKind, required: bool) -> FieldDescriptor {
    FieldDescriptor::new(name, kind, required)
}

/// The five-step qualification flow. Field names match the canonical record
/// assembly keys, so flattened state maps straight onto the wire shape.
pub fn qualification_steps() -> Vec<StepDefinition> {
    use FieldKind::{Checkbox, Email, File, Radio, Select, Tel, Text, Textarea};

    vec![
        StepDefinition::new(
            1,
            vec![
                field("full-name", Text, true),
                field("email", Email, true),
                field("phone", Tel, true),
                field("preferred-contact", Select, true),
                field("best-time", Select, false),
            ],
        ),
        StepDefinition::new(
            2,
            vec![
                field("city-zip", Text, true),
                field("space-type", Select, true),
                field("live-at-property", Radio, true),
                field("rental-type", Select, true),
                field("guest-capacity", Select, true),
            ],
        ),
        StepDefinition::new(
            3,
            vec![
                field("furnished", Radio, true),
                field("furniture-details", Textarea, true),
                field("open-to-furnishing", Radio, true),
                field("bathroom-situation", Select, true),
                field("private-entrance", Radio, true),
            ],
        )
        .with_visibility(vec![
            VisibilityRule::new("furniture-details", "furnished", "yes"),
            VisibilityRule::new("open-to-furnishing", "furnished", "no"),
        ]),
        StepDefinition::new(
            4,
            vec![
                field("approximate-size", Text, false),
                field("ready-for-photography", Radio, true),
                field("pets-allowed", Radio, true),
                field("restrictions", Textarea, false),
                field("space-photos", File, false),
            ],
        ),
        StepDefinition::new(
            5,
            vec![
                field("hosting-timeline", Select, true),
                field("priority", Select, true),
                field("involvement-level", Select, true),
                field("consent", Checkbox, true),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::qualification_steps;

    #[test]
    fn flow_defines_five_ordered_steps() {
        let steps = qualification_steps();
        assert_eq!(steps.len(), 5);
        for (position, step) in steps.iter().enumerate() {
            assert_eq!(step.index, position + 1);
        }
    }

    #[test]
    fn furnishing_step_carries_mutually_exclusive_conditional_fields() {
        let steps = qualification_steps();
        let furnishing = &steps[2];

        assert_eq!(furnishing.visibility.len(), 2);
        assert!(furnishing
            .visibility
            .iter()
            .any(|rule| rule.field == "furniture-details" && rule.visible_when == "yes"));
        assert!(furnishing
            .visibility
            .iter()
            .any(|rule| rule.field == "open-to-furnishing" && rule.visible_when == "no"));
    }

    #[test]
    fn consent_checkbox_is_required_on_the_final_step() {
        let steps = qualification_steps();
        let last = steps.last().expect("flow has steps");
        let consent = last
            .fields
            .iter()
            .find(|descriptor| descriptor.name == "consent")
            .expect("consent field exists");
        assert!(consent.required);
    }
}
