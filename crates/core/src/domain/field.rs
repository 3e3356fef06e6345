use serde::{Deserialize, Serialize};

/// Input kind of a wizard field. The validator matches exhaustively on this
/// tag, so adding a kind forces a decision about its validation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Email,
    Tel,
    Select,
    Radio,
    Checkbox,
    File,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self { name: name.into(), kind, required }
    }
}

/// Current value of a field in wizard state. Checkboxes carry a checked flag;
/// every other kind carries its raw string value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Checked(_) => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Checked(true))
    }

    /// Flattened string form used for snapshots and record assembly.
    pub fn flattened(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Checked(checked) => checked.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDescriptor, FieldKind, FieldValue};

    #[test]
    fn checkbox_values_flatten_to_boolean_strings() {
        assert_eq!(FieldValue::Checked(true).flattened(), "true");
        assert_eq!(FieldValue::Checked(false).flattened(), "false");
        assert_eq!(FieldValue::text("studio").flattened(), "studio");
    }

    #[test]
    fn descriptor_construction_preserves_kind_and_required_flag() {
        let descriptor = FieldDescriptor::new("email", FieldKind::Email, true);
        assert_eq!(descriptor.name, "email");
        assert_eq!(descriptor.kind, FieldKind::Email);
        assert!(descriptor.required);
    }
}
