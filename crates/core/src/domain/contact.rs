use serde::{Deserialize, Serialize};

/// The simple contact-form variant: a flat payload with the same
/// success/failure envelope as the qualification flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.message.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ContactMessage;

    #[test]
    fn requires_name_email_and_message() {
        let message: ContactMessage =
            serde_json::from_str(r#"{"name": "Jane", "email": "jane@x.com"}"#).expect("decodes");
        assert!(!message.has_required_fields());

        let message = ContactMessage {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            message: "Looking for management help".to_string(),
            ..ContactMessage::default()
        };
        assert!(message.has_required_fields());
    }
}
