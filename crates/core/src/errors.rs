use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("required field `{field}` is missing or empty")]
    MissingRequiredField { field: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("notification failure: {0}")]
    Notification(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("method not allowed")]
    MethodNotAllowed { correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::MethodNotAllowed { .. } => 405,
            Self::Internal { .. } => 500,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message, .. } => message.clone(),
            Self::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            // The submit envelope carries the error text; callers parse it.
            Self::Internal { message, .. } => format!("Internal server error: {message}"),
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::MethodNotAllowed { correlation_id: id }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_string(),
            },
            ApplicationError::Notification(message)
            | ApplicationError::Persistence(message)
            | ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_string() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn domain_error_maps_to_bad_request_with_correlation_id() {
        let interface = ApplicationError::from(DomainError::MissingRequiredField {
            field: "email".to_string(),
        })
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.status_code(), 400);
    }

    #[test]
    fn notification_error_maps_to_internal_with_error_text() {
        let interface =
            ApplicationError::Notification("smtp relay unavailable".to_string())
                .into_interface("req-2");

        assert_eq!(interface.status_code(), 500);
        assert_eq!(interface.user_message(), "Internal server error: smtp relay unavailable");
    }

    #[test]
    fn method_not_allowed_uses_fixed_envelope_message() {
        let interface = InterfaceError::MethodNotAllowed { correlation_id: "req-3".to_string() };
        assert_eq!(interface.status_code(), 405);
        assert_eq!(interface.user_message(), "Method not allowed");
    }
}
