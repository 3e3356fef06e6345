use async_trait::async_trait;
use metrohost_core::SubmissionRecord;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("submission transport failed: {0}")]
    Transport(String),
    #[error("submission response could not be decoded: {0}")]
    Decode(String),
}

/// Verdict envelope returned by the submission orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(
        rename = "applicationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_id: Option<String>,
}

/// Outbound boundary from the wizard to the orchestrator. The transport is a
/// detail; the engine only sees the decoded verdict envelope.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, record: &SubmissionRecord) -> Result<SubmitResponse, GatewayError>;
}

/// Gateway posting the canonical record as JSON to the orchestrator endpoint.
pub struct HttpSubmissionGateway {
    client: Client,
    endpoint: String,
}

impl HttpSubmissionGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: Client::new(), endpoint: endpoint.into() }
    }
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, record: &SubmissionRecord) -> Result<SubmitResponse, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|error| GatewayError::Transport(error.to_string()))?;

        // Error statuses still carry the verdict envelope; decode regardless.
        response
            .json::<SubmitResponse>()
            .await
            .map_err(|error| GatewayError::Decode(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::SubmitResponse;

    #[test]
    fn verdict_envelope_decodes_camel_case_application_id() {
        let response: SubmitResponse = serde_json::from_str(
            r#"{"success": true, "message": "Application submitted successfully", "applicationId": "app_1754000000000"}"#,
        )
        .expect("envelope decodes");

        assert!(response.success);
        assert_eq!(response.application_id.as_deref(), Some("app_1754000000000"));
    }

    #[test]
    fn failure_envelope_decodes_without_application_id() {
        let response: SubmitResponse =
            serde_json::from_str(r#"{"success": false, "message": "Email and name are required"}"#)
                .expect("envelope decodes");

        assert!(!response.success);
        assert_eq!(response.message, "Email and name are required");
        assert!(response.application_id.is_none());
    }
}
