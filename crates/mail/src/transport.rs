use async_trait::async_trait;
use metrohost_core::config::MailConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::message::OutboundEmail;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
    #[error("mail api request failed: {0}")]
    Request(String),
    #[error("mail api rejected message to `{to}`: status {status}")]
    Rejected { to: String, status: u16 },
}

/// Outbound mail-sending capability. One call per message; the caller decides
/// what a failure means for the overall request.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Transport posting each message to an HTTP mail API with a bearer token.
pub struct HttpApiMailer {
    client: Client,
    endpoint: String,
    api_token: SecretString,
}

impl HttpApiMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/v1/messages", config.api_base_url.trim_end_matches('/')),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpApiMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let payload = SendMessageRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html_body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|error| MailError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected { to: email.to.clone(), status: status.as_u16() });
        }

        debug!(
            event_name = "egress.mail.message_sent",
            to = %email.to,
            subject = %email.subject,
            "mail api accepted message"
        );
        Ok(())
    }
}

/// Transport that accepts every message without side effects.
#[derive(Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        debug!(
            event_name = "egress.mail.message_dropped",
            to = %email.to,
            subject = %email.subject,
            "noop mailer dropped message"
        );
        Ok(())
    }
}
