use std::sync::Arc;

use chrono::Utc;
use metrohost_core::{
    next_application_id, ContactMessage, DeliveryChannel, DeliveryOutcome, SubmissionMetadata,
    SubmissionRecord,
};
use metrohost_db::{ApplicationRepository, ContactRepository};
use metrohost_mail::{MailError, MailTemplates, Mailer};
use thiserror::Error;
use tracing::{info, warn};

/// Why a submission was not accepted. Anything else - including a failed
/// persistence attempt - still yields an accepted verdict.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    MissingFields(&'static str),
    #[error(transparent)]
    Notification(#[from] MailError),
}

impl SubmitError {
    /// Map to the HTTP-facing error taxonomy. The bad-request message is the
    /// envelope text verbatim; notification failures surface as internal
    /// errors carrying the cause.
    pub fn into_interface(self, correlation_id: &str) -> metrohost_core::InterfaceError {
        match self {
            Self::MissingFields(message) => metrohost_core::InterfaceError::BadRequest {
                message: message.to_string(),
                correlation_id: correlation_id.to_string(),
            },
            Self::Notification(cause) => {
                metrohost_core::ApplicationError::Notification(cause.to_string())
                    .into_interface(correlation_id)
            }
        }
    }
}

/// Accepted qualification submission: the correlation id handed back to the
/// caller plus the per-channel delivery outcomes.
#[derive(Clone, Debug)]
pub struct ApplicationAccepted {
    pub application_id: String,
    pub notification: DeliveryOutcome,
    pub persistence: DeliveryOutcome,
}

#[derive(Clone, Debug)]
pub struct ContactAccepted {
    pub notification: DeliveryOutcome,
    pub persistence: DeliveryOutcome,
}

/// Server-side submission pipeline: validate the minimum identity fields,
/// notify (fatal), then persist (non-fatal), strictly in that order.
pub struct SubmissionOrchestrator {
    mailer: Arc<dyn Mailer>,
    templates: MailTemplates,
    applications: Arc<dyn ApplicationRepository>,
    contacts: Arc<dyn ContactRepository>,
    from_address: String,
    operator_address: String,
}

impl SubmissionOrchestrator {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        templates: MailTemplates,
        applications: Arc<dyn ApplicationRepository>,
        contacts: Arc<dyn ContactRepository>,
        from_address: impl Into<String>,
        operator_address: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            templates,
            applications,
            contacts,
            from_address: from_address.into(),
            operator_address: operator_address.into(),
        }
    }

    /// Handle one qualification submission. Notification failure fails the
    /// request before any storage side effect can mask it; a persistence
    /// failure is logged and replaced by a locally generated id.
    pub async fn submit_application(
        &self,
        record: &SubmissionRecord,
        metadata: &SubmissionMetadata,
        correlation_id: &str,
    ) -> Result<ApplicationAccepted, SubmitError> {
        if !record.has_required_identity() {
            return Err(SubmitError::MissingFields("Email and name are required"));
        }

        let operator_email = self.templates.application_operator(
            &self.from_address,
            &self.operator_address,
            record,
        )?;
        self.mailer.send(&operator_email).await?;

        let confirmation = self
            .templates
            .application_confirmation(&self.from_address, record)?;
        self.mailer.send(&confirmation).await?;

        let notification =
            DeliveryOutcome::ok(DeliveryChannel::Notify, "operator and submitter notified");
        info!(
            event_name = "pipeline.submit.notification_delivered",
            correlation_id,
            submitter = %record.contact.email,
            "both notification messages accepted"
        );

        let (application_id, persistence) =
            match self.applications.save(record, metadata).await {
                Ok(saved) => {
                    info!(
                        event_name = "pipeline.submit.record_persisted",
                        correlation_id,
                        application_id = %saved.application_id,
                        "qualification record stored"
                    );
                    let outcome =
                        DeliveryOutcome::ok(DeliveryChannel::Persist, format!("row {}", saved.id));
                    (saved.application_id, outcome)
                }
                Err(error) => {
                    // The store being down must not surface to the caller.
                    warn!(
                        event_name = "pipeline.submit.persistence_failed",
                        correlation_id,
                        error = %error,
                        "qualification record could not be stored; issuing local id"
                    );
                    let outcome =
                        DeliveryOutcome::failed(DeliveryChannel::Persist, error.to_string());
                    (next_application_id(), outcome)
                }
            };

        Ok(ApplicationAccepted { application_id, notification, persistence })
    }

    /// Handle one simple contact-form submission with the same
    /// notify-then-persist policy.
    pub async fn submit_contact(
        &self,
        message: &ContactMessage,
        metadata: &SubmissionMetadata,
        correlation_id: &str,
    ) -> Result<ContactAccepted, SubmitError> {
        if !message.has_required_fields() {
            return Err(SubmitError::MissingFields("Name, email, and message are required"));
        }

        let submission_date = Utc::now().to_rfc3339();
        let operator_email = self.templates.contact_operator(
            &self.from_address,
            &self.operator_address,
            message,
            &submission_date,
        )?;
        self.mailer.send(&operator_email).await?;

        let confirmation = self.templates.contact_confirmation(&self.from_address, message)?;
        self.mailer.send(&confirmation).await?;

        let notification =
            DeliveryOutcome::ok(DeliveryChannel::Notify, "operator and submitter notified");
        info!(
            event_name = "pipeline.contact.notification_delivered",
            correlation_id,
            submitter = %message.email,
            "both notification messages accepted"
        );

        let persistence = match self.contacts.save(message, metadata).await {
            Ok(id) => {
                info!(
                    event_name = "pipeline.contact.record_persisted",
                    correlation_id,
                    row_id = id,
                    "contact message stored"
                );
                DeliveryOutcome::ok(DeliveryChannel::Persist, format!("row {id}"))
            }
            Err(error) => {
                warn!(
                    event_name = "pipeline.contact.persistence_failed",
                    correlation_id,
                    error = %error,
                    "contact message could not be stored"
                );
                DeliveryOutcome::failed(DeliveryChannel::Persist, error.to_string())
            }
        };

        Ok(ContactAccepted { notification, persistence })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use metrohost_core::{
        ContactMessage, ContactSection, DeliveryStatus, SubmissionMetadata, SubmissionRecord,
    };
    use metrohost_db::{
        ApplicationRepository, ApplicationSummary, InMemoryContactRepository, RepositoryError,
        SavedApplication,
    };
    use metrohost_mail::{MailError, MailTemplates, Mailer, OutboundEmail};
    use tokio::sync::Mutex;

    use super::{SubmissionOrchestrator, SubmitError};

    type EventLog = Arc<Mutex<Vec<&'static str>>>;

    struct ScriptedMailer {
        results: Mutex<VecDeque<Result<(), MailError>>>,
        sent: Mutex<Vec<OutboundEmail>>,
        events: EventLog,
    }

    impl ScriptedMailer {
        fn healthy(events: EventLog) -> Self {
            Self::with_script(VecDeque::new(), events)
        }

        fn with_script(results: VecDeque<Result<(), MailError>>, events: EventLog) -> Self {
            Self { results: Mutex::new(results), sent: Mutex::new(Vec::new()), events }
        }

        async fn sent_messages(&self) -> Vec<OutboundEmail> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Mailer for ScriptedMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
            self.events.lock().await.push("notify");
            let result = self.results.lock().await.pop_front().unwrap_or(Ok(()));
            if result.is_ok() {
                self.sent.lock().await.push(email.clone());
            }
            result
        }
    }

    struct ScriptedApplicationRepository {
        results: Mutex<VecDeque<Result<SavedApplication, RepositoryError>>>,
        events: EventLog,
    }

    impl ScriptedApplicationRepository {
        fn with_script(
            results: VecDeque<Result<SavedApplication, RepositoryError>>,
            events: EventLog,
        ) -> Self {
            Self { results: Mutex::new(results), events }
        }
    }

    #[async_trait]
    impl ApplicationRepository for ScriptedApplicationRepository {
        async fn save(
            &self,
            _record: &SubmissionRecord,
            _metadata: &SubmissionMetadata,
        ) -> Result<SavedApplication, RepositoryError> {
            self.events.lock().await.push("persist");
            self.results.lock().await.pop_front().unwrap_or_else(|| {
                Ok(SavedApplication { id: 1, application_id: "app_default".to_string() })
            })
        }

        async fn recent(&self, _limit: i64) -> Result<Vec<ApplicationSummary>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<i64, RepositoryError> {
            Ok(0)
        }
    }

    fn record() -> SubmissionRecord {
        SubmissionRecord {
            contact: ContactSection {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                ..ContactSection::default()
            },
            ..SubmissionRecord::default()
        }
    }

    fn orchestrator(
        mailer: Arc<ScriptedMailer>,
        applications: Arc<ScriptedApplicationRepository>,
    ) -> SubmissionOrchestrator {
        SubmissionOrchestrator::new(
            mailer,
            MailTemplates::new().expect("templates compile"),
            applications,
            Arc::new(InMemoryContactRepository::default()),
            "hello@metrohostcollective.com",
            "team@metrohostcollective.com",
        )
    }

    fn store_success(application_id: &str) -> Result<SavedApplication, RepositoryError> {
        Ok(SavedApplication { id: 7, application_id: application_id.to_string() })
    }

    fn store_failure() -> Result<SavedApplication, RepositoryError> {
        Err(RepositoryError::Decode("database unavailable".to_string()))
    }

    #[tokio::test]
    async fn healthy_channels_return_the_store_confirmed_id() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::healthy(events.clone()));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::from([store_success("app_1754000000000")]),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer.clone(), applications);

        let accepted = orchestrator
            .submit_application(&record(), &SubmissionMetadata::default(), "req-1")
            .await
            .expect("submission accepted");

        assert_eq!(accepted.application_id, "app_1754000000000");
        assert_eq!(accepted.notification.status, DeliveryStatus::Ok);
        assert_eq!(accepted.persistence.status, DeliveryStatus::Ok);

        let sent = mailer.sent_messages().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "team@metrohostcollective.com");
        assert_eq!(sent[1].to, "jane@x.com");
    }

    #[tokio::test]
    async fn missing_identity_fields_fail_fast_without_side_effects() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::healthy(events.clone()));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::new(),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer, applications);

        let mut incomplete = record();
        incomplete.contact.email.clear();

        let error = orchestrator
            .submit_application(&incomplete, &SubmissionMetadata::default(), "req-2")
            .await
            .expect_err("identity fields are required");

        assert!(matches!(error, SubmitError::MissingFields("Email and name are required")));
        assert!(events.lock().await.is_empty(), "no channel may be invoked");
    }

    #[tokio::test]
    async fn notification_failure_is_fatal_and_skips_persistence() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::with_script(
            VecDeque::from([Err(MailError::Request("relay down".to_string()))]),
            events.clone(),
        ));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::new(),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer, applications);

        let error = orchestrator
            .submit_application(&record(), &SubmissionMetadata::default(), "req-3")
            .await
            .expect_err("notification failure must fail the request");

        assert!(matches!(error, SubmitError::Notification(_)));
        assert_eq!(*events.lock().await, vec!["notify"]);
    }

    #[tokio::test]
    async fn second_notification_failure_is_equally_fatal() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::with_script(
            VecDeque::from([
                Ok(()),
                Err(MailError::Rejected { to: "jane@x.com".to_string(), status: 502 }),
            ]),
            events.clone(),
        ));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::new(),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer, applications);

        let error = orchestrator
            .submit_application(&record(), &SubmissionMetadata::default(), "req-4")
            .await
            .expect_err("confirmation failure must fail the request");

        assert!(matches!(error, SubmitError::Notification(_)));
        assert_eq!(*events.lock().await, vec!["notify", "notify"]);
    }

    #[tokio::test]
    async fn persistence_failure_is_non_fatal_with_local_id_fallback() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::healthy(events.clone()));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::from([store_failure()]),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer, applications);

        let accepted = orchestrator
            .submit_application(&record(), &SubmissionMetadata::default(), "req-5")
            .await
            .expect("store failure must not fail the request");

        assert!(accepted.application_id.starts_with("app_"));
        assert_eq!(accepted.persistence.status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn persistence_is_attempted_only_after_both_notifications() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::healthy(events.clone()));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::from([store_success("app_1754000000001")]),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer, applications);

        orchestrator
            .submit_application(&record(), &SubmissionMetadata::default(), "req-6")
            .await
            .expect("submission accepted");

        assert_eq!(*events.lock().await, vec!["notify", "notify", "persist"]);
    }

    #[tokio::test]
    async fn repeated_persistence_failures_yield_distinct_fallback_ids() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::healthy(events.clone()));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::from([store_failure(), store_failure()]),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer, applications);

        let first = orchestrator
            .submit_application(&record(), &SubmissionMetadata::default(), "req-7")
            .await
            .expect("first accepted");
        let second = orchestrator
            .submit_application(&record(), &SubmissionMetadata::default(), "req-8")
            .await
            .expect("second accepted");

        assert!(!first.application_id.is_empty());
        assert!(!second.application_id.is_empty());
        assert_ne!(first.application_id, second.application_id);
    }

    #[test]
    fn submit_errors_map_to_the_interface_taxonomy() {
        let bad =
            SubmitError::MissingFields("Email and name are required").into_interface("req-11");
        assert_eq!(bad.status_code(), 400);
        assert_eq!(bad.user_message(), "Email and name are required");

        let fatal = SubmitError::Notification(MailError::Request("relay down".to_string()))
            .into_interface("req-12");
        assert_eq!(fatal.status_code(), 500);
        assert_eq!(
            fatal.user_message(),
            "Internal server error: mail api request failed: relay down"
        );
    }

    #[tokio::test]
    async fn contact_variant_requires_name_email_and_message() {
        let events: EventLog = Arc::default();
        let mailer = Arc::new(ScriptedMailer::healthy(events.clone()));
        let applications = Arc::new(ScriptedApplicationRepository::with_script(
            VecDeque::new(),
            events.clone(),
        ));
        let orchestrator = orchestrator(mailer.clone(), applications);

        let error = orchestrator
            .submit_contact(
                &ContactMessage { name: "Sam".to_string(), ..ContactMessage::default() },
                &SubmissionMetadata::default(),
                "req-9",
            )
            .await
            .expect_err("incomplete message must be rejected");
        assert!(matches!(
            error,
            SubmitError::MissingFields("Name, email, and message are required")
        ));

        let message = ContactMessage {
            name: "Sam".to_string(),
            email: "sam@x.com".to_string(),
            message: "Interested in co-hosting".to_string(),
            ..ContactMessage::default()
        };
        let accepted = orchestrator
            .submit_contact(&message, &SubmissionMetadata::default(), "req-10")
            .await
            .expect("contact accepted");

        assert_eq!(accepted.notification.status, DeliveryStatus::Ok);
        assert_eq!(accepted.persistence.status, DeliveryStatus::Ok);
        assert_eq!(mailer.sent_messages().await.len(), 2);
    }
}
