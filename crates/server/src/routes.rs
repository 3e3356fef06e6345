use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use metrohost_core::{ContactMessage, SubmissionMetadata, SubmissionRecord, UNKNOWN_SENTINEL};
use metrohost_db::{ApplicationRepository, ContactRepository};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::orchestrator::{SubmissionOrchestrator, SubmitError};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SubmissionOrchestrator>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub contacts: Arc<dyn ContactRepository>,
}

/// Verdict envelope shared by both submission endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(
        rename = "applicationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_id: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/submit-application",
            post(submit_application).fallback(method_not_allowed),
        )
        .route("/api/contact-form", post(contact_form).fallback(method_not_allowed))
        .route(
            "/api/view-submissions",
            get(view_submissions).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Client address and user agent, defaulted rather than required.
fn request_metadata(headers: &HeaderMap) -> SubmissionMetadata {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .map(str::to_owned)
    };

    SubmissionMetadata {
        ip_address: header("x-forwarded-for")
            .or_else(|| header("client-ip"))
            .unwrap_or_else(|| UNKNOWN_SENTINEL.to_string()),
        user_agent: header("user-agent").unwrap_or_else(|| UNKNOWN_SENTINEL.to_string()),
    }
}

async fn submit_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(record): Json<SubmissionRecord>,
) -> (StatusCode, Json<SubmitEnvelope>) {
    let correlation_id = Uuid::new_v4().to_string();
    let metadata = request_metadata(&headers);

    info!(
        event_name = "ingress.http.application_received",
        correlation_id = %correlation_id,
        ip_address = %metadata.ip_address,
        "qualification submission received"
    );

    match state
        .orchestrator
        .submit_application(&record, &metadata, &correlation_id)
        .await
    {
        Ok(accepted) => {
            info!(
                event_name = "ingress.http.application_accepted",
                correlation_id = %correlation_id,
                application_id = %accepted.application_id,
                notification = ?accepted.notification.status,
                persistence = ?accepted.persistence.status,
                "qualification submission accepted"
            );
            (
                StatusCode::OK,
                Json(SubmitEnvelope {
                    success: true,
                    message: "Application submitted successfully".to_string(),
                    application_id: Some(accepted.application_id),
                }),
            )
        }
        Err(error) => {
            if let SubmitError::Notification(cause) = &error {
                error!(
                    event_name = "ingress.http.application_failed",
                    correlation_id = %correlation_id,
                    error = %cause,
                    "qualification submission failed"
                );
            }
            reject(error, &correlation_id)
        }
    }
}

/// Render a rejected submission through the shared error taxonomy.
fn reject(error: SubmitError, correlation_id: &str) -> (StatusCode, Json<SubmitEnvelope>) {
    let interface = error.into_interface(correlation_id);
    let status = StatusCode::from_u16(interface.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(SubmitEnvelope {
            success: false,
            message: interface.user_message(),
            application_id: None,
        }),
    )
}

async fn contact_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(message): Json<ContactMessage>,
) -> (StatusCode, Json<SubmitEnvelope>) {
    let correlation_id = Uuid::new_v4().to_string();
    let metadata = request_metadata(&headers);

    info!(
        event_name = "ingress.http.contact_received",
        correlation_id = %correlation_id,
        ip_address = %metadata.ip_address,
        "contact form submission received"
    );

    match state
        .orchestrator
        .submit_contact(&message, &metadata, &correlation_id)
        .await
    {
        Ok(accepted) => {
            info!(
                event_name = "ingress.http.contact_accepted",
                correlation_id = %correlation_id,
                notification = ?accepted.notification.status,
                persistence = ?accepted.persistence.status,
                "contact form submission accepted"
            );
            (
                StatusCode::OK,
                Json(SubmitEnvelope {
                    success: true,
                    message: "Message sent successfully".to_string(),
                    application_id: None,
                }),
            )
        }
        Err(error) => {
            if let SubmitError::Notification(cause) = &error {
                error!(
                    event_name = "ingress.http.contact_failed",
                    correlation_id = %correlation_id,
                    error = %cause,
                    "contact form submission failed"
                );
            }
            reject(error, &correlation_id)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ViewSubmissionsQuery {
    limit: Option<i64>,
}

async fn view_submissions(
    State(state): State<AppState>,
    Query(query): Query<ViewSubmissionsQuery>,
) -> (StatusCode, Json<Value>) {
    let limit = query.limit.unwrap_or(10).clamp(0, 100);

    let listing = async {
        let contact_count = state.contacts.count().await?;
        let application_count = state.applications.count().await?;
        let contact_rows = state.contacts.recent(limit).await?;
        let application_rows = state.applications.recent(limit).await?;
        Ok::<_, metrohost_db::RepositoryError>((
            contact_count,
            application_count,
            contact_rows,
            application_rows,
        ))
    }
    .await;

    match listing {
        Ok((contact_count, application_count, contact_rows, application_rows)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "statistics": {
                        "contactForms": contact_count,
                        "qualificationForms": application_count,
                        "total": contact_count + application_count,
                    },
                    "submissions": {
                        "contact": contact_rows,
                        "qualification": application_rows,
                    },
                    "timestamp": Utc::now().to_rfc3339(),
                }
            })),
        ),
        Err(cause) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "message": format!("Error retrieving submissions: {cause}"),
            })),
        ),
    }
}

async fn method_not_allowed() -> (StatusCode, Json<SubmitEnvelope>) {
    let interface = metrohost_core::InterfaceError::MethodNotAllowed {
        correlation_id: "unrouted".to_string(),
    };
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(SubmitEnvelope {
            success: false,
            message: interface.user_message(),
            application_id: None,
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use metrohost_db::{InMemoryApplicationRepository, InMemoryContactRepository};
    use metrohost_mail::{MailTemplates, NoopMailer};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{router, AppState, SubmitEnvelope};
    use crate::orchestrator::SubmissionOrchestrator;

    fn state() -> AppState {
        let applications = Arc::new(InMemoryApplicationRepository::default());
        let contacts = Arc::new(InMemoryContactRepository::default());
        let orchestrator = Arc::new(SubmissionOrchestrator::new(
            Arc::new(NoopMailer),
            MailTemplates::new().expect("templates compile"),
            applications.clone(),
            contacts.clone(),
            "hello@metrohostcollective.com",
            "team@metrohostcollective.com",
        ));
        AppState { orchestrator, applications, contacts }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn healthy_submission_returns_envelope_with_application_id() {
        let payload = json!({
            "contact": {"name": "Jane Doe", "email": "jane@x.com"},
            "property": {},
            "goals": {},
            "submissionDate": "2026-08-01T00:00:00Z",
            "source": "MetroHost Collective Website"
        });

        let response = router(state())
            .oneshot(post_json("/api/submit-application", payload))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::OK);
        let envelope: SubmitEnvelope =
            serde_json::from_value(body_json(response).await).expect("envelope decodes");
        assert!(envelope.success);
        assert_eq!(envelope.message, "Application submitted successfully");
        assert!(envelope.application_id.expect("id present").starts_with("app_"));
    }

    #[tokio::test]
    async fn missing_email_yields_bad_request_envelope() {
        let payload = json!({"contact": {"name": "Jane Doe"}});

        let response = router(state())
            .oneshot(post_json("/api/submit-application", payload))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Email and name are required");
    }

    #[tokio::test]
    async fn disallowed_method_yields_405_envelope() {
        let request = Request::builder()
            .method("GET")
            .uri("/api/submit-application")
            .body(Body::empty())
            .expect("request builds");

        let response = router(state()).oneshot(request).await.expect("request handled");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Method not allowed");
    }

    #[tokio::test]
    async fn contact_form_round_trips_the_simple_envelope() {
        let payload = json!({
            "name": "Sam Lee",
            "email": "sam@x.com",
            "message": "Looking for co-hosting"
        });

        let response = router(state())
            .oneshot(post_json("/api/contact-form", payload))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Message sent successfully");
        assert!(body.get("applicationId").is_none());
    }

    #[tokio::test]
    async fn view_submissions_reports_statistics_and_recent_rows() {
        let state = state();

        let submit = json!({
            "contact": {"name": "Jane Doe", "email": "jane@x.com"},
        });
        router(state.clone())
            .oneshot(post_json("/api/submit-application", submit))
            .await
            .expect("request handled");

        let request = Request::builder()
            .method("GET")
            .uri("/api/view-submissions?limit=5")
            .body(Body::empty())
            .expect("request builds");
        let response = router(state).oneshot(request).await.expect("request handled");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["statistics"]["qualificationForms"], 1);
        assert_eq!(body["data"]["statistics"]["total"], 1);
        assert_eq!(
            body["data"]["submissions"]["qualification"][0]["fullName"],
            "Jane Doe"
        );
    }
}
