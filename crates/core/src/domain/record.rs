use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag stamped on every record assembled by the wizard.
pub const SUBMISSION_SOURCE: &str = "MetroHost Collective Website";

/// Default for request metadata that could not be captured.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Canonical grouped submission payload.
///
/// Every key is always present on the wire; unset optional answers serialize
/// as empty strings, never as missing keys. Deserialization is equally
/// tolerant (`serde(default)` throughout) so the orchestrator can run its own
/// required-field check on incomplete payloads instead of failing at decode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(default)]
    pub contact: ContactSection,
    #[serde(default)]
    pub property: PropertySection,
    #[serde(default)]
    pub goals: GoalsSection,
    #[serde(default)]
    pub submission_date: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub preferred_contact: String,
    #[serde(default)]
    pub best_time: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySection {
    #[serde(default)]
    pub city_zip: String,
    #[serde(default)]
    pub space_type: String,
    #[serde(default)]
    pub live_at_property: String,
    #[serde(default)]
    pub rental_type: String,
    #[serde(default)]
    pub guest_capacity: String,
    #[serde(default)]
    pub furnished: String,
    #[serde(default)]
    pub furniture_details: String,
    #[serde(default)]
    pub open_to_furnishing: String,
    #[serde(default)]
    pub bathroom_situation: String,
    #[serde(default)]
    pub private_entrance: String,
    #[serde(default)]
    pub approximate_size: String,
    #[serde(default)]
    pub ready_for_photography: String,
    #[serde(default)]
    pub pets_allowed: String,
    #[serde(default)]
    pub restrictions: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsSection {
    #[serde(default)]
    pub hosting_timeline: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub involvement_level: String,
}

/// Request-origin metadata attached to persisted rows. Absence never blocks
/// the pipeline; missing values default to the `unknown` sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub ip_address: String,
    pub user_agent: String,
}

impl Default for SubmissionMetadata {
    fn default() -> Self {
        Self {
            ip_address: UNKNOWN_SENTINEL.to_string(),
            user_agent: UNKNOWN_SENTINEL.to_string(),
        }
    }
}

impl SubmissionRecord {
    /// Assemble a record from the wizard's flattened `field name -> value`
    /// map. Absent fields map to empty strings so downstream consumers can
    /// rely on every key existing.
    pub fn from_fields(fields: &BTreeMap<String, String>, submitted_at: DateTime<Utc>) -> Self {
        let field = |name: &str| fields.get(name).cloned().unwrap_or_default();

        Self {
            contact: ContactSection {
                name: field("full-name"),
                email: field("email"),
                phone: field("phone"),
                preferred_contact: field("preferred-contact"),
                best_time: field("best-time"),
            },
            property: PropertySection {
                city_zip: field("city-zip"),
                space_type: field("space-type"),
                live_at_property: field("live-at-property"),
                rental_type: field("rental-type"),
                guest_capacity: field("guest-capacity"),
                furnished: field("furnished"),
                furniture_details: field("furniture-details"),
                open_to_furnishing: field("open-to-furnishing"),
                bathroom_situation: field("bathroom-situation"),
                private_entrance: field("private-entrance"),
                approximate_size: field("approximate-size"),
                ready_for_photography: field("ready-for-photography"),
                pets_allowed: field("pets-allowed"),
                restrictions: field("restrictions"),
            },
            goals: GoalsSection {
                hosting_timeline: field("hosting-timeline"),
                priority: field("priority"),
                involvement_level: field("involvement-level"),
            },
            submission_date: submitted_at.to_rfc3339(),
            source: SUBMISSION_SOURCE.to_string(),
            application_id: None,
        }
    }

    pub fn has_required_identity(&self) -> bool {
        !self.contact.name.trim().is_empty() && !self.contact.email.trim().is_empty()
    }
}

static LAST_GENERATED_ID: AtomicI64 = AtomicI64::new(0);

/// Locally generated, timestamp-derived application identifier used when the
/// store did not confirm one. Strictly monotonic within a process so repeated
/// fallbacks stay distinct even inside the same millisecond.
pub fn next_application_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut previous = LAST_GENERATED_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(previous + 1);
        match LAST_GENERATED_ID.compare_exchange(
            previous,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return format!("app_{candidate}"),
            Err(observed) => previous = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::{next_application_id, SubmissionMetadata, SubmissionRecord, SUBMISSION_SOURCE};

    #[test]
    fn assembled_record_contains_every_key_with_empty_defaults() {
        let mut fields = BTreeMap::new();
        fields.insert("full-name".to_string(), "Jane Doe".to_string());
        fields.insert("email".to_string(), "jane@x.com".to_string());

        let record = SubmissionRecord::from_fields(&fields, Utc::now());

        assert_eq!(record.contact.name, "Jane Doe");
        assert_eq!(record.contact.email, "jane@x.com");
        assert_eq!(record.property.city_zip, "");
        assert_eq!(record.goals.hosting_timeline, "");
        assert_eq!(record.source, SUBMISSION_SOURCE);

        let value = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(value["contact"]["preferredContact"], "");
        assert_eq!(value["property"]["furnitureDetails"], "");
        assert_eq!(value["goals"]["involvementLevel"], "");
        assert!(value.get("applicationId").is_none());
    }

    #[test]
    fn wire_shape_uses_camel_case_grouped_sections() {
        let json = r#"{
            "contact": {"name": "Jane Doe", "email": "jane@x.com", "preferredContact": "email"},
            "property": {"cityZip": "Austin 78701", "spaceType": "apartment"},
            "goals": {"hostingTimeline": "asap"},
            "submissionDate": "2026-08-01T00:00:00Z",
            "source": "MetroHost Collective Website"
        }"#;

        let record: SubmissionRecord = serde_json::from_str(json).expect("record decodes");
        assert_eq!(record.contact.preferred_contact, "email");
        assert_eq!(record.property.city_zip, "Austin 78701");
        assert_eq!(record.goals.hosting_timeline, "asap");
        assert_eq!(record.contact.phone, "");
    }

    #[test]
    fn incomplete_payload_decodes_for_defensive_validation() {
        let record: SubmissionRecord =
            serde_json::from_str(r#"{"contact": {"name": "Jane Doe"}}"#).expect("decodes");
        assert!(!record.has_required_identity());

        let record: SubmissionRecord = serde_json::from_str(
            r#"{"contact": {"name": "Jane Doe", "email": "jane@x.com"}}"#,
        )
        .expect("decodes");
        assert!(record.has_required_identity());
    }

    #[test]
    fn generated_application_ids_are_distinct_and_nonempty() {
        let first = next_application_id();
        let second = next_application_id();

        assert!(first.starts_with("app_"));
        assert!(second.starts_with("app_"));
        assert_ne!(first, second);
    }

    #[test]
    fn metadata_defaults_to_unknown_sentinel() {
        let metadata = SubmissionMetadata::default();
        assert_eq!(metadata.ip_address, "unknown");
        assert_eq!(metadata.user_agent, "unknown");
    }
}
