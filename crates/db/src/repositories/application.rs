use async_trait::async_trait;
use metrohost_core::{next_application_id, SubmissionMetadata, SubmissionRecord};

use super::{ApplicationRepository, ApplicationSummary, RepositoryError, SavedApplication};
use crate::DbPool;

pub struct SqlApplicationRepository {
    pool: DbPool,
}

impl SqlApplicationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Optional answers are stored as NULL rather than empty strings.
fn nullable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[async_trait]
impl ApplicationRepository for SqlApplicationRepository {
    async fn save(
        &self,
        record: &SubmissionRecord,
        metadata: &SubmissionMetadata,
    ) -> Result<SavedApplication, RepositoryError> {
        let application_id = record
            .application_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(str::to_owned)
            .unwrap_or_else(next_application_id);

        let (id, application_id) = sqlx::query_as::<_, (i64, String)>(
            "INSERT INTO qualification_form_submissions (
                application_id,
                full_name, email, phone, preferred_contact, best_time,
                city_zip, space_type, live_at_property, rental_type, guest_capacity,
                furnished, furniture_details, open_to_furnishing, bathroom_situation,
                private_entrance, approximate_size, ready_for_photography, pets_allowed,
                restrictions,
                hosting_timeline, priority, involvement_level,
                ip_address, user_agent, consent_given
             ) VALUES (
                ?1,
                ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19,
                ?20,
                ?21, ?22, ?23,
                ?24, ?25, TRUE
             ) RETURNING id, application_id",
        )
        .bind(&application_id)
        .bind(&record.contact.name)
        .bind(&record.contact.email)
        .bind(nullable(&record.contact.phone))
        .bind(nullable(&record.contact.preferred_contact))
        .bind(nullable(&record.contact.best_time))
        .bind(nullable(&record.property.city_zip))
        .bind(nullable(&record.property.space_type))
        .bind(nullable(&record.property.live_at_property))
        .bind(nullable(&record.property.rental_type))
        .bind(nullable(&record.property.guest_capacity))
        .bind(nullable(&record.property.furnished))
        .bind(nullable(&record.property.furniture_details))
        .bind(nullable(&record.property.open_to_furnishing))
        .bind(nullable(&record.property.bathroom_situation))
        .bind(nullable(&record.property.private_entrance))
        .bind(nullable(&record.property.approximate_size))
        .bind(nullable(&record.property.ready_for_photography))
        .bind(nullable(&record.property.pets_allowed))
        .bind(nullable(&record.property.restrictions))
        .bind(nullable(&record.goals.hosting_timeline))
        .bind(nullable(&record.goals.priority))
        .bind(nullable(&record.goals.involvement_level))
        .bind(&metadata.ip_address)
        .bind(&metadata.user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(SavedApplication { id, application_id })
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ApplicationSummary>(
            "SELECT id, application_id, full_name, email, submission_date, space_type
             FROM qualification_form_submissions
             ORDER BY submission_date DESC, id DESC
             LIMIT ?1",
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM qualification_form_submissions",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
