use async_trait::async_trait;
use metrohost_core::{ContactMessage, SubmissionMetadata};

use super::{ContactRepository, ContactSummary, RepositoryError};
use crate::DbPool;

pub struct SqlContactRepository {
    pool: DbPool,
}

impl SqlContactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn nullable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[async_trait]
impl ContactRepository for SqlContactRepository {
    async fn save(
        &self,
        message: &ContactMessage,
        metadata: &SubmissionMetadata,
    ) -> Result<i64, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO contact_form_submissions (
                name, email, phone, service, message, ip_address, user_agent
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(nullable(&message.phone))
        .bind(nullable(&message.service))
        .bind(&message.message)
        .bind(&metadata.ip_address)
        .bind(&metadata.user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ContactSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactSummary>(
            "SELECT id, name, email, submission_date, service
             FROM contact_form_submissions
             ORDER BY submission_date DESC, id DESC
             LIMIT ?1",
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_form_submissions")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
