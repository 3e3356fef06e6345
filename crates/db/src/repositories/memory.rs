use async_trait::async_trait;
use tokio::sync::Mutex;

use metrohost_core::{next_application_id, ContactMessage, SubmissionMetadata, SubmissionRecord};

use super::{
    ApplicationRepository, ApplicationSummary, ContactRepository, ContactSummary,
    RepositoryError, SavedApplication,
};

/// In-memory stand-in for the qualification store, used by orchestrator and
/// engine tests that do not need SQL.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    rows: Mutex<Vec<(SavedApplication, SubmissionRecord, SubmissionMetadata)>>,
}

impl InMemoryApplicationRepository {
    pub async fn saved(&self) -> Vec<SavedApplication> {
        self.rows.lock().await.iter().map(|(saved, _, _)| saved.clone()).collect()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn save(
        &self,
        record: &SubmissionRecord,
        metadata: &SubmissionMetadata,
    ) -> Result<SavedApplication, RepositoryError> {
        let mut rows = self.rows.lock().await;
        let application_id = record
            .application_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(next_application_id);
        let saved = SavedApplication { id: rows.len() as i64 + 1, application_id };
        rows.push((saved.clone(), record.clone(), metadata.clone()));
        Ok(saved)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .map(|(saved, record, _)| ApplicationSummary {
                id: saved.id,
                application_id: saved.application_id.clone(),
                full_name: record.contact.name.clone(),
                email: record.contact.email.clone(),
                submission_date: record.submission_date.clone(),
                space_type: Some(record.property.space_type.clone()),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.rows.lock().await.len() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryContactRepository {
    rows: Mutex<Vec<(i64, ContactMessage, SubmissionMetadata)>>,
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn save(
        &self,
        message: &ContactMessage,
        metadata: &SubmissionMetadata,
    ) -> Result<i64, RepositoryError> {
        let mut rows = self.rows.lock().await;
        let id = rows.len() as i64 + 1;
        rows.push((id, message.clone(), metadata.clone()));
        Ok(id)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ContactSummary>, RepositoryError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .map(|(id, message, _)| ContactSummary {
                id: *id,
                name: message.name.clone(),
                email: message.email.clone(),
                submission_date: String::new(),
                service: Some(message.service.clone()),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.rows.lock().await.len() as i64)
    }
}
