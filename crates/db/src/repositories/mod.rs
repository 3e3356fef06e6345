use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use metrohost_core::{ContactMessage, SubmissionMetadata, SubmissionRecord};

pub mod application;
pub mod contact;
pub mod memory;

pub use application::SqlApplicationRepository;
pub use contact::SqlContactRepository;
pub use memory::{InMemoryApplicationRepository, InMemoryContactRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Row identifiers confirmed by the store for a persisted application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SavedApplication {
    pub id: i64,
    pub application_id: String,
}

/// Listing shape for recent qualification submissions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: i64,
    pub application_id: String,
    pub full_name: String,
    pub email: String,
    pub submission_date: String,
    pub space_type: Option<String>,
}

/// Listing shape for recent contact-form submissions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub submission_date: String,
    pub service: Option<String>,
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist one qualification submission. The store confirms the
    /// `application_id` actually written (the record's pre-assigned id when
    /// present, a generated one otherwise).
    async fn save(
        &self,
        record: &SubmissionRecord,
        metadata: &SubmissionMetadata,
    ) -> Result<SavedApplication, RepositoryError>;

    async fn recent(&self, limit: i64) -> Result<Vec<ApplicationSummary>, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn save(
        &self,
        message: &ContactMessage,
        metadata: &SubmissionMetadata,
    ) -> Result<i64, RepositoryError>;

    async fn recent(&self, limit: i64) -> Result<Vec<ContactSummary>, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;
}
