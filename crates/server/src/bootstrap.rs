use std::sync::Arc;

use metrohost_core::config::{AppConfig, ConfigError, LoadOptions};
use metrohost_db::{
    connect_from, migrations, DbPool, SqlApplicationRepository, SqlContactRepository,
};
use metrohost_mail::{HttpApiMailer, MailError, MailTemplates};
use thiserror::Error;
use tracing::info;

use crate::orchestrator::SubmissionOrchestrator;
use crate::routes::AppState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("mail templates failed to compile: {0}")]
    MailTemplates(#[source] MailError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_from(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let applications = Arc::new(SqlApplicationRepository::new(db_pool.clone()));
    let contacts = Arc::new(SqlContactRepository::new(db_pool.clone()));
    let templates = MailTemplates::new().map_err(BootstrapError::MailTemplates)?;
    let orchestrator = Arc::new(SubmissionOrchestrator::new(
        Arc::new(HttpApiMailer::new(&config.mail)),
        templates,
        applications.clone(),
        contacts.clone(),
        config.mail.from_address.clone(),
        config.mail.operator_address.clone(),
    ));

    let state = AppState { orchestrator, applications, contacts };

    Ok(Application { config, db_pool, state })
}
