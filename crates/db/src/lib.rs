pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_from, connect_with_settings, DbPool};
pub use repositories::{
    ApplicationRepository, ApplicationSummary, ContactRepository, ContactSummary,
    InMemoryApplicationRepository, InMemoryContactRepository, RepositoryError, SavedApplication,
    SqlApplicationRepository, SqlContactRepository,
};
