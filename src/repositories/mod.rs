use async_trait::async_trait;
use thiserror::Error;

use crate::models::application::{Application, ApplicationStatus, Stats, UnknownStatus};

pub mod memory;
pub mod mysql;

pub use memory::MemoryApplicationRepository;
pub use mysql::MySqlApplicationRepository;

/// Field that collided with an existing application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Nim,
    Email,
}

impl DuplicateField {
    pub fn message(&self) -> &'static str {
        match self {
            DuplicateField::Nim => "NIM sudah terdaftar",
            DuplicateField::Email => "Email sudah terdaftar",
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{}", .0.message())]
    Duplicate(DuplicateField),
    #[error("corrupt application {id}: {source}")]
    Corrupt { id: String, source: UnknownStatus },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, application: &Application) -> Result<(), RepositoryError>;

    async fn find(&self, id: &str) -> Result<Option<Application>, RepositoryError>;

    /// Look up by NIM or (case-insensitive) email.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Application>, RepositoryError>;

    async fn find_duplicate(
        &self,
        nim: &str,
        email: &str,
    ) -> Result<Option<DuplicateField>, RepositoryError>;

    /// Every application, newest first.
    async fn list(&self) -> Result<Vec<Application>, RepositoryError>;

    async fn stats(&self) -> Result<Stats, RepositoryError>;

    /// Returns the updated record, or `None` when the id is unknown.
    async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        assigned_division: &str,
    ) -> Result<Option<Application>, RepositoryError>;
}
