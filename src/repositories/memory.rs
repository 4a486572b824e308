use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ApplicationRepository, DuplicateField, RepositoryError};
use crate::models::application::{Application, ApplicationStatus, Stats};

/// Process-local store used for development and tests.
#[derive(Clone, Default)]
pub struct MemoryApplicationRepository {
    applications: Arc<RwLock<Vec<Application>>>,
}

impl MemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.applications.read().await.len()
    }
}

fn duplicate_of(existing: &Application, nim: &str, email: &str) -> Option<DuplicateField> {
    if existing.nim == nim {
        Some(DuplicateField::Nim)
    } else if existing.email.eq_ignore_ascii_case(email) {
        Some(DuplicateField::Email)
    } else {
        None
    }
}

fn newest_first(applications: &[Application]) -> Vec<Application> {
    let mut sorted = applications.to_vec();
    sorted.sort_by(|a, b| {
        b.submitted_at
            .cmp(&a.submitted_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    sorted
}

#[async_trait]
impl ApplicationRepository for MemoryApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), RepositoryError> {
        let mut applications = self.applications.write().await;
        if let Some(field) = applications
            .iter()
            .find_map(|existing| duplicate_of(existing, &application.nim, &application.email))
        {
            return Err(RepositoryError::Duplicate(field));
        }
        applications.push(application.clone());
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<Application>, RepositoryError> {
        let applications = self.applications.read().await;
        Ok(applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Application>, RepositoryError> {
        let applications = self.applications.read().await;
        Ok(newest_first(&applications)
            .into_iter()
            .find(|a| a.nim == identifier || a.email.eq_ignore_ascii_case(identifier)))
    }

    async fn find_duplicate(
        &self,
        nim: &str,
        email: &str,
    ) -> Result<Option<DuplicateField>, RepositoryError> {
        let applications = self.applications.read().await;
        Ok(applications
            .iter()
            .find_map(|existing| duplicate_of(existing, nim, email)))
    }

    async fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        let applications = self.applications.read().await;
        Ok(newest_first(&applications))
    }

    async fn stats(&self) -> Result<Stats, RepositoryError> {
        let applications = self.applications.read().await;
        Ok(Stats::tally(applications.iter()))
    }

    async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        assigned_division: &str,
    ) -> Result<Option<Application>, RepositoryError> {
        let mut applications = self.applications.write().await;
        Ok(applications.iter_mut().find(|a| a.id == id).map(|a| {
            a.status = status;
            a.assigned_division = assigned_division.to_string();
            a.clone()
        }))
    }
}
