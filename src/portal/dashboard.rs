use chrono::Utc;

use super::client::{ClientError, PortalClient};
use crate::exports::{ExportError, applications_csv, export_filename};
use crate::models::application::{Application, ApplicationStatus, Stats};
use crate::models::filter::ApplicationFilter;
use crate::utils::response::FieldErrors;
use crate::utils::validation::push;

pub const EMPTY_PASSWORD: &str = "Password wajib diisi";
pub const NOT_LOGGED_IN: &str = "Silakan login sebagai admin";
pub const NO_SELECTION: &str = "Tidak ada pendaftar yang dipilih";
pub const DECISION_SAVED: &str = "Status pendaftar berhasil diperbarui";
pub const DECISION_FAILED: &str = "Gagal memperbarui status pendaftar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Open detail modal with its editable assigned division.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub application: Application,
    pub assigned_division: String,
}

impl DetailView {
    /// `(from, to)` when saving would move the applicant to another division.
    pub fn relocation(&self) -> Option<(&str, &str)> {
        (self.assigned_division != self.application.assigned_division).then_some((
            self.application.assigned_division.as_str(),
            self.assigned_division.as_str(),
        ))
    }
}

/// Admin dashboard session. The token lives only in this struct.
pub struct AdminSession {
    client: PortalClient,
    token: Option<String>,
    applications: Vec<Application>,
    stats: Option<Stats>,
    filter: ApplicationFilter,
    detail: Option<DetailView>,
    notice: Option<Notice>,
    error: Option<String>,
}

impl AdminSession {
    pub fn new(client: PortalClient) -> Self {
        Self {
            client,
            token: None,
            applications: Vec::new(),
            stats: None,
            filter: ApplicationFilter::default(),
            detail: None,
            notice: None,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn token(&self) -> Result<&str, ClientError> {
        self.token
            .as_deref()
            .ok_or_else(|| ClientError::Unauthorized(NOT_LOGGED_IN.to_string()))
    }

    pub async fn login(&mut self, password: &str) -> Result<(), ClientError> {
        if password.is_empty() {
            let mut errors = FieldErrors::new();
            push(&mut errors, "password", EMPTY_PASSWORD);
            self.error = Some(EMPTY_PASSWORD.to_string());
            return Err(ClientError::local(EMPTY_PASSWORD, errors));
        }

        match self.client.login(password).await {
            Ok(login) => {
                tracing::info!("Admin logged in, token valid for {}s", login.expires_in);
                self.token = Some(login.token);
                self.error = None;
                self.refresh().await
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Reload the list and the stats together.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let token = self.token()?;
        let loaded = futures::try_join!(self.client.list(token), self.client.stats(token));

        match loaded {
            Ok((applications, stats)) => {
                self.applications = applications;
                self.stats = Some(stats);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading applications: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn set_status_filter(&mut self, status: Option<ApplicationStatus>) {
        self.filter.status = status;
    }

    pub fn set_division_filter(&mut self, division: Option<String>) {
        self.filter.division = division;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn filtered(&self) -> Vec<&Application> {
        self.filter.apply(&self.applications)
    }

    pub fn division_options(&self) -> Vec<&str> {
        self.stats
            .iter()
            .flat_map(|stats| stats.by_division.keys().map(String::as_str))
            .collect()
    }

    pub fn open_detail(&mut self, id: &str) -> Option<&DetailView> {
        let application = self.applications.iter().find(|a| a.id == id)?.clone();
        self.detail = Some(DetailView {
            assigned_division: application.assigned_division.clone(),
            application,
        });
        self.detail.as_ref()
    }

    pub fn set_assigned_division(&mut self, division: impl Into<String>) {
        if let Some(detail) = self.detail.as_mut() {
            detail.assigned_division = division.into();
        }
    }

    pub fn relocation(&self) -> Option<(&str, &str)> {
        self.detail.as_ref().and_then(DetailView::relocation)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Save a decision for the open application with the edited division.
    pub async fn decide(&mut self, status: ApplicationStatus) -> Result<(), ClientError> {
        let Some(detail) = self.detail.as_ref() else {
            return Err(ClientError::local(NO_SELECTION, FieldErrors::new()));
        };
        let token = self.token()?.to_string();

        let result = self
            .client
            .update_status(
                &token,
                &detail.application.id,
                status,
                &detail.assigned_division,
            )
            .await;

        let updated = match result {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!("Error updating status: {}", e);
                self.notice = Some(Notice {
                    kind: NoticeKind::Failure,
                    message: format!("{}: {}", DECISION_FAILED, e),
                });
                return Err(e);
            }
        };

        if let Some(entry) = self.applications.iter_mut().find(|a| a.id == updated.id) {
            *entry = updated;
        }

        match self.client.stats(&token).await {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => tracing::warn!("Error refreshing stats: {}", e),
        }

        self.detail = None;
        self.notice = Some(Notice {
            kind: NoticeKind::Success,
            message: DECISION_SAVED.to_string(),
        });
        Ok(())
    }

    /// CSV of the rows currently passing the filter.
    pub fn export_csv(&self) -> Result<(String, Vec<u8>), ExportError> {
        let bytes = applications_csv(self.filtered())?;
        Ok((export_filename(Utc::now().date_naive(), "csv"), bytes))
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.applications.clear();
        self.stats = None;
        self.filter = ApplicationFilter::default();
        self.detail = None;
        self.notice = None;
        self.error = None;
    }

    #[cfg(test)]
    pub(crate) fn seeded(client: PortalClient, token: &str, applications: Vec<Application>) -> Self {
        let stats = Stats::tally(&applications);
        Self {
            token: Some(token.to_string()),
            stats: Some(stats),
            applications,
            ..Self::new(client)
        }
    }
}
