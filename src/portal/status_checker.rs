use super::client::{ClientError, GENERIC_ERROR, PortalClient};
use super::presentation::StatusPresentation;
use crate::schemas::application_schema::ApplicationSummary;

pub const EMPTY_IDENTIFIER: &str = "Masukkan NIM atau Email";
pub const CHECK_FAILED: &str = "Gagal mengecek status. Coba lagi nanti.";

#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    Found {
        application: ApplicationSummary,
        presentation: StatusPresentation,
    },
    NotFound,
}

/// Status lookup by NIM or email. One request per check, no retries.
pub struct StatusChecker {
    client: PortalClient,
    input: String,
    outcome: Option<StatusOutcome>,
    error: Option<String>,
}

impl StatusChecker {
    pub fn new(client: PortalClient) -> Self {
        Self {
            client,
            input: String::new(),
            outcome: None,
            error: None,
        }
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn outcome(&self) -> Option<&StatusOutcome> {
        self.outcome.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn check(&mut self) -> Option<&StatusOutcome> {
        let identifier = self.input.trim();
        if identifier.is_empty() {
            self.error = Some(EMPTY_IDENTIFIER.to_string());
            return None;
        }

        self.error = None;
        self.outcome = None;

        match self.client.check_status(identifier).await {
            Ok(lookup) => {
                self.outcome = Some(match lookup.application {
                    Some(application) if lookup.found => StatusOutcome::Found {
                        presentation: StatusPresentation::from_wire(&application.status),
                        application,
                    },
                    _ => StatusOutcome::NotFound,
                });
            }
            Err(ClientError::Transport(e)) => {
                tracing::error!("Error checking status: {}", e);
                self.error = Some(CHECK_FAILED.to_string());
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(if message.is_empty() {
                    GENERIC_ERROR.to_string()
                } else {
                    message
                });
            }
        }

        self.outcome.as_ref()
    }
}
