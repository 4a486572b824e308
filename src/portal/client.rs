use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::models::application::{Application, ApplicationStatus, Stats};
use crate::schemas::application_schema::{
    ApplicationListResponse, ApplicationResponse, CheckStatusRequest, CheckStatusResponse,
    StatusLookup, StatsResponse, SubmitApplicationRequest, SubmitApplicationResponse,
};
use crate::schemas::auth_schema::{LoginRequest, LoginResponse};
use crate::schemas::catalog_schema::ProkerOptionsResponse;
use crate::utils::response::{ApiResponse, FieldErrors};

pub const GENERIC_ERROR: &str = "Terjadi kesalahan";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Refused before any request was sent.
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected {
        status: StatusCode,
        message: String,
        errors: FieldErrors,
    },
    #[error("{0}")]
    Unauthorized(String),
}

impl ClientError {
    pub fn local(message: impl Into<String>, errors: FieldErrors) -> Self {
        ClientError::Validation {
            message: message.into(),
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DivisionSummary {
    pub name: String,
    pub description: String,
    pub prokers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DivisionsPayload {
    divisions: Vec<DivisionSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusBody<'a> {
    status: ApplicationStatus,
    assigned_division: &'a str,
}

/// Typed HTTP client for the portal API.
#[derive(Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
    requests: Arc<AtomicUsize>,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of requests issued so far, successful or not.
    pub fn requests_sent(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let response = request.send().await?;
        let status = response.status();
        let body: ApiResponse<T> = response.json().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized(
                body.error.unwrap_or_else(|| GENERIC_ERROR.to_string()),
            ));
        }

        match body.data {
            Some(data) if status.is_success() && body.success => Ok(data),
            _ => Err(ClientError::Rejected {
                status,
                message: body
                    .error
                    .or(body.message)
                    .unwrap_or_else(|| GENERIC_ERROR.to_string()),
                errors: body.errors.unwrap_or_default(),
            }),
        }
    }

    pub async fn divisions(&self) -> Result<Vec<DivisionSummary>, ClientError> {
        let payload: DivisionsPayload = self.send(self.request(Method::GET, "/divisions")).await?;
        Ok(payload.divisions)
    }

    pub async fn proker_options(
        &self,
        department: &str,
        other_department: &str,
        other_proker: &str,
        sekben: bool,
    ) -> Result<Vec<String>, ClientError> {
        let mut url = reqwest::Url::parse(&format!("{}/divisions/prokers", self.base_url))
            .map_err(|e| ClientError::local(e.to_string(), FieldErrors::new()))?;
        url.query_pairs_mut()
            .append_pair("department", department)
            .append_pair("otherDepartment", other_department)
            .append_pair("otherProker", other_proker)
            .append_pair("sekben", if sekben { "true" } else { "false" });

        let payload: ProkerOptionsResponse = self.send(self.http.get(url)).await?;
        Ok(payload.options)
    }

    pub async fn submit(
        &self,
        application: &SubmitApplicationRequest,
    ) -> Result<SubmitApplicationResponse, ClientError> {
        self.send(
            self.request(Method::POST, "/applications/submit")
                .json(application),
        )
        .await
    }

    pub async fn check_status(&self, identifier: &str) -> Result<StatusLookup, ClientError> {
        let payload: CheckStatusResponse = self
            .send(
                self.request(Method::POST, "/applications/check-status")
                    .json(&CheckStatusRequest {
                        identifier: identifier.to_string(),
                    }),
            )
            .await?;
        Ok(payload.result)
    }

    pub async fn login(&self, password: &str) -> Result<LoginResponse, ClientError> {
        self.send(
            self.request(Method::POST, "/admin/login")
                .json(&LoginRequest {
                    password: password.to_string(),
                }),
        )
        .await
    }

    pub async fn list(&self, token: &str) -> Result<Vec<Application>, ClientError> {
        let payload: ApplicationListResponse = self
            .send(
                self.request(Method::GET, "/applications/list")
                    .bearer_auth(token),
            )
            .await?;
        Ok(payload.applications)
    }

    pub async fn stats(&self, token: &str) -> Result<Stats, ClientError> {
        let payload: StatsResponse = self
            .send(
                self.request(Method::GET, "/applications/stats")
                    .bearer_auth(token),
            )
            .await?;
        Ok(payload.stats)
    }

    pub async fn application(&self, token: &str, id: &str) -> Result<Application, ClientError> {
        let payload: ApplicationResponse = self
            .send(
                self.request(Method::GET, &format!("/applications/{id}"))
                    .bearer_auth(token),
            )
            .await?;
        Ok(payload.application)
    }

    pub async fn update_status(
        &self,
        token: &str,
        id: &str,
        status: ApplicationStatus,
        assigned_division: &str,
    ) -> Result<Application, ClientError> {
        let payload: ApplicationResponse = self
            .send(
                self.request(Method::PATCH, &format!("/applications/{id}/status"))
                    .bearer_auth(token)
                    .json(&UpdateStatusBody {
                        status,
                        assigned_division,
                    }),
            )
            .await?;
        Ok(payload.application)
    }
}
