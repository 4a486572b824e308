use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Status tidak dikenal: {0}")]
pub struct UnknownStatus(pub String);

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Label shown in the admin table.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Diterima",
            ApplicationStatus::Rejected => "Ditolak",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Where the uploaded attachments of one application ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documents {
    pub ktm: String,
    pub commitment_letter: String,
    pub cv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub full_name: String,
    pub nim: String,
    pub email: String,
    pub phone: String,
    pub semester: Option<String>,
    pub ipk: Option<f64>,
    pub department1: String,
    pub proker1: String,
    pub department2: String,
    pub proker2: String,
    pub motivation: String,
    pub experience: Option<String>,
    pub documents: Documents,
    pub status: ApplicationStatus,
    pub assigned_division: String,
    pub submitted_at: DateTime<Utc>,
}

/// Applicant-provided part of an application, before the server assigns
/// identity, documents and review state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub full_name: String,
    pub nim: String,
    pub email: String,
    pub phone: String,
    pub semester: Option<String>,
    pub ipk: Option<f64>,
    pub department1: String,
    pub proker1: String,
    pub department2: String,
    pub proker2: String,
    pub motivation: String,
    pub experience: Option<String>,
}

impl NewApplication {
    pub fn into_application(
        self,
        id: String,
        documents: Documents,
        submitted_at: DateTime<Utc>,
    ) -> Application {
        Application {
            id,
            assigned_division: self.department1.clone(),
            full_name: self.full_name,
            nim: self.nim,
            email: self.email,
            phone: self.phone,
            semester: self.semester,
            ipk: self.ipk,
            department1: self.department1,
            proker1: self.proker1,
            department2: self.department2,
            proker2: self.proker2,
            motivation: self.motivation,
            experience: self.experience,
            documents,
            status: ApplicationStatus::Pending,
            submitted_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: String,
    pub full_name: String,
    pub nim: String,
    pub email: String,
    pub phone: String,
    pub semester: Option<String>,
    pub ipk: Option<f64>,
    pub department1: String,
    pub proker1: String,
    pub department2: String,
    pub proker2: String,
    pub motivation: String,
    pub experience: Option<String>,
    pub ktm_url: String,
    pub commitment_letter_url: String,
    pub cv_url: String,
    pub portfolio_url: Option<String>,
    pub status: String,
    pub assigned_division: String,
    pub submitted_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = UnknownStatus;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            status: row.status.parse()?,
            id: row.id,
            full_name: row.full_name,
            nim: row.nim,
            email: row.email,
            phone: row.phone,
            semester: row.semester,
            ipk: row.ipk,
            department1: row.department1,
            proker1: row.proker1,
            department2: row.department2,
            proker2: row.proker2,
            motivation: row.motivation,
            experience: row.experience,
            documents: Documents {
                ktm: row.ktm_url,
                commitment_letter: row.commitment_letter_url,
                cv: row.cv_url,
                portfolio: row.portfolio_url,
            },
            assigned_division: row.assigned_division,
            submitted_at: row.submitted_at,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
}

impl StatusCounts {
    pub fn get(&self, status: ApplicationStatus) -> i64 {
        match status {
            ApplicationStatus::Pending => self.pending,
            ApplicationStatus::Accepted => self.accepted,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    fn bump(&mut self, status: ApplicationStatus) {
        match status {
            ApplicationStatus::Pending => self.pending += 1,
            ApplicationStatus::Accepted => self.accepted += 1,
            ApplicationStatus::Rejected => self.rejected += 1,
        }
    }
}

pub const UNKNOWN_SEMESTER: &str = "-";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: i64,
    pub by_division: BTreeMap<String, i64>,
    pub by_semester: BTreeMap<String, i64>,
    pub by_status: StatusCounts,
}

impl Stats {
    pub fn tally<'a>(applications: impl IntoIterator<Item = &'a Application>) -> Self {
        let mut stats = Stats::default();
        for application in applications {
            stats.total += 1;
            *stats
                .by_division
                .entry(application.assigned_division.clone())
                .or_default() += 1;
            let semester = application
                .semester
                .clone()
                .unwrap_or_else(|| UNKNOWN_SEMESTER.to_string());
            *stats.by_semester.entry(semester).or_default() += 1;
            stats.by_status.bump(application.status);
        }
        stats
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn documents() -> Documents {
        Documents {
            ktm: "uploads/ktm.pdf".to_string(),
            commitment_letter: "uploads/surat.pdf".to_string(),
            cv: "uploads/cv.pdf".to_string(),
            portfolio: None,
        }
    }

    pub fn application(id: &str, name: &str, nim: &str, email: &str) -> Application {
        NewApplication {
            full_name: name.to_string(),
            nim: nim.to_string(),
            email: email.to_string(),
            phone: "08123456789".to_string(),
            semester: Some("3".to_string()),
            ipk: Some(3.5),
            department1: "Departemen PSDM".to_string(),
            proker1: "Upgrading".to_string(),
            department2: "Departemen EKRAF".to_string(),
            proker2: "Safe Merch".to_string(),
            motivation: "Ingin berkontribusi".to_string(),
            experience: None,
        }
        .into_application(
            id.to_string(),
            documents(),
            Utc.with_ymd_and_hms(2026, 1, 6, 2, 30, 0).unwrap(),
        )
    }
}
