use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::MySqlPool;

use super::{ApplicationRepository, DuplicateField, RepositoryError};
use crate::models::application::{
    Application, ApplicationRow, ApplicationStatus, Stats, StatusCounts, UNKNOWN_SEMESTER,
};

const SELECT_APPLICATION: &str = "
    SELECT id, full_name, nim, email, phone, semester, ipk,
           department1, proker1, department2, proker2, motivation, experience,
           ktm_url, commitment_letter_url, cv_url, portfolio_url,
           status, assigned_division, submitted_at
    FROM applications
";

#[derive(Clone)]
pub struct MySqlApplicationRepository {
    pool: MySqlPool,
}

impl MySqlApplicationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn into_application(row: ApplicationRow) -> Result<Application, RepositoryError> {
    let id = row.id.clone();
    Application::try_from(row).map_err(|source| RepositoryError::Corrupt { id, source })
}

fn duplicate_from(error: &sqlx::Error) -> Option<DuplicateField> {
    let db_error = error.as_database_error()?;
    if !db_error.is_unique_violation() {
        return None;
    }
    if db_error.message().contains("applications_email_unique") {
        Some(DuplicateField::Email)
    } else {
        Some(DuplicateField::Nim)
    }
}

#[derive(sqlx::FromRow)]
struct StatusTotals {
    total: i64,
    pending: i64,
    accepted: i64,
    rejected: i64,
}

#[derive(sqlx::FromRow)]
struct GroupCount {
    label: String,
    total: i64,
}

fn into_map(groups: Vec<GroupCount>) -> BTreeMap<String, i64> {
    groups
        .into_iter()
        .map(|group| (group.label, group.total))
        .collect()
}

#[async_trait]
impl ApplicationRepository for MySqlApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "
            INSERT INTO applications (
                id, full_name, nim, email, phone, semester, ipk,
                department1, proker1, department2, proker2, motivation, experience,
                ktm_url, commitment_letter_url, cv_url, portfolio_url,
                status, assigned_division, submitted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&application.id)
        .bind(&application.full_name)
        .bind(&application.nim)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.semester)
        .bind(application.ipk)
        .bind(&application.department1)
        .bind(&application.proker1)
        .bind(&application.department2)
        .bind(&application.proker2)
        .bind(&application.motivation)
        .bind(&application.experience)
        .bind(&application.documents.ktm)
        .bind(&application.documents.commitment_letter)
        .bind(&application.documents.cv)
        .bind(&application.documents.portfolio)
        .bind(application.status.as_str())
        .bind(&application.assigned_division)
        .bind(application.submitted_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match duplicate_from(&e) {
                Some(field) => Err(RepositoryError::Duplicate(field)),
                None => Err(e.into()),
            },
        }
    }

    async fn find(&self, id: &str) -> Result<Option<Application>, RepositoryError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!("{SELECT_APPLICATION} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(into_application).transpose()
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Application>, RepositoryError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "{SELECT_APPLICATION} WHERE nim = ? OR LOWER(email) = LOWER(?) ORDER BY submitted_at DESC LIMIT 1"
        ))
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_application).transpose()
    }

    async fn find_duplicate(
        &self,
        nim: &str,
        email: &str,
    ) -> Result<Option<DuplicateField>, RepositoryError> {
        let existing: Option<(String, String)> = sqlx::query_as(
            "SELECT nim, email FROM applications WHERE nim = ? OR LOWER(email) = LOWER(?) LIMIT 1",
        )
        .bind(nim)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(existing.map(|(existing_nim, _)| {
            if existing_nim == nim {
                DuplicateField::Nim
            } else {
                DuplicateField::Email
            }
        }))
    }

    async fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "{SELECT_APPLICATION} ORDER BY submitted_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_application).collect()
    }

    async fn stats(&self) -> Result<Stats, RepositoryError> {
        let totals = sqlx::query_as::<_, StatusTotals>(
            "
            SELECT
                COUNT(*) AS total,
                CAST(COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) AS SIGNED) AS pending,
                CAST(COALESCE(SUM(CASE WHEN status = 'accepted' THEN 1 ELSE 0 END), 0) AS SIGNED) AS accepted,
                CAST(COALESCE(SUM(CASE WHEN status = 'rejected' THEN 1 ELSE 0 END), 0) AS SIGNED) AS rejected
            FROM applications
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        let by_division = sqlx::query_as::<_, GroupCount>(
            "
            SELECT assigned_division AS label, COUNT(*) AS total
            FROM applications
            GROUP BY assigned_division
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let by_semester = sqlx::query_as::<_, GroupCount>(
            "
            SELECT COALESCE(semester, ?) AS label, COUNT(*) AS total
            FROM applications
            GROUP BY label
            ",
        )
        .bind(UNKNOWN_SEMESTER)
        .fetch_all(&self.pool)
        .await?;

        Ok(Stats {
            total: totals.total,
            by_division: into_map(by_division),
            by_semester: into_map(by_semester),
            by_status: StatusCounts {
                pending: totals.pending,
                accepted: totals.accepted,
                rejected: totals.rejected,
            },
        })
    }

    async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        assigned_division: &str,
    ) -> Result<Option<Application>, RepositoryError> {
        // MySQL reports zero affected rows for no-op updates, so existence is
        // checked separately.
        if self.find(id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query("UPDATE applications SET status = ?, assigned_division = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(assigned_division)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find(id).await
    }
}
