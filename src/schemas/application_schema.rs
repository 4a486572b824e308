use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus, NewApplication, Stats};
use crate::models::catalog::{self, PreferenceError};
use crate::models::filter::ApplicationFilter;
use crate::utils::attachment::{AttachmentKind, DecodedFile, decode_pdf};
use crate::utils::response::FieldErrors;
use crate::utils::validation::push;

static NIM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8,20}$").expect("nim pattern"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("phone pattern"));

pub const MAX_SEMESTER: u8 = 14;

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Nama lengkap minimal 1 karakter dan maksimal 255 karakter"
    ))]
    pub full_name: String,
    #[validate(regex(path = *NIM_PATTERN, message = "NIM harus berupa 8-20 digit angka"))]
    pub nim: String,
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
    #[validate(regex(path = *PHONE_PATTERN, message = "Nomor WhatsApp tidak valid"))]
    pub phone: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub semester: Option<String>,
    #[serde(default)]
    pub ipk: Option<f64>,
    #[validate(length(min = 1, message = "Departemen pilihan 1 wajib dipilih"))]
    pub department1: String,
    #[validate(length(min = 1, message = "Program kerja pilihan 1 wajib dipilih"))]
    pub proker1: String,
    #[validate(length(min = 1, message = "Departemen pilihan 2 wajib dipilih"))]
    pub department2: String,
    #[validate(length(min = 1, message = "Program kerja pilihan 2 wajib dipilih"))]
    pub proker2: String,
    #[validate(length(min = 1, message = "Motivasi wajib diisi"))]
    pub motivation: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub experience: Option<String>,
    #[validate(length(min = 1, message = "KTM wajib diunggah"))]
    pub ktm_file: String,
    #[validate(length(min = 1, message = "Surat Komitmen wajib diunggah"))]
    pub commitment_letter_file: String,
    #[validate(length(min = 1, message = "CV wajib diunggah"))]
    pub cv_file: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub portfolio_file: Option<String>,
}

impl SubmitApplicationRequest {
    /// Trim the free-text identity fields before validation.
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.nim = self.nim.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.motivation = self.motivation.trim().to_string();
        self
    }

    pub fn needs_portfolio(&self) -> bool {
        catalog::requires_portfolio(&self.department1, &self.proker1)
            || catalog::requires_portfolio(&self.department2, &self.proker2)
    }

    /// Rules the derive cannot express: numeric ranges on optional fields,
    /// catalog membership, distinct preferences and the portfolio rule.
    pub fn rule_violations(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if let Some(semester) = &self.semester {
            let in_range = semester
                .trim()
                .parse::<u8>()
                .is_ok_and(|value| (1..=MAX_SEMESTER).contains(&value));
            if !in_range {
                push(&mut errors, "semester", "Semester harus di antara 1 dan 14");
            }
        }

        if let Some(ipk) = self.ipk {
            if !(0.0..=4.0).contains(&ipk) {
                push(&mut errors, "ipk", "IPK harus di antara 0.00 dan 4.00");
            }
        }

        let preferences = [
            ("department1", "proker1", &self.department1, &self.proker1),
            ("department2", "proker2", &self.department2, &self.proker2),
        ];
        for (department_field, proker_field, department, proker) in preferences {
            if department.is_empty() || proker.is_empty() {
                continue;
            }
            match catalog::classify_preference(department, proker) {
                Ok(_) => {}
                Err(e @ PreferenceError::UnknownDepartment) => {
                    push(&mut errors, department_field, e.to_string())
                }
                Err(e @ PreferenceError::UnknownProker) => {
                    push(&mut errors, proker_field, e.to_string())
                }
            }
        }

        if !self.proker1.is_empty()
            && self.department1 == self.department2
            && self.proker1 == self.proker2
        {
            push(
                &mut errors,
                "proker2",
                "Pilihan 2 tidak boleh sama dengan pilihan 1",
            );
        }

        if self.needs_portfolio() && self.portfolio_file.is_none() {
            push(
                &mut errors,
                AttachmentKind::Portfolio.field(),
                "Portofolio wajib diunggah untuk pilihan Departemen MEDINFO",
            );
        }

        errors
    }

    fn attachment(&self, kind: AttachmentKind) -> Option<&str> {
        let value = match kind {
            AttachmentKind::Ktm => Some(&self.ktm_file),
            AttachmentKind::CommitmentLetter => Some(&self.commitment_letter_file),
            AttachmentKind::Cv => Some(&self.cv_file),
            AttachmentKind::Portfolio => self.portfolio_file.as_ref(),
        };
        value.map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Decode every provided attachment. Failures are reported per field.
    pub fn decode_attachments(
        &self,
        max_bytes: usize,
    ) -> Result<Vec<(AttachmentKind, DecodedFile)>, FieldErrors> {
        let mut decoded = Vec::new();
        let mut errors = FieldErrors::new();

        for kind in AttachmentKind::ALL {
            let Some(data_url) = self.attachment(kind) else {
                continue;
            };
            match decode_pdf(data_url, max_bytes) {
                Ok(file) => decoded.push((kind, file)),
                Err(e) => push(&mut errors, kind.field(), format!("{}: {}", kind.label(), e)),
            }
        }

        if errors.is_empty() {
            Ok(decoded)
        } else {
            Err(errors)
        }
    }

    pub fn into_new_application(self) -> NewApplication {
        NewApplication {
            full_name: self.full_name,
            nim: self.nim,
            email: self.email,
            phone: self.phone,
            semester: self.semester.map(|s| s.trim().to_string()),
            ipk: self.ipk,
            department1: self.department1,
            proker1: self.proker1,
            department2: self.department2,
            proker2: self.proker2,
            motivation: self.motivation,
            experience: self.experience,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationResponse {
    pub application_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStatusRequest {
    #[serde(default)]
    pub identifier: String,
}

/// Public view of an application returned by the status check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub full_name: String,
    pub nim: String,
    pub email: String,
    pub proker1: String,
    pub department1: String,
    pub proker2: String,
    pub department2: String,
    /// Kept as text so clients can cope with values they do not know.
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<Application> for ApplicationSummary {
    fn from(application: Application) -> Self {
        Self {
            full_name: application.full_name,
            nim: application.nim,
            email: application.email,
            proker1: application.proker1,
            department1: application.department1,
            proker2: application.proker2,
            department2: application.department2,
            status: application.status.to_string(),
            submitted_at: application.submitted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLookup {
    pub found: bool,
    #[serde(flatten)]
    pub application: Option<ApplicationSummary>,
}

impl StatusLookup {
    pub fn found(application: Application) -> Self {
        Self {
            found: true,
            application: Some(application.into()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            application: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStatusResponse {
    pub result: StatusLookup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub assigned_division: String,
}

impl UpdateStatusRequest {
    pub fn parse(&self) -> Result<(ApplicationStatus, &str), FieldErrors> {
        let mut errors = FieldErrors::new();

        let status = self.status.parse::<ApplicationStatus>().map_err(|e| {
            push(&mut errors, "status", e.to_string());
        });
        let division = self.assigned_division.trim();
        if !catalog::is_department(division) {
            push(
                &mut errors,
                "assigned_division",
                "Divisi tidak terdaftar pada katalog",
            );
        }

        match status {
            Ok(status) if errors.is_empty() => Ok((status, division)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationFilterQuery {
    pub status: Option<String>,
    pub division: Option<String>,
    pub search: Option<String>,
}

impl ApplicationFilterQuery {
    pub fn into_filter(self) -> Result<ApplicationFilter, FieldErrors> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(value) => match value.parse::<ApplicationStatus>() {
                Ok(status) => Some(status),
                Err(e) => {
                    let mut errors = FieldErrors::new();
                    push(&mut errors, "status", e.to_string());
                    return Err(errors);
                }
            },
        };

        let division = match self.division.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(value) => Some(value.to_string()),
        };

        Ok(ApplicationFilter {
            status,
            division,
            search: self.search.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<Application>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub application: Application,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::attachment::encode_data_url;
    use serde_json::json;

    const PDF: &[u8] = b"%PDF-1.4\n%test\n";

    pub fn valid_request() -> SubmitApplicationRequest {
        let pdf = encode_data_url("application/pdf", PDF);
        serde_json::from_value(json!({
            "fullName": "Budi Santoso",
            "nim": "162111233044",
            "email": "budi@student.unair.ac.id",
            "phone": "081234567890",
            "semester": "3",
            "ipk": 3.75,
            "department1": "Departemen PSDM",
            "proker1": "Upgrading",
            "department2": "Departemen PSDM",
            "proker2": "Welwis",
            "motivation": "Ingin belajar berorganisasi",
            "experience": "",
            "ktmFile": pdf,
            "commitmentLetterFile": pdf,
            "cvFile": pdf
        }))
        .unwrap()
    }

    #[test]
    fn valid_request_passes_every_rule() {
        let request = valid_request();
        assert!(request.validate().is_ok());
        assert!(request.rule_violations().is_empty());
        assert_eq!(request.decode_attachments(1024).unwrap().len(), 3);
        assert_eq!(request.experience, None);
    }

    #[test]
    fn rejects_malformed_identity_fields() {
        let request = SubmitApplicationRequest {
            nim: "16211A".to_string(),
            phone: "12-34".to_string(),
            email: "budi".to_string(),
            ..valid_request()
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nim"));
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn identical_preferences_are_rejected() {
        let request = SubmitApplicationRequest {
            proker2: "Upgrading".to_string(),
            ..valid_request()
        };
        assert!(request.rule_violations().contains_key("proker2"));
    }

    #[test]
    fn same_proker_name_in_other_department_is_unknown_not_duplicate() {
        let request = SubmitApplicationRequest {
            department2: "Departemen EKRAF".to_string(),
            proker2: "Upgrading".to_string(),
            ..valid_request()
        };
        let errors = request.rule_violations();
        assert_eq!(
            errors["proker2"],
            vec![PreferenceError::UnknownProker.to_string()]
        );
    }

    #[test]
    fn sekben_department_is_not_a_preference() {
        let request = SubmitApplicationRequest {
            department1: catalog::SEKBEN_DEPARTMENT.to_string(),
            proker1: "Musma GD dan AD/ART".to_string(),
            ..valid_request()
        };
        assert!(request.rule_violations().contains_key("department1"));
    }

    #[test]
    fn sekben_role_is_accepted_in_any_placement_department() {
        let request = SubmitApplicationRequest {
            department2: "Departemen HUBLU".to_string(),
            proker2: "Bendahara".to_string(),
            ..valid_request()
        };
        assert!(request.rule_violations().is_empty());
    }

    #[test]
    fn medinfo_design_requires_portfolio() {
        let request = SubmitApplicationRequest {
            department2: catalog::MEDINFO_DEPARTMENT.to_string(),
            proker2: "Creative Design".to_string(),
            ..valid_request()
        };
        assert!(request.rule_violations().contains_key("portfolio_file"));

        let copywriting = SubmitApplicationRequest {
            department2: catalog::MEDINFO_DEPARTMENT.to_string(),
            proker2: catalog::COPYWRITING_PROKER.to_string(),
            ..valid_request()
        };
        assert!(copywriting.rule_violations().is_empty());
    }

    #[test]
    fn out_of_range_semester_and_ipk() {
        let request = SubmitApplicationRequest {
            semester: Some("15".to_string()),
            ipk: Some(4.5),
            ..valid_request()
        };
        let errors = request.rule_violations();
        assert!(errors.contains_key("semester"));
        assert!(errors.contains_key("ipk"));
    }

    #[test]
    fn non_pdf_attachment_is_reported_on_its_field() {
        let request = SubmitApplicationRequest {
            cv_file: encode_data_url("application/pdf", b"GIF89a-not-a-pdf"),
            ..valid_request()
        };
        let errors = request.decode_attachments(1024).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors["cv_file"][0].starts_with("CV"));
    }

    #[test]
    fn update_status_checks_status_and_division() {
        let request = UpdateStatusRequest {
            status: "accepted".to_string(),
            assigned_division: "Departemen EKRAF".to_string(),
        };
        assert_eq!(
            request.parse().unwrap(),
            (ApplicationStatus::Accepted, "Departemen EKRAF")
        );

        let invalid = UpdateStatusRequest {
            status: "archived".to_string(),
            assigned_division: "Departemen Fiktif".to_string(),
        };
        let errors = invalid.parse().unwrap_err();
        assert!(errors.contains_key("status"));
        assert!(errors.contains_key("assigned_division"));
    }

    #[test]
    fn filter_query_treats_all_as_unset() {
        let filter = ApplicationFilterQuery {
            status: Some("all".to_string()),
            division: Some("".to_string()),
            search: Some("budi".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.division, None);
        assert_eq!(filter.search, "budi");
    }

    #[test]
    fn lookup_serializes_flat() {
        let value = serde_json::to_value(StatusLookup::not_found()).unwrap();
        assert_eq!(value, json!({"found": false}));
    }
}
