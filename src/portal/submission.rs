use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use validator::Validate;

use super::client::{ClientError, PortalClient};
use crate::models::catalog::{self, SEKBEN_ROLES};
use crate::schemas::application_schema::SubmitApplicationRequest;
use crate::utils::attachment::{AttachmentKind, encode_data_url, is_pdf, size_label};
use crate::utils::response::FieldErrors;
use crate::utils::validation::{field_errors, merge, push};

pub const RESET_DELAY: Duration = Duration::from_secs(5);
pub const SUBMIT_FAILED: &str = "Terjadi kesalahan saat mengirim pendaftaran";
pub const INCOMPLETE: &str = "Lengkapi data pendaftaran terlebih dahulu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalField {
    FullName,
    Nim,
    Email,
    Phone,
    Semester,
    Ipk,
    Motivation,
    Experience,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalDetails {
    pub full_name: String,
    pub nim: String,
    pub email: String,
    pub phone: String,
    pub semester: String,
    pub ipk: String,
    pub motivation: String,
    pub experience: String,
}

impl PersonalDetails {
    fn field_mut(&mut self, field: PersonalField) -> &mut String {
        match field {
            PersonalField::FullName => &mut self.full_name,
            PersonalField::Nim => &mut self.nim,
            PersonalField::Email => &mut self.email,
            PersonalField::Phone => &mut self.phone,
            PersonalField::Semester => &mut self.semester,
            PersonalField::Ipk => &mut self.ipk,
            PersonalField::Motivation => &mut self.motivation,
            PersonalField::Experience => &mut self.experience,
        }
    }
}

/// One preference: a department plus either a proker or, in Sekben mode, a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSlot {
    pub sekben: bool,
    pub department: String,
    pub choice: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub personal: PersonalDetails,
    pub preferences: [PreferenceSlot; 2],
    pub attachments: HashMap<AttachmentKind, Attachment>,
    /// Application id of the last accepted submission.
    pub confirmation: Option<String>,
    pub error: Option<String>,
}

impl FormState {
    fn slot(&self, slot: Slot) -> &PreferenceSlot {
        &self.preferences[slot.index()]
    }

    fn needs_portfolio(&self) -> bool {
        self.preferences
            .iter()
            .any(|pref| catalog::requires_portfolio(&pref.department, &pref.choice))
    }
}

/// Registration form driving `POST /applications/submit`.
pub struct SubmissionForm {
    client: PortalClient,
    max_attachment_bytes: usize,
    state: Arc<Mutex<FormState>>,
}

impl SubmissionForm {
    pub fn new(client: PortalClient, max_attachment_bytes: usize) -> Self {
        Self {
            client,
            max_attachment_bytes,
            state: Arc::new(Mutex::new(FormState::default())),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn snapshot(&self) -> FormState {
        self.with_state(|state| state.clone())
    }

    pub fn edit_personal(&self, field: PersonalField, value: impl Into<String>) {
        let value = value.into();
        self.with_state(|state| *state.personal.field_mut(field) = value);
    }

    /// Switching mode in either direction empties the slot.
    pub fn toggle_sekben(&self, slot: Slot) {
        self.with_state(|state| {
            let pref = &mut state.preferences[slot.index()];
            pref.sekben = !pref.sekben;
            pref.department.clear();
            pref.choice.clear();
        });
    }

    /// A department change drops the proker. A Sekben role stays valid under
    /// any placement department, so it is kept.
    pub fn select_department(&self, slot: Slot, department: impl Into<String>) {
        let department = department.into();
        self.with_state(|state| {
            let pref = &mut state.preferences[slot.index()];
            pref.department = department;
            if !pref.sekben {
                pref.choice.clear();
            }
        });
    }

    pub fn select_choice(&self, slot: Slot, choice: impl Into<String>) {
        let choice = choice.into();
        self.with_state(|state| state.preferences[slot.index()].choice = choice);
    }

    pub fn department_options(&self) -> Vec<&'static str> {
        catalog::placement_departments()
            .map(|department| department.name)
            .collect()
    }

    pub fn choice_options(&self, slot: Slot) -> Vec<&'static str> {
        self.with_state(|state| {
            let pref = state.slot(slot);
            let other = state.slot(slot.other());
            if pref.sekben {
                return SEKBEN_ROLES
                    .into_iter()
                    .filter(|role| !(pref.department == other.department && *role == other.choice))
                    .collect();
            }
            catalog::proker_options(&pref.department, &other.department, &other.choice)
        })
    }

    pub fn needs_portfolio(&self) -> bool {
        self.with_state(|state| state.needs_portfolio())
    }

    pub fn attach(
        &self,
        kind: AttachmentKind,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) {
        let attachment = Attachment {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        };
        self.with_state(|state| state.attachments.insert(kind, attachment));
    }

    pub fn detach(&self, kind: AttachmentKind) {
        self.with_state(|state| state.attachments.remove(&kind));
    }

    /// Problems the server would report for this form, found without a
    /// request. Uniqueness of NIM and email is left to the server.
    pub fn local_errors(&self) -> FieldErrors {
        let request = self.request();
        let mut errors = match request.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => field_errors(&e),
        };
        merge(&mut errors, request.rule_violations());

        let max_bytes = self.max_attachment_bytes;
        self.with_state(|state| {
            let ipk = state.personal.ipk.trim();
            if !ipk.is_empty() && ipk.parse::<f64>().is_err() {
                push(&mut errors, "ipk", "IPK harus berupa angka");
            }

            for (kind, file) in &state.attachments {
                if file.bytes.len() > max_bytes {
                    push(
                        &mut errors,
                        kind.field(),
                        format!("{}: Ukuran berkas maksimal {}", kind.label(), size_label(max_bytes)),
                    );
                } else if !is_pdf(&file.bytes) {
                    push(
                        &mut errors,
                        kind.field(),
                        format!("{}: Berkas harus berformat PDF", kind.label()),
                    );
                }
            }
        });

        errors
    }

    fn request(&self) -> SubmitApplicationRequest {
        self.with_state(|state| {
            let personal = &state.personal;
            let data_url = |kind: AttachmentKind| {
                state
                    .attachments
                    .get(&kind)
                    .map(|file| encode_data_url(&file.mime, &file.bytes))
            };
            let optional = |value: &str| {
                let value = value.trim();
                (!value.is_empty()).then(|| value.to_string())
            };
            let [first, second] = &state.preferences;

            SubmitApplicationRequest {
                full_name: personal.full_name.trim().to_string(),
                nim: personal.nim.trim().to_string(),
                email: personal.email.trim().to_string(),
                phone: personal.phone.trim().to_string(),
                semester: optional(&personal.semester),
                ipk: personal.ipk.trim().parse().ok(),
                department1: first.department.clone(),
                proker1: first.choice.clone(),
                department2: second.department.clone(),
                proker2: second.choice.clone(),
                motivation: personal.motivation.trim().to_string(),
                experience: optional(&personal.experience),
                ktm_file: data_url(AttachmentKind::Ktm).unwrap_or_default(),
                commitment_letter_file: data_url(AttachmentKind::CommitmentLetter)
                    .unwrap_or_default(),
                cv_file: data_url(AttachmentKind::Cv).unwrap_or_default(),
                portfolio_file: data_url(AttachmentKind::Portfolio),
            }
        })
    }

    /// Sends the form once. Local problems are reported without a request.
    pub async fn submit(&self) -> Result<String, ClientError> {
        let errors = self.local_errors();
        if !errors.is_empty() {
            self.with_state(|state| state.error = Some(INCOMPLETE.to_string()));
            return Err(ClientError::local(INCOMPLETE, errors));
        }

        let request = self.request();
        self.with_state(|state| state.error = None);

        match self.client.submit(&request).await {
            Ok(response) => {
                self.confirm_submission(response.application_id.clone());
                Ok(response.application_id)
            }
            Err(e) => {
                let message = match &e {
                    ClientError::Transport(inner) => {
                        tracing::error!("Error submitting application: {}", inner);
                        SUBMIT_FAILED.to_string()
                    }
                    other => other.to_string(),
                };
                self.with_state(|state| state.error = Some(message));
                Err(e)
            }
        }
    }

    fn confirm_submission(&self, application_id: String) {
        self.with_state(|state| {
            state.confirmation = Some(application_id);
            state.error = None;
        });

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(RESET_DELAY).await;
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            *state = FormState::default();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::MEDINFO_DEPARTMENT;

    const PDF: &[u8] = b"%PDF-1.4\n%form\n";

    fn form() -> SubmissionForm {
        SubmissionForm::new(PortalClient::new("http://127.0.0.1:9"), 1024)
    }

    fn filled() -> SubmissionForm {
        let form = form();
        form.edit_personal(PersonalField::FullName, "Budi");
        form.edit_personal(PersonalField::Nim, "162111233044");
        form.edit_personal(PersonalField::Email, "budi@x.id");
        form.edit_personal(PersonalField::Phone, "08123456789");
        form.edit_personal(PersonalField::Motivation, "Ingin belajar");
        form.select_department(Slot::First, "Departemen PSDM");
        form.select_choice(Slot::First, "Upgrading");
        form.select_department(Slot::Second, "Departemen EKRAF");
        form.select_choice(Slot::Second, "Safe Merch");
        for kind in [
            AttachmentKind::Ktm,
            AttachmentKind::CommitmentLetter,
            AttachmentKind::Cv,
        ] {
            form.attach(kind, "berkas.pdf", "application/pdf", PDF.to_vec());
        }
        form
    }

    #[test]
    fn same_department_hides_the_other_slots_proker() {
        let form = form();
        form.select_department(Slot::First, "Departemen PSDM");
        form.select_choice(Slot::First, "Upgrading");
        form.select_department(Slot::Second, "Departemen PSDM");

        assert!(!form.choice_options(Slot::Second).contains(&"Upgrading"));

        form.select_choice(Slot::Second, "Welwis");
        let first = form.choice_options(Slot::First);
        assert!(!first.contains(&"Welwis"));
        assert!(first.contains(&"Upgrading"));
    }

    #[test]
    fn different_departments_keep_every_proker() {
        let form = form();
        form.select_department(Slot::First, "Departemen PSDM");
        form.select_choice(Slot::First, "Upgrading");
        form.select_department(Slot::Second, "Departemen HUBLU");

        assert_eq!(form.choice_options(Slot::Second).len(), 5);
        assert_eq!(form.choice_options(Slot::First).len(), 6);
    }

    #[test]
    fn sekben_toggle_clears_the_slot_both_ways() {
        let form = form();
        form.select_department(Slot::First, "Departemen PSDM");
        form.select_choice(Slot::First, "Upgrading");

        form.toggle_sekben(Slot::First);
        let slot = form.snapshot().preferences[0].clone();
        assert!(slot.sekben);
        assert!(slot.department.is_empty());
        assert!(slot.choice.is_empty());
        assert_eq!(form.choice_options(Slot::First), SEKBEN_ROLES.to_vec());

        form.select_department(Slot::First, "Departemen HUBLU");
        form.select_choice(Slot::First, "Bendahara");
        form.toggle_sekben(Slot::First);
        assert_eq!(form.snapshot().preferences[0], PreferenceSlot::default());
    }

    #[test]
    fn department_change_clears_proker_but_keeps_role() {
        let form = form();
        form.select_department(Slot::First, "Departemen PSDM");
        form.select_choice(Slot::First, "Upgrading");
        form.select_department(Slot::First, "Departemen EKRAF");
        assert!(form.snapshot().preferences[0].choice.is_empty());

        form.toggle_sekben(Slot::Second);
        form.select_choice(Slot::Second, "Sekretaris");
        form.select_department(Slot::Second, "Departemen HUBLU");
        assert_eq!(form.snapshot().preferences[1].choice, "Sekretaris");
    }

    #[test]
    fn same_role_in_same_department_is_caught_before_sending() {
        let form = filled();
        form.toggle_sekben(Slot::First);
        form.select_department(Slot::First, "Departemen HUBLU");
        form.select_choice(Slot::First, "Sekretaris");
        form.toggle_sekben(Slot::Second);
        form.select_department(Slot::Second, "Departemen HUBLU");

        assert_eq!(form.choice_options(Slot::Second), vec!["Bendahara"]);

        form.select_choice(Slot::Second, "Sekretaris");
        let errors = form.local_errors();
        assert_eq!(
            errors["proker2"],
            vec!["Pilihan 2 tidak boleh sama dengan pilihan 1"]
        );

        form.select_department(Slot::Second, "Departemen PSDM");
        assert_eq!(form.choice_options(Slot::Second), SEKBEN_ROLES.to_vec());
        assert!(form.local_errors().is_empty());
    }

    #[test]
    fn malformed_contact_details_are_caught_before_sending() {
        let form = filled();
        form.edit_personal(PersonalField::Nim, "16211");
        form.edit_personal(PersonalField::Email, "budi-at-x");
        form.edit_personal(PersonalField::Phone, "telepon");

        let mut fields: Vec<String> = form.local_errors().into_keys().collect();
        fields.sort();
        assert_eq!(fields, vec!["email", "nim", "phone"]);
    }

    #[test]
    fn sekben_department_is_not_offered_for_placement() {
        let options = form().department_options();
        assert_eq!(options.len(), 6);
        assert!(!options.contains(&catalog::SEKBEN_DEPARTMENT));
    }

    #[test]
    fn medinfo_outside_copywriting_requires_portfolio() {
        let form = filled();
        assert!(form.local_errors().is_empty());

        form.select_department(Slot::Second, MEDINFO_DEPARTMENT);
        form.select_choice(Slot::Second, "Creative Media");
        assert!(form.needs_portfolio());
        assert!(form.local_errors().contains_key("portfolio_file"));

        form.select_choice(Slot::Second, "Copywriting");
        assert!(!form.needs_portfolio());
        assert!(form.local_errors().is_empty());
    }

    #[test]
    fn oversized_or_non_pdf_attachments_are_flagged() {
        let form = filled();
        form.attach(AttachmentKind::Cv, "cv.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47]);
        form.attach(
            AttachmentKind::Ktm,
            "ktm.pdf",
            "application/pdf",
            [PDF, &[b'x'; 2048]].concat(),
        );

        let errors = form.local_errors();
        assert_eq!(errors["cv_file"], vec!["CV: Berkas harus berformat PDF"]);
        assert_eq!(errors["ktm_file"], vec!["KTM: Ukuran berkas maksimal 1 KB"]);
    }

    #[tokio::test]
    async fn incomplete_form_is_refused_without_a_request() {
        let client = PortalClient::new("http://127.0.0.1:9");
        let form = SubmissionForm::new(client.clone(), 1024);
        form.edit_personal(PersonalField::FullName, "Budi");

        let result = form.submit().await;

        assert!(matches!(result, Err(ClientError::Validation { .. })));
        assert_eq!(client.requests_sent(), 0);
        let state = form.snapshot();
        assert_eq!(state.personal.full_name, "Budi");
        assert_eq!(state.error.as_deref(), Some(INCOMPLETE));
    }

    #[tokio::test]
    async fn transport_failure_keeps_fields_and_shows_fallback() {
        let form = filled();

        assert!(form.submit().await.is_err());

        let state = form.snapshot();
        assert_eq!(state.error.as_deref(), Some(SUBMIT_FAILED));
        assert_eq!(state.personal.nim, "162111233044");
        assert_eq!(state.attachments.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_resets_the_form_after_five_seconds() {
        let form = filled();
        form.toggle_sekben(Slot::Second);
        form.confirm_submission("REG-1".to_string());

        assert_eq!(form.snapshot().confirmation.as_deref(), Some("REG-1"));

        tokio::time::sleep(RESET_DELAY - Duration::from_millis(1)).await;
        assert_eq!(form.snapshot().personal.full_name, "Budi");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(form.snapshot(), FormState::default());
    }
}
