use crate::models::application::{Application, ApplicationStatus};

/// Admin list filter. The three predicates are independent and combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub division: Option<String>,
    pub search: String,
}

impl ApplicationFilter {
    pub fn matches_status(&self, application: &Application) -> bool {
        self.status.is_none_or(|status| application.status == status)
    }

    pub fn matches_division(&self, application: &Application) -> bool {
        self.division
            .as_deref()
            .is_none_or(|division| application.assigned_division == division)
    }

    pub fn matches_search(&self, application: &Application) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        application.full_name.to_lowercase().contains(&needle)
            || application.nim.to_lowercase().contains(&needle)
            || application.email.to_lowercase().contains(&needle)
    }

    pub fn matches(&self, application: &Application) -> bool {
        self.matches_status(application)
            && self.matches_division(application)
            && self.matches_search(application)
    }

    pub fn apply<'a>(&self, applications: &'a [Application]) -> Vec<&'a Application> {
        applications
            .iter()
            .filter(|application| self.matches(application))
            .collect()
    }
}
