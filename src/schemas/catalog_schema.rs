use serde::{Deserialize, Serialize};

use crate::models::catalog::{Department, TimelinePhase};

#[derive(Debug, Serialize)]
pub struct DivisionsResponse {
    pub divisions: &'static [Department],
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub timeline: &'static [TimelinePhase],
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProkerOptionsQuery {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub other_department: String,
    #[serde(default)]
    pub other_proker: String,
    #[serde(default)]
    pub sekben: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProkerOptionsResponse {
    pub options: Vec<String>,
}
