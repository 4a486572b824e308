use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::ExportError;
use crate::models::application::Application;

pub const CSV_HEADERS: [&str; 12] = [
    "Nama",
    "NIM",
    "Email",
    "Telepon",
    "Semester",
    "IPK",
    "Proker 1",
    "Departemen 1",
    "Proker 2",
    "Departemen 2",
    "Status",
    "Tanggal Daftar",
];

const WIB_OFFSET_SECS: i32 = 7 * 3600;

pub fn export_filename(today: NaiveDate, extension: &str) -> String {
    format!("pendaftaran_{}.{}", today.format("%Y-%m-%d"), extension)
}

/// Submission date as shown to admins, `d/m/yyyy` in WIB.
pub fn display_date(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(WIB_OFFSET_SECS) {
        Some(wib) => at.with_timezone(&wib).format("%-d/%-m/%Y").to_string(),
        None => at.format("%-d/%-m/%Y").to_string(),
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

fn row(application: &Application) -> [String; 12] {
    [
        application.full_name.clone(),
        application.nim.clone(),
        application.email.clone(),
        application.phone.clone(),
        application.semester.clone().unwrap_or_default(),
        application
            .ipk
            .map(|ipk| format!("{ipk:.2}"))
            .unwrap_or_default(),
        application.proker1.clone(),
        application.department1.clone(),
        or_dash(&application.proker2).to_string(),
        or_dash(&application.department2).to_string(),
        application.status.to_string(),
        display_date(application.submitted_at),
    ]
}

/// Header line unquoted, every data cell quoted.
pub fn applications_csv<'a>(
    applications: impl IntoIterator<Item = &'a Application>,
) -> Result<Vec<u8>, ExportError> {
    let mut buffer = CSV_HEADERS.join(",").into_bytes();
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    for application in applications {
        writer.write_record(row(application))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}
