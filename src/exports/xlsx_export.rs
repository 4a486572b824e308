use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use super::ExportError;
use super::csv_export::{CSV_HEADERS, display_date};
use crate::models::application::{Application, ApplicationStatus, Stats};

fn status_format(status: ApplicationStatus) -> Format {
    let color = match status {
        ApplicationStatus::Pending => Color::RGB(0xFFA500),
        ApplicationStatus::Accepted => Color::RGB(0x008000),
        ApplicationStatus::Rejected => Color::RGB(0xFF0000),
    };
    Format::new().set_font_color(color).set_bold()
}

/// Workbook with one row per application plus a "Ringkasan" sheet counting
/// the exported rows per status.
pub fn applications_xlsx(applications: &[&Application]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::RGB(0xFFFFFF));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Pendaftar")?;

    for (col, header) in CSV_HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, 20.0)?;
    }
    worksheet.set_column_width(0, 28.0)?; // Nama
    worksheet.set_column_width(2, 30.0)?; // Email

    for (row_idx, application) in applications.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        worksheet.write_string(row, 0, &application.full_name)?;
        worksheet.write_string(row, 1, &application.nim)?;
        worksheet.write_string(row, 2, &application.email)?;
        worksheet.write_string(row, 3, &application.phone)?;
        worksheet.write_string(row, 4, application.semester.as_deref().unwrap_or(""))?;
        match application.ipk {
            Some(ipk) => {
                worksheet.write_number_with_format(
                    row,
                    5,
                    ipk,
                    &Format::new().set_num_format("0.00"),
                )?;
            }
            None => {
                worksheet.write_string(row, 5, "")?;
            }
        }
        worksheet.write_string(row, 6, &application.proker1)?;
        worksheet.write_string(row, 7, &application.department1)?;
        worksheet.write_string(row, 8, &application.proker2)?;
        worksheet.write_string(row, 9, &application.department2)?;
        worksheet.write_string_with_format(
            row,
            10,
            application.status.label(),
            &status_format(application.status),
        )?;
        worksheet.write_string(row, 11, display_date(application.submitted_at))?;
    }

    let stats = Stats::tally(applications.iter().copied());

    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name("Ringkasan")?;

    for (col, header) in ["Status", "Jumlah", "Persentase"].iter().enumerate() {
        summary_sheet.write_with_format(0, col as u16, *header, &header_format)?;
    }

    let total = stats.total as f64;
    let percentage_format = Format::new().set_num_format("0.00%");
    let mut row = 1;
    for status in ApplicationStatus::ALL {
        let count = stats.by_status.get(status) as f64;
        let share = if total > 0.0 { count / total } else { 0.0 };

        summary_sheet.write_string_with_format(row, 0, status.label(), &status_format(status))?;
        summary_sheet.write_number(row, 1, count)?;
        summary_sheet.write_number_with_format(row, 2, share, &percentage_format)?;
        row += 1;
    }

    let total_format = Format::new()
        .set_bold()
        .set_border_top(FormatBorder::Double);
    summary_sheet.write_string_with_format(row, 0, "TOTAL", &total_format)?;
    summary_sheet.write_number_with_format(row, 1, total, &total_format)?;
    summary_sheet.autofit();

    Ok(workbook.save_to_buffer()?)
}
