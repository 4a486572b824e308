use thiserror::Error;

pub mod csv_export;
pub mod xlsx_export;

pub use csv_export::{applications_csv, export_filename};
pub use xlsx_export::applications_xlsx;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to finish csv buffer: {0}")]
    Buffer(String),
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
