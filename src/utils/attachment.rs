use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose};
use regex::Regex;
use thiserror::Error;

// data:<mime>;base64,<payload>
static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:([\w.+-]+/[\w.+-]+);base64,(.+)$").expect("data url pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Ktm,
    CommitmentLetter,
    Cv,
    Portfolio,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 4] = [
        AttachmentKind::Ktm,
        AttachmentKind::CommitmentLetter,
        AttachmentKind::Cv,
        AttachmentKind::Portfolio,
    ];

    /// Request field carrying the attachment.
    pub fn field(&self) -> &'static str {
        match self {
            AttachmentKind::Ktm => "ktm_file",
            AttachmentKind::CommitmentLetter => "commitment_letter_file",
            AttachmentKind::Cv => "cv_file",
            AttachmentKind::Portfolio => "portfolio_file",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Ktm => "KTM",
            AttachmentKind::CommitmentLetter => "Surat Komitmen",
            AttachmentKind::Cv => "CV",
            AttachmentKind::Portfolio => "Portofolio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub mime: String,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("Berkas tidak dapat dibaca")]
    InvalidDataUrl,
    #[error("Berkas tidak dapat didekode")]
    Encoding,
    #[error("Ukuran berkas maksimal {limit_label}")]
    TooLarge { limit_label: String },
    #[error("Berkas harus berformat PDF")]
    NotPdf,
}

pub fn size_label(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

const PDF_MAGIC: &[u8] = b"%PDF";

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Decode a `data:` URL into raw bytes, rejecting anything that is not a PDF
/// or that exceeds `max_bytes`.
pub fn decode_pdf(data_url: &str, max_bytes: usize) -> Result<DecodedFile, AttachmentError> {
    let caps = DATA_URL
        .captures(data_url.trim())
        .ok_or(AttachmentError::InvalidDataUrl)?;
    let mime = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let payload = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let too_large = || AttachmentError::TooLarge {
        limit_label: size_label(max_bytes),
    };

    // Reject before decoding when the encoded length already rules it out.
    if payload.len() / 4 * 3 > max_bytes + 3 {
        return Err(too_large());
    }

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| AttachmentError::Encoding)?;

    if bytes.len() > max_bytes {
        return Err(too_large());
    }

    if !is_pdf(&bytes) {
        return Err(AttachmentError::NotPdf);
    }

    Ok(DecodedFile {
        mime: mime.to_string(),
        extension: "pdf",
        bytes,
    })
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &[u8] = b"%PDF-1.4\n%test\n";

    #[test]
    fn decodes_pdf_data_url() {
        let url = encode_data_url("application/pdf", PDF);
        let decoded = decode_pdf(&url, 1024).unwrap();
        assert_eq!(decoded.bytes, PDF);
        assert_eq!(decoded.mime, "application/pdf");
        assert_eq!(decoded.extension, "pdf");
    }

    #[test]
    fn rejects_non_pdf_content_even_with_pdf_mime() {
        let url = encode_data_url("application/pdf", &[0x89, 0x50, 0x4E, 0x47, 0x0D]);
        assert_eq!(decode_pdf(&url, 1024), Err(AttachmentError::NotPdf));
    }

    #[test]
    fn rejects_oversized_file() {
        let mut big = PDF.to_vec();
        big.resize(4096, b'a');
        let url = encode_data_url("application/pdf", &big);
        assert!(matches!(
            decode_pdf(&url, 1024),
            Err(AttachmentError::TooLarge { .. })
        ));
    }

    #[test]
    fn rejects_plain_strings() {
        assert_eq!(
            decode_pdf("cv.pdf", 1024),
            Err(AttachmentError::InvalidDataUrl)
        );
        assert_eq!(
            decode_pdf("data:application/pdf;base64,@@@@", 1024),
            Err(AttachmentError::Encoding)
        );
    }

    #[test]
    fn pdf_is_recognised_by_magic_bytes() {
        assert!(is_pdf(PDF));
        assert!(!is_pdf(b"%PD"));
        assert!(!is_pdf(&[0x89, 0x50, 0x4E, 0x47]));
    }

    #[test]
    fn size_labels_read_naturally() {
        assert_eq!(size_label(2 * 1024 * 1024), "2 MB");
        assert_eq!(size_label(1500), "2 KB");
    }
}
