use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    CheckCircle,
    XCircle,
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Warning,
}

/// What an applicant sees for their current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub icon: StatusIcon,
    pub tone: Tone,
    pub label: &'static str,
    pub message: &'static str,
}

impl StatusPresentation {
    pub fn for_status(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Accepted => Self {
                icon: StatusIcon::CheckCircle,
                tone: Tone::Success,
                label: "Selamat! Anda Diterima 🎉",
                message: "Anda telah diterima sebagai anggota Himakesker. Kami akan menghubungi Anda segera melalui WhatsApp untuk informasi lebih lanjut.",
            },
            ApplicationStatus::Rejected => Self {
                icon: StatusIcon::XCircle,
                tone: Tone::Danger,
                label: "Mohon Maaf",
                message: "Terima kasih atas minat Anda. Sayangnya, kami belum bisa menerima Anda di periode ini. Tetap semangat dan jangan menyerah!",
            },
            ApplicationStatus::Pending => Self {
                icon: StatusIcon::Clock,
                tone: Tone::Warning,
                label: "Sedang Diproses",
                message: "Pendaftaran Anda sedang dalam proses review. Mohon tunggu informasi lebih lanjut.",
            },
        }
    }

    /// Unknown values from the wire fall back to the pending presentation.
    pub fn from_wire(status: &str) -> Self {
        match status.parse::<ApplicationStatus>() {
            Ok(status) => Self::for_status(status),
            Err(e) => {
                tracing::warn!("{}, showing pending", e);
                Self::for_status(ApplicationStatus::Pending)
            }
        }
    }
}
