use serde::Serialize;
use thiserror::Error;

pub const SEKBEN_DEPARTMENT: &str = "Departemen Sekretaris Bendahara";
pub const MEDINFO_DEPARTMENT: &str = "Departemen MEDINFO";
pub const COPYWRITING_PROKER: &str = "Copywriting";
pub const SEKBEN_ROLES: [&str; 2] = ["Sekretaris", "Bendahara"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Department {
    pub name: &'static str,
    pub description: &'static str,
    pub prokers: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelinePhase {
    pub date: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub static DEPARTMENTS: [Department; 7] = [
    Department {
        name: SEKBEN_DEPARTMENT,
        description: "Menjamin tata kelola administrasi dan keuangan organisasi yang akuntabel, transparan, dan teratur.",
        prokers: &[
            "Pelatihan Kesekretariatan dan Kebendaharaan",
            "Musma GD dan AD/ART",
        ],
    },
    Department {
        name: "Departemen PSDM",
        description: "Berfokus pada pengelolaan dan penguatan hubungan internal organisasi demi terjalinnya komunikasi yang baik serta sdm organisasi yang berkompeten guna menguatkan nilai kontribusi mahasiswa baik untuk HIMA maupun Program Studi K3.",
        prokers: &[
            "Upgrading",
            "OSG (OSH Student Gathering)",
            "Dies Natalis K3",
            "Shield (Safety and Health Introduction Education and Learning Development)",
            "LKMM-Pra TD",
            "Welwis",
        ],
    },
    Department {
        name: "Departemen ILPRES",
        description: "Menyelenggarakan program kerja yang berkaitan dengan bidang keilmuan dan prestasi Mahasiswa-Mahasiswi D-IV Keselamatan dan Kesehatan Kerja yang dikemas dengan lingkup program kerja internal hingga eksternal yang menaungi lingkup prestasi dan informasi untuk Program Studi.",
        prokers: &[
            "Seminar Nasional K3",
            "Session Sharing",
            "Paper Sharing and Learning (PSL)",
            "K3 Training",
            "Pojok Prestasi",
        ],
    },
    Department {
        name: "Departemen HUBLU",
        description: "Menjalin dan menjaga hubungan strategis dari lingkup internal dengan mitra eksternal yang bertujuan untuk menjadikan HIMA K3 UNAIR menjadi organisasi yang kolaboratif dengan memperluas wawasan serta jaring relasi dengan pihak eksternal.",
        prokers: &[
            "K3R (K3 Roadshow)",
            "Relation Work Program (WRP)",
            "OSH Welcoming",
            "ONPOSH (Devotion Public Occupational Safety & Health)",
            "Kajian Aksi Strategis",
        ],
    },
    Department {
        name: MEDINFO_DEPARTMENT,
        description: "Mengelola dan mengembangkan citra publik (branding) serta kanal-kanal komunikasi visual HIMA, serta bertanggung jawab atas produksi konten, desain grafis, dan dokumentasi visual yang informatif, menarik, dan relevan.",
        prokers: &["Creative Design", "Creative Media", COPYWRITING_PROKER],
    },
    Department {
        name: "Departemen EKRAF",
        description: "Sebagai penggerak perekonomian organisasi dalam bentuk produksi, kreatif, dan marketing merchandise serta bertanggung jawab sebagai wadah untuk menaungi minat dan bakat Mahasiswa/i di bidang kewirausahaan.",
        prokers: &["Safe Merch", "OSH FEST", "OSHTEN"],
    },
    Department {
        name: "Departemen SENIORA",
        description: "Menjadi wadah pengembangan minat dan bakat mahasiswa dalam bidang seni, kreativitas, dan olahraga guna mendukung terciptanya keseimbangan fisik dan mental serta semangat sportivitas dan ekspresi diri.",
        prokers: &[
            "K3 Running Fest",
            "Kelas Seni",
            "K3 Sport Cup",
            "OSH Cup",
            "Olgarut (Olahraga Rutin)",
        ],
    },
];

pub static TIMELINE: [TimelinePhase; 3] = [
    TimelinePhase {
        date: "05-10 Januari 2026",
        title: "Pendaftaran",
        description: "Periode pendaftaran open recruitment dibuka",
    },
    TimelinePhase {
        date: "11-14 Januari 2026",
        title: "Wawancara",
        description: "Wawancara dengan Departemen Pilihan",
    },
    TimelinePhase {
        date: "17 Januari 2026",
        title: "Pengumuman",
        description: "Pengumuman hasil seleksi",
    },
];

/// How a preference pair was interpreted against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKind {
    Proker,
    SekbenRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("Departemen tidak tersedia sebagai pilihan")]
    UnknownDepartment,
    #[error("Program kerja tidak terdaftar pada departemen yang dipilih")]
    UnknownProker,
}

pub fn find_department(name: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|department| department.name == name)
}

pub fn is_department(name: &str) -> bool {
    find_department(name).is_some()
}

/// Departments an applicant can place a preference in. The secretary/treasurer
/// department is reached through the Sekben roles instead.
pub fn placement_departments() -> impl Iterator<Item = &'static Department> {
    DEPARTMENTS
        .iter()
        .filter(|department| department.name != SEKBEN_DEPARTMENT)
}

pub fn is_placement_department(name: &str) -> bool {
    placement_departments().any(|department| department.name == name)
}

pub fn is_sekben_role(value: &str) -> bool {
    SEKBEN_ROLES.contains(&value)
}

pub fn classify_preference(department: &str, choice: &str) -> Result<PreferenceKind, PreferenceError> {
    let department = placement_departments()
        .find(|candidate| candidate.name == department)
        .ok_or(PreferenceError::UnknownDepartment)?;

    if is_sekben_role(choice) {
        Ok(PreferenceKind::SekbenRole)
    } else if department.prokers.contains(&choice) {
        Ok(PreferenceKind::Proker)
    } else {
        Err(PreferenceError::UnknownProker)
    }
}

/// Prokers offered for one preference slot. The other slot's proker is hidden
/// only when both slots point at the same department.
pub fn proker_options(
    department: &str,
    other_department: &str,
    other_proker: &str,
) -> Vec<&'static str> {
    let Some(found) = find_department(department) else {
        return Vec::new();
    };

    found
        .prokers
        .iter()
        .copied()
        .filter(|proker| !(department == other_department && *proker == other_proker))
        .collect()
}

pub fn requires_portfolio(department: &str, proker: &str) -> bool {
    department == MEDINFO_DEPARTMENT && proker != COPYWRITING_PROKER
}
