use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};

/// Opaque application id, e.g. `REG-20260106-3F9A0C12`.
pub fn application_id(nim: &str, email: &str, at: DateTime<Utc>) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nim.as_bytes());
    hasher.update(b"|");
    hasher.update(email.to_lowercase().as_bytes());
    hasher.update(b"|");
    hasher.update(at.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    let digest = format!("{:X}", hasher.finalize());

    format!("REG-{}-{}", at.format("%Y%m%d"), &digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn id_carries_submission_date() {
        let at = Utc.with_ymd_and_hms(2026, 1, 6, 10, 0, 0).unwrap();
        let id = application_id("162111233044", "budi@x.id", at);
        assert!(id.starts_with("REG-20260106-"));
        assert_eq!(id.len(), "REG-20260106-".len() + 8);
    }

    #[test]
    fn ids_differ_per_applicant() {
        let at = Utc.with_ymd_and_hms(2026, 1, 6, 10, 0, 0).unwrap();
        assert_ne!(
            application_id("162111233044", "budi@x.id", at),
            application_id("162111233045", "sari@x.id", at)
        );
    }
}
