//! Directory filtering — linear scans over the injected doctor and
//! medical-center lists. Seed data lives with the embedding shell.

use crate::models::{Doctor, Hospital};

/// Filter chips shown above the doctor list. "All" disables the filter.
pub const SPECIALTIES: &[&str] = &["All", "General", "Cardiologist", "Dentist", "Pediatrics"];

/// Doctors matching a free-text query and an optional specialty chip.
///
/// The query matches name, specialty or clinic, case-insensitively.
/// `None` or `Some("All")` disables the specialty filter.
pub fn filter_doctors<'a>(
    doctors: &'a [Doctor],
    query: &str,
    specialty: Option<&str>,
) -> Vec<&'a Doctor> {
    let needle = query.trim().to_lowercase();
    doctors
        .iter()
        .filter(|doctor| {
            let matches_search = needle.is_empty()
                || doctor.name.to_lowercase().contains(&needle)
                || doctor.specialty.to_lowercase().contains(&needle)
                || doctor.clinic.to_lowercase().contains(&needle);
            let matches_specialty = match specialty {
                None | Some("All") => true,
                Some(chip) => doctor.specialty == chip,
            };
            matches_search && matches_specialty
        })
        .collect()
}

/// Medical centers matching a free-text query over name, address or kind.
pub fn filter_hospitals<'a>(hospitals: &'a [Hospital], query: &str) -> Vec<&'a Hospital> {
    let needle = query.trim().to_lowercase();
    hospitals
        .iter()
        .filter(|hospital| {
            needle.is_empty()
                || hospital.name.to_lowercase().contains(&needle)
                || hospital.address.to_lowercase().contains(&needle)
                || hospital.kind.to_lowercase().contains(&needle)
        })
        .collect()
}
