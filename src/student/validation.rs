//! Pure validation logic for student records.
//!
//! Nothing in here touches the document store; the lifecycle code in the
//! parent module gathers whatever state these decisions need and applies
//! the results.

use email_address::EmailAddress;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Composes the display title from the name parts.
///
/// Empty and absent parts are skipped; the rest are joined by single
/// spaces, so a missing middle name never produces a double space.
pub fn compose_title(
    first_name: &str,
    middle_name: Option<&str>,
    last_name: Option<&str>,
) -> String {
    [Some(first_name), middle_name, last_name]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decides whether a record may claim `applicant`.
///
/// `existing` holds the keys of students already referencing the applicant;
/// the record's own key is excluded so re-saving an unchanged record stays
/// legal.
pub fn check_unique_applicant(
    existing: &[String],
    own_key: Option<&str>,
    applicant: &str,
) -> AppResult<()> {
    match existing.iter().find(|name| Some(name.as_str()) != own_key) {
        Some(student) => Err(AppError::DuplicateApplicant {
            student: student.clone(),
            applicant: applicant.to_string(),
        }),
        None => Ok(()),
    }
}

/// Validates the shape of a student contact email.
pub fn check_email(email: &str) -> AppResult<()> {
    if EmailAddress::from_str(email).is_err() {
        return Err(AppError::BadRequest(format!(
            "invalid student email address: {}",
            email
        )));
    }
    Ok(())
}
