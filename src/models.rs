use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Student record as stored in the document store.
///
/// `name` is the store-assigned key and is absent until the first insert.
/// `title` is derived from the name parts on every save and should not be
/// set by callers. Arbitrary additional fields are preserved round-trip
/// (for custom attributes and testing).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Student {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_applicant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(flatten)]
    pub additional_fields: HashMap<String, Value>,
}

impl Student {
    /// The store-assigned key, if this record has been persisted.
    pub fn key(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Upstream record representing a prospective student before admission.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StudentApplicant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_status: Option<String>,
}

/// Links a student to an academic program for one academic year.
///
/// Submitted (`docstatus` 1) once enrollment is finalized.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProgramEnrollment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub student: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub program: String,
    pub academic_year: String,
    pub enrollment_date: DateTime<Utc>,
    #[serde(default)]
    pub docstatus: u8,
}

/// Links a student to a specific course offering within a program enrollment.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CourseEnrollment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub student: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub course: String,
    pub program_enrollment: String,
    pub enrollment_date: DateTime<Utc>,
    #[serde(default)]
    pub docstatus: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AcademicYear {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub year_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Per-day attendance mark for a student.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StudentAttendance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub student: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}
