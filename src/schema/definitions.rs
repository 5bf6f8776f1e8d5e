//! Education schema knowledge.
//!
//! This module centralizes doctype names and link metadata in one place.
//! Any schema customization should be done here.

use super::LinkedType;
use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap};

pub const STUDENT: &str = "Student";
pub const STUDENT_APPLICANT: &str = "Student Applicant";
pub const PROGRAM_ENROLLMENT: &str = "Program Enrollment";
pub const COURSE_ENROLLMENT: &str = "Course Enrollment";
pub const ACADEMIC_YEAR: &str = "Academic Year";
pub const STUDENT_ATTENDANCE: &str = "Student Attendance";
pub const STUDENT_LOG: &str = "Student Log";
pub const STUDENT_GROUP: &str = "Student Group";
pub const STUDENT_GROUP_STUDENT: &str = "Student Group Student";

lazy_static! {
    /// Field names per doctype, as the metadata layer reports them.
    pub static ref DOCTYPE_FIELDS: HashMap<&'static str, BTreeSet<&'static str>> = {
        let mut m = HashMap::new();
        m.insert(
            STUDENT,
            field_set(&[
                "first_name",
                "middle_name",
                "last_name",
                "title",
                "gender",
                "student_email_id",
                "joining_date",
                "student_applicant",
                "user",
            ]),
        );
        m.insert(
            STUDENT_APPLICANT,
            field_set(&["first_name", "last_name", "application_status"]),
        );
        m.insert(
            PROGRAM_ENROLLMENT,
            field_set(&[
                "student",
                "student_name",
                "program",
                "academic_year",
                "enrollment_date",
                "docstatus",
            ]),
        );
        m.insert(
            COURSE_ENROLLMENT,
            field_set(&[
                "student",
                "student_name",
                "course",
                "program_enrollment",
                "enrollment_date",
                "docstatus",
            ]),
        );
        m.insert(ACADEMIC_YEAR, field_set(&["year_name"]));
        m.insert(
            STUDENT_ATTENDANCE,
            field_set(&["student", "student_name", "date", "status"]),
        );
        m.insert(
            STUDENT_LOG,
            field_set(&["student", "student_name", "date", "log"]),
        );
        // Student Group itself carries no student fields; its members live
        // in the Student Group Student child table.
        m.insert(
            STUDENT_GROUP,
            field_set(&["group_name", "program", "academic_year"]),
        );
        m.insert(
            STUDENT_GROUP_STUDENT,
            field_set(&["student", "student_name", "active"]),
        );
        m
    };

    /// Doctypes holding a reference back to Student, with the foreign-key
    /// field that points at it and the nested child doctype where the link
    /// lives in a child table.
    pub static ref STUDENT_LINKED_TYPES: Vec<LinkedType> = vec![
        LinkedType::new(PROGRAM_ENROLLMENT, "student"),
        LinkedType::new(COURSE_ENROLLMENT, "student"),
        LinkedType::new(STUDENT_ATTENDANCE, "student"),
        LinkedType::new(STUDENT_LOG, "student"),
        LinkedType::new(STUDENT_GROUP, "student").with_child(STUDENT_GROUP_STUDENT),
    ];
}

fn field_set(fields: &[&'static str]) -> BTreeSet<&'static str> {
    fields.iter().copied().collect()
}
