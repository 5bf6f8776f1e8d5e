#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::Arc;

use edu_records::accounts::DirectoryAccountService;
use edu_records::backend::{DocumentStore, StoreFactory};
use edu_records::config::{AppConfig, ProvisioningConfig};
use edu_records::context::SessionContext;
use edu_records::models::{
    AcademicYear, AttendanceStatus, Student, StudentApplicant, StudentAttendance,
};
use edu_records::notify::InMemoryNotificationBus;
use edu_records::schema::StaticSchemaRegistry;
use edu_records::student::StudentService;

pub const SESSION_USER: &str = "counselor@example.edu";

pub struct TestEnv {
    pub store: Arc<dyn DocumentStore>,
    pub accounts: Arc<DirectoryAccountService>,
    pub notifications: Arc<InMemoryNotificationBus>,
    pub service: StudentService,
    pub ctx: SessionContext,
}

/// Service wired to in-memory collaborators and the education schema.
pub fn setup() -> TestEnv {
    build(
        StaticSchemaRegistry::education(),
        AppConfig::default_config().provisioning,
    )
}

pub fn setup_with_registry(registry: StaticSchemaRegistry) -> TestEnv {
    build(registry, AppConfig::default_config().provisioning)
}

pub fn setup_with_provisioning(provisioning: ProvisioningConfig) -> TestEnv {
    build(StaticSchemaRegistry::education(), provisioning)
}

fn build(registry: StaticSchemaRegistry, provisioning: ProvisioningConfig) -> TestEnv {
    edu_records::logging::init();

    let store = StoreFactory::create(&AppConfig::default_config().store).unwrap();
    let accounts = Arc::new(DirectoryAccountService::new(provisioning.portal_url.clone()));
    let notifications = Arc::new(InMemoryNotificationBus::new());
    let service = StudentService::new(
        store.clone(),
        Arc::new(registry),
        accounts.clone(),
        notifications.clone(),
        provisioning,
    );

    TestEnv {
        store,
        accounts,
        notifications,
        service,
        ctx: SessionContext::new(SESSION_USER),
    }
}

pub fn sample_student(first: &str, last: &str, email: &str) -> Student {
    Student {
        first_name: first.to_string(),
        last_name: Some(last.to_string()),
        student_email_id: Some(email.to_string()),
        gender: Some("Female".to_string()),
        ..Default::default()
    }
}

/// Inserts a Student Applicant and returns its key.
pub async fn create_applicant(store: &Arc<dyn DocumentStore>, first: &str, last: &str) -> String {
    let applicant = StudentApplicant {
        name: None,
        first_name: first.to_string(),
        last_name: Some(last.to_string()),
        application_status: Some("Approved".to_string()),
    };
    let doc = store
        .insert(
            "Student Applicant",
            serde_json::to_value(&applicant).unwrap(),
        )
        .await
        .unwrap();
    doc.name
}

/// Inserts an Academic Year and returns its key.
pub async fn create_academic_year(store: &Arc<dyn DocumentStore>, year_name: &str) -> String {
    let year = AcademicYear {
        name: None,
        year_name: year_name.to_string(),
    };
    let doc = store
        .insert("Academic Year", serde_json::to_value(&year).unwrap())
        .await
        .unwrap();
    doc.name
}

/// Inserts a Student Attendance row.
pub async fn mark_attendance(
    store: &Arc<dyn DocumentStore>,
    student: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) {
    let attendance = StudentAttendance {
        name: None,
        student: student.to_string(),
        student_name: None,
        date,
        status,
    };
    store
        .insert(
            "Student Attendance",
            serde_json::to_value(&attendance).unwrap(),
        )
        .await
        .unwrap();
}
