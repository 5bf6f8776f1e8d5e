use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::accounts::{NewAccount, UserAccountService};
use crate::backend::{DocumentStore, Filter};
use crate::config::ProvisioningConfig;
use crate::context::SessionContext;
use crate::error::{AppError, AppResult};
use crate::models::{CourseEnrollment, ProgramEnrollment, Student};
use crate::notify::NotificationBus;
use crate::schema::definitions::{
    ACADEMIC_YEAR, COURSE_ENROLLMENT, PROGRAM_ENROLLMENT, STUDENT, STUDENT_APPLICANT,
    STUDENT_ATTENDANCE,
};
use crate::schema::SchemaRegistry;
use crate::utils;

pub mod validation;

/// Realtime event emitted when admission provisioning completes.
pub const ENROLL_STUDENT_PROGRESS: &str = "enroll_student_progress";

/// Applicant status once a student record claims the application.
const APPLICANT_ADMITTED: &str = "Admitted";

/// Denormalized copy of the student title carried by linked doctypes.
const STUDENT_NAME_FIELD: &str = "student_name";

/// Validation and lifecycle glue for Student records.
///
/// Wraps the document store's create/update flow with the record's own
/// rules: title derivation, applicant uniqueness, denormalized-name
/// propagation, and first-save account provisioning. All collaborators are
/// trait objects so the surrounding framework (or a test fixture) decides
/// what actually backs them.
pub struct StudentService {
    store: Arc<dyn DocumentStore>,
    schema: Arc<dyn SchemaRegistry>,
    accounts: Arc<dyn UserAccountService>,
    notifications: Arc<dyn NotificationBus>,
    provisioning: ProvisioningConfig,
}

impl StudentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        schema: Arc<dyn SchemaRegistry>,
        accounts: Arc<dyn UserAccountService>,
        notifications: Arc<dyn NotificationBus>,
        provisioning: ProvisioningConfig,
    ) -> Self {
        Self {
            store,
            schema,
            accounts,
            notifications,
            provisioning,
        }
    }

    /// Validates and inserts a new student, then provisions a login account.
    ///
    /// The returned record carries the store-assigned key and, on success,
    /// the linked account. If provisioning fails the error propagates and
    /// the record stays persisted with `user` unset; re-running provisioning
    /// is an operator action, not an automatic retry.
    pub async fn create_student(
        &self,
        ctx: &SessionContext,
        mut student: Student,
    ) -> AppResult<Student> {
        self.validate(&mut student).await?;

        let data = serde_json::to_value(&student)?;
        let doc = self.store.insert(STUDENT, data).await?;
        student.name = Some(doc.name.clone());
        debug!(user = %ctx.user, student = %doc.name, "student record created");

        self.after_insert(ctx, &mut student).await?;
        Ok(student)
    }

    /// Validates and persists changes to an existing student.
    ///
    /// A changed title is pushed into dependent records before the save;
    /// account provisioning never runs on updates.
    pub async fn save_student(
        &self,
        ctx: &SessionContext,
        mut student: Student,
    ) -> AppResult<Student> {
        let name = student.key().map(str::to_string).ok_or_else(|| {
            AppError::BadRequest("cannot save a student without a key".to_string())
        })?;

        self.validate(&mut student).await?;

        self.store
            .update(STUDENT, &name, serde_json::to_value(&student)?)
            .await?;
        debug!(user = %ctx.user, student = %name, "student record saved");
        Ok(student)
    }

    /// Validation hook, run before any create or update is persisted.
    async fn validate(&self, student: &mut Student) -> AppResult<()> {
        let title = validation::compose_title(
            &student.first_name,
            student.middle_name.as_deref(),
            student.last_name.as_deref(),
        );

        if let Some(email) = &student.student_email_id {
            validation::check_email(email)?;
        }

        if let Some(applicant) = student.student_applicant.clone() {
            // The uniqueness decision must come before the status write
            self.check_unique(student, &applicant).await?;
            self.update_applicant_status(&applicant).await?;
        }

        if let Some(name) = student.key() {
            let prior = self.store.get_value(STUDENT, name, "title").await?;
            if let Some(prior) = prior {
                if prior.as_str() != Some(title.as_str()) {
                    self.propagate_student_name(name, &title).await;
                }
            }
        }

        student.title = Some(title);
        Ok(())
    }

    /// Rejects a save whose applicant is already claimed by another student.
    async fn check_unique(&self, student: &Student, applicant: &str) -> AppResult<()> {
        let rows = self
            .store
            .list(
                STUDENT,
                &[Filter::eq("student_applicant", applicant)],
                &["name"],
            )
            .await?;
        let existing: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        validation::check_unique_applicant(&existing, student.key(), applicant)
    }

    /// Marks the claimed applicant as admitted. Idempotent.
    async fn update_applicant_status(&self, applicant: &str) -> AppResult<()> {
        self.store
            .set_value(
                STUDENT_APPLICANT,
                applicant,
                "application_status",
                json!(APPLICANT_ADMITTED),
            )
            .await
    }

    /// Pushes a changed title into every linked doctype that denormalizes
    /// it, including child tables.
    ///
    /// Best-effort: a doctype that fails to update is logged and the rest
    /// still run. Returns the number of rows touched.
    async fn propagate_student_name(&self, name: &str, title: &str) -> u64 {
        let mut touched = 0;
        for link in self.schema.linked_types(STUDENT) {
            if self.schema.is_singleton(&link.doctype) {
                continue;
            }

            if self.schema.fields(&link.doctype).contains(STUDENT_NAME_FIELD) {
                touched += self
                    .bulk_update_student_name(&link.doctype, &link.fieldname, name, title)
                    .await;
            }

            if let Some(child) = &link.child_doctype {
                if self.schema.fields(child).contains(STUDENT_NAME_FIELD) {
                    touched += self
                        .bulk_update_student_name(child, &link.fieldname, name, title)
                        .await;
                }
            }
        }
        touched
    }

    async fn bulk_update_student_name(
        &self,
        doctype: &str,
        key_field: &str,
        key: &str,
        title: &str,
    ) -> u64 {
        match self
            .store
            .bulk_set_field(doctype, key_field, key, STUDENT_NAME_FIELD, json!(title))
            .await
        {
            Ok(touched) => touched,
            Err(e) => {
                warn!(doctype, error = %e, "student name propagation failed");
                0
            }
        }
    }

    /// Creates a login account for a freshly inserted student.
    ///
    /// Runs once per record: a student whose `user` is already set is left
    /// alone.
    async fn after_insert(&self, ctx: &SessionContext, student: &mut Student) -> AppResult<()> {
        if student.user.is_some() {
            return Ok(());
        }

        let name = student
            .key()
            .map(str::to_string)
            .ok_or_else(|| AppError::Internal("student inserted without a key".to_string()))?;
        let email = student.student_email_id.clone().ok_or_else(|| {
            AppError::AccountCreation(format!("student {} has no email address", name))
        })?;

        let account = self
            .accounts
            .create_account(NewAccount {
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                email,
                gender: student.gender.clone(),
                user_type: "Website User".to_string(),
                send_welcome_email: self.provisioning.send_welcome_email,
                roles: self.provisioning.roles.clone(),
            })
            .await?;

        student.user = Some(account.name.clone());
        self.store
            .update(STUDENT, &name, serde_json::to_value(&*student)?)
            .await?;

        self.notifications
            .publish(
                ENROLL_STUDENT_PROGRESS,
                json!({"progress": [4, 4]}),
                &ctx.user,
            )
            .await?;

        let reset_link = self.accounts.reset_password(&account.name).await?;
        info!(
            student = %name,
            account = %account.name,
            %reset_link,
            "student account provisioned"
        );
        Ok(())
    }

    /// Course-key to enrollment-key mapping for all course enrollments of
    /// `student`. Empty when none exist.
    pub async fn get_all_course_enrollments(
        &self,
        ctx: &SessionContext,
        student: &str,
    ) -> AppResult<HashMap<String, String>> {
        debug!(user = %ctx.user, student, "listing course enrollments");
        let rows = self
            .store
            .list(
                COURSE_ENROLLMENT,
                &[Filter::eq("student", student)],
                &["course", "name"],
            )
            .await?;

        let mut enrollments = HashMap::new();
        for row in rows {
            if let (Some(course), Some(name)) = (
                row.get("course").and_then(Value::as_str),
                row.get("name").and_then(Value::as_str),
            ) {
                enrollments.insert(course.to_string(), name.to_string());
            }
        }
        Ok(enrollments)
    }

    /// Program keys of all program enrollments of `student`, in creation
    /// order. Empty when none exist.
    pub async fn get_program_enrollments(
        &self,
        ctx: &SessionContext,
        student: &str,
    ) -> AppResult<Vec<String>> {
        debug!(user = %ctx.user, student, "listing program enrollments");
        let rows = self
            .store
            .list(
                PROGRAM_ENROLLMENT,
                &[Filter::eq("student", student)],
                &["program"],
            )
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get("program").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    /// Enrolls `student` into a program for the most recent academic year
    /// and finalizes the enrollment.
    ///
    /// The enrollment is committed immediately so it stays durable no
    /// matter what happens to the caller's transaction.
    pub async fn enroll_in_program(
        &self,
        ctx: &SessionContext,
        student: &str,
        program_name: &str,
    ) -> AppResult<ProgramEnrollment> {
        let student_record = self.fetch_student(student).await?;
        let academic_year = self
            .store
            .latest(ACADEMIC_YEAR)
            .await?
            .ok_or(AppError::MissingAcademicYear)?;

        let enrollment = ProgramEnrollment {
            name: None,
            student: student.to_string(),
            student_name: student_record.title.clone(),
            program: program_name.to_string(),
            academic_year: academic_year.name,
            enrollment_date: Utc::now(),
            docstatus: 0,
        };
        let doc = self
            .store
            .insert(PROGRAM_ENROLLMENT, serde_json::to_value(&enrollment)?)
            .await?;
        self.store.submit(PROGRAM_ENROLLMENT, &doc.name).await?;
        self.store.commit().await?;
        info!(user = %ctx.user, student, program = program_name, enrollment = %doc.name, "program enrollment submitted");

        let submitted = self
            .store
            .get(PROGRAM_ENROLLMENT, &doc.name)
            .await?
            .ok_or_else(|| AppError::NotFound {
                doctype: PROGRAM_ENROLLMENT.to_string(),
                name: doc.name.clone(),
            })?;
        submitted.parse()
    }

    /// Enrolls `student` into a course under an existing program
    /// enrollment. The enrollment date defaults to now.
    pub async fn enroll_in_course(
        &self,
        ctx: &SessionContext,
        student: &str,
        course_name: &str,
        program_enrollment: &str,
        enrollment_date: Option<DateTime<Utc>>,
    ) -> AppResult<CourseEnrollment> {
        let student_record = self.fetch_student(student).await?;

        let enrollment = CourseEnrollment {
            name: None,
            student: student.to_string(),
            student_name: student_record.title.clone(),
            course: course_name.to_string(),
            program_enrollment: program_enrollment.to_string(),
            enrollment_date: enrollment_date.unwrap_or_else(Utc::now),
            docstatus: 0,
        };
        let doc = self
            .store
            .insert(COURSE_ENROLLMENT, serde_json::to_value(&enrollment)?)
            .await?;
        self.store.commit().await?;
        info!(user = %ctx.user, student, course = course_name, enrollment = %doc.name, "course enrollment created");

        doc.parse()
    }

    /// Attendance counts for the past year, keyed by the midnight-UTC
    /// timestamp of each date. Only "Present" rows count. Read-only.
    pub async fn get_timeline_data(
        &self,
        ctx: &SessionContext,
        student: &str,
    ) -> AppResult<BTreeMap<i64, u64>> {
        debug!(user = %ctx.user, student, "building attendance timeline");
        let cutoff = utils::one_year_before(Utc::now().date_naive());
        let rows = self
            .store
            .list(
                STUDENT_ATTENDANCE,
                &[
                    Filter::eq("student", student),
                    Filter::eq("status", "Present"),
                    Filter::gt("date", cutoff.to_string()),
                ],
                &["date"],
            )
            .await?;

        let mut timeline = BTreeMap::new();
        for row in rows {
            let Some(date) = row.get("date").and_then(Value::as_str) else {
                continue;
            };
            let Ok(date) = date.parse::<NaiveDate>() else {
                continue;
            };
            *timeline.entry(utils::date_to_epoch(date)).or_insert(0) += 1;
        }
        Ok(timeline)
    }

    async fn fetch_student(&self, name: &str) -> AppResult<Student> {
        self.store
            .get(STUDENT, name)
            .await?
            .ok_or_else(|| AppError::NotFound {
                doctype: STUDENT.to_string(),
                name: name.to_string(),
            })?
            .parse()
    }
}
