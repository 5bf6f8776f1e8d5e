use chrono::{TimeZone, Utc};

use edu_records::error::AppError;

mod common;

#[tokio::test]
async fn test_enroll_in_program() {
    let env = common::setup();
    let year = common::create_academic_year(&env.store, "2025-26").await;

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();
    let key = student.key().unwrap();

    let enrollment = env
        .service
        .enroll_in_program(&env.ctx, key, "Computer Science")
        .await
        .unwrap();

    assert_eq!(enrollment.student, key);
    assert_eq!(enrollment.student_name.as_deref(), Some("Jane Doe"));
    assert_eq!(enrollment.program, "Computer Science");
    assert_eq!(enrollment.academic_year, year);
    assert_eq!(enrollment.docstatus, 1);

    let stored = env
        .store
        .get("Program Enrollment", enrollment.name.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.data["docstatus"], 1);
}

#[tokio::test]
async fn test_enroll_in_program_requires_academic_year() {
    let env = common::setup();

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();

    let err = env
        .service
        .enroll_in_program(&env.ctx, student.key().unwrap(), "Computer Science")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingAcademicYear));
}

#[tokio::test]
async fn test_enroll_in_program_uses_latest_academic_year() {
    let env = common::setup();
    common::create_academic_year(&env.store, "2024-25").await;
    let latest = common::create_academic_year(&env.store, "2025-26").await;

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();

    let enrollment = env
        .service
        .enroll_in_program(&env.ctx, student.key().unwrap(), "Computer Science")
        .await
        .unwrap();
    assert_eq!(enrollment.academic_year, latest);
}

#[tokio::test]
async fn test_enroll_in_program_unknown_student() {
    let env = common::setup();
    common::create_academic_year(&env.store, "2025-26").await;

    let err = env
        .service
        .enroll_in_program(&env.ctx, "no-such-student", "Computer Science")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_course_enrollments_mapping() {
    let env = common::setup();
    common::create_academic_year(&env.store, "2025-26").await;

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();
    let key = student.key().unwrap();

    let program_enrollment = env
        .service
        .enroll_in_program(&env.ctx, key, "Computer Science")
        .await
        .unwrap();
    let program_enrollment = program_enrollment.name.as_deref().unwrap();

    let first = env
        .service
        .enroll_in_course(&env.ctx, key, "C1", program_enrollment, None)
        .await
        .unwrap();
    let second = env
        .service
        .enroll_in_course(&env.ctx, key, "C2", program_enrollment, None)
        .await
        .unwrap();

    let enrollments = env
        .service
        .get_all_course_enrollments(&env.ctx, key)
        .await
        .unwrap();
    assert_eq!(enrollments.len(), 2);
    assert_eq!(
        enrollments.get("C1").map(String::as_str),
        first.name.as_deref()
    );
    assert_eq!(
        enrollments.get("C2").map(String::as_str),
        second.name.as_deref()
    );
}

#[tokio::test]
async fn test_course_enrollments_empty() {
    let env = common::setup();

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();

    let enrollments = env
        .service
        .get_all_course_enrollments(&env.ctx, student.key().unwrap())
        .await
        .unwrap();
    assert!(enrollments.is_empty());
}

#[tokio::test]
async fn test_enroll_in_course_explicit_date() {
    let env = common::setup();
    common::create_academic_year(&env.store, "2025-26").await;

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();
    let key = student.key().unwrap();

    let program_enrollment = env
        .service
        .enroll_in_program(&env.ctx, key, "Computer Science")
        .await
        .unwrap();

    let date = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
    let enrollment = env
        .service
        .enroll_in_course(
            &env.ctx,
            key,
            "C1",
            program_enrollment.name.as_deref().unwrap(),
            Some(date),
        )
        .await
        .unwrap();
    assert_eq!(enrollment.enrollment_date, date);
}

#[tokio::test]
async fn test_program_enrollments_in_creation_order() {
    let env = common::setup();
    common::create_academic_year(&env.store, "2025-26").await;

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();
    let key = student.key().unwrap();

    env.service
        .enroll_in_program(&env.ctx, key, "Computer Science")
        .await
        .unwrap();
    env.service
        .enroll_in_program(&env.ctx, key, "Mathematics")
        .await
        .unwrap();

    let programs = env
        .service
        .get_program_enrollments(&env.ctx, key)
        .await
        .unwrap();
    assert_eq!(programs, vec!["Computer Science", "Mathematics"]);

    let other = env
        .service
        .get_program_enrollments(&env.ctx, "someone-else")
        .await
        .unwrap();
    assert!(other.is_empty());
}
