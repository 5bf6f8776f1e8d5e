use chrono::{Days, Utc};

use edu_records::models::AttendanceStatus;
use edu_records::utils::date_to_epoch;

mod common;

#[tokio::test]
async fn test_timeline_groups_present_days() {
    let env = common::setup();

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();
    let key = student.key().unwrap();

    let today = Utc::now().date_naive();
    let recent = today.checked_sub_days(Days::new(10)).unwrap();
    let earlier = today.checked_sub_days(Days::new(30)).unwrap();
    let stale = today.checked_sub_days(Days::new(400)).unwrap();

    // Two sessions marked on the same recent day
    common::mark_attendance(&env.store, key, recent, AttendanceStatus::Present).await;
    common::mark_attendance(&env.store, key, recent, AttendanceStatus::Present).await;
    common::mark_attendance(&env.store, key, earlier, AttendanceStatus::Present).await;
    // Excluded: absent, outside the one-year window, other student
    common::mark_attendance(&env.store, key, earlier, AttendanceStatus::Absent).await;
    common::mark_attendance(&env.store, key, stale, AttendanceStatus::Present).await;
    common::mark_attendance(&env.store, "someone-else", recent, AttendanceStatus::Present).await;

    let timeline = env.service.get_timeline_data(&env.ctx, key).await.unwrap();

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.get(&date_to_epoch(recent)), Some(&2));
    assert_eq!(timeline.get(&date_to_epoch(earlier)), Some(&1));
    assert_eq!(timeline.get(&date_to_epoch(stale)), None);
}

#[tokio::test]
async fn test_timeline_empty_without_attendance() {
    let env = common::setup();

    let student = env
        .service
        .create_student(
            &env.ctx,
            common::sample_student("Jane", "Doe", "jane.doe@example.edu"),
        )
        .await
        .unwrap();

    let timeline = env
        .service
        .get_timeline_data(&env.ctx, student.key().unwrap())
        .await
        .unwrap();
    assert!(timeline.is_empty());
}
