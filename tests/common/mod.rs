//! Store contract checks shared by the in-memory and PostgreSQL test suites.

#![allow(dead_code)]

use course_catalog::{
    AnnouncementUpdate, CourseStore, CourseUpdate, Entity, NewAnnouncement, NewCourse, Role, StoreError,
};

/// Unique id per call so PostgreSQL runs do not collide with earlier rows.
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

pub fn assert_not_found(err: StoreError, expected: Entity) {
    match err {
        StoreError::NotFound { entity, .. } => assert_eq!(entity, expected),
        other => panic!("expected {} not found, got {:?}", expected, other),
    }
}

pub async fn duplicate_course_is_rejected(store: &dyn CourseStore) {
    let id = unique("C");
    store
        .add_course(NewCourse::new(&id, "Algorithms", "Fall2025").with_description("graphs"))
        .await
        .unwrap();
    let err = store
        .add_course(NewCourse::new(&id, "Other", "Spring2026"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { entity: Entity::Course, .. }));

    let stored = store.get_course(&id).await.unwrap();
    assert_eq!(stored.course_name, "Algorithms");
    assert_eq!(stored.semester, "Fall2025");
    assert_eq!(stored.description.as_deref(), Some("graphs"));
}

pub async fn empty_fields_fail_fast(store: &dyn CourseStore) {
    assert!(matches!(store.get_course("").await, Err(StoreError::EmptyField { .. })));
    assert!(matches!(
        store.add_course(NewCourse::new("", "n", "s")).await,
        Err(StoreError::EmptyField { field: "course id" })
    ));
    assert!(matches!(
        store.add_student_to_course("C", "").await,
        Err(StoreError::EmptyField { field: "student id" })
    ));
    assert!(matches!(
        store.get_staff_courses("").await,
        Err(StoreError::EmptyField { field: "staff id" })
    ));
    assert!(matches!(
        store.get_courses_by_semester("").await,
        Err(StoreError::EmptyField { field: "semester" })
    ));
    assert!(matches!(
        store.remove_announcement("C", "").await,
        Err(StoreError::EmptyField { field: "announcement id" })
    ));
    assert!(matches!(
        store.delete_course("").await,
        Err(StoreError::EmptyField { field: "course id" })
    ));
}

pub async fn partial_update_keeps_unset_fields(store: &dyn CourseStore) {
    let id = unique("C");
    store
        .add_course(NewCourse::new(&id, "Algorithms", "Fall2025").with_description("graphs"))
        .await
        .unwrap();
    let update = CourseUpdate {
        course_name: Some("Advanced Algorithms".into()),
        semester: Some(String::new()),
        ..CourseUpdate::new(&id)
    };
    let updated = store.update_course(update).await.unwrap();
    assert_eq!(updated.course_name, "Advanced Algorithms");
    assert_eq!(updated.semester, "Fall2025");
    assert_eq!(updated.description.as_deref(), Some("graphs"));

    let err = store.update_course(CourseUpdate::new(unique("missing"))).await.unwrap_err();
    assert_not_found(err, Entity::Course);
}

pub async fn membership_is_idempotent_and_symmetric(store: &dyn CourseStore) {
    let course = unique("C");
    let student = unique("S");
    store.add_course(NewCourse::new(&course, "Algorithms", "Fall2025")).await.unwrap();

    store.add_student_to_course(&course, &student).await.unwrap();
    store.add_student_to_course(&course, &student).await.unwrap();
    assert_eq!(store.get_course_students(&course).await.unwrap(), vec![student.clone()]);
    assert_eq!(store.get_student_courses(&student).await.unwrap(), vec![course.clone()]);

    store.remove_student_from_course(&course, &student).await.unwrap();
    assert!(store.get_course_students(&course).await.unwrap().is_empty());
    assert!(store.get_student_courses(&student).await.unwrap().is_empty());

    let err = store.remove_student_from_course(&course, &student).await.unwrap_err();
    assert_not_found(err, Entity::Student);
}

pub async fn staff_mirrors_students(store: &dyn CourseStore) {
    let course = unique("C");
    let staff = unique("T");
    store.add_course(NewCourse::new(&course, "Compilers", "Spring2026")).await.unwrap();

    store.add_staff_to_course(&course, &staff).await.unwrap();
    assert_eq!(store.get_course_staff(&course).await.unwrap(), vec![staff.clone()]);
    assert_eq!(store.get_staff_courses(&staff).await.unwrap(), vec![course.clone()]);
    assert!(store.get_course_students(&course).await.unwrap().is_empty());

    store.remove_staff_from_course(&course, &staff).await.unwrap();
    assert!(store.get_staff_courses(&staff).await.unwrap().is_empty());
}

pub async fn membership_requires_existing_course(store: &dyn CourseStore) {
    let missing = unique("missing");
    assert_not_found(store.add_member(Role::Student, &missing, "S1").await.unwrap_err(), Entity::Course);
    assert_not_found(store.remove_member(Role::Staff, &missing, "T1").await.unwrap_err(), Entity::Course);
    assert_not_found(store.get_course_students(&missing).await.unwrap_err(), Entity::Course);
    assert!(store.get_student_courses(&unique("nobody")).await.unwrap().is_empty());
}

pub async fn announcements_lifecycle(store: &dyn CourseStore) {
    let course = unique("C");
    store.add_course(NewCourse::new(&course, "Algorithms", "Fall2025")).await.unwrap();
    assert!(store.get_announcements(&course).await.unwrap().is_empty());

    let added = store
        .add_announcement(&course, NewAnnouncement::new("A1", "Midterm", ""))
        .await
        .unwrap();
    assert_eq!(added.announcement_id, "A1");
    assert_eq!(added.course_id, course);

    let err = store
        .add_announcement(&course, NewAnnouncement::new("A1", "Again", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { entity: Entity::Announcement, .. }));

    let generated = store
        .add_announcement(&course, NewAnnouncement::new("", "Final", "June 1st"))
        .await
        .unwrap();
    assert!(!generated.announcement_id.is_empty());

    let updated = store
        .update_announcement(
            &course,
            "A1",
            AnnouncementUpdate {
                title: None,
                content: Some("Chapters 1-5".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Midterm");
    assert_eq!(updated.content, "Chapters 1-5");

    let listed = store.get_announcements(&course).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().any(|a| a.announcement_id == "A1" && a.content == "Chapters 1-5"));

    store.remove_announcement(&course, "A1").await.unwrap();
    let listed = store.get_announcements(&course).await.unwrap();
    assert!(listed.iter().all(|a| a.announcement_id != "A1"));

    assert_not_found(store.remove_announcement(&course, "A1").await.unwrap_err(), Entity::Announcement);
    assert_not_found(
        store
            .update_announcement(&course, "A1", AnnouncementUpdate::default())
            .await
            .unwrap_err(),
        Entity::Announcement,
    );
    assert_not_found(
        store
            .add_announcement(&unique("missing"), NewAnnouncement::new("A9", "t", "c"))
            .await
            .unwrap_err(),
        Entity::Course,
    );
    assert!(matches!(
        store.add_announcement(&course, NewAnnouncement::new("A2", "", "")).await,
        Err(StoreError::EmptyField { field: "announcement" })
    ));
}

pub async fn delete_cascades(store: &dyn CourseStore) {
    let course = unique("C");
    let other = unique("C");
    let student = unique("S");
    let staff = unique("T");
    store.add_course(NewCourse::new(&course, "Algorithms", "Fall2025")).await.unwrap();
    store.add_course(NewCourse::new(&other, "Databases", "Fall2025")).await.unwrap();
    store.add_student_to_course(&course, &student).await.unwrap();
    store.add_student_to_course(&other, &student).await.unwrap();
    store.add_staff_to_course(&course, &staff).await.unwrap();
    store
        .add_announcement(&course, NewAnnouncement::new("A1", "Midterm", "April 10th"))
        .await
        .unwrap();

    store.delete_course(&course).await.unwrap();

    assert_not_found(store.get_course(&course).await.unwrap_err(), Entity::Course);
    assert_not_found(store.get_course_students(&course).await.unwrap_err(), Entity::Course);
    assert_not_found(store.get_course_staff(&course).await.unwrap_err(), Entity::Course);
    assert_not_found(store.get_announcements(&course).await.unwrap_err(), Entity::Course);
    assert_eq!(store.get_student_courses(&student).await.unwrap(), vec![other.clone()]);
    assert!(store.get_staff_courses(&staff).await.unwrap().is_empty());
    assert_not_found(store.delete_course(&course).await.unwrap_err(), Entity::Course);

    // Recreating the id starts from a clean slate.
    store.add_course(NewCourse::new(&course, "Algorithms", "Spring2026")).await.unwrap();
    assert!(store.get_course_students(&course).await.unwrap().is_empty());
    assert!(store.get_announcements(&course).await.unwrap().is_empty());
}

pub async fn courses_by_semester(store: &dyn CourseStore) {
    let semester = unique("Term");
    let b = unique("B");
    let a = unique("A");
    store.add_course(NewCourse::new(&b, "Networks", &semester)).await.unwrap();
    store.add_course(NewCourse::new(&a, "Graphics", &semester)).await.unwrap();
    store.add_course(NewCourse::new(unique("Z"), "Other", "Elsewhere")).await.unwrap();

    let ids: Vec<String> = store
        .get_courses_by_semester(&semester)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.course_id)
        .collect();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(ids, expected);
    assert!(store.get_courses_by_semester(&unique("Empty")).await.unwrap().is_empty());
}

/// Memberships and announcements added while their course is being deleted
/// either fail with a missing course or are removed with it.
pub async fn delete_racing_additions_leaves_no_orphans(store: &dyn CourseStore) {
    for _ in 0..10 {
        let course = unique("C");
        let (early, late, staff) = (unique("S"), unique("S"), unique("T"));
        store.add_course(NewCourse::new(&course, "Algorithms", "Fall2025")).await.unwrap();

        let (first, second, deleted, third, posted) = tokio::join!(
            store.add_student_to_course(&course, &early),
            store.add_staff_to_course(&course, &staff),
            store.delete_course(&course),
            store.add_student_to_course(&course, &late),
            store.add_announcement(&course, NewAnnouncement::new("A1", "Late news", "")),
        );
        deleted.unwrap();
        for added in [first, second, third] {
            if let Err(e) = added {
                assert_not_found(e, Entity::Course);
            }
        }
        if let Err(e) = posted {
            assert_not_found(e, Entity::Course);
        }

        assert!(!store.get_student_courses(&early).await.unwrap().contains(&course));
        assert!(!store.get_student_courses(&late).await.unwrap().contains(&course));
        assert!(!store.get_staff_courses(&staff).await.unwrap().contains(&course));

        // Recreating the id must not resurrect anything from the race.
        store.add_course(NewCourse::new(&course, "Algorithms", "Fall2025")).await.unwrap();
        assert!(store.get_course_students(&course).await.unwrap().is_empty());
        assert!(store.get_course_staff(&course).await.unwrap().is_empty());
        assert!(store.get_announcements(&course).await.unwrap().is_empty());
    }
}
