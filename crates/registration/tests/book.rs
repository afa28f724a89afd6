use lectern_shared::{Error, kind::EntityKind};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_book_records_a_registration() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_registration::Command(state.clone());
    let query = lectern_registration::Query(state.read_db.clone());

    let course = helpers::create_course(&state, "Rust in practice").await?;
    let event = command.book("john", EntityKind::Course, &course).await?;

    assert_eq!(event.entity_id.as_deref(), Some(course.as_str()));
    assert_eq!(event.timestamp(), Some(event.recorded_at));

    let mine = query.list_by_user("john").await?;
    assert_eq!(mine, vec![event]);
    assert!(query.list_by_user("jane").await?.is_empty());
    assert!(query.is_registered("john", EntityKind::Course, &course).await?);

    Ok(())
}

#[tokio::test]
async fn test_book_twice_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_registration::Command(state.clone());

    let course = helpers::create_course(&state, "Rust in practice").await?;
    command.book("john", EntityKind::Course, &course).await?;

    let err = command
        .book("john", EntityKind::Course, &course)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Already registered for this course");

    command.book("jane", EntityKind::Course, &course).await?;

    Ok(())
}

#[tokio::test]
async fn test_book_unknown_or_archived_entity() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_registration::Command(state.clone());
    let catalog = lectern_catalog::Command(state.clone());

    let err = command
        .book("john", EntityKind::Course, "42")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let course = helpers::create_course(&state, "Rust in practice").await?;
    catalog.archive(EntityKind::Course, &course).await?;

    let err = command
        .book("john", EntityKind::Webinar, &course)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = command
        .book("john", EntityKind::Course, &course)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_bookings_record_one_seat() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let course = helpers::create_course(&state, "Rust in practice").await?;

    let write_db = helpers::single_writer(dir.child("db.sqlite3")).await?;
    let command = lectern_registration::Command(lectern_shared::State {
        read_db: state.read_db.clone(),
        write_db,
    });

    let attempts = (0..16).map(|_| command.book("john", EntityKind::Course, &course));
    let results = futures::future::join_all(attempts).await;

    let booked = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(booked, 1);

    for err in results.into_iter().filter_map(Result::err) {
        assert_eq!(err.to_string(), "Already registered for this course");
    }

    let query = lectern_registration::Query(state.read_db.clone());
    assert_eq!(query.list_by_user("john").await?.len(), 1);

    Ok(())
}
