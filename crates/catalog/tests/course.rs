use lectern_shared::{Error, kind::EntityKind};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_create_and_find_course() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_catalog::Command(state.clone());
    let query = lectern_catalog::Query(state.read_db.clone());

    let id = command
        .create_course(helpers::course_input("  Rust in practice  "))
        .await?;

    let course = query.find_course(&id).await?.unwrap();
    assert_eq!(course.title, "Rust in practice");
    assert_eq!(course.modules, vec!["Ownership", "Traits"]);
    assert_eq!(course.price_cents, 4900);
    assert_eq!(course.created_at, course.updated_at);
    assert!(course.archived_at.is_none());

    assert!(query.find_course("unknown").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_create_course_rejects_invalid_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_catalog::Command(state.clone());
    let query = lectern_catalog::Query(state.read_db.clone());

    let err = command
        .create_course(helpers::course_input("Rs"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validate(_)));

    assert!(query.list(EntityKind::Course, true).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_update_course() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_catalog::Command(state.clone());
    let query = lectern_catalog::Query(state.read_db.clone());

    let id = command
        .create_course(helpers::course_input("Rust in practice"))
        .await?;

    let mut input = helpers::course_input("Async Rust");
    input.modules = vec!["Futures".to_owned()];
    input.price_cents = 9900;
    command.update_course(&id, input).await?;

    let course = query.find_course(&id).await?.unwrap();
    assert_eq!(course.title, "Async Rust");
    assert_eq!(course.modules, vec!["Futures"]);
    assert_eq!(course.price_cents, 9900);

    let err = command
        .update_course("unknown", helpers::course_input("Async Rust"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_archive_course() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_catalog::Command(state.clone());
    let query = lectern_catalog::Query(state.read_db.clone());

    let kept = command
        .create_course(helpers::course_input("Rust in practice"))
        .await?;
    let archived = command
        .create_course(helpers::course_input("Legacy Rust"))
        .await?;

    command.archive(EntityKind::Course, &archived).await?;
    command.archive(EntityKind::Course, &archived).await?;

    let visible = query.list_courses().await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, kept);

    let all = query.list(EntityKind::Course, true).await?;
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|e| e.id == archived && e.is_archived()));

    assert!(query.find_course(&archived).await?.is_some());
    assert!(!query.exists(EntityKind::Course, &archived, false).await?);
    assert!(query.exists(EntityKind::Course, &archived, true).await?);

    let err = command
        .archive(EntityKind::Course, "unknown")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}
