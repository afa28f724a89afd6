use lectern_shared::kind::EntityKind;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_list_is_most_recent_first() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_catalog::Command(state.clone());
    let query = lectern_catalog::Query(state.read_db.clone());

    let mut ids = vec![];
    for title in ["First course", "Second course", "Third course"] {
        ids.push(command.create_course(helpers::course_input(title)).await?);
        helpers::tick().await;
    }

    let listed = query.list(EntityKind::Course, false).await?;
    let listed_ids: Vec<_> = listed.iter().map(|e| e.id.to_owned()).collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);
    assert_eq!(listed[0].title, "Third course");

    assert!(query.list(EntityKind::Webinar, false).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_webinars_are_listed_apart_from_courses() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_catalog::Command(state.clone());
    let query = lectern_catalog::Query(state.read_db.clone());

    command
        .create_course(helpers::course_input("Rust in practice"))
        .await?;
    let first = command
        .create_webinar(helpers::webinar_input("Live Q&A"))
        .await?;
    helpers::tick().await;
    let second = command
        .create_webinar(helpers::webinar_input("Release party"))
        .await?;

    let webinars = query.list_webinars().await?;
    assert_eq!(webinars.len(), 2);
    assert_eq!(webinars[0].id, second);
    assert_eq!(webinars[1].id, first);
    assert_eq!(webinars[0].platform, "zoom");
    assert_eq!(webinars[0].starts_at, Some(1_700_000_000_000));

    let mut input = helpers::webinar_input("Live Q&A, again");
    input.starts_at = None;
    command.update_webinar(&first, input).await?;

    let webinar = query.find_webinar(&first).await?.unwrap();
    assert_eq!(webinar.title, "Live Q&A, again");
    assert!(webinar.starts_at.is_none());

    Ok(())
}
