use lectern_registration::{ImportInput, RetryPolicy, load_dashboard};
use lectern_shared::{MISSING_TIMESTAMP, kind::EntityKind};
use serde_json::json;
use temp_dir::TempDir;

mod helpers;

fn import_input(value: serde_json::Value) -> ImportInput {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_import_then_dashboard() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_registration::Command(state.clone());
    let log = lectern_registration::Query(state.read_db.clone());
    let catalog = lectern_catalog::Query(state.read_db.clone());

    let a = helpers::create_course(&state, "Course A").await?;
    let b = helpers::create_course(&state, "Course B").await?;
    let c = helpers::create_course(&state, "Course C").await?;

    let imported = command
        .import(import_input(json!({
            "records": [
                {"kind": "course", "entityId": a, "createdAt": {"_seconds": 1, "_nanoseconds": 0}},
                {"kind": "course", "entityId": a, "createdAt": "1970-01-01T00:00:02Z"},
                {"kind": "course", "entity_id": b, "created_at": 1500},
                {"kind": "course", "entityId": b, "createdAt": ""},
                {"kind": "course", "createdAt": 9000},
                {"kind": "webinar", "entityId": a, "createdAt": 9000},
            ]
        })))
        .await?;
    assert_eq!(imported, 6);

    let dashboard =
        load_dashboard(&catalog, &log, EntityKind::Course, RetryPolicy::default()).await?;

    assert_eq!(dashboard.total, 4);
    let bars: Vec<_> = dashboard
        .entities
        .iter()
        .map(|bar| (bar.id.to_owned(), bar.count, bar.percentage, bar.last_timestamp))
        .collect();

    assert_eq!(
        bars,
        vec![
            (c.to_owned(), 0, 0, None),
            (b.to_owned(), 2, 100, Some(1500)),
            (a.to_owned(), 2, 100, Some(2000)),
        ]
    );
    assert_eq!(dashboard.entities[0].last_registered, MISSING_TIMESTAMP);

    let webinars =
        load_dashboard(&catalog, &log, EntityKind::Webinar, RetryPolicy::default()).await?;
    assert_eq!(webinars.total, 1);
    assert!(webinars.entities.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_import_rejects_empty_batch() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_registration::Command(state.clone());

    let err = command
        .import(import_input(json!({"records": []})))
        .await
        .unwrap_err();
    assert!(matches!(err, lectern_shared::Error::Validate(_)));

    Ok(())
}

#[tokio::test]
async fn test_list_pages_through_the_whole_log() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = lectern_registration::Command(state.clone());
    let query = lectern_registration::Query(state.read_db.clone());

    let records: Vec<_> = (0..1200)
        .map(|i| {
            json!({
                "kind": "course",
                "entityId": format!("e{}", i % 7),
                "createdAt": i,
            })
        })
        .collect();

    command
        .import(import_input(json!({"records": &records[..1000]})))
        .await?;
    command
        .import(import_input(json!({"records": &records[1000..]})))
        .await?;

    let first = query.list_page(None, 500).await?;
    assert_eq!(first.events.len(), 500);
    let next = first.next.expect("a second page");

    let second = query.list_page(Some(&next), 500).await?;
    assert_eq!(second.events.len(), 500);
    let last = &first.events[499];
    let head = &second.events[0];
    assert!((head.recorded_at, &head.id) > (last.recorded_at, &last.id));

    let all = query.list_all().await?;
    assert_eq!(all.len(), 1200);

    let mut ids: Vec<_> = all.iter().map(|e| e.id.to_owned()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 1200);

    Ok(())
}
