//! Repository tests for `AlertRepo`: owner scoping, ordering, and the
//! existence/ownership checks on update and delete.

use assert_matches::assert_matches;
use gridwatch_core::alert::{AlertDefinition, AlertFields, Criteria};
use gridwatch_core::error::CoreError;
use gridwatch_db::repositories::alert_repo::OwnedWrite;
use gridwatch_db::repositories::AlertRepo;
use serde_json::json;
use sqlx::PgPool;

const OWNER: i64 = 1;
const OTHER: i64 = 2;

fn definition(name: &str) -> AlertDefinition {
    let fields: AlertFields = serde_json::from_value(json!({
        "name": name,
        "criteria": "Greater",
        "value": 55,
        "active_days": ["Mon", "Tue", "Wed", "Thu", "Fri"],
        "notify_email": "a@b.com",
        "notify_phone": "+45 12345678",
    }))
    .unwrap();
    fields.validate().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_assigns_owner_and_timestamps(pool: PgPool) {
    let alert = AlertRepo::create(&pool, OWNER, &definition("High Price"))
        .await
        .unwrap();

    assert_eq!(alert.owner_id, OWNER);
    assert_eq!(alert.name, "High Price");
    assert_eq!(alert.criteria, Criteria::GreaterThan);
    assert_eq!(alert.active_days.tokens(), vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
    assert_eq!(alert.created_at, alert.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_owner_scoped_and_newest_first(pool: PgPool) {
    let first = AlertRepo::create(&pool, OWNER, &definition("First")).await.unwrap();
    let second = AlertRepo::create(&pool, OWNER, &definition("Second")).await.unwrap();
    AlertRepo::create(&pool, OTHER, &definition("Someone else")).await.unwrap();

    let listed = AlertRepo::list_for_owner(&pool, OWNER).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let others = AlertRepo::list_for_owner(&pool, OTHER).await.unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].name, "Someone else");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_every_field(pool: PgPool) {
    let alert = AlertRepo::create(&pool, OWNER, &definition("Before")).await.unwrap();

    let replacement: AlertFields = serde_json::from_value(json!({
        "name": "After",
        "criteria": "Less",
        "value": 12.5,
        "active_days": ["Sun"],
        "notify_email": "ops@example.com",
        "notify_phone": "12345678",
    }))
    .unwrap();
    let updated = AlertRepo::update_owned(&pool, OWNER, alert.id, &replacement.validate().unwrap())
        .await
        .unwrap();

    let OwnedWrite::Applied(updated) = updated else {
        panic!("owner update should apply, got {updated:?}");
    };
    assert_eq!(updated.id, alert.id);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.criteria, Criteria::LessThan);
    assert_eq!(updated.value, 12.5);
    assert_eq!(updated.active_days.tokens(), vec!["Sun"]);
    assert_eq!(updated.notify_email, "ops@example.com");
    assert_eq!(updated.notify_phone, "12345678");
    assert_eq!(updated.created_at, alert.created_at);
    assert_eq!(updated.owner_id, OWNER);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_by_non_owner_leaves_row_unchanged(pool: PgPool) {
    let alert = AlertRepo::create(&pool, OWNER, &definition("Mine")).await.unwrap();

    let outcome = AlertRepo::update_owned(&pool, OTHER, alert.id, &definition("Stolen"))
        .await
        .unwrap();
    assert_eq!(outcome, OwnedWrite::NotOwner);

    let stored = AlertRepo::find_by_id(&pool, alert.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Mine");
    assert_eq!(stored.updated_at, alert.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_alert_reports_missing(pool: PgPool) {
    let outcome = AlertRepo::update_owned(&pool, OWNER, 9999, &definition("Ghost"))
        .await
        .unwrap();
    assert_eq!(outcome, OwnedWrite::Missing);
    assert_matches!(
        outcome.into_core("Alert", 9999),
        Err(CoreError::NotFound { entity: "Alert", id: 9999 })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_checks_ownership_then_removes(pool: PgPool) {
    let alert = AlertRepo::create(&pool, OWNER, &definition("Doomed")).await.unwrap();

    let denied = AlertRepo::delete_owned(&pool, OTHER, alert.id).await.unwrap();
    assert_matches!(denied.into_core("Alert", alert.id), Err(CoreError::Forbidden(_)));
    assert!(AlertRepo::find_by_id(&pool, alert.id).await.unwrap().is_some());

    let deleted = AlertRepo::delete_owned(&pool, OWNER, alert.id).await.unwrap();
    assert_eq!(deleted, OwnedWrite::Applied(()));
    assert!(AlertRepo::find_by_id(&pool, alert.id).await.unwrap().is_none());

    let again = AlertRepo::delete_owned(&pool, OWNER, alert.id).await.unwrap();
    assert_eq!(again, OwnedWrite::Missing);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_updates_to_one_alert_both_apply_whole_rows(pool: PgPool) {
    let alert = AlertRepo::create(&pool, OWNER, &definition("Race")).await.unwrap();
    let a = definition("Writer A");
    let mut b = definition("Writer B");
    b.value = 99.0;

    let (ra, rb) = tokio::join!(
        AlertRepo::update_owned(&pool, OWNER, alert.id, &a),
        AlertRepo::update_owned(&pool, OWNER, alert.id, &b),
    );
    assert_matches!(ra.unwrap(), OwnedWrite::Applied(_));
    assert_matches!(rb.unwrap(), OwnedWrite::Applied(_));

    let stored = AlertRepo::find_by_id(&pool, alert.id).await.unwrap().unwrap();
    match stored.name.as_str() {
        "Writer A" => assert_eq!(stored.value, 55.0),
        "Writer B" => assert_eq!(stored.value, 99.0),
        other => panic!("unexpected name {other}"),
    }
}
