use std::collections::BTreeMap;

use anyhow::Result;
use sea_orm::{DatabaseBackend, MockDatabase, Value};

use crate::errors::ModelError;
use crate::historico::{self, LinguaCount};

fn row(id: i32, lingua: &str, data: &str, rank: Option<&str>) -> historico::Model {
    historico::Model { id, lingua: lingua.into(), data: data.into(), rank: rank.map(Into::into) }
}

fn count_row(lingua: &str, count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("lingua", Value::from(lingua)), ("count", Value::from(count))])
}

#[tokio::test]
async fn create_returns_inserted_row() -> Result<()> {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(1, "pt", "2024-01-01", None)]])
        .into_connection();

    let created = historico::create(&db, "pt", "2024-01-01", None).await?;
    assert_eq!(created, row(1, "pt", "2024-01-01", None));

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].statements()[0].sql.starts_with(r#"INSERT INTO "historicos""#));
    Ok(())
}

#[tokio::test]
async fn create_rejects_empty_fields_without_touching_db() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let err = historico::create(&db, "", "2024-01-01", Some("1")).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn list_orders_by_id() -> Result<()> {
    let rows = vec![row(1, "pt", "a", None), row(2, "en", "b", Some("3"))];
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([rows.clone()])
        .into_connection();

    assert_eq!(historico::list_ordered(&db).await?, rows);
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].statements()[0].sql.ends_with(r#"ORDER BY "historicos"."id" ASC"#));
    Ok(())
}

#[tokio::test]
async fn count_by_lingua_groups() -> Result<()> {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row("pt", 2), count_row("en", 1)]])
        .into_connection();

    let counts = historico::count_by_lingua(&db).await?;
    assert_eq!(
        counts,
        vec![
            LinguaCount { lingua: "pt".into(), count: 2 },
            LinguaCount { lingua: "en".into(), count: 1 },
        ]
    );
    let log = db.into_transaction_log();
    assert!(log[0].statements()[0].sql.contains(r#"GROUP BY "historicos"."lingua""#));
    Ok(())
}
