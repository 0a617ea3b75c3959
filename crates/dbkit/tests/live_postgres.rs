use dbkit::{ConnectOptions, CreateTable, Database, DbResult, RowSet, Value, columns};
use std::time::{SystemTime, UNIX_EPOCH};

async fn connect_or_skip(test: &str) -> DbResult<Option<Database>> {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL is not set; skipping {test}");
        return Ok(None);
    }
    let db = Database::connect(&ConnectOptions::from_env()?).await?;
    Ok(Some(db))
}

fn unique_table(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    format!("dbkit_{prefix}_{}_{nanos}", std::process::id())
}

async fn drop_table(db: &Database, table: &str) -> DbResult<()> {
    db.query_no_fetch(&format!("DROP TABLE IF EXISTS {table}"), &columns! {})
        .await?;
    Ok(())
}

#[tokio::test]
async fn insert_exists_delete_roundtrip() -> DbResult<()> {
    let Some(db) = connect_or_skip("insert_exists_delete_roundtrip").await? else {
        return Ok(());
    };
    let table = unique_table("users");

    let created = db
        .create_table(
            &CreateTable::new(table.as_str())
                .column("id", "BIGINT PRIMARY KEY")
                .column("name", "TEXT NOT NULL"),
        )
        .await?;
    assert!(created);
    assert!(db.table_exists(&table).await?);

    let again = db
        .create_table(&CreateTable::new(table.as_str()).column("id", "BIGINT"))
        .await?;
    assert!(!again);

    db.insert(&table, &columns! { "id" => 1, "name" => "Ada" })
        .await?;
    assert!(db.key_exists(&table, &columns! { "id" => 1 }).await?);

    let updated = db
        .update_on_key(&table, &columns! { "id" => 1, "name" => "Ada L." }, "id")
        .await?;
    assert_eq!(updated, 1);
    let names = db.retrieve_column(&table, "name").await?;
    assert_eq!(names, vec![Value::from("Ada L.")]);

    let rows = db
        .query(
            &format!("SELECT id, name FROM {table} WHERE id = :id"),
            &columns! { "id" => 1 },
        )
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Value::Int(1)));

    assert_eq!(db.delete(&table, &columns! { "id" => 1 }).await?, 1);
    assert!(!db.key_exists(&table, &columns! { "id" => 1 }).await?);

    drop_table(&db, &table).await?;
    db.close().await
}

#[tokio::test]
async fn bulk_insert_skips_duplicates() -> DbResult<()> {
    let Some(db) = connect_or_skip("bulk_insert_skips_duplicates").await? else {
        return Ok(());
    };
    let table = unique_table("bulk");

    db.create_table(
        &CreateTable::new(table.as_str())
            .column("a", "INT PRIMARY KEY")
            .column("b", "TEXT"),
    )
    .await?;

    let rows = RowSet::from_table(vec![
        vec!["a".into(), "b".into()],
        vec![1.into(), "x".into()],
        vec![2.into(), "y".into()],
    ])?;
    assert_eq!(db.insert_many(&table, &rows).await?, 2);
    assert_eq!(db.count_rows(&table, &columns! {}).await?, 2);

    // Same keys again: nothing new lands, nothing fails.
    assert_eq!(db.insert_many(&table, &rows).await?, 0);
    assert_eq!(db.count_rows(&table, &columns! {}).await?, 2);

    let keys = db.retrieve_column_set(&table, "a").await?;
    assert!(keys.contains(&Value::Int(1)));
    assert!(keys.contains(&Value::Int(2)));

    assert_eq!(
        db.count_rows_on_key(&table, &columns! { "b" => "y" }, "b")
            .await?,
        1
    );

    db.truncate(&table).await?;
    assert_eq!(db.count_rows(&table, &columns! {}).await?, 0);

    drop_table(&db, &table).await?;
    db.close().await
}

#[tokio::test]
async fn unique_violation_is_classified() -> DbResult<()> {
    let Some(db) = connect_or_skip("unique_violation_is_classified").await? else {
        return Ok(());
    };
    let table = unique_table("uniq");

    db.create_table(&CreateTable::new(table.as_str()).column("id", "INT PRIMARY KEY"))
        .await?;
    db.insert(&table, &columns! { "id" => 1 }).await?;

    let err = db.insert(&table, &columns! { "id" => 1 }).await.unwrap_err();
    assert!(err.is_unique_violation(), "unexpected error: {err}");

    drop_table(&db, &table).await?;
    db.close().await
}

#[tokio::test]
async fn mixed_case_table_is_created_once() -> DbResult<()> {
    let Some(db) = connect_or_skip("mixed_case_table_is_created_once").await? else {
        return Ok(());
    };
    let table = unique_table("MixedCase");
    let spec = CreateTable::new(table.as_str()).column("id", "INT");

    assert!(db.create_table(&spec).await?);
    assert!(db.table_exists(&table).await?);
    assert!(!db.create_table(&spec).await?);

    drop_table(&db, &table).await?;
    db.close().await
}

#[tokio::test]
async fn numeric_aggregates_decode() -> DbResult<()> {
    let Some(db) = connect_or_skip("numeric_aggregates_decode").await? else {
        return Ok(());
    };

    let rows = db
        .query(
            "SELECT SUM(x) AS s FROM (VALUES (1::bigint), (2)) v(x)",
            &columns! {},
        )
        .await?;
    assert_eq!(rows[0].get("s"), Some(&Value::Decimal(rust_decimal::Decimal::from(3i64))));

    db.close().await
}

#[tokio::test]
async fn count_on_null_key_counts_all_rows() -> DbResult<()> {
    let Some(db) = connect_or_skip("count_on_null_key_counts_all_rows").await? else {
        return Ok(());
    };
    let table = unique_table("nullkey");

    db.create_table(&CreateTable::new(table.as_str()).column("id", "INT"))
        .await?;
    db.insert(&table, &columns! { "id" => 1 }).await?;
    db.insert(&table, &columns! { "id" => 2 }).await?;

    let n = db
        .count_rows_on_key(&table, &columns! { "id" => None::<i64> }, "id")
        .await?;
    assert_eq!(n, 2);

    drop_table(&db, &table).await?;
    db.close().await
}
