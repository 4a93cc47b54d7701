use pubs_chat::{error::ChatError, sql::Executor};

#[tokio::test]
async fn unconfigured_executor_fails_without_connecting() {
    let executor = Executor::new();
    assert!(!executor.is_configured());

    let err = executor.execute("SELECT 1").await.unwrap_err();
    assert!(matches!(err, ChatError::Unconfigured(_)), "got {err:?}");
}

#[tokio::test]
async fn sqlite_round_trip_materializes_all_rows() {
    let dir = tempfile::tempdir().unwrap();
    let conn = format!("sqlite:{}?mode=rwc", dir.path().join("pubs.db").display());

    let mut executor = Executor::new();
    executor.set_connection_string(&conn).await.unwrap();
    assert!(executor.is_configured());

    executor
        .execute("CREATE TABLE authors (au_id TEXT, au_lname TEXT, state TEXT)")
        .await
        .unwrap();
    executor
        .execute("INSERT INTO authors VALUES ('172-32-1176', 'White', 'CA'), ('213-46-8915', 'Green', 'CA'), ('238-95-7766', 'Carson', 'UT')")
        .await
        .unwrap();

    let result = executor
        .execute("SELECT au_lname, state FROM authors WHERE state = 'CA' ORDER BY au_lname")
        .await
        .unwrap();

    assert_eq!(result.headers, vec!["au_lname", "state"]);
    assert_eq!(result.row_count(), 2);
    assert_eq!(result.rows[0], vec!["Green", "CA"]);
    assert_eq!(result.rows[1], vec!["White", "CA"]);
}

#[tokio::test]
async fn driver_failure_surfaces_as_query_execution_error() {
    let dir = tempfile::tempdir().unwrap();
    let conn = format!("sqlite:{}?mode=rwc", dir.path().join("pubs.db").display());

    let mut executor = Executor::new();
    executor.set_connection_string(&conn).await.unwrap();

    let err = executor.execute("SELECT * FROM no_such_table").await.unwrap_err();
    match err {
        ChatError::QueryExecution(message) => assert!(message.contains("no_such_table")),
        other => panic!("expected QueryExecution, got {other:?}"),
    }
}

#[tokio::test]
async fn probe_failure_keeps_connection_string_set() {
    let mut executor = Executor::new();
    // Read-only mode against a missing file makes the probe fail.
    let missing = "sqlite:/nonexistent-dir/definitely-missing.db";
    assert!(executor.set_connection_string(missing).await.is_err());
    assert!(executor.is_configured());
    assert_eq!(executor.connection_string(), Some(missing));
}
