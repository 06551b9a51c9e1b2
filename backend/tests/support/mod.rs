//! Shared helper utilities for integration tests.
//!
//! Each file under `tests/` compiles as its own crate, so helpers shared
//! between suites live here and are pulled in with `mod support;`.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use users_service::outbound::persistence::run_pending_migrations;

/// Database every cluster starts with, used for administrative statements.
const ADMIN_DATABASE: &str = "postgres";

/// Render a `postgres` error with its SQLSTATE and server-side context.
///
/// `postgres::Error`'s `Display` often collapses to a bare `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    let context = [
        ("detail", db_error.detail()),
        ("hint", db_error.hint()),
        ("where", db_error.where_()),
    ];
    for (label, value) in context {
        if let Some(value) = value {
            summary.push_str(&format!("; {label}: {value}"));
        }
    }
    summary
}

/// Whether `SKIP_TEST_CLUSTER` is set to `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` allows it, otherwise fail loudly so CI
/// breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Drop and recreate `name` on `cluster`, leaving an empty database.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url(ADMIN_DATABASE);
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let quoted = name.replace('"', "\"\"");
    client
        .batch_execute(&format!("DROP DATABASE IF EXISTS \"{quoted}\" WITH (FORCE)"))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{quoted}\""))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

/// Apply the embedded migrations to the database at `url`.
pub fn migrate_schema(url: &str) -> Result<usize, String> {
    run_pending_migrations(url).map_err(|err| err.to_string())
}

/// Run raw SQL against the database at `url`, for fixtures the repository
/// itself would refuse to write.
pub fn execute_sql(url: &str, sql: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(sql)
        .map_err(|err| format_postgres_error(&err))
}
