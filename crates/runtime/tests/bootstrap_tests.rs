use courier_config::{AppConfig, DatabaseConfig};
use courier_runtime::BackendServices;
use tempfile::TempDir;

#[tokio::test]
async fn initialise_prepares_database_schema() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("runtime.db");

    let config = AppConfig {
        database: DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        },
        ..AppConfig::default()
    };

    let services = BackendServices::initialise(&config).await.unwrap();

    // Schema must be migrated and queryable.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&services.db_pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}
