//! Database dump through a mock PostgREST API

use pricecharting_scraper::backup::{run_backup, BackupError, PostgrestClient};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_rpc(server: &MockServer, function: &str, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(format!("/rest/v1/rpc/{}", function)))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Mounts every endpoint except `get_table_schema`
async fn mount_database(server: &MockServer, row_requests: u64) {
    mount_rpc(
        server,
        "list_all_tables",
        json!([
            { "schema_name": "public", "table_name": "products", "table_type": "BASE TABLE" },
            { "schema_name": "public", "table_name": "product_overview", "table_type": "VIEW" },
            { "schema_name": "auth", "table_name": "users", "table_type": "BASE TABLE" }
        ]),
    )
    .await;
    mount_rpc(
        server,
        "get_function_definitions",
        json!([{
            "function_name": "touch_updated_at",
            "arguments": "",
            "return_type": "trigger",
            "language": "plpgsql",
            "security_type": "SECURITY INVOKER",
            "volatility": "VOLATILE",
            "source_code": "BEGIN NEW.updated_at = NOW(); RETURN NEW; END;"
        }]),
    )
    .await;
    mount_rpc(
        server,
        "get_index_definitions",
        json!([
            { "indexname": "products_pkey", "tablename": "products", "indexdef": "CREATE UNIQUE INDEX products_pkey ON public.products USING btree (id)" },
            { "indexname": "idx_products_title", "tablename": "products", "indexdef": "CREATE INDEX idx_products_title ON public.products USING btree (product_title)" }
        ]),
    )
    .await;
    mount_rpc(server, "get_trigger_definitions", json!([])).await;
    mount_rpc(
        server,
        "get_view_definitions",
        json!([{ "viewname": "product_overview", "definition": " SELECT products.id FROM products" }]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("select", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "product_title": "Tom Clancy's HAWX", "ean_gtin": ["3307210422186"], "genre": null, "extra": ["box", "manual"] }
        ])))
        .expect(row_requests)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_backup_writes_dump_and_keeps_previous() {
    let server = MockServer::start().await;
    mount_database(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_table_schema"))
        .and(body_json(json!({ "p_table_name": "products" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "column_name": "id", "data_type": "integer", "is_nullable": "NO" },
            { "column_name": "product_title", "data_type": "character varying", "character_maximum_length": 255, "is_nullable": "YES" },
            { "column_name": "extra", "data_type": "jsonb", "is_nullable": "YES" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("db.sql");
    let dumps = dir.path().join("dumps");
    std::fs::write(&output, "-- previous dump\n").unwrap();

    let client = PostgrestClient::new(&server.uri(), "anon-key");
    let report = run_backup(&client, &output, &dumps).await.unwrap();

    assert_eq!(report.output, output);
    assert_eq!(report.tables, 1);

    let previous = report.previous.unwrap();
    assert!(previous.starts_with(&dumps));
    let copy_name = previous.file_name().unwrap().to_str().unwrap();
    assert!(copy_name.starts_with("db."));
    assert!(copy_name.ends_with(".sql"));
    assert_eq!(
        std::fs::read_to_string(&previous).unwrap(),
        "-- previous dump\n"
    );

    let dump = std::fs::read_to_string(&output).unwrap();
    assert!(dump.starts_with("-- Backup created at "));
    assert!(dump.contains("BEGIN;"));
    assert!(dump.trim_end().ends_with("COMMIT;"));

    assert!(dump.contains("DROP TABLE IF EXISTS products CASCADE;"));
    assert!(dump.contains(
        "CREATE TABLE products (\n  id integer NOT NULL,\n  product_title character varying(255),\n  extra jsonb\n);"
    ));
    assert!(!dump.contains("users"));

    assert!(dump.contains("CREATE OR REPLACE FUNCTION touch_updated_at()"));
    assert!(dump.contains("GRANT EXECUTE ON FUNCTION touch_updated_at() TO anon;"));

    assert!(dump.contains("CREATE INDEX idx_products_title"));
    assert!(!dump.contains("CREATE UNIQUE INDEX products_pkey"));

    assert!(dump.contains(
        r#"INSERT INTO products (id, product_title, ean_gtin, genre, extra) VALUES (1, 'Tom Clancy''s HAWX', ARRAY['3307210422186'], NULL, '["box","manual"]');"#
    ));

    let data_pos = dump.find("-- Data for products").unwrap();
    let view_pos = dump.find("CREATE VIEW product_overview AS").unwrap();
    assert!(data_pos < view_pos);
}

#[tokio::test]
async fn test_schema_failure_writes_nothing() {
    let server = MockServer::start().await;
    mount_database(&server, 0).await;
    mount_rpc(
        &server,
        "get_table_schema",
        json!([{ "column_name": null, "debug_info": "permission denied for table products" }]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("db.sql");
    let dumps = dir.path().join("dumps");

    let client = PostgrestClient::new(&server.uri(), "anon-key");
    let err = run_backup(&client, &output, &dumps).await.unwrap_err();

    match err {
        BackupError::TableSchema { table, reason } => {
            assert_eq!(table, "products");
            assert!(reason.contains("permission denied"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!output.exists());
    assert!(!dumps.exists());
}

#[tokio::test]
async fn test_api_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/list_all_tables"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("db.sql");

    let client = PostgrestClient::new(&server.uri(), "wrong-key");
    let err = run_backup(&client, &output, &dir.path().join("dumps"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackupError::Status { status: 401, .. }));
    assert!(!output.exists());
}
