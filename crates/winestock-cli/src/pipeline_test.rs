use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use winestock_core::MissingCategoryPolicy;

use super::*;

const OBNINSK: &str = "Обнинск, пр-кт. Ленина, дом 137, корп. 4, пом.7.";

fn profile() -> RunProfile {
    RunProfile {
        address: Some(OBNINSK.to_string()),
        ..RunProfile::default()
    }
}

fn out_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("winestock-pipeline-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("data.csv")
}

fn read_rows(path: &Path) -> Vec<ProductRecord> {
    csv::ReaderBuilder::new()
        .delimiter(crate::export::DELIMITER)
        .from_path(path)
        .unwrap()
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, category_id: &str, page: u32, id: u64, available: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/products/{category_id}/")))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "total_pages": 2,
                "items": [{ "bitrix_id": id, "available": available }]
            }
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// One store in Обнинск, two categories of two pages each. Both categories
/// list product 101 (available) on page 1 and an unavailable product on
/// page 2.
async fn obninsk_catalog() -> MockServer {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/v2/cities",
        json!({ "status": "success", "data": [{ "id": 7, "name": "Обнинск", "short": "obn" }] }),
    )
    .await;
    mount_get(
        &server,
        "/api/v2/stores",
        json!({
            "status": "success",
            "data": [{
                "code": "OBN01",
                "name": "Обнинск Ленина",
                "city": 7,
                "address": "249030, Обнинск, пр-кт. Ленина, дом 137, корп. 4, пом.7."
            }]
        }),
    )
    .await;
    mount_get(
        &server,
        "/api/v2/categories",
        json!({
            "status": "success",
            "data": [
                { "category_id": 10, "name": "Вино" },
                { "category_id": 20, "name": "Крепкие\nнапитки" }
            ]
        }),
    )
    .await;
    mount_listing(&server, "10", 1, 101, true).await;
    mount_listing(&server, "10", 2, 201, false).await;
    mount_listing(&server, "20", 1, 101, true).await;
    mount_listing(&server, "20", 2, 202, false).await;
    server
}

async fn mount_product(server: &MockServer, id: u64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/product/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> SimpleWineClient {
    SimpleWineClient::new(&server.uri(), "v2", 5).unwrap()
}

#[tokio::test]
async fn collect_writes_one_row_for_the_available_product() {
    let server = obninsk_catalog().await;
    mount_product(
        &server,
        101,
        json!({
            "status": "success",
            "data": {
                "article": "A-101",
                "name": "Коньяк Hennessy VS",
                "drink_type": "Коньяк",
                "price": 3990,
                "available": true,
                "strenght": "40%",
                "country": { "name": "Франция" },
                "manufacturer": "Hennessy",
                "url": "/catalog/product/hennessy_vs/",
                "image": ["/upload/hennessy.png"]
            }
        }),
    )
    .await;

    let output = out_path("e2e");
    let report = run_collect(&client(&server), &profile(), &output)
        .await
        .expect("run should succeed");

    assert_eq!(report.categories, 2);
    assert_eq!(report.collected.unique, 1);
    assert_eq!(report.collected.duplicates, 1);
    assert_eq!(report.exported, 1);
    assert!(report.skipped.is_empty());

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.name_store, "Обнинск Ленина");
    assert_eq!(row.city_store, "Обнинск");
    assert_eq!(row.address_store, "пр-кт. Ленина, дом 137, корп. 4, пом.7.");
    assert_eq!(row.article, "A-101");
    assert_eq!(row.price, "3990");
    assert_eq!(row.strength, "40%");
    assert_eq!(row.brand, "Hennessy");
    assert_eq!(row.url_img, format!("{}/upload/hennessy.png", server.uri()));

    let _ = std::fs::remove_dir_all(output.parent().unwrap());
}

#[tokio::test]
async fn category_filter_walks_only_the_matching_category() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/v2/categories",
        json!({
            "status": "success",
            "data": [
                { "category_id": 10, "name": "Вино" },
                { "category_id": 20, "name": "Крепкие\nнапитки" }
            ]
        }),
    )
    .await;
    mount_get(
        &server,
        "/api/v2/cities",
        json!({ "status": "success", "data": [{ "id": 7, "name": "Обнинск", "short": "obn" }] }),
    )
    .await;
    mount_get(
        &server,
        "/api/v2/stores",
        json!({
            "status": "success",
            "data": [{
                "code": "OBN01",
                "name": "Обнинск Ленина",
                "city": 7,
                "address": OBNINSK
            }]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/products/10/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/products/20/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "total_pages": 1, "items": [{ "bitrix_id": 5, "available": true }] }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_product(&server, 5, json!({ "status": "success", "data": { "name": "Ром" } })).await;

    let profile = RunProfile {
        category: Some("Крепкие напитки".to_string()),
        ..profile()
    };
    let output = out_path("filter");
    let report = run_collect(&client(&server), &profile, &output).await.unwrap();

    assert_eq!(report.categories, 1);
    assert_eq!(read_rows(&output)[0].name, "Ром");

    let _ = std::fs::remove_dir_all(output.parent().unwrap());
}

#[tokio::test]
async fn skip_policy_keeps_the_rest_of_the_run() {
    let server = obninsk_catalog().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/product/101"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "error", "code": 404 })),
        )
        .mount(&server)
        .await;

    let profile = RunProfile {
        available_only: false,
        on_product_error: ProductErrorPolicy::Skip,
        ..profile()
    };
    mount_product(&server, 201, json!({ "status": "success", "data": { "name": "Вино 201" } }))
        .await;
    mount_product(&server, 202, json!({ "status": "success", "data": { "name": "Вино 202" } }))
        .await;

    let output = out_path("skip");
    let report = run_collect(&client(&server), &profile, &output).await.unwrap();

    assert_eq!(report.collected.unique, 3);
    assert_eq!(report.skipped, vec![101]);
    let names: Vec<_> = read_rows(&output).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Вино 201", "Вино 202"]);

    let _ = std::fs::remove_dir_all(output.parent().unwrap());
}

#[tokio::test]
async fn abort_policy_fails_without_writing_output() {
    let server = obninsk_catalog().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/product/101"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "error", "code": 500 })),
        )
        .mount(&server)
        .await;

    let output = out_path("abort");
    let result = run_collect(&client(&server), &profile(), &output).await;

    let err = result.expect_err("abort policy should fail the run");
    assert!(
        err.chain().any(|cause| cause.to_string().contains("product 101")),
        "unexpected error: {err:#}"
    );
    assert!(!output.exists());
}

#[tokio::test]
async fn unknown_category_fails_before_any_listing_request() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/v2/categories",
        json!({ "status": "success", "data": [{ "category_id": 10, "name": "Вино" }] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cities"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let profile = RunProfile {
        category: Some("Пиво".to_string()),
        ..profile()
    };
    let result = run_collect(&client(&server), &profile, &out_path("unknown")).await;

    let err = result.expect_err("unknown category should fail");
    assert!(matches!(
        err.downcast_ref::<ScraperError>(),
        Some(ScraperError::CategoryNotFound { .. })
    ));
}

#[tokio::test]
async fn empty_category_policy_reports_nothing_to_export() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/v2/categories",
        json!({ "status": "success", "data": [{ "category_id": 10, "name": "Вино" }] }),
    )
    .await;
    mount_get(
        &server,
        "/api/v2/cities",
        json!({ "status": "success", "data": [{ "id": 7, "name": "Обнинск", "short": "obn" }] }),
    )
    .await;
    mount_get(
        &server,
        "/api/v2/stores",
        json!({
            "status": "success",
            "data": [{ "code": "OBN01", "name": "Обнинск Ленина", "city": 7, "address": OBNINSK }]
        }),
    )
    .await;

    let profile = RunProfile {
        category: Some("Пиво".to_string()),
        missing_category: MissingCategoryPolicy::Empty,
        ..profile()
    };
    let output = out_path("empty");
    let err = run_collect(&client(&server), &profile, &output)
        .await
        .expect_err("nothing to export");

    assert!(matches!(
        err.downcast_ref::<crate::export::ExportError>(),
        Some(crate::export::ExportError::Empty)
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn missing_address_fails_before_any_request() {
    let server = MockServer::start().await;

    let result = run_collect(&client(&server), &RunProfile::default(), &out_path("noaddr")).await;

    assert!(result.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn build_client_applies_pacing_and_base_url() {
    let config = AppConfig {
        base_url: "https://simplewine.ru".to_string(),
        log_level: "info".to_string(),
        profile_path: PathBuf::from("config/profile.yaml"),
        output_path: PathBuf::from("data.csv"),
        dump_dir: PathBuf::from("saved_data"),
        request_timeout_secs: 5,
        inter_request_delay_ms: 330,
        pacing_jitter_ms: 0,
        max_retries: 2,
        retry_backoff_base_secs: 2,
    };
    let client = build_client(&config, &RunProfile::default()).unwrap();
    assert_eq!(
        client.pacing(),
        Pacing::Fixed(std::time::Duration::from_millis(330))
    );
    assert_eq!(client.site_origin(), "https://simplewine.ru");
}
