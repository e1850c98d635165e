//! Integration tests for `DatasetClient` over HTTP.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use locfinder_dataset::{DatasetClient, DatasetError, DatasetSource};

/// 5-second timeout, descriptive UA, no retries.
fn test_client() -> DatasetClient {
    DatasetClient::new(5, "locfinder-test/0.1", 0, 0).expect("failed to build test DatasetClient")
}

fn test_client_with_retries(max_retries: u32) -> DatasetClient {
    DatasetClient::new(5, "locfinder-test/0.1", max_retries, 0)
        .expect("failed to build test DatasetClient")
}

fn dataset_json() -> serde_json::Value {
    json!([
        {
            "Latitude": -34.6037,
            "Longitude": -58.3816,
            "Direccion": "Av. de Mayo 500",
            "CP": "C1084",
            "LOCALIDAD": "CABA",
            "PROVINCIA": "Buenos Aires"
        },
        {
            "Latitude": -34.5875,
            "Longitude": -58.4205,
            "Direccion": "Av. Santa Fe 3253",
            "CP": 1425,
            "LOCALIDAD": "Palermo",
            "PROVINCIA": "Buenos Aires"
        },
        {
            "Direccion": "Sin coordenadas",
            "CP": "0000"
        }
    ])
}

#[tokio::test]
async fn load_decodes_dataset_served_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset_json()))
        .mount(&server)
        .await;

    let source = DatasetSource::parse(&format!("{}/data/output.json", server.uri()));
    let decoded = test_client().load(&source).await.expect("expected Ok");

    assert_eq!(decoded.locations.len(), 2);
    assert_eq!(decoded.skipped, 1);
    assert_eq!(decoded.locations[0].address.as_deref(), Some("Av. de Mayo 500"));
    assert_eq!(decoded.locations[1].postal_code.as_deref(), Some("1425"));
}

#[tokio::test]
async fn load_returns_not_found_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let source = DatasetSource::Url(format!("{}/data/output.json", server.uri()));
    let err = test_client_with_retries(3).load(&source).await.unwrap_err();

    assert!(matches!(err, DatasetError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn load_returns_unexpected_status_on_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = DatasetSource::Url(format!("{}/data/output.json", server.uri()));
    let err = test_client().load(&source).await.unwrap_err();

    assert!(
        matches!(err, DatasetError::UnexpectedStatus { status: 403, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn load_retries_server_errors_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataset_json()))
        .expect(1)
        .mount(&server)
        .await;

    let source = DatasetSource::Url(format!("{}/data/output.json", server.uri()));
    let decoded = test_client_with_retries(3)
        .load(&source)
        .await
        .expect("expected Ok after retries");

    assert_eq!(decoded.locations.len(), 2);
}

#[tokio::test]
async fn load_gives_up_after_max_retries_on_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(2)
        .mount(&server)
        .await;

    let source = DatasetSource::Url(format!("{}/data/output.json", server.uri()));
    let err = test_client_with_retries(1).load(&source).await.unwrap_err();

    assert!(matches!(err, DatasetError::RateLimited { .. }), "got: {err:?}");
}

#[tokio::test]
async fn load_rejects_non_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .mount(&server)
        .await;

    let source = DatasetSource::Url(format!("{}/data/output.json", server.uri()));
    let err = test_client().load(&source).await.unwrap_err();

    assert!(matches!(err, DatasetError::NotAnArray { .. }), "got: {err:?}");
}

#[tokio::test]
async fn load_rejects_invalid_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/output.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = DatasetSource::Url(format!("{}/data/output.json", server.uri()));
    let err = test_client().load(&source).await.unwrap_err();

    assert!(matches!(err, DatasetError::Decode { .. }), "got: {err:?}");
}
