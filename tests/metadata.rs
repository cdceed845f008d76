use drone_gcr::metadata;
use mockito::mock;
use serde::Deserialize;
use std::time::Duration;

static FLAVOR_K: &str = "Metadata-Flavor";
static FLAVOR_V: &str = "Google";

fn mock_client() -> metadata::Client {
    metadata::Client::configure()
        .endpoint(&mockito::server_url())
        .build()
        .unwrap()
}

#[derive(Debug, Deserialize)]
struct Attribute {
    name: String,
}

#[tokio::test]
async fn test_get_decodes_typed_body() {
    let m = mock("GET", "/instance/attributes/publish")
        .match_header(FLAVOR_K, FLAVOR_V)
        .with_status(200)
        .with_body(r#"{"name":"builder"}"#)
        .create();

    let attr: Attribute = mock_client().get("/instance/attributes/publish").await.unwrap();

    assert_eq!(attr.name, "builder");
    m.assert();
}

#[tokio::test]
async fn test_get_malformed_body_is_decode_error() {
    let m = mock("GET", "/instance/attributes/garbled")
        .with_status(200)
        .with_body("not json at all")
        .create();

    let res = mock_client().get::<Attribute>("/instance/attributes/garbled").await;

    match res {
        Err(drone_gcr::Error::Decode(_)) => {}
        other => panic!("expected decode error, got {:?}", other),
    };
    m.assert();
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let client = metadata::Client::configure()
        .endpoint("http://127.0.0.1:1")
        .connect_timeout(Duration::from_millis(250))
        .build()
        .unwrap();

    let res = client.service_account_email().await;

    match res {
        Err(drone_gcr::Error::Transport(_)) => {}
        other => panic!("expected transport error, got {:?}", other),
    };
}

#[tokio::test]
async fn test_default_account_email_then_token() {
    let email_m = mock("GET", "/instance/service-accounts/?recursive=true")
        .match_header(FLAVOR_K, FLAVOR_V)
        .with_status(200)
        .with_body(r#"{"default":{"aliases":["default"],"email":"robot@developer.gserviceaccount.com","scopes":["https://www.googleapis.com/auth/cloud-platform"]}}"#)
        .create();
    let token_m = mock(
        "GET",
        "/instance/service-accounts/robot@developer.gserviceaccount.com/token",
    )
    .match_header(FLAVOR_K, FLAVOR_V)
    .with_status(200)
    .with_body(r#"{"access_token":"ya29.minted","expires_in":3599,"token_type":"Bearer"}"#)
    .create();

    let client = mock_client();
    let email = client.service_account_email().await.unwrap();
    assert_eq!(email, "robot@developer.gserviceaccount.com");

    let token = client.access_token(&email).await.unwrap();
    assert_eq!(token, "ya29.minted");

    email_m.assert();
    token_m.assert();
}
