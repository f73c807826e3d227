//! Fetch client reading its token from a live edge server.

use std::sync::Arc;

use reqwest::StatusCode;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seu_garcom_client::{ApiClient, ClientConfig, ClientError, HttpSessionProvider};
use seu_garcom_core::Role;
use seu_garcom_integration_tests::{session, session_cookie, spawn_edge, test_state};

#[tokio::test]
async fn test_client_uses_token_from_edge_session() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/restaurants/r-1/units"))
        .and(header("authorization", "Bearer jwt-edge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&backend)
        .await;

    let state = test_state(&backend.uri());
    let cookie = session_cookie(&state, &session(Role::Manager));
    let edge = spawn_edge(state).await;

    let provider =
        HttpSessionProvider::new(&Url::parse(&format!("http://{edge}")).unwrap(), cookie).unwrap();
    let client = ApiClient::builder(ClientConfig::new(Url::parse(&backend.uri()).unwrap()))
        .session_provider(Arc::new(provider))
        .build()
        .unwrap();

    let response = client.get("restaurants/r-1/units").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_repeated_401_signs_out_through_edge() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&backend)
        .await;

    let state = test_state(&backend.uri());
    let cookie = session_cookie(&state, &session(Role::Admin));
    let edge = spawn_edge(state).await;

    let provider = Arc::new(
        HttpSessionProvider::new(&Url::parse(&format!("http://{edge}")).unwrap(), cookie).unwrap(),
    );
    let client = ApiClient::builder(ClientConfig::new(Url::parse(&backend.uri()).unwrap()))
        .session_provider(provider.clone())
        .on_sign_out(provider)
        .build()
        .unwrap();

    let result = client.get("employees").await;
    assert!(matches!(result, Err(ClientError::SessionExpired)));
}
