use std::net::SocketAddr;
use std::sync::Arc;

use authd_cli::{AuthClient, ClientError, TokenStore};
use authd_core::InMemorySessionStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::StatusCode;

async fn spawn_server() -> AuthClient {
    let store = InMemorySessionStore::with_rng(StdRng::seed_from_u64(3), 2).unwrap();
    let app = authd_server::app(Arc::new(store));

    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let local = server.local_addr();
    tokio::spawn(server);

    AuthClient::new(format!("http://{}", local))
}

#[tokio::test]
async fn client_drives_full_session() {
    let client = spawn_server().await;

    assert_eq!(client.health().await.unwrap(), "ok");

    let response = client.register("dana", "secret").await.unwrap();
    assert_eq!(response.message, "user registered");

    let (token, message) = client.login("dana", "secret").await.unwrap();
    assert_eq!(message, "login success");

    let users = client.users(&token).await.unwrap();
    assert_eq!(users.me, "dana");
    assert_eq!(users.users.len(), 1 + 2 + 1);

    let response = client.logout(&token).await.unwrap();
    assert_eq!(response.message, "dana logged out");

    match client.users(&token).await {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "unauthorized");
        }
        other => panic!("expected unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn server_errors_surface_their_message() {
    let client = spawn_server().await;

    match client.register("admin", "admin").await {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(message, "user exists");
        }
        other => panic!("expected conflict, got {:?}", other),
    }

    match client.login("admin", "nope").await {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("expected invalid credentials, got {:?}", other),
    }
}

#[tokio::test]
async fn saved_token_authenticates_later_calls() {
    let client = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let tokens = TokenStore::new(dir.path().join("token"));

    let (token, _) = client.login("admin", "admin").await.unwrap();
    tokens.save(&token).unwrap();

    let saved = tokens.load().unwrap().unwrap();
    assert_eq!(client.users(&saved).await.unwrap().me, "admin");
}
