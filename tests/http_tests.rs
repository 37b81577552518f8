mod common;

use common::*;
use serde_json::json;

#[tokio::test]
async fn health_returns_ok() {
    let server = spawn_test_server().await;

    let response = reqwest::get(&server.http_url("/health")).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn lobbies_returns_empty_list() {
    let server = spawn_test_server().await;

    let response = reqwest::get(&server.http_url("/lobbies")).await.unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "lobbies": [], "v": 1}));
}

#[tokio::test]
async fn lobbies_lists_lobby_created_over_tcp() {
    let server = spawn_test_server().await;
    let mut host = TcpClient::connect(&server).await;

    host.request(json!({
        "method": "create_lobby",
        "player_name": "Alice",
        "port": 6000,
        "game_version": "1.0.2"
    }))
    .await;

    let body: serde_json::Value = reqwest::get(&server.http_url("/lobbies"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body["lobbies"],
        json!([{
            "name": "Alice's Lobby",
            "ip": "127.0.0.1",
            "port": 6000,
            "players": [{"name": "Alice", "ip": "127.0.0.1", "color": "red"}],
            "status": "OPEN",
            "has_password": false,
            "game_version": "1.0.2"
        }])
    );
}

#[tokio::test]
async fn lobbies_endpoint_sweeps_stale_lobbies() {
    use std::time::{Duration, Instant};

    let server = spawn_test_server().await;
    let mut host = TcpClient::connect(&server).await;
    let token = host.request(json!({"method": "create_lobby"})).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    server.dispatcher.with_registry(|registry| {
        registry.get_mut(&token).unwrap().last_heartbeat =
            Instant::now().checked_sub(Duration::from_secs(60)).unwrap();
    });

    let body: serde_json::Value = reqwest::get(&server.http_url("/lobbies"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["lobbies"], json!([]));
    server
        .dispatcher
        .with_registry(|registry| assert!(registry.is_empty()));
}
