use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{Router, http::StatusCode, http::Uri, response::IntoResponse};
use serde_json::json;
use smitebot_api::{ApiError, ClientConfig, Credentials, SmiteClient, signature};

type Seen = Arc<Mutex<Vec<String>>>;

fn envelope(payload: serde_json::Value) -> String {
    json!({ "response": payload.to_string() }).to_string()
}

fn record(seen: &Seen, path: &str) {
    match seen.lock() {
        Ok(mut guard) => guard.push(path.to_string()),
        Err(poisoned) => poisoned.into_inner().push(path.to_string()),
    }
}

fn paths(seen: &Seen) -> Vec<String> {
    match seen.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

async fn spawn_server(seen: Seen) -> SocketAddr {
    let app = Router::new().fallback(move |uri: Uri| {
        let seen = seen.clone();
        async move {
            let path = uri.path().to_string();
            record(&seen, &path);

            if path.contains("/createsessionjson/") {
                (
                    StatusCode::OK,
                    envelope(json!({"ret_msg": "Approved", "session_id": "LIVE"})),
                )
                    .into_response()
            } else if path.contains("/getplayerjson/") {
                (
                    StatusCode::OK,
                    envelope(json!([{"Name": "Enchom", "RankedDuel": {"Tier": 27}}])),
                )
                    .into_response()
            } else if path.ends_with("/pingjson") {
                (StatusCode::OK, envelope(json!("Ping successful."))).into_response()
            } else {
                (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response()
            }
        }
    });

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind mock server: {error}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(error) => panic!("failed to read mock server address: {error}"),
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn client_for(addr: SocketAddr) -> SmiteClient {
    let config = ClientConfig::default().with_base_url(format!("http://{addr}/smiteapi.svc"));
    match SmiteClient::new(config, Credentials::new("1004", "KEY")) {
        Ok(client) => client,
        Err(error) => panic!("failed to build client: {error}"),
    }
}

#[tokio::test]
async fn signed_call_over_http_creates_session_then_fetches() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_server(seen.clone()).await;
    let client = client_for(addr);

    let players = match client.get_player("Enchom", None).await {
        Ok(players) => players,
        Err(error) => panic!("get_player failed: {error}"),
    };
    assert_eq!(players.len(), 1);
    assert_eq!(
        players[0].ranked_duel.division().map(|d| d.display_name()),
        Some("Grandmaster")
    );

    let paths = paths(&seen);
    assert_eq!(paths.len(), 2);
    assert!(paths[0].starts_with("/smiteapi.svc/createsessionjson/1004/"));

    let Some(rest) = paths[1].strip_prefix("/smiteapi.svc/getplayerjson/") else {
        panic!("unexpected path {}", paths[1]);
    };
    let segments: Vec<&str> = rest.split('/').collect();
    assert_eq!(segments[0], "1004");
    assert_eq!(segments[1], signature("1004", "getplayer", "KEY", segments[3]));
    assert_eq!(segments[2], "LIVE");
    assert_eq!(segments[4], "Enchom");
}

#[tokio::test]
async fn unsigned_ping_over_http() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_server(seen.clone()).await;
    let client = client_for(addr);

    let pong = match client.ping().await {
        Ok(value) => value,
        Err(error) => panic!("ping failed: {error}"),
    };

    assert_eq!(pong, json!("Ping successful."));
    assert_eq!(paths(&seen), vec!["/smiteapi.svc/pingjson".to_string()]);
}

#[tokio::test]
async fn error_status_is_surfaced_as_status_error() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_server(seen.clone()).await;
    let client = client_for(addr);

    let result = client.get_patch_info().await;

    match result {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind: {error}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(error) => panic!("failed to read address: {error}"),
    };
    drop(listener);

    let client = client_for(addr);
    let result = client.ping().await;

    assert!(matches!(result, Err(ref error) if error.is_transport()));
}
