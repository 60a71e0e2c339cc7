// tests/common/mod.rs
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::routing::post;
use axum::{Json, Router};
use reqwest::Client;
use serde_json::Value;

use crate::config::settings::AuthSettings;
use crate::helpers::time::Clock;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Deterministic clock for expiry tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(start: i64) -> Arc<Self> {
        Arc::new(Self { now: AtomicI64::new(start) })
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Settings pointing token acquisition at a local stub.
pub fn test_settings(token_addr: SocketAddr) -> AuthSettings {
    AuthSettings {
        subdomain: Some("unit-test".into()),
        client_id: Some("id".into()),
        client_secret: Some("secret".into()),
        default_account_id: None,
        auth_url: Some(format!("http://{token_addr}")),
    }
}

/// Observable state of a spawned token endpoint stub.
#[derive(Clone)]
pub struct TokenStub {
    pub hits: Arc<AtomicUsize>,
    pub bodies: Arc<tokio::sync::Mutex<Vec<Value>>>,
    instance_url: String,
    expires_in: i64,
}

/// Token endpoint stub. Issues `tok-1`, `tok-2`, ... and reports
/// `instance_url` as both the REST and SOAP instance URL.
pub async fn spawn_token_stub(instance_url: String, expires_in: i64) -> (TokenStub, SocketAddr) {
    let stub = TokenStub {
        hits: Arc::new(AtomicUsize::new(0)),
        bodies: Arc::new(tokio::sync::Mutex::new(Vec::new())),
        instance_url,
        expires_in,
    };
    let state = stub.clone();
    let router = Router::new().route(
        "/v2/token",
        post(move |Json(body): Json<Value>| {
            let state = state.clone();
            async move {
                let n = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
                state.bodies.lock().await.push(body);
                Json(json!({
                    "access_token": format!("tok-{n}"),
                    "token_type": "Bearer",
                    "expires_in": state.expires_in,
                    "rest_instance_url": state.instance_url,
                    "soap_instance_url": state.instance_url,
                }))
            }
        }),
    );
    let (_handle, addr) = spawn_axum(router).await;
    (stub, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}
