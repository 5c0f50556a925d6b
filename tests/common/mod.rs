//! Shared helpers for Statusboard integration tests.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use statusboard::api::{create_router, AppContext};
use statusboard::config::{ChannelConfig, DashboardConfig, SourceConfig, StaticConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a frame before declaring it missing.
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Channel fed by pinned JSON.
pub fn static_channel(name: &str, value: Value) -> ChannelConfig {
    ChannelConfig {
        name: name.to_string(),
        interval_seconds: 60,
        enabled: true,
        source: SourceConfig::Static(StaticConfig { value }),
        fallback: None,
    }
}

/// Fresh context with default config.
pub fn test_context() -> Arc<AppContext> {
    Arc::new(AppContext::new(Arc::new(DashboardConfig::default())))
}

/// Context built from an explicit config.
pub fn context_with(config: DashboardConfig) -> Arc<AppContext> {
    Arc::new(AppContext::new(Arc::new(config)))
}

/// Serve the router on an ephemeral local port.
pub async fn spawn_server(ctx: Arc<AppContext>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(ctx);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Open a dashboard WebSocket.
pub async fn connect_ws(addr: SocketAddr) -> WsClient {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .unwrap();
    ws
}

/// Next text frame decoded as JSON. Panics on timeout or close.
pub async fn next_frame(ws: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("socket closed")
            .expect("socket error");
        match msg {
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            Message::Close(_) => panic!("socket closed by server"),
            _ => continue,
        }
    }
}

/// Assert no text frame arrives within `wait`.
pub async fn assert_no_frame(ws: &mut WsClient, wait: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(wait, ws.next()).await {
        panic!("unexpected frame: {}", text);
    }
}

/// Close the client side politely.
pub async fn close_ws(mut ws: WsClient) {
    let _ = ws.send(Message::Close(None)).await;
}

/// Poll `condition` until it holds or the deadline passes.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + FRAME_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
