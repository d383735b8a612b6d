//! HTTP request handlers and router.

use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use hostprobe_core::model::HostSnapshot;

use crate::state::{AppState, SharedSource};

/// Assembly time above which a request is logged as slow.
const SLOW_SNAPSHOT: Duration = Duration::from_secs(1);

/// Builds the application router.
pub(crate) fn router(source: SharedSource) -> Router {
    Router::new()
        .route("/", get(handle_snapshot))
        .route("/health", get(handle_health))
        .with_state(source)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

/// Assembles a fresh snapshot on the blocking pool and returns it as JSON.
///
/// Always 200: if the assembly task itself dies, an all-unavailable
/// snapshot is returned instead.
pub(crate) async fn handle_snapshot(State(source): AppState) -> Json<HostSnapshot> {
    let started = tokio::time::Instant::now();
    let snapshot = match tokio::task::spawn_blocking(move || source.assemble()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "snapshot assembly task failed");
            HostSnapshot::unavailable()
        }
    };

    let elapsed = started.elapsed();
    if elapsed > SLOW_SNAPSHOT {
        warn!(elapsed_ms = elapsed.as_millis() as u64, "slow snapshot");
    }

    Json(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use hostprobe_core::collector::MockHost;

    use crate::state::SnapshotSource;

    struct PanickingSource;

    impl SnapshotSource for PanickingSource {
        fn assemble(&self) -> HostSnapshot {
            panic!("collector blew up");
        }
    }

    async fn get_json(source: SharedSource, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
        let response = router(source)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_snapshot_endpoint() {
        let source: SharedSource = Arc::new(MockHost::typical_system().assembler());
        let (status, content_type, json) = get_json(source, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(json["available"], true);
        assert_eq!(json["hostname"], "testhost");
        assert_eq!(json["cpu"]["load1_pct"], 12);
        assert_eq!(json["cpu"]["load15_pct"], 37);
        assert_eq!(json["memory"]["used_pct"], 50);
        assert_eq!(json["mountpoints"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_endpoint_all_sources_failing() {
        let source: SharedSource = Arc::new(MockHost::all_sources_failing().assembler());
        let (status, _, json) = get_json(source, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cpu"]["load_available"], false);
        assert_eq!(json["cpu"]["temp_available"], false);
        assert_eq!(json["cpu"]["temperature_c"], 0);
        assert_eq!(json["memory"]["available"], false);
        assert_eq!(json["memory"]["swap_available"], false);
        assert_eq!(json["memory"]["total_mb"], 0);
        assert_eq!(json["mountpoints"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_snapshot_endpoint_survives_panicking_source() {
        let source: SharedSource = Arc::new(PanickingSource);
        let (status, _, json) = get_json(source, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["available"], false);
        assert_eq!(json["memory"]["available"], false);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let source: SharedSource = Arc::new(MockHost::typical_system().assembler());
        let response = router(source)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let source: SharedSource = Arc::new(MockHost::typical_system().assembler());
        let response = router(source)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
