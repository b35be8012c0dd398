mod handlers;
mod state;
mod static_files;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::places::PlaceResolver;

pub fn build_router(resolver: PlaceResolver) -> Router {
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .route("/api/search", get(handlers::search))
        .route("/api/recommend", post(handlers::recommend))
        .route("/api/venues", get(handlers::venues))
        .route("/api/hotspots", get(handlers::hotspots))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, resolver: PlaceResolver) -> anyhow::Result<()> {
    let app = build_router(resolver);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind to {}: {}", addr, e))?;

    info!("MIDMEET server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::places::resolver::testing::{place, ScriptedSearch};
    use crate::places::{CategoryQuery, KeywordQuery, Place, PlaceError, PlaceSearch, SearchCache};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Category searches block until released; keyword searches answer at once.
    struct GatedSearch {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl PlaceSearch for GatedSearch {
        fn search_keyword(&self, _query: &KeywordQuery) -> Result<Vec<Place>, PlaceError> {
            Ok(Vec::new())
        }

        fn search_category(&self, _query: &CategoryQuery) -> Result<Vec<Place>, PlaceError> {
            let _ = self.entered.lock().unwrap().send(());
            let _ = self.release.lock().unwrap().recv_timeout(Duration::from_secs(5));
            Ok(Vec::new())
        }

        fn region_name(&self, _at: Coordinate) -> Result<String, PlaceError> {
            Err(PlaceError::Network("unreachable".into()))
        }
    }

    fn app(source: ScriptedSearch, offline: bool) -> (Router, TempDir) {
        let dir = TempDir::new().unwrap();
        let cache = SearchCache::load_from(dir.path().join("cache.json"));
        let mut resolver = PlaceResolver::new(Box::new(source), cache);
        resolver.set_offline(offline);
        (build_router(resolver), dir)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_index_served() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let resp = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let (status, body) = send(app, get_req("/api/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_search_offline_uses_builtin() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let (status, body) = send(app, get_req("/api/search?query=%EA%B0%95%EB%82%A8%EC%97%AD")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "강남역");
        assert_eq!(body[0]["source"], "Builtin");
    }

    #[tokio::test]
    async fn test_recommend_unresolved_is_422() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let req = post_json(
            "/api/recommend",
            json!({ "participants": [{ "lat": 37.5, "lon": 127.0 }, { "name": "친구" }] }),
        );
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("participant 2"));
    }

    #[tokio::test]
    async fn test_recommend_single_participant_is_422() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let req = post_json("/api/recommend", json!({ "participants": [{ "lat": 37.5, "lon": 127.0 }] }));
        let (status, _) = send(app, req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_recommend_unknown_strategy_is_400() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let req = post_json(
            "/api/recommend",
            json!({
                "participants": [{ "lat": 37.5, "lon": 127.0 }, { "lat": 37.5, "lon": 127.1 }],
                "strategy": "random"
            }),
        );
        let (status, _) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommend_hotspot_mode() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let req = post_json(
            "/api/recommend",
            json!({
                "participants": [
                    { "lat": 37.5, "lon": 127.0 },
                    { "lat": 37.5, "lon": 127.1 },
                    { "lat": 37.5, "lon": 126.9 }
                ],
                "strategy": "hotspot",
                "vibe": "drinking"
            }),
        );
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "hotspot");
        assert_eq!(body["vibe"], "drinking");
        assert_eq!(body["centroid"]["lat"], 37.5);
        assert_eq!(body["centroid"]["lon"], 127.0);
        let candidates = body["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0]["rank"], 1);
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_recommend_distance_mode_empty_has_message() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let req = post_json(
            "/api/recommend",
            json!({ "participants": [{ "lat": 37.5, "lon": 127.0 }, { "lat": 37.5, "lon": 127.1 }] }),
        );
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "distance");
        assert!(body["candidates"].as_array().unwrap().is_empty());
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_venues_uses_vibe() {
        let source = ScriptedSearch::default()
            .category(Ok(vec![
                place("분식집", "음식점 > 분식", 37.5, 127.0),
                place("곱창골목", "음식점 > 한식 > 곱창", 37.5, 127.0),
            ]))
            .category(Ok(vec![]))
            .category(Ok(vec![]));
        let (app, _dir) = app(source, false);
        let (status, body) = send(app, get_req("/api/venues?lat=37.5&lon=127.0&vibe=drinking")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["food"][0]["name"], "곱창골목");
        assert_eq!(body["vibe"], "drinking");
    }

    #[tokio::test]
    async fn test_venues_rejects_bad_coordinates() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let (status, _) = send(app, get_req("/api/venues?lat=95&lon=127.0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_hotspot_catalog() {
        let (app, _dir) = app(ScriptedSearch::default(), true);
        let (status, body) = send(app, get_req("/api/hotspots")).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), crate::hotspots::HOTSPOTS.len());
        assert_eq!(list[0]["name"], "강남역");
    }

    #[tokio::test]
    async fn test_search_not_blocked_by_slow_venue_lookup() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let source = GatedSearch {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        let dir = TempDir::new().unwrap();
        let cache = SearchCache::load_from(dir.path().join("cache.json"));
        let app = build_router(PlaceResolver::new(Box::new(source), cache));

        let venues = tokio::spawn(app.clone().oneshot(get_req("/api/venues?lat=37.5&lon=127.0")));
        tokio::task::spawn_blocking(move || entered_rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();

        // 잠실
        let search = send(app, get_req("/api/search?query=%EC%9E%A0%EC%8B%A4"));
        let (status, body) = tokio::time::timeout(Duration::from_secs(2), search)
            .await
            .expect("search stalled behind the venue lookup");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "잠실역");

        for _ in 0..3 {
            let _ = release_tx.send(());
        }
        let resp = venues.await.unwrap().unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
