//! Integration tests for the API routes with in-memory sources.

use std::collections::{BTreeMap, VecDeque};
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;

use folio_api::{AppState, build_router};
use folio_core::config::AppConfig;
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::Upstream;
use folio_presence::{
    GatewayConnection, GatewayConnector, PresenceClient, PresenceResult, TransportEvent,
};
use folio_service::{GithubStats, MusicStats, SongLibrary, Sources, StarCounts, Weather};

/// Returns a fixed value, counting calls; fails while `failing` is set.
#[derive(Debug)]
struct FakeSource<T> {
    name: &'static str,
    value: T,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl<T> FakeSource<T> {
    fn new(name: &'static str, value: T) -> Arc<Self> {
        Arc::new(Self {
            name,
            value,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: Clone + Debug + Send + Sync + 'static> Upstream for FakeSource<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self) -> AppResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service(format!("{} is down", self.name)));
        }
        Ok(self.value.clone())
    }
}

/// Test application context
struct TestApp {
    router: Router,
    projects: Arc<FakeSource<StarCounts>>,
    github_stats: Arc<FakeSource<GithubStats>>,
    music_stats: Arc<FakeSource<MusicStats>>,
    weather: Arc<FakeSource<Weather>>,
    _songs_dir: tempfile::TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with_presence(None)
    }

    fn with_presence(presence: Option<PresenceClient>) -> Self {
        let songs_dir = tempfile::tempdir().unwrap();
        for name in ["Tycho - Awake.mp3", "Bonobo - Kerala.mp3", "playlist.m3u"] {
            std::fs::write(songs_dir.path().join(name), b"").unwrap();
        }

        let projects = FakeSource::new(
            "projects",
            StarCounts::from([("https://github.com/Equicord/Equibop".to_string(), 412)]),
        );
        let github_stats = FakeSource::new(
            "github_stats",
            GithubStats {
                contributions: json!([{ "date": "2025-06-01", "count": 4, "level": 2 }]),
                total: 321,
                languages: BTreeMap::from([("Rust".to_string(), 9000)]),
            },
        );
        let music_stats = FakeSource::new(
            "music_stats",
            MusicStats {
                artists: json!({ "items": [{ "artist": { "name": "Tycho" } }] }),
                tracks: json!({ "items": [] }),
            },
        );
        let weather = FakeSource::new(
            "weather",
            Weather {
                temp: "27°C".to_string(),
                condition: "Sunny".to_string(),
                last_updated: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            },
        );

        let sources = Sources {
            projects: projects.clone(),
            github_stats: github_stats.clone(),
            music_stats: music_stats.clone(),
            weather: weather.clone(),
            songs: Arc::new(SongLibrary::new(songs_dir.path())),
        };
        let state = AppState::new(Arc::new(AppConfig::default()), sources, presence);

        Self {
            router: build_router(state),
            projects,
            github_stats,
            music_stats,
            weather,
            _songs_dir: songs_dir,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, HeaderMap, Value) {
        let request = Request::get(path).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }
}

fn cache_header(headers: &HeaderMap) -> &str {
    headers.get("x-cache").and_then(|v| v.to_str().ok()).unwrap_or("")
}

#[tokio::test(start_paused = true)]
async fn test_projects_served_from_cache_inside_window() {
    let app = TestApp::new();

    let (status, headers, first) = app.get("/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_header(&headers), "refreshed");
    assert_eq!(first, json!({ "https://github.com/Equicord/Equibop": 412 }));

    tokio::time::advance(Duration::from_secs(29 * 60)).await;
    let (status, headers, second) = app.get("/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_header(&headers), "fresh");
    assert_eq!(first, second);
    assert_eq!(app.projects.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_projects_refresh_once_after_window() {
    let app = TestApp::new();
    app.get("/api/projects").await;

    tokio::time::advance(Duration::from_secs(30 * 60)).await;
    let (_, headers, _) = app.get("/api/projects").await;
    app.get("/api/projects").await;

    assert_eq!(cache_header(&headers), "refreshed");
    assert_eq!(app.projects.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failure_serves_previous_payload_with_ok() {
    let app = TestApp::new();
    let (_, _, before) = app.get("/api/stats").await;

    app.github_stats.fail(true);
    tokio::time::advance(Duration::from_secs(24 * 60 * 60)).await;
    let (status, headers, after) = app.get("/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_header(&headers), "stale");
    assert_eq!(before, after);
    assert_eq!(after["total"], 321);
    assert_eq!(app.github_stats.calls(), 2);
}

#[tokio::test]
async fn test_failure_without_history_returns_route_error() {
    let app = TestApp::new();
    app.projects.fail(true);
    app.github_stats.fail(true);
    app.music_stats.fail(true);
    app.weather.fail(true);

    let cases = [
        ("/api/projects", "Failed to fetch GitHub data. Possible Ratelimit try again later."),
        ("/api/stats", "Failed to fetch GitHub data. Possible Ratelimit try again later."),
        ("/api/music", "Failed to fetch music stats"),
        ("/api/weather", "Unable to fetch weather data"),
    ];
    for (path, message) in cases {
        let (status, _, body) = app.get(path).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_eq!(body, json!({ "error": message }), "{path}");
    }
}

#[tokio::test]
async fn test_music_and_weather_payloads() {
    let app = TestApp::new();

    let (status, _, music) = app.get("/api/music").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(music["artists"]["items"][0]["artist"]["name"], "Tycho");

    let (status, _, weather) = app.get("/api/weather").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(weather["temp"], "27°C");
    assert_eq!(weather["condition"], "Sunny");
    assert_eq!(weather["last_updated"], "2025-06-01T12:00:00Z");
}

#[tokio::test]
async fn test_songs_listed_from_directory() {
    let app = TestApp::new();

    let (status, headers, body) = app.get("/api/songs").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get("x-cache").is_none());
    assert_eq!(
        body,
        json!([
            { "title": "Kerala", "artist": "Bonobo" },
            { "title": "Awake", "artist": "Tycho" }
        ])
    );
}

#[tokio::test]
async fn test_songs_directory_error() {
    let app = TestApp::new();
    let missing = tempfile::tempdir().unwrap().path().join("gone");
    let state = AppState::new(
        Arc::new(AppConfig::default()),
        Sources {
            projects: app.projects.clone(),
            github_stats: app.github_stats.clone(),
            music_stats: app.music_stats.clone(),
            weather: app.weather.clone(),
            songs: Arc::new(SongLibrary::new(missing)),
        },
        None,
    );
    let broken = TestApp {
        router: build_router(state),
        ..app
    };

    let (status, _, body) = broken.get("/api/songs").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to load songs" }));
}

#[tokio::test]
async fn test_presence_disabled_reports_offline() {
    let app = TestApp::new();

    let (status, _, body) = app.get("/api/presence").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "offline", "connection_status": "disconnected", "data": null })
    );

    let (_, _, health) = app.get("/api/health").await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["presence"], "disabled");
}

/// Replays fixed frames on every connection, then stays open.
struct ReplayGateway {
    frames: Vec<String>,
}

struct ReplayConnection {
    frames: VecDeque<String>,
}

#[async_trait]
impl GatewayConnector for ReplayGateway {
    async fn connect(&self, _url: &str) -> PresenceResult<Box<dyn GatewayConnection>> {
        Ok(Box::new(ReplayConnection {
            frames: self.frames.iter().cloned().collect(),
        }))
    }
}

#[async_trait]
impl GatewayConnection for ReplayConnection {
    async fn send_text(&mut self, _text: String) -> PresenceResult<()> {
        Ok(())
    }

    async fn next_event(&mut self) -> TransportEvent {
        match self.frames.pop_front() {
            Some(frame) => TransportEvent::Message(frame),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) {}
}

#[tokio::test]
async fn test_presence_route_serves_live_snapshot() {
    let gateway = ReplayGateway {
        frames: vec![
            json!({ "op": 1, "d": { "heartbeat_interval": 30000 } }).to_string(),
            json!({
                "op": 0,
                "t": "INIT_STATE",
                "d": {
                    "discord_user": { "id": "825069530376044594", "username": "refurbishing" },
                    "discord_status": "dnd",
                    "activities": [{ "name": "Neovim", "type": 0 }],
                    "listening_to_spotify": false
                }
            })
            .to_string(),
        ],
    };
    let client = PresenceClient::start(AppConfig::default().presence, Arc::new(gateway));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = client.subscribe(move |state| {
        if state.presence.is_some() {
            let _ = tx.send(());
        }
    });
    rx.recv().await.unwrap();
    sub.unsubscribe();

    let app = TestApp::with_presence(Some(client.clone()));
    let (status, _, body) = app.get("/api/presence").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "dnd");
    assert_eq!(body["connection_status"], "connected");
    assert_eq!(body["data"]["discord_user"]["username"], "refurbishing");
    assert_eq!(body["data"]["activities"][0]["name"], "Neovim");

    let (_, _, health) = app.get("/api/health").await;
    assert_eq!(health["presence"], "connected");

    client.shutdown().await;
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/projects")
        .header("origin", "https://refurbishing.dev")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(app.projects.calls(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();
    let (status, _, _) = app.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
