//! End-to-end explorer scenarios with scripted API and renderer fakes

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use exchange_explorer::api::{ExchangeApi, MockApiClient};
use exchange_explorer::catalog::{EmptyKind, Listing};
use exchange_explorer::viewer::{
    DiagramRenderer, Outcome, PayloadKind, Point, PointerButton, ViewerController, ViewerState,
    ZoomProfile, EMPTY_PAYLOAD, RENDER_FAILED,
};
use exchange_explorer::{
    Direction, ExchangeCatalog, Explorer, ExplorerError, Result, Severity,
};

/// API serving fixed payloads per exchange and recording requests
#[derive(Default, Clone)]
struct ScriptedApi {
    payloads: HashMap<String, String>,
    requests: Arc<Mutex<Vec<(String, Direction)>>>,
}

impl ScriptedApi {
    fn with(mut self, exchange: &str, payload: &str) -> Self {
        self.payloads.insert(exchange.to_string(), payload.to_string());
        self
    }
}

#[async_trait]
impl ExchangeApi for ScriptedApi {
    async fn fetch_exchanges(&self) -> Result<ExchangeCatalog> {
        let mut names: Vec<String> = self.payloads.keys().cloned().collect();
        names.sort();
        Ok(ExchangeCatalog::new("moirai", names))
    }

    async fn fetch_flowchart(&self, exchange: &str, direction: Direction) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((exchange.to_string(), direction));
        self.payloads
            .get(exchange)
            .cloned()
            .ok_or_else(|| ExplorerError::network_error("Failed to fetch flowchart"))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Renderer that wraps the source in an SVG, or rejects sources containing "broken"
#[derive(Default, Clone)]
struct CountingRenderer {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl DiagramRenderer for CountingRenderer {
    async fn render(&self, id: &str, source: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if source.contains("broken") {
            return Err(ExplorerError::render_error("Parse error on line 2"));
        }
        Ok(format!(
            "<svg id=\"{}\" onload=\"alert(1)\"><script>alert(2)</script><text>{}</text></svg>",
            id,
            source.lines().count()
        ))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

const SOURCE: &str = "flowchart LR\n  A --> B\n";
const BROKEN: &str = "flowchart LR\n  broken -->\n";
const SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"><g/></svg>";

fn scripted() -> ScriptedApi {
    ScriptedApi::default()
        .with("moirai.topic.database.clone", SOURCE)
        .with("moirai.topic.database.backup", SVG)
        .with("moirai.topic.user.created", BROKEN)
        .with("moirai.topic.user.blank", "   \n")
}

#[tokio::test]
async fn diagram_source_goes_through_renderer_and_is_sanitized() {
    let renderer = CountingRenderer::default();
    let calls = renderer.calls.clone();
    let mut explorer = Explorer::new(Box::new(scripted()), Box::new(renderer));

    explorer
        .open_exchange("moirai.topic.database.clone")
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    match explorer.viewer().state() {
        ViewerState::Rendered {
            kind, svg, source, ..
        } => {
            assert_eq!(*kind, PayloadKind::DiagramSource);
            assert_eq!(source, SOURCE);
            assert!(svg.contains("id=\"mermaid-"));
            assert!(!svg.contains("<script"));
            assert!(!svg.contains("onload"));
        }
        other => panic!("expected Rendered, got {:?}", other),
    }
}

#[tokio::test]
async fn svg_payload_skips_renderer() {
    let renderer = CountingRenderer::default();
    let calls = renderer.calls.clone();
    let mut explorer = Explorer::new(Box::new(scripted()), Box::new(renderer));

    explorer
        .open_exchange("moirai.topic.database.backup")
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(matches!(
        explorer.viewer().state(),
        ViewerState::Rendered { kind: PayloadKind::Svg, .. }
    ));
    let download = explorer.viewer().download().unwrap();
    assert_eq!(download.file_name, "moirai.topic.database.backup.svg");
    assert_eq!(download.contents, SVG);
}

#[tokio::test]
async fn renderer_rejection_keeps_source_for_inspection() {
    let mut explorer = Explorer::new(Box::new(scripted()), Box::new(CountingRenderer::default()));

    let err = explorer
        .open_exchange("moirai.topic.user.created")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "render");

    assert_eq!(
        explorer.viewer().state(),
        &ViewerState::RenderFailed {
            exchange: "moirai.topic.user.created".to_string(),
            direction: Direction::LR,
            message: RENDER_FAILED.to_string(),
            source: Some(BROKEN.to_string()),
        }
    );
    assert!(explorer.take_notifications().is_empty());
    assert!(explorer.viewer().download().is_none());
}

#[tokio::test]
async fn blank_payload_fails_without_rendering() {
    let renderer = CountingRenderer::default();
    let calls = renderer.calls.clone();
    let mut explorer = Explorer::new(Box::new(scripted()), Box::new(renderer));

    let err = explorer.open_exchange("moirai.topic.user.blank").await.unwrap_err();
    assert!(matches!(err, ExplorerError::Format { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(matches!(
        explorer.viewer().state(),
        ViewerState::RenderFailed { message, .. } if message == EMPTY_PAYLOAD
    ));
}

#[tokio::test]
async fn fetch_failure_notifies_and_shows_message() {
    let mut explorer = Explorer::new(Box::new(scripted()), Box::new(CountingRenderer::default()));

    assert!(explorer.open_exchange("moirai.nope").await.is_err());

    let notifications = explorer.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Destructive);
    assert!(matches!(
        explorer.viewer().state(),
        ViewerState::RenderFailed { source: None, message, .. } if message == "Failed to fetch flowchart"
    ));
}

#[tokio::test]
async fn direction_change_refetches_open_exchange() {
    let api = scripted();
    let requests = api.requests.clone();
    let mut explorer = Explorer::new(Box::new(api), Box::new(CountingRenderer::default()));

    explorer
        .open_exchange("moirai.topic.database.clone")
        .await
        .unwrap();
    explorer.viewer_mut().transform_mut().zoom_in();
    explorer.change_direction(Direction::TD).await.unwrap();

    assert_eq!(
        *requests.lock().unwrap(),
        vec![
            ("moirai.topic.database.clone".to_string(), Direction::LR),
            ("moirai.topic.database.clone".to_string(), Direction::TD),
        ]
    );
    assert!(matches!(
        explorer.viewer().state(),
        ViewerState::Rendered { direction: Direction::TD, .. }
    ));
    assert_eq!(explorer.viewer().transform().zoom(), ZoomProfile::PANNING.default);

    // Direction persists for the next exchange opened
    explorer
        .open_exchange("moirai.topic.database.backup")
        .await
        .unwrap();
    assert_eq!(requests.lock().unwrap()[2].1, Direction::TD);
}

#[test]
fn last_request_wins_across_fetches() {
    let mut viewer = ViewerController::new(ZoomProfile::PANNING);
    let first = viewer.open("moirai.a");
    let second = viewer.open("moirai.b");

    assert!(matches!(
        viewer.complete_fetch(&first, Ok(SVG.to_string())),
        Outcome::Stale
    ));
    assert_eq!(viewer.state().exchange(), Some("moirai.b"));
    assert!(viewer.state().is_loading());

    assert!(matches!(
        viewer.complete_fetch(&second, Ok(SVG.to_string())),
        Outcome::Rendered
    ));
    assert_eq!(viewer.state().exchange(), Some("moirai.b"));
}

#[test]
fn render_result_after_close_is_discarded() {
    let mut viewer = ViewerController::new(ZoomProfile::PANNING);
    let ticket = viewer.open("moirai.a");
    let job = match viewer.complete_fetch(&ticket, Ok(SOURCE.to_string())) {
        Outcome::NeedsRender(job) => job,
        other => panic!("expected NeedsRender, got {:?}", other),
    };

    viewer.close();
    assert!(matches!(
        viewer.complete_render(job, Ok("<svg/>".to_string())),
        Outcome::Stale
    ));
    assert_eq!(viewer.state(), &ViewerState::Idle);
}

#[test]
fn render_result_after_direction_change_is_discarded() {
    let mut viewer = ViewerController::new(ZoomProfile::PANNING);
    let ticket = viewer.open("moirai.a");
    let job = match viewer.complete_fetch(&ticket, Ok(SOURCE.to_string())) {
        Outcome::NeedsRender(job) => job,
        other => panic!("expected NeedsRender, got {:?}", other),
    };

    let refetch = viewer.set_direction(Direction::TD).unwrap();
    assert!(matches!(
        viewer.complete_render(job, Ok("<svg/>".to_string())),
        Outcome::Stale
    ));
    assert_eq!(refetch.direction, Direction::TD);
    assert!(viewer.state().is_loading());
}

#[test]
fn pan_and_zoom_reset_when_switching_exchange() {
    let mut viewer = ViewerController::new(ZoomProfile::PANNING);
    let ticket = viewer.open("moirai.a");
    viewer.complete_fetch(&ticket, Ok(SVG.to_string()));

    let transform = viewer.transform_mut();
    transform.zoom_in();
    assert!(transform.pointer_down(PointerButton::Primary, Point::new(10.0, 10.0)));
    assert!(transform.pointer_move(Point::new(40.0, 30.0)));
    transform.pointer_up();
    assert_eq!(viewer.transform().pan(), Point::new(30.0, 20.0));

    viewer.open("moirai.b");
    assert_eq!(viewer.transform().pan(), Point::ORIGIN);
    assert_eq!(viewer.transform().zoom(), ZoomProfile::PANNING.default);
}

#[tokio::test]
async fn searching_the_mock_catalog() {
    let mut explorer = Explorer::new(
        Box::new(MockApiClient::new()),
        Box::new(CountingRenderer::default()),
    );
    explorer.load_catalog().await.unwrap();

    explorer.set_search_term("database");
    match explorer.listing() {
        Listing::Exchanges { items, matches } => {
            assert_eq!(
                items,
                vec![
                    "moirai.topic.database.clone",
                    "moirai.topic.database.backup",
                    "moirai.topic.database.restore",
                ]
            );
            assert_eq!(matches.as_deref(), Some("Found 3 exchanges"));
        }
        other => panic!("expected Exchanges, got {:?}", other),
    }

    explorer.set_search_term("zzz");
    assert_eq!(
        explorer.listing(),
        Listing::Empty(EmptyKind::NoResults {
            term: "zzz".to_string()
        })
    );

    explorer.set_search_term("");
    assert!(matches!(
        explorer.listing(),
        Listing::Exchanges { ref items, matches: None } if items.len() == 8
    ));
}
