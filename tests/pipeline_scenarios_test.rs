//! End-to-end batch tests against mocked Figma and compression services

use layer_export::adapters::compress::HttpCompressionClient;
use layer_export::adapters::figma::FigmaClient;
use layer_export::adapters::settings::FileSettingsStore;
use layer_export::adapters::sink::FileSink;
use layer_export::config::{secret_string, FigmaConfig};
use layer_export::core::export::{BatchPipeline, BatchSummary};
use layer_export::core::settings::{SettingsManager, DEFAULT_COMPRESS_SERVICE_URL};
use layer_export::domain::{ExportRequest, FileKey, NodeId, PipelineEvent};
use mockito::{Matcher, ServerGuard};
use std::sync::Arc;
use tempfile::TempDir;

const NODES_BODY: &str = r#"{"nodes": {
    "1:2": {"document": {"id": "1:2", "name": "Hero", "type": "FRAME"}},
    "0:1": {"document": {"id": "0:1", "name": "Page 1", "type": "CANVAS"}}
}}"#;

struct Fixture {
    figma: ServerGuard,
    dir: TempDir,
    client: Arc<FigmaClient>,
    settings: Arc<SettingsManager>,
    pipeline: BatchPipeline,
}

impl Fixture {
    async fn new() -> Self {
        let figma = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();

        let config = FigmaConfig {
            api_base_url: figma.url(),
            access_token: Some(secret_string("figd_test".to_string())),
            file_key: None,
            timeout_seconds: 5,
        };
        let client =
            Arc::new(FigmaClient::new(&config, FileKey::new("KEY1").unwrap()).unwrap());
        let settings = Arc::new(SettingsManager::new(
            Arc::new(FileSettingsStore::new(dir.path().join("settings.json"))),
            DEFAULT_COMPRESS_SERVICE_URL,
        ));
        let pipeline = BatchPipeline::new(
            client.clone(),
            Arc::new(HttpCompressionClient::new(5).unwrap()),
            settings.clone(),
        );

        Self {
            figma,
            dir,
            client,
            settings,
            pipeline,
        }
    }

    async fn mock_nodes(&mut self) {
        self.figma
            .mock("GET", "/files/KEY1/nodes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(NODES_BODY)
            .create_async()
            .await;
    }

    async fn mock_render(&mut self, body: &'static [u8]) {
        let image_url = format!("{}/render/1-2", self.figma.url());
        self.figma
            .mock("GET", "/images/KEY1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(format!(r#"{{"err": null, "images": {{"1:2": "{image_url}"}}}}"#))
            .create_async()
            .await;
        self.figma
            .mock("GET", "/render/1-2")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
    }

    fn out(&self) -> std::path::PathBuf {
        self.dir.path().join("out")
    }

    async fn run(&self, request: ExportRequest) -> BatchSummary {
        let sink = FileSink::new(self.out());
        self.pipeline
            .start(request)
            .unwrap()
            .drain_into(&sink, |_| {})
            .await
    }

    async fn selection(&self) -> Vec<layer_export::domain::SelectableNode> {
        self.client
            .resolve_selection(&[NodeId::new("1:2").unwrap(), NodeId::new("0:1").unwrap()])
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_export_with_compression_writes_both_files() {
    let mut fx = Fixture::new().await;
    fx.mock_nodes().await;
    fx.mock_render(b"original").await;

    let mut compressor = mockito::Server::new_async().await;
    compressor
        .mock("POST", "/compress")
        .match_body(Matcher::from(b"original".to_vec()))
        .with_status(200)
        .with_body("small")
        .create_async()
        .await;
    let endpoint = format!("{}/compress", compressor.url());

    let request = ExportRequest::new(fx.selection().await)
        .with_scale("2")
        .with_output_prefix("icons/")
        .with_compression_endpoint(endpoint.clone());
    let summary = fx.run(request).await;

    assert_eq!(
        std::fs::read(fx.out().join("icons/1_2@2x.png")).unwrap(),
        b"original".to_vec()
    );
    assert_eq!(
        std::fs::read(fx.out().join("icons/1_2@2x_compress.png")).unwrap(),
        b"small".to_vec()
    );
    assert_eq!(
        summary.delivered_names,
        vec!["icons/1_2@2x.png", "icons/1_2@2x_compress.png"]
    );
    assert_eq!(summary.warnings, vec!["Page 1 cannot be exported"]);
    assert!(summary.completed);
    assert_eq!(summary.exit_code(), 1);

    // The endpoint is remembered for the next session
    assert_eq!(fx.settings.get_config().await, endpoint);
}

#[tokio::test]
async fn test_compressed_only_with_failing_service() {
    let mut fx = Fixture::new().await;
    fx.mock_nodes().await;
    fx.mock_render(b"original").await;

    let mut compressor = mockito::Server::new_async().await;
    compressor
        .mock("POST", "/compress")
        .with_status(503)
        .create_async()
        .await;

    let items = fx.selection().await.into_iter().take(1).collect();
    let request = ExportRequest::new(items)
        .with_compression_endpoint(format!("{}/compress", compressor.url()))
        .compressed_only(true);
    let summary = fx.run(request).await;

    assert_eq!(summary.artifacts_delivered, 0);
    assert_eq!(
        summary.warnings,
        vec!["compression failed: compression service returned 503"]
    );
    assert!(summary.completed);
    assert!(!fx.out().exists());
}

#[tokio::test]
async fn test_render_failure_aborts_batch() {
    let mut fx = Fixture::new().await;
    fx.mock_nodes().await;
    fx.figma
        .mock("GET", "/images/KEY1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"err": "Render timeout", "images": {}}"#)
        .create_async()
        .await;

    let events = fx
        .pipeline
        .run_to_completion(ExportRequest::new(fx.selection().await))
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    let PipelineEvent::Fatal(message) = &events[0] else {
        panic!("expected fatal event, got {events:?}");
    };
    assert!(message.starts_with("export failed:"));
    assert_eq!(BatchSummary::from_events(&events).exit_code(), 5);
}

#[tokio::test]
async fn test_unsupported_format_renders_nothing() {
    let mut fx = Fixture::new().await;
    fx.mock_nodes().await;
    let render = fx
        .figma
        .mock("GET", "/images/KEY1")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let request = ExportRequest::new(fx.selection().await)
        .with_format("gif")
        .with_compression_endpoint("http://localhost:1/compress");
    let events = fx.pipeline.run_to_completion(request).await.unwrap();

    assert_eq!(
        events,
        vec![PipelineEvent::Fatal(
            "unsupported format: gif, use PNG or JPG".to_string()
        )]
    );
    render.assert_async().await;

    // Rejected requests do not touch the remembered endpoint
    assert_eq!(fx.settings.get_config().await, DEFAULT_COMPRESS_SERVICE_URL);
}

#[tokio::test]
async fn test_jpg_export_without_compression() {
    let mut fx = Fixture::new().await;
    fx.mock_nodes().await;
    fx.mock_render(b"\xff\xd8jpeg").await;

    let items = fx.selection().await.into_iter().take(1).collect();
    let request = ExportRequest::new(items).with_format("jpg").with_scale("0");
    let summary = fx.run(request).await;

    assert_eq!(summary.delivered_names, vec!["1_2@3x.jpg"]);
    assert!(summary.is_successful());
    assert_eq!(summary.exit_code(), 0);
}
