use std::{path::PathBuf, sync::Arc};

use json_dotpath::DotPaths;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, instrument, trace};

use crate::{
    error::LoadError,
    state::{
        video::{VideoCollection, VideoRecord},
        State,
    },
};

/// Fetches a video list with a single GET request.
#[instrument]
pub async fn fetch_collection(url: &str) -> Result<VideoCollection, LoadError> {
    let network = |source: reqwest::Error| LoadError::Network {
        url: url.to_owned(),
        source,
    };

    let response_text = Client::new()
        .get(url)
        .send()
        .await
        .map_err(network)?
        .error_for_status()
        .map_err(network)?
        .text()
        .await
        .map_err(network)?;
    trace!(video_list_response_text = %response_text);

    parse_collection(&response_text)
}

/// Reads a video list from a local file.
#[instrument]
pub async fn read_collection(path: PathBuf) -> Result<VideoCollection, LoadError> {
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| LoadError::File { path, source })?;
    trace!(video_list_file_text = %text);

    parse_collection(&text)
}

/// Decodes `[{ "url": "...", "title": "..." }, ...]`. Extra fields are ignored.
pub fn parse_collection(text: &str) -> Result<VideoCollection, LoadError> {
    // Parsing in a separate step for easier JSON decode debugging.
    let data: Value = serde_json::from_str(text)?;
    debug!("video list data: {data:#?}");

    let entries = data
        .as_array()
        .ok_or_else(|| LoadError::Parse("expected an array of videos".to_owned()))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if !entry.is_object() {
                return Err(LoadError::Parse(format!("video {i} is not an object")));
            }

            let url = entry
                .dot_get::<String>("url")?
                .ok_or_else(|| LoadError::Parse(format!("video {i} has no 'url'")))?;
            let title = entry
                .dot_get::<String>("title")?
                .ok_or_else(|| LoadError::Parse(format!("video {i} has no 'title'")))?;

            Ok(VideoRecord::new(url, title))
        })
        .collect()
}

/// Fetches from `url` and shows the result. Failures are logged, the wall stays as it was.
///
/// `ticket` must be taken from `State::next_ticket` when the load is requested.
#[instrument(skip(state))]
pub async fn load_from_url(state: Arc<State>, ticket: u64, url: String) {
    info!("Fetch video list...");
    if state.is_latest_ticket(ticket) {
        state.set_stage_fetching(url.as_str()).await;
    }

    let result = fetch_collection(&url).await;
    apply(&state, ticket, result).await;
}

/// Reads `path` and shows the result. Failures are logged, the wall stays as it was.
#[instrument(skip(state))]
pub async fn load_from_file(state: Arc<State>, ticket: u64, path: PathBuf) {
    info!("Read video list...");
    if state.is_latest_ticket(ticket) {
        state
            .set_stage_reading(path.display().to_string())
            .await;
    }

    let result = read_collection(path).await;
    apply(&state, ticket, result).await;
}

async fn apply(state: &State, ticket: u64, result: Result<VideoCollection, LoadError>) {
    match result {
        Ok(collection) => {
            let count = collection.len();
            let applied = state.wall_mut().await.apply_load(ticket, collection);

            // A newer load still in flight keeps its stage.
            if applied && state.is_latest_ticket(ticket) {
                info!("Showing {count} videos");
                state.set_stage_loaded(count).await;
            }
        }
        Err(e) => {
            error!("Error loading video list: {e}");

            if state.is_latest_ticket(ticket) {
                state.set_stage_failed(e.to_string()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;
    use crate::state::{wall::WallConfig, Stage};

    const VIDEOS: &str = r#"[
        { "url": "https://cams.example/lobby", "title": "Lobby", "id": 7 },
        { "url": "https://cams.example/yard", "title": "Yard" },
        { "url": "https://cams.example/gate", "title": "Gate" }
    ]"#;

    /// Answers a single request with the given status and body.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/videos.json")
    }

    async fn unused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/videos.json")
    }

    fn json_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn state() -> Arc<State> {
        Arc::new(State::new(WallConfig::default()))
    }

    #[test]
    fn parses_records_in_order() {
        let collection = parse_collection(VIDEOS).unwrap();

        let records = collection.slice(0..collection.len());
        let titles: Vec<&str> = records.iter().map(VideoRecord::title).collect();
        assert_eq!(titles, ["Lobby", "Yard", "Gate"]);
        assert_eq!(records[0].url(), "https://cams.example/lobby");
    }

    #[test]
    fn rejects_malformed_payloads() {
        for payload in [
            "",
            "{ not json",
            r#"{ "url": "https://cams.example/a", "title": "A" }"#,
            r#"[{ "url": "https://cams.example/a" }]"#,
            r#"[{ "url": 3, "title": "A" }]"#,
            r#"["https://cams.example/a"]"#,
        ] {
            assert!(
                matches!(parse_collection(payload), Err(LoadError::Parse(_))),
                "payload {payload:?}"
            );
        }
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_collection("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetches_collection() {
        let url = serve_once("200 OK", VIDEOS).await;
        assert_eq!(fetch_collection(&url).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn bad_status_is_network_error() {
        let url = serve_once("404 Not Found", "[]").await;
        assert!(matches!(
            fetch_collection(&url).await,
            Err(LoadError::Network { .. })
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let url = unused_url().await;
        assert!(matches!(
            fetch_collection(&url).await,
            Err(LoadError::Network { .. })
        ));
    }

    #[tokio::test]
    async fn reads_collection_from_file() {
        let file = json_file(VIDEOS);
        let collection = read_collection(file.path().to_owned()).await.unwrap();
        assert_eq!(collection.len(), 3);
    }

    #[tokio::test]
    async fn missing_file_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_collection(dir.path().join("missing.json")).await,
            Err(LoadError::File { .. })
        ));
    }

    #[tokio::test]
    async fn successful_load_replaces_and_renders() {
        let state = state();
        let url = serve_once("200 OK", VIDEOS).await;

        load_from_url(state.clone(), state.next_ticket(), url).await;

        let wall = state.wall().await;
        assert_eq!(wall.collection().len(), 3);
        assert_eq!(wall.view().frames.len(), 3);
        assert_eq!(wall.view().status, "Page 1 of 1");
        drop(wall);
        assert_eq!(*state.stage().await, Stage::Loaded(3));
    }

    #[tokio::test]
    async fn malformed_file_leaves_wall_untouched() {
        let state = state();
        let good = json_file(VIDEOS);
        load_from_file(state.clone(), state.next_ticket(), good.path().to_owned()).await;
        let view_before = state.wall().await.view().clone();

        let bad = json_file("[{ \"url\": ");
        load_from_file(state.clone(), state.next_ticket(), bad.path().to_owned()).await;

        let wall = state.wall().await;
        assert_eq!(wall.collection().len(), 3);
        assert_eq!(*wall.view(), view_before);
        drop(wall);
        assert!(matches!(*state.stage().await, Stage::Failed(_)));
    }

    #[tokio::test]
    async fn failed_fetch_leaves_wall_untouched() {
        let state = state();
        let file = json_file(VIDEOS);
        load_from_file(state.clone(), state.next_ticket(), file.path().to_owned()).await;

        let url = serve_once("500 Internal Server Error", "").await;
        load_from_url(state.clone(), state.next_ticket(), url).await;
        load_from_url(state.clone(), state.next_ticket(), unused_url().await).await;

        let wall = state.wall().await;
        assert_eq!(wall.collection().len(), 3);
        assert_eq!(wall.page().current(), 1);
    }

    #[tokio::test]
    async fn stale_failure_keeps_stage() {
        let state = state();
        let older = state.next_ticket();
        let newer = state.next_ticket();

        apply(&state, newer, parse_collection(VIDEOS)).await;
        apply(&state, older, Err(LoadError::Parse("late".to_owned()))).await;

        assert_eq!(*state.stage().await, Stage::Loaded(3));
        assert_eq!(state.wall().await.collection().len(), 3);
    }

    #[tokio::test]
    async fn older_load_does_not_claim_loaded_stage() {
        let state = state();
        let older = state.next_ticket();
        let newer = state.next_ticket();
        state.set_stage_fetching("https://cams.example/newer.json").await;

        apply(&state, older, parse_collection(VIDEOS)).await;

        // Shown until the newer load lands, but the fetch is still reported.
        assert_eq!(state.wall().await.collection().len(), 3);
        assert_eq!(
            *state.stage().await,
            Stage::Fetching("https://cams.example/newer.json".to_owned())
        );

        apply(&state, newer, parse_collection("[]")).await;
        assert_eq!(*state.stage().await, Stage::Loaded(0));
    }

    #[tokio::test]
    async fn superseded_load_does_not_report_progress() {
        let state = state();
        let older = state.next_ticket();
        let newer = state.next_ticket();
        let file = json_file(VIDEOS);

        load_from_file(state.clone(), newer, file.path().to_owned()).await;
        load_from_file(state.clone(), older, file.path().to_owned()).await;

        assert_eq!(*state.stage().await, Stage::Loaded(3));
    }
}
