//! Presentation files.
//!
//! A presentation directory is either a local path or an `http(s)` base URL.
//! The manifest sits at its root and every slide has a directory of its own,
//! named by the manifest's `slideDict`.

use super::env::SlideLoader;
use super::error::ShellError;
use crate::manifest::{Manifest, ManifestError};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const SLIDE_CONTENT_FILE: &str = "image.svg";

/// Join path segments with `/`, ignoring redundant separators.
pub fn join(base: &str, segments: &[&str]) -> String {
    let mut out = base.trim_end_matches('/').to_string();
    if out.is_empty() && base.starts_with('/') {
        out.push('/');
    }
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

/// Location of `file` inside the directory of `slide`.
///
/// ```rust
/// use slidecast::core::StepNode;
/// use slidecast::effects::files::file_name;
/// use slidecast::manifest::Manifest;
///
/// let manifest = Manifest {
///     presentation: "Demo".into(),
///     tree: StepNode::new().slide("intro"),
///     slide_dict: [("intro".to_string(), "slides/intro".to_string())].into(),
///     live: Vec::new(),
/// };
/// assert_eq!(
///     file_name("talk/", &manifest, "intro", "image.svg").as_deref(),
///     Some("talk/slides/intro/image.svg")
/// );
/// assert_eq!(file_name("talk", &manifest, "missing", "image.svg"), None);
/// ```
pub fn file_name(dir: &str, manifest: &Manifest, slide: &str, file: &str) -> Option<String> {
    manifest
        .slide_dir(slide)
        .map(|slide_dir| join(dir, &[slide_dir, file]))
}

pub fn manifest_location(dir: &str) -> String {
    join(dir, &[MANIFEST_FILE])
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read a local file or fetch a URL.
pub async fn fetch_text(client: &Client, location: &str) -> Result<String, String> {
    if is_remote(location) {
        let response = client
            .get(location)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP status {status}"));
        }
        response.text().await.map_err(|e| e.to_string())
    } else {
        tokio::fs::read_to_string(location)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Load and validate `<dir>/manifest.json`.
pub async fn load_manifest(client: &Client, dir: &str) -> Result<Manifest, ManifestError> {
    let location = manifest_location(dir);
    debug!(%location, "loading manifest");
    let text = fetch_text(client, &location)
        .await
        .map_err(|reason| ManifestError::Unreachable {
            location: location.clone(),
            reason,
        })?;
    Manifest::from_json(&location, &text)
}

/// [`SlideLoader`] backed by [`fetch_text`].
#[derive(Clone, Debug)]
pub struct FileLoader {
    client: Client,
}

impl FileLoader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Loader whose remote fetches give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client))
    }
}

impl SlideLoader for FileLoader {
    fn load(&self, location: String) -> BoxFuture<'static, Result<String, ShellError>> {
        let client = self.client.clone();
        async move {
            fetch_text(&client, &location)
                .await
                .map_err(|reason| ShellError::SlideLoad { location, reason })
        }
        .boxed()
    }
}
