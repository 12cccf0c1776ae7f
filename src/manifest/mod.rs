//! Presentation manifest.
//!
//! The manifest is the top-level descriptor of a presentation: its name, the
//! step tree, where each slide lives, and the recordings made so far. It is
//! loaded once at startup and never mutated afterwards.
//!
//! ```json
//! {
//!   "presentation": "Automata",
//!   "tree": { "slide": "intro", "children": [ { "name": "definition" } ] },
//!   "slideDict": { "intro": "intro" },
//!   "live": [
//!     {
//!       "mode": "timed",
//!       "length": 4.0,
//!       "sound": "live/0.webm",
//!       "steps": [ { "step": [], "start": 0.0, "duration": 1.5 } ]
//!     }
//!   ]
//! }
//! ```

pub mod error;
pub mod validate;

pub use error::{ManifestError, ManifestViolation};
pub use validate::validate;

use crate::core::{CaptureMode, StepGraph, StepNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub presentation: String,
    pub tree: StepNode,
    #[serde(rename = "slideDict", default)]
    pub slide_dict: BTreeMap<String, String>,
    #[serde(default)]
    pub live: Vec<LiveRecording>,
}

impl Manifest {
    /// Parse and validate a manifest.
    pub fn from_json(location: &str, json: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest =
            serde_json::from_str(json).map_err(|e| ManifestError::Malformed {
                location: location.to_string(),
                reason: e.to_string(),
            })?;
        validate(&manifest)?;
        Ok(manifest)
    }

    pub fn graph(&self) -> StepGraph {
        StepGraph::from_tree(&self.tree)
    }

    /// Directory of a slide relative to the presentation directory.
    pub fn slide_dir(&self, slide: &str) -> Option<&str> {
        self.slide_dict.get(slide).map(String::as_str)
    }

    /// Recording selected by a deep-link index, if it exists.
    pub fn recording(&self, index: Option<usize>) -> Option<&LiveRecording> {
        index.and_then(|i| self.live.get(i))
    }
}

/// A persisted narration, as listed in the manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRecording {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default = "default_mode")]
    pub mode: CaptureMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    /// Total length in seconds.
    #[serde(default)]
    pub length: f64,
    /// Reference to the audio payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    pub steps: Vec<RecordedStep>,
}

fn default_mode() -> CaptureMode {
    CaptureMode::Timed
}

/// One step of a recording. Times are in seconds from the start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedStep {
    pub step: Vec<usize>,
    pub start: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "presentation": "Automata",
        "tree": {
            "slide": "intro",
            "children": [
                { "name": "definition" },
                { "slide": "proof", "children": [ { "name": "lemma" } ] }
            ]
        },
        "slideDict": { "intro": "intro", "proof": "sub/proof" },
        "live": [
            {
                "length": 3.0,
                "sound": "live/0.webm",
                "steps": [
                    { "step": [], "start": 0.0, "duration": 1.0 },
                    { "step": [1], "start": 1.0, "duration": 2.0 }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_sample_manifest() {
        let manifest = Manifest::from_json("manifest.json", SAMPLE).unwrap();
        assert_eq!(manifest.presentation, "Automata");
        assert_eq!(manifest.slide_dir("proof"), Some("sub/proof"));
        assert_eq!(manifest.live.len(), 1);
        assert_eq!(manifest.live[0].mode, CaptureMode::Timed);
        assert_eq!(manifest.graph().len(), 4);
    }

    #[test]
    fn recording_index_out_of_range_is_none() {
        let manifest = Manifest::from_json("manifest.json", SAMPLE).unwrap();
        assert!(manifest.recording(Some(0)).is_some());
        assert!(manifest.recording(Some(1)).is_none());
        assert!(manifest.recording(None).is_none());
    }

    #[test]
    fn stale_recording_still_loads() {
        let json = SAMPLE.replace(r#""step": [1]"#, r#""step": [3]"#);
        let manifest = Manifest::from_json("manifest.json", &json).unwrap();
        assert_eq!(manifest.live[0].steps[1].step, vec![3]);
    }

    #[test]
    fn malformed_json_is_reported_with_location() {
        let err = Manifest::from_json("slides/manifest.json", "{").unwrap_err();
        match err {
            ManifestError::Malformed { location, .. } => {
                assert_eq!(location, "slides/manifest.json")
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn recording_round_trips_camel_case() {
        let recording = LiveRecording {
            id: Some(Uuid::new_v4()),
            mode: CaptureMode::Live,
            recorded_at: Some(Utc::now()),
            length: 2.5,
            sound: None,
            steps: vec![RecordedStep {
                step: vec![0],
                start: 0.0,
                duration: None,
            }],
        };
        let json = serde_json::to_value(&recording).unwrap();
        assert!(json.get("recordedAt").is_some());
        assert_eq!(json["mode"], "live");
        let back: LiveRecording = serde_json::from_value(json).unwrap();
        assert_eq!(back, recording);
    }
}
