//! Messages exchanged with the companion server.

use crate::manifest::LiveRecording;
use serde::{Deserialize, Serialize};

/// JSON body posted to the server. The `type` field selects the handler.
///
/// ```rust
/// use slidecast::sync::ServerMessage;
///
/// let json = serde_json::to_value(ServerMessage::Probe).unwrap();
/// assert_eq!(json["type"], "probe");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Connectivity check sent once at startup.
    Probe,
    /// A committed recording to append to the manifest.
    Wav {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        presentation: Option<String>,
        recording: LiveRecording,
    },
    /// Slide data produced by an authoring tool; forwarded as is.
    Slides {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        presentation: Option<String>,
        slides: serde_json::Value,
    },
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Probe => "probe",
            ServerMessage::Wav { .. } => "wav",
            ServerMessage::Slides { .. } => "slides",
        }
    }

    /// Attach the presentation name to messages that belong to one.
    pub fn stamp(&mut self, name: &str) {
        match self {
            ServerMessage::Wav { presentation, .. } | ServerMessage::Slides { presentation, .. } => {
                *presentation = Some(name.to_string())
            }
            ServerMessage::Probe => {}
        }
    }
}
