use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Descriptor for the audio track attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFile {
    /// Unique identifier
    pub id: Uuid,
    /// User-facing display name (usually the imported file name).
    pub name: String,
    /// Reference into the asset store.
    pub source_ref: String,
    /// Track duration in seconds, probed at import time.
    #[serde(default)]
    pub duration: f64,
}

impl AudioFile {
    /// Create a descriptor for a freshly imported track.
    pub fn new(name: impl Into<String>, source_ref: impl Into<String>, duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source_ref: source_ref.into(),
            duration: duration.max(0.0),
        }
    }
}
