use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// An image uploaded during the current authoring session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedImage {
    pub id: String,
    pub url: String,
    pub uploaded_at: i64,
}

/// Session-scoped record of uploaded images.
///
/// Passed by handle into the components that need it; the submission
/// boundary consumes the manifest, and `clear` runs whenever the draft is
/// cleared so orphaned uploads can be reaped server-side.
#[derive(Clone, Default)]
pub struct UploadTracker {
    images: Arc<Mutex<Vec<UploadedImage>>>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an uploaded image URL
    pub fn add(&self, url: &str) -> UploadedImage {
        let image = UploadedImage {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.to_string(),
            uploaded_at: chrono::Utc::now().timestamp_millis(),
        };
        self.images.lock().unwrap().push(image.clone());
        image
    }

    /// Snapshot of every image uploaded this session, in upload order
    pub fn manifest(&self) -> Vec<UploadedImage> {
        self.images.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.images.lock().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.images.lock().unwrap().clear();
    }
}

/// Content-image manifest as it arrives from the boundary: historically
/// either a JSON string or an already-parsed list. Normalized exactly once;
/// the rest of the engine only ever sees `Vec<String>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentImages {
    Parsed(Vec<String>),
    Raw(String),
}

impl ContentImages {
    /// Collapse both shapes into a plain URL list. A raw payload that fails
    /// to parse is logged and treated as empty.
    pub fn normalize(self) -> Vec<String> {
        match self {
            ContentImages::Parsed(urls) => urls,
            ContentImages::Raw(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::warn!("discarding malformed content-image payload: {}", e);
                    Vec::new()
                }
            },
        }
    }
}
