use std::sync::Arc;

use super::types::{DraftPatch, DraftRecord};
use crate::store::KeyValueStore;

/// Storage key for the serialized draft record
pub const DRAFT_KEY: &str = "article_draft";
/// Storage key for the rendered-HTML preview cache kept alongside the draft
pub const HTML_CACHE_KEY: &str = "article_draft_html";
/// Storage key for the uploaded-image tracking list
pub const UPLOADED_IMAGES_KEY: &str = "article_uploaded_images";

/// Durable, scoped persistence for the in-progress article.
///
/// Persistence is an optimization, not a correctness requirement: every
/// failure path degrades to "nothing persisted this cycle" and is logged,
/// never surfaced as an error to the authoring session.
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted draft for the given site scope.
    ///
    /// Returns None when nothing is stored, when the stored payload fails to
    /// parse (logged, treated as absent), or when the stored record belongs
    /// to a different site. A scope mismatch is not an error; it is simply
    /// "no draft for this site."
    pub fn load(&self, site_id: &str) -> Option<DraftRecord> {
        let raw = match self.store.get(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("draft load failed: {}", e);
                return None;
            }
        };

        let record: DraftRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("discarding malformed stored draft: {}", e);
                return None;
            }
        };

        if record.site_id != site_id {
            tracing::debug!(
                "stored draft belongs to site {}, not {}; ignoring",
                record.site_id,
                site_id
            );
            return None;
        }

        Some(record)
    }

    /// Merge the patch into any existing stored record and persist it.
    ///
    /// Returns false without writing when the merged record is entirely empty
    /// (guard against persisting a pristine form) or when the store rejects
    /// the write (quota, serialization), which is logged.
    pub fn save(&self, patch: &DraftPatch) -> bool {
        let site_id = patch.site_id.clone().unwrap_or_default();

        // Merging only happens within the same scope; a stored draft for a
        // different site must never bleed into this one
        let mut record = self
            .load(&site_id)
            .unwrap_or_else(|| DraftRecord::empty(&site_id));
        patch.apply_to(&mut record);

        if record.is_empty() {
            return false;
        }

        let serialized = match serde_json::to_string(&record) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("draft serialization failed: {}", e);
                return false;
            }
        };

        match self.store.set(DRAFT_KEY, &serialized) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("draft save failed: {}", e);
                false
            }
        }
    }

    /// Delete the persisted draft and all side storage. Idempotent.
    pub fn clear(&self) {
        for key in [DRAFT_KEY, HTML_CACHE_KEY, UPLOADED_IMAGES_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("failed to clear {}: {}", key, e);
            }
        }
    }

}
