use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The canonical in-progress article record.
///
/// Persisted opportunistically while the user writes; the submission boundary
/// carries the authoritative copy, so nothing here is load-bearing for
/// correctness beyond restoring the form after a reload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftRecord {
    pub title: String,
    pub slug: String,
    pub small_description: String,
    /// Comma-separated free text entered by the author
    pub keywords: String,
    pub cover_image_url: Option<String>,
    /// Scope key: a draft is only ever restored into the same site
    pub site_id: String,
    /// Opaque content-tree document owned by the external editor
    pub content: Option<Value>,
    pub last_updated: i64,
}

impl DraftRecord {
    /// A pristine record for the given authoring scope
    pub fn empty(site_id: &str) -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            small_description: String::new(),
            keywords: String::new(),
            cover_image_url: None,
            site_id: site_id.to_string(),
            content: None,
            last_updated: 0,
        }
    }

    /// True when there is nothing worth persisting: no title, description,
    /// cover image, or content
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.small_description.is_empty()
            && self.cover_image_url.is_none()
            && self.content.is_none()
    }
}

/// Partial update for a draft; fields left as None are preserved on merge,
/// so saving just a slug never erases a previously saved cover image.
///
/// The cover image is the one field the author can remove again, so its
/// patch entry is doubly optional: `None` leaves the stored value alone,
/// `Some(None)` clears it, `Some(Some(url))` sets it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub small_description: Option<String>,
    pub keywords: Option<String>,
    pub cover_image_url: Option<Option<String>>,
    pub site_id: Option<String>,
    pub content: Option<Value>,
}

impl DraftPatch {
    /// Snapshot a full record into a patch (used by autosave, which always
    /// carries complete form state)
    pub fn from_record(record: &DraftRecord) -> Self {
        Self {
            title: Some(record.title.clone()),
            slug: Some(record.slug.clone()),
            small_description: Some(record.small_description.clone()),
            keywords: Some(record.keywords.clone()),
            cover_image_url: Some(record.cover_image_url.clone()),
            site_id: Some(record.site_id.clone()),
            content: record.content.clone(),
        }
    }

    /// Apply this patch on top of an existing record, stamping last_updated
    pub fn apply_to(&self, base: &mut DraftRecord) {
        if let Some(title) = &self.title {
            base.title = title.clone();
        }
        if let Some(slug) = &self.slug {
            base.slug = slug.clone();
        }
        if let Some(desc) = &self.small_description {
            base.small_description = desc.clone();
        }
        if let Some(keywords) = &self.keywords {
            base.keywords = keywords.clone();
        }
        if let Some(cover) = &self.cover_image_url {
            base.cover_image_url = cover.clone();
        }
        if let Some(site_id) = &self.site_id {
            base.site_id = site_id.clone();
        }
        if let Some(content) = &self.content {
            base.content = Some(content.clone());
        }
        base.last_updated = chrono::Utc::now().timestamp_millis();
    }
}
