use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::autosave::AUTOSAVE_DEBOUNCE_MS;
use crate::draft::{DraftAutosave, DraftPatch, DraftRecord, DraftStore};
use crate::seo::{self, SeoReport};
use crate::session::UploadTracker;
use crate::slug::validator::SLUG_DEBOUNCE_MS;
use crate::slug::{normalize_slug, SlugAuthority, SlugStatus, SlugValidationState, SlugValidator};
use crate::store::KeyValueStore;

/// Minimum title length to leave the basic-info step
const MIN_TITLE_LENGTH: usize = 3;
/// Minimum description length to leave the basic-info step
const MIN_DESCRIPTION_LENGTH: usize = 10;

/// The authoring surface's two steps
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    BasicInfo,
    Content,
}

/// Construction options for an authoring session
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Clear any persisted draft before the first read and suppress
    /// autosave until the user makes a deliberate edit. The host is
    /// responsible for stripping the triggering signal from the URL so a
    /// refresh does not repeat the reset.
    pub start_fresh: bool,
    pub autosave_delay: Duration,
    pub slug_debounce: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            start_fresh: false,
            autosave_delay: Duration::from_millis(AUTOSAVE_DEBOUNCE_MS),
            slug_debounce: Duration::from_millis(SLUG_DEBOUNCE_MS),
        }
    }
}

/// Top-level controller for the article-authoring flow.
///
/// Owns the canonical draft record and sequences the two steps; every field
/// edit updates the record, reroutes the slug through the availability
/// validator, recomputes the SEO report, and schedules a debounced autosave.
/// Forward navigation is gated on field lengths plus a confirmed-available
/// slug; backward navigation is always permitted.
pub struct AuthoringForm {
    site_id: String,
    record: Mutex<DraftRecord>,
    step: Mutex<FormStep>,
    report: Mutex<SeoReport>,
    validator: SlugValidator,
    autosave: DraftAutosave,
    draft_store: Arc<DraftStore>,
    uploads: UploadTracker,
    /// Set for freshly cleared sessions; autosave stays off until the user
    /// makes a deliberate edit, so a blank form never re-persists itself
    fresh: AtomicBool,
}

impl AuthoringForm {
    pub fn new(
        site_id: &str,
        store: Arc<dyn KeyValueStore>,
        authority: Arc<dyn SlugAuthority>,
        options: FormOptions,
    ) -> Self {
        let draft_store = Arc::new(DraftStore::new(store));

        let record = if options.start_fresh {
            draft_store.clear();
            DraftRecord::empty(site_id)
        } else {
            draft_store
                .load(site_id)
                .unwrap_or_else(|| DraftRecord::empty(site_id))
        };

        let report = Mutex::new(seo::analyze(
            &record.title,
            &record.small_description,
            &record.keywords,
            record.content.as_ref(),
        ));

        Self {
            site_id: site_id.to_string(),
            record: Mutex::new(record),
            step: Mutex::new(FormStep::BasicInfo),
            report,
            validator: SlugValidator::with_debounce(authority, site_id, options.slug_debounce),
            autosave: DraftAutosave::with_delay(draft_store.clone(), options.autosave_delay),
            draft_store,
            uploads: UploadTracker::new(),
            fresh: AtomicBool::new(options.start_fresh),
        }
    }

    // ==================== Reactive Getters ====================

    pub fn record(&self) -> DraftRecord {
        self.record.lock().unwrap().clone()
    }

    pub fn slug_state(&self) -> SlugValidationState {
        self.validator.state()
    }

    pub fn seo_report(&self) -> SeoReport {
        self.report.lock().unwrap().clone()
    }

    pub fn step(&self) -> FormStep {
        *self.step.lock().unwrap()
    }

    pub fn uploads(&self) -> UploadTracker {
        self.uploads.clone()
    }

    // ==================== Field Mutations ====================

    pub fn set_title(&self, title: &str) {
        self.record.lock().unwrap().title = title.to_string();
        self.after_edit(true);
    }

    /// Route the raw input through the validator and adopt the canonical
    /// form; returns the formatted slug for display
    pub fn set_slug(&self, raw: &str) -> String {
        let formatted = self.validator.on_candidate_change(raw);
        self.record.lock().unwrap().slug = formatted.clone();
        self.after_edit(true);
        formatted
    }

    pub fn set_description(&self, description: &str) {
        self.record.lock().unwrap().small_description = description.to_string();
        self.after_edit(true);
    }

    pub fn set_keywords(&self, keywords: &str) {
        self.record.lock().unwrap().keywords = keywords.to_string();
        self.after_edit(true);
    }

    pub fn set_cover_image(&self, url: Option<&str>) {
        self.record.lock().unwrap().cover_image_url = url.map(String::from);
        self.after_edit(true);
    }

    /// Accept a content-tree emission from the external editor. An emission
    /// carrying no text is not treated as a deliberate edit: editors emit
    /// their (empty) initial document on mount, and that must not lift the
    /// fresh-session autosave suppression.
    pub fn set_content(&self, content: Value) {
        let deliberate = !seo::collect_text(&content).trim().is_empty();
        self.record.lock().unwrap().content = Some(content);
        self.after_edit(deliberate);
    }

    /// Re-run slug validation for whatever slug the record currently holds
    /// (the host calls this once after restoring a draft)
    pub fn revalidate_slug(&self) {
        let slug = self.record.lock().unwrap().slug.clone();
        self.validator.on_candidate_change(&slug);
    }

    /// Derive a slug from the current title, validating immediately. If the
    /// authority reports it taken, exactly one retry with a random numeric
    /// suffix is attempted; the retried candidate is adopted either way.
    pub async fn generate_slug_from_title(&self) -> String {
        let title = self.record.lock().unwrap().title.clone();
        let base = normalize_slug(&title);

        let status = self.validator.check_now(&base).await;
        let chosen = if status == SlugStatus::Unavailable {
            let suffixed = format!("{}-{}", base, rand::thread_rng().gen_range(100..1000));
            self.validator.check_now(&suffixed).await;
            suffixed
        } else {
            base
        };

        self.record.lock().unwrap().slug = chosen.clone();
        self.after_edit(true);
        chosen
    }

    // ==================== Step Navigation ====================

    /// Advance from basic info to content. Permitted only when the title,
    /// slug, and description meet their minimum lengths and the validator
    /// has confirmed the current slug available.
    pub fn go_next(&self) -> bool {
        let mut step = self.step.lock().unwrap();
        if *step == FormStep::Content {
            return false;
        }

        let record = self.record.lock().unwrap();
        let slug_state = self.validator.state();

        let fields_ok = record.title.chars().count() >= MIN_TITLE_LENGTH
            && record.slug.chars().count() >= crate::slug::MIN_SLUG_LENGTH
            && record.small_description.chars().count() >= MIN_DESCRIPTION_LENGTH;
        let slug_ok =
            slug_state.status == SlugStatus::Available && slug_state.candidate == record.slug;

        if fields_ok && slug_ok {
            *step = FormStep::Content;
            true
        } else {
            tracing::debug!(
                "step advance rejected (fields_ok={}, slug status {:?})",
                fields_ok,
                slug_state.status
            );
            false
        }
    }

    /// Return to basic info; always permitted
    pub fn go_back(&self) -> bool {
        *self.step.lock().unwrap() = FormStep::BasicInfo;
        true
    }

    // ==================== Persistence Lifecycle ====================

    /// Persist the current form state immediately
    pub fn save_draft_now(&self) -> bool {
        let patch = DraftPatch::from_record(&self.record.lock().unwrap());
        self.autosave.schedule(patch);
        self.autosave.flush()
    }

    /// Flush pending work before teardown (the unload/unmount path)
    pub fn shutdown(&self) {
        self.validator.cancel();
        if self.fresh.load(Ordering::SeqCst) {
            self.autosave.cancel();
        } else {
            self.autosave.flush();
        }
    }

    /// Discard everything and start a new article in the same scope
    pub fn reset_for_new_article(&self) {
        self.autosave.cancel();
        self.autosave.reset_dedup();
        self.draft_store.clear();
        self.uploads.clear();
        self.validator.on_candidate_change("");

        *self.record.lock().unwrap() = DraftRecord::empty(&self.site_id);
        *self.step.lock().unwrap() = FormStep::BasicInfo;
        self.recompute_report();
        self.fresh.store(true, Ordering::SeqCst);
    }

    /// The external submission succeeded; the persisted draft and the
    /// upload manifest are no longer needed
    pub fn complete(&self) {
        self.autosave.cancel();
        self.autosave.reset_dedup();
        self.draft_store.clear();
        self.uploads.clear();
    }

    // ==================== Internals ====================

    fn after_edit(&self, deliberate: bool) {
        self.recompute_report();

        if deliberate {
            self.fresh.store(false, Ordering::SeqCst);
        }
        if self.fresh.load(Ordering::SeqCst) {
            return;
        }

        let patch = DraftPatch::from_record(&self.record.lock().unwrap());
        self.autosave.schedule(patch);
    }

    fn recompute_report(&self) {
        let record = self.record.lock().unwrap();
        let report = seo::analyze(
            &record.title,
            &record.small_description,
            &record.keywords,
            record.content.as_ref(),
        );
        drop(record);
        *self.report.lock().unwrap() = report;
    }
}
