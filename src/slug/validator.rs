use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use regex::Regex;
use tokio::task::JoinHandle;

use super::authority::SlugAuthority;
use super::types::{
    normalize_slug, slug_pattern, validate_slug_format, SlugStatus, SlugValidationState,
};

/// Quiet period after the last slug edit before the remote check fires
pub const SLUG_DEBOUNCE_MS: u64 = 500;

const TAKEN_MESSAGE: &str = "This slug is already taken";
const CHECK_FAILED_MESSAGE: &str = "Error checking slug availability";

/// Debounced, race-safe availability validator for candidate slugs.
///
/// Every scheduled check carries a sequence number assigned at schedule
/// time; a resolution is applied to shared state only while its number is
/// still the most recent one issued. A response for an older candidate can
/// therefore never overwrite the state for a newer one, no matter how the
/// network reorders completions.
#[derive(Clone)]
pub struct SlugValidator {
    authority: Arc<dyn SlugAuthority>,
    site_id: String,
    debounce: Duration,
    pattern: Regex,
    state: Arc<Mutex<SlugValidationState>>,
    seq: Arc<AtomicU64>,
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
    /// Strings confirmed Available this session; re-validating an identical
    /// string short-circuits without a remote call
    confirmed: Arc<Mutex<HashSet<String>>>,
}

impl SlugValidator {
    pub fn new(authority: Arc<dyn SlugAuthority>, site_id: &str) -> Self {
        Self::with_debounce(authority, site_id, Duration::from_millis(SLUG_DEBOUNCE_MS))
    }

    pub fn with_debounce(
        authority: Arc<dyn SlugAuthority>,
        site_id: &str,
        debounce: Duration,
    ) -> Self {
        Self {
            authority,
            site_id: site_id.to_string(),
            debounce,
            pattern: slug_pattern(),
            state: Arc::new(Mutex::new(SlugValidationState::default())),
            seq: Arc::new(AtomicU64::new(0)),
            timer: Arc::new(Mutex::new(None)),
            confirmed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Current validation state
    pub fn state(&self) -> SlugValidationState {
        self.state.lock().unwrap().clone()
    }

    /// Handle an edit to the candidate slug.
    ///
    /// Normalizes the input and returns the canonical form for display.
    /// Any pending debounce timer is cancelled and any in-flight check is
    /// marked stale; format failures short-circuit to Invalid without a
    /// network round trip, and session-confirmed strings short-circuit to
    /// Available.
    pub fn on_candidate_change(&self, raw: &str) -> String {
        let slug = normalize_slug(raw);
        let seq = self.supersede();

        if slug.is_empty() {
            self.set_state(SlugValidationState::idle(&slug));
            return slug;
        }

        if let Err(message) = validate_slug_format(&slug, &self.pattern) {
            self.set_state(SlugValidationState {
                candidate: slug.clone(),
                status: SlugStatus::Invalid,
                error_message: Some(message),
            });
            return slug;
        }

        if self.confirmed.lock().unwrap().contains(&slug) {
            self.set_state(SlugValidationState {
                candidate: slug.clone(),
                status: SlugStatus::Available,
                error_message: None,
            });
            return slug;
        }

        self.set_state(SlugValidationState::idle(&slug));

        let validator = self.clone();
        let candidate = slug.clone();
        let debounce = self.debounce;
        let mut timer = self.timer.lock().unwrap();
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if validator.is_current(seq) {
                validator.run_check(&candidate, seq).await;
            }
        }));

        slug
    }

    /// Validate a slug immediately, bypassing the debounce window (used by
    /// "generate slug from title"). Returns the status computed for this
    /// call; shared state is only updated if the call was not superseded.
    pub async fn check_now(&self, slug: &str) -> SlugStatus {
        let slug = normalize_slug(slug);
        let seq = self.supersede();

        if let Err(message) = validate_slug_format(&slug, &self.pattern) {
            self.apply_if_current(
                seq,
                SlugValidationState {
                    candidate: slug,
                    status: SlugStatus::Invalid,
                    error_message: Some(message),
                },
            );
            return SlugStatus::Invalid;
        }

        if self.confirmed.lock().unwrap().contains(&slug) {
            self.apply_if_current(
                seq,
                SlugValidationState {
                    candidate: slug,
                    status: SlugStatus::Available,
                    error_message: None,
                },
            );
            return SlugStatus::Available;
        }

        self.run_check(&slug, seq).await
    }

    /// Cancel any pending timer and mark in-flight work stale (the unmount
    /// path). State is left as-is.
    pub fn cancel(&self) {
        self.supersede();
    }

    /// Perform the remote check and apply the outcome under the sequence
    /// guard. Authority failures resolve to Unavailable: never tell the
    /// user an unverified slug is safe.
    async fn run_check(&self, slug: &str, seq: u64) -> SlugStatus {
        self.apply_if_current(
            seq,
            SlugValidationState {
                candidate: slug.to_string(),
                status: SlugStatus::Checking,
                error_message: None,
            },
        );

        let (status, message) = match self.authority.is_unique(slug, &self.site_id).await {
            Ok(true) => {
                // Safe to memoize even when stale: within this session the
                // same string cannot become taken out from under us
                self.confirmed.lock().unwrap().insert(slug.to_string());
                (SlugStatus::Available, None)
            }
            Ok(false) => (SlugStatus::Unavailable, Some(TAKEN_MESSAGE.to_string())),
            Err(e) => {
                tracing::warn!("slug check failed for '{}': {}", slug, e);
                (
                    SlugStatus::Unavailable,
                    Some(CHECK_FAILED_MESSAGE.to_string()),
                )
            }
        };

        self.apply_if_current(
            seq,
            SlugValidationState {
                candidate: slug.to_string(),
                status,
                error_message: message,
            },
        );

        status
    }

    /// Issue a new sequence number and abort any pending debounce timer
    fn supersede(&self) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut timer = self.timer.lock().unwrap();
        if let Some(pending) = timer.take() {
            pending.abort();
        }
        seq
    }

    fn is_current(&self, seq: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == seq
    }

    fn set_state(&self, next: SlugValidationState) {
        *self.state.lock().unwrap() = next;
    }

    /// Apply a state transition only if the originating check is still the
    /// most recent one issued; stale resolutions are discarded silently
    fn apply_if_current(&self, seq: u64, next: SlugValidationState) {
        if self.is_current(seq) {
            self.set_state(next);
        } else {
            tracing::debug!(
                "discarding stale slug result for '{}' ({:?})",
                next.candidate,
                next.status
            );
        }
    }
}
