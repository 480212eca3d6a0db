//! Article-authoring state engine for a multi-tenant blogging platform.
//!
//! Keeps in-progress article state durably synchronized to local storage,
//! validates candidate URL slugs against a remote authority with debouncing
//! and race-safety, and analyzes structured content for SEO quality signals.
//! The UI layer drives [`form::AuthoringForm`] and polls its getters; the
//! engine assumes no particular reactivity mechanism.

pub mod draft;
pub mod form;
pub mod seo;
pub mod session;
pub mod slug;
pub mod store;

pub use draft::{DraftPatch, DraftRecord, DraftStore};
pub use form::{AuthoringForm, FormOptions, FormStep};
pub use seo::{CheckStatus, SeoCheckResult, SeoReport};
pub use session::{ContentImages, UploadTracker, UploadedImage};
pub use slug::{HttpSlugAuthority, SlugAuthority, SlugStatus, SlugValidationState, SlugValidator};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
