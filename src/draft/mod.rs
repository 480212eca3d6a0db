pub mod autosave;
pub mod storage;
pub mod types;

pub use autosave::{Debouncer, DraftAutosave, AUTOSAVE_DEBOUNCE_MS};
pub use storage::{DraftStore, DRAFT_KEY, HTML_CACHE_KEY, UPLOADED_IMAGES_KEY};
pub use types::{DraftPatch, DraftRecord};
