pub mod authority;
pub mod types;
pub mod validator;

pub use authority::{AuthorityError, HttpSlugAuthority, SlugAuthority};
pub use types::{normalize_slug, SlugStatus, SlugValidationState, MIN_SLUG_LENGTH};
pub use validator::{SlugValidator, SLUG_DEBOUNCE_MS};
