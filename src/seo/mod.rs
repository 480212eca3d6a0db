pub mod analyzer;
pub mod types;
pub mod walker;

pub use analyzer::analyze;
pub use types::{CheckStatus, SeoCheckResult, SeoReport};
pub use walker::{collect_text, count_headings, walk};
