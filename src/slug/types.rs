use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum length for a publishable slug
pub const MIN_SLUG_LENGTH: usize = 3;

/// Where a candidate slug stands in the validation pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlugStatus {
    Idle,
    Checking,
    Available,
    Unavailable,
    Invalid,
}

impl SlugStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlugStatus::Idle => "idle",
            SlugStatus::Checking => "checking",
            SlugStatus::Available => "available",
            SlugStatus::Unavailable => "unavailable",
            SlugStatus::Invalid => "invalid",
        }
    }
}

/// Validation state for the current candidate slug
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlugValidationState {
    pub candidate: String,
    pub status: SlugStatus,
    pub error_message: Option<String>,
}

impl SlugValidationState {
    pub fn idle(candidate: &str) -> Self {
        Self {
            candidate: candidate.to_string(),
            status: SlugStatus::Idle,
            error_message: None,
        }
    }
}

impl Default for SlugValidationState {
    fn default() -> Self {
        Self::idle("")
    }
}

/// Normalize raw input into canonical slug form: lowercase, whitespace runs
/// become single hyphens, disallowed characters are stripped, and hyphen
/// runs are collapsed and trimmed.
pub fn normalize_slug(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut last_was_hyphen = true; // suppress leading hyphens
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_was_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_was_hyphen {
            out.push('-');
            last_was_hyphen = true;
        }
        // Anything else is dropped
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Check a slug against the format rule. Returns a user-facing message on
/// failure so the caller can surface it inline.
pub fn validate_slug_format(slug: &str, pattern: &Regex) -> Result<(), String> {
    if slug.chars().count() < MIN_SLUG_LENGTH {
        return Err(format!(
            "Slug must be at least {} characters",
            MIN_SLUG_LENGTH
        ));
    }
    if !pattern.is_match(slug) {
        return Err("Slug may only contain lowercase letters, numbers, and hyphens".to_string());
    }
    Ok(())
}

/// Compile the slug format rule: hyphen-separated lowercase alphanumeric runs
pub fn slug_pattern() -> Regex {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid")
}
