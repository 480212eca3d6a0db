use serde_json::Value;

use super::types::{CheckStatus, SeoCheckResult, SeoReport};
use super::walker::{collect_text, count_headings};

/// Words too generic to serve as a lead keyword
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "this", "that", "these", "those", "it",
    "its", "your", "you", "my", "our", "their", "how", "what", "when", "where", "why", "can",
    "will", "do", "does", "not",
];

const GOOD_WORD_COUNT: usize = 300;
const EXCELLENT_WORD_COUNT: usize = 600;

/// Run the full check battery over the current authoring inputs.
///
/// Pure and deterministic: the report is recomputed from scratch on every
/// relevant edit, never patched incrementally. User-entered keywords are
/// accepted at the boundary but not cross-checked; density tracks the
/// title's lead keyword only.
pub fn analyze(
    title: &str,
    description: &str,
    _keywords: &str,
    content: Option<&Value>,
) -> SeoReport {
    let body_text = content.map(collect_text).unwrap_or_default();
    let word_count = body_text.split_whitespace().count();

    let checks = vec![
        check_title_length(title),
        check_description_length(description),
        check_h1_count(content),
        check_h2_presence(content),
        check_word_count(word_count),
        check_keyword_usage(title, &body_text, word_count),
    ];

    SeoReport::from_checks(checks)
}

fn check_title_length(title: &str) -> SeoCheckResult {
    let len = title.trim().chars().count();
    let (status, recommendation) = if len == 0 {
        (
            CheckStatus::Fail,
            "Add a title; pages without one are not indexed meaningfully".to_string(),
        )
    } else if len < 30 {
        (
            CheckStatus::Warning,
            format!("Title is {} characters; aim for 30-60", len),
        )
    } else if len > 60 {
        (
            CheckStatus::Warning,
            format!("Title is {} characters; search engines truncate after 60", len),
        )
    } else {
        (CheckStatus::Pass, "Title length looks good".to_string())
    };

    SeoCheckResult {
        id: "title-length".to_string(),
        title: "Title length".to_string(),
        description: "Titles between 30 and 60 characters display fully in results".to_string(),
        status,
        recommendation,
    }
}

fn check_description_length(description: &str) -> SeoCheckResult {
    let len = description.trim().chars().count();
    let (status, recommendation) = if len == 0 {
        (
            CheckStatus::Fail,
            "Add a meta description; snippets are generated from it".to_string(),
        )
    } else if len < 80 {
        (
            CheckStatus::Warning,
            format!("Description is {} characters; aim for 80-160", len),
        )
    } else if len > 160 {
        (
            CheckStatus::Warning,
            format!("Description is {} characters; it will be cut off after 160", len),
        )
    } else {
        (CheckStatus::Pass, "Description length looks good".to_string())
    };

    SeoCheckResult {
        id: "description-length".to_string(),
        title: "Meta description".to_string(),
        description: "Descriptions between 80 and 160 characters make complete snippets"
            .to_string(),
        status,
        recommendation,
    }
}

fn check_h1_count(content: Option<&Value>) -> SeoCheckResult {
    let count = content.map(|c| count_headings(c, 1)).unwrap_or(0);
    let (status, recommendation) = match count {
        0 => (
            CheckStatus::Fail,
            "Add exactly one H1 heading to the article body".to_string(),
        ),
        1 => (CheckStatus::Pass, "Exactly one H1 heading".to_string()),
        n => (
            CheckStatus::Warning,
            format!("{} H1 headings found; keep a single one", n),
        ),
    };

    SeoCheckResult {
        id: "h1-count".to_string(),
        title: "H1 heading".to_string(),
        description: "Each article should carry exactly one top-level heading".to_string(),
        status,
        recommendation,
    }
}

fn check_h2_presence(content: Option<&Value>) -> SeoCheckResult {
    let count = content.map(|c| count_headings(c, 2)).unwrap_or(0);
    let (status, recommendation) = if count == 0 {
        (
            CheckStatus::Warning,
            "Break the article into sections with H2 headings".to_string(),
        )
    } else {
        (
            CheckStatus::Pass,
            format!("{} H2 headings structure the article", count),
        )
    };

    SeoCheckResult {
        id: "h2-presence".to_string(),
        title: "H2 headings".to_string(),
        description: "Section headings help readers and crawlers scan the article".to_string(),
        status,
        recommendation,
    }
}

fn check_word_count(word_count: usize) -> SeoCheckResult {
    let (status, recommendation) = if word_count < GOOD_WORD_COUNT {
        (
            CheckStatus::Warning,
            format!("{} words; articles under {} rarely rank", word_count, GOOD_WORD_COUNT),
        )
    } else if word_count >= EXCELLENT_WORD_COUNT {
        (
            CheckStatus::Pass,
            format!("{} words; excellent depth", word_count),
        )
    } else {
        (CheckStatus::Pass, format!("{} words", word_count))
    };

    SeoCheckResult {
        id: "word-count".to_string(),
        title: "Word count".to_string(),
        description: "Substantial articles perform better in search".to_string(),
        status,
        recommendation,
    }
}

fn check_keyword_usage(title: &str, body_text: &str, word_count: usize) -> SeoCheckResult {
    let description = "The lead keyword from the title should appear in the body at a \
                       density between 0.5% and 3%"
        .to_string();

    let keyword = match main_keyword(title) {
        Some(keyword) => keyword,
        None => {
            return SeoCheckResult {
                id: "keyword-usage".to_string(),
                title: "Keyword usage".to_string(),
                description,
                status: CheckStatus::Warning,
                recommendation: "No usable keyword could be derived from the title".to_string(),
            }
        }
    };

    let occurrences = count_word(body_text, &keyword);
    let density = if word_count > 0 {
        occurrences as f64 / word_count as f64 * 100.0
    } else {
        0.0
    };

    let (status, recommendation) = if occurrences == 0 {
        (
            CheckStatus::Warning,
            format!("The keyword \"{}\" never appears in the body", keyword),
        )
    } else if density < 0.5 {
        (
            CheckStatus::Warning,
            format!("\"{}\" density is {:.1}%; use it a little more", keyword, density),
        )
    } else if density > 3.0 {
        (
            CheckStatus::Warning,
            format!("\"{}\" density is {:.1}%; this reads as keyword stuffing", keyword, density),
        )
    } else {
        (
            CheckStatus::Pass,
            format!("\"{}\" density is {:.1}%", keyword, density),
        )
    };

    SeoCheckResult {
        id: "keyword-usage".to_string(),
        title: "Keyword usage".to_string(),
        description,
        status,
        recommendation,
    }
}

/// First title token that survives lowercasing, the stop-word list, and the
/// minimum-length filter
fn main_keyword(title: &str) -> Option<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .map(String::from)
}

/// Whole-word, case-insensitive occurrence count
fn count_word(text: &str, word: &str) -> usize {
    text.split_whitespace()
        .filter(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .eq_ignore_ascii_case(word)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_text(text: &str) -> Value {
        json!({
            "type": "doc",
            "children": [
                { "type": "heading", "attrs": { "level": 1 }, "children": [
                    { "type": "text", "text": "Heading" }
                ]},
                { "type": "paragraph", "children": [
                    { "type": "text", "text": text }
                ]}
            ]
        })
    }

    #[test]
    fn test_empty_inputs_fail_deterministically() {
        let report = analyze("How to Bake Bread", "", "", None);

        assert_eq!(
            report.check("description-length").unwrap().status,
            CheckStatus::Fail
        );
        assert_eq!(report.check("h1-count").unwrap().status, CheckStatus::Fail);
        assert_eq!(report.status, CheckStatus::Fail);
    }

    #[test]
    fn test_main_keyword_skips_stop_words() {
        assert_eq!(main_keyword("How to Bake Bread"), Some("bake".to_string()));
        assert_eq!(
            main_keyword("React Performance Tips"),
            Some("react".to_string())
        );
        assert_eq!(main_keyword("The A An"), None);
        assert_eq!(main_keyword(""), None);
    }

    #[test]
    fn test_keyword_density_one_percent_passes() {
        // 3 keyword occurrences in exactly 300 words (heading included)
        // -> 1.0% density
        let mut words = vec!["filler"; 296];
        words.push("react");
        words.push("react");
        words.push("React,");
        let body = words.join(" ");

        let doc = doc_with_text(&body);
        let report = analyze("React Performance Tips", &"d".repeat(100), "", Some(&doc));

        let check = report.check("keyword-usage").unwrap();
        assert_eq!(check.status, CheckStatus::Pass);
        assert!(check.recommendation.contains("1.0%"));
    }

    #[test]
    fn test_keyword_absent_warns() {
        let doc = doc_with_text("nothing relevant here at all");
        let report = analyze("React Performance Tips", "", "", Some(&doc));
        assert_eq!(
            report.check("keyword-usage").unwrap().status,
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_keyword_stuffing_warns() {
        let body = vec!["react"; 50].join(" ");
        let doc = doc_with_text(&body);
        let report = analyze("React Performance Tips", "", "", Some(&doc));
        assert_eq!(
            report.check("keyword-usage").unwrap().status,
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_title_length_bands() {
        assert_eq!(check_title_length("").status, CheckStatus::Fail);
        assert_eq!(check_title_length("Short").status, CheckStatus::Warning);
        assert_eq!(
            check_title_length("A Perfectly Reasonable Title For Search").status,
            CheckStatus::Pass
        );
        assert_eq!(
            check_title_length(&"x".repeat(61)).status,
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_description_length_bands() {
        assert_eq!(check_description_length("").status, CheckStatus::Fail);
        assert_eq!(
            check_description_length("too short").status,
            CheckStatus::Warning
        );
        assert_eq!(
            check_description_length(&"d".repeat(120)).status,
            CheckStatus::Pass
        );
        assert_eq!(
            check_description_length(&"d".repeat(200)).status,
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_heading_checks() {
        let doc = json!({
            "type": "doc",
            "children": [
                { "type": "heading", "attrs": { "level": 1 } },
                { "type": "heading", "attrs": { "level": 1 } }
            ]
        });
        let report = analyze("t", "", "", Some(&doc));
        assert_eq!(
            report.check("h1-count").unwrap().status,
            CheckStatus::Warning
        );
        assert_eq!(
            report.check("h2-presence").unwrap().status,
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_word_count_bands() {
        assert_eq!(check_word_count(50).status, CheckStatus::Warning);
        assert_eq!(check_word_count(400).status, CheckStatus::Pass);
        let excellent = check_word_count(700);
        assert_eq!(excellent.status, CheckStatus::Pass);
        assert!(excellent.recommendation.contains("excellent"));
    }

    #[test]
    fn test_malformed_content_degrades_to_empty() {
        let doc = json!({ "type": "doc", "children": { "bad": "shape" } });
        let report = analyze("How to Bake Bread", "", "", Some(&doc));
        assert_eq!(
            report.check("word-count").unwrap().status,
            CheckStatus::Warning
        );
        assert_eq!(report.check("h1-count").unwrap().status, CheckStatus::Fail);
    }
}
