use serde::{Deserialize, Serialize};

/// Outcome of a single SEO check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Warning => "warning",
            CheckStatus::Fail => "fail",
        }
    }
}

/// One entry in the check battery. Ids are stable so the UI and tests can
/// address individual checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoCheckResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: CheckStatus,
    pub recommendation: String,
}

/// Full report: the ordered battery plus an aggregate verdict and counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoReport {
    pub checks: Vec<SeoCheckResult>,
    pub status: CheckStatus,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
}

impl SeoReport {
    /// Aggregate: Fail if any check fails, else Warning if any warns,
    /// else Pass
    pub fn from_checks(checks: Vec<SeoCheckResult>) -> Self {
        let passed = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count();
        let warnings = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Warning)
            .count();
        let failed = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count();

        let status = if failed > 0 {
            CheckStatus::Fail
        } else if warnings > 0 {
            CheckStatus::Warning
        } else {
            CheckStatus::Pass
        };

        Self {
            checks,
            status,
            passed,
            warnings,
            failed,
        }
    }

    /// Look up a check by its stable id
    pub fn check(&self, id: &str) -> Option<&SeoCheckResult> {
        self.checks.iter().find(|c| c.id == id)
    }
}

impl Default for SeoReport {
    fn default() -> Self {
        Self::from_checks(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, status: CheckStatus) -> SeoCheckResult {
        SeoCheckResult {
            id: id.to_string(),
            title: String::new(),
            description: String::new(),
            status,
            recommendation: String::new(),
        }
    }

    #[test]
    fn test_aggregate_precedence() {
        let report = SeoReport::from_checks(vec![
            result("a", CheckStatus::Pass),
            result("b", CheckStatus::Warning),
            result("c", CheckStatus::Fail),
        ]);
        assert_eq!(report.status, CheckStatus::Fail);
        assert_eq!((report.passed, report.warnings, report.failed), (1, 1, 1));

        let report = SeoReport::from_checks(vec![
            result("a", CheckStatus::Pass),
            result("b", CheckStatus::Warning),
        ]);
        assert_eq!(report.status, CheckStatus::Warning);

        let report = SeoReport::from_checks(vec![result("a", CheckStatus::Pass)]);
        assert_eq!(report.status, CheckStatus::Pass);
    }
}
