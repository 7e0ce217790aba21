use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exposure classification for one package/advisory check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The manifest names the package at or above the fixed version.
    DirectSafe,
    /// The manifest names the package below the fixed version.
    DirectVulnerable,
    /// The package is not a direct dependency and the lock file carries no
    /// version below the fix.
    IndirectSafe,
    /// The resolved dependency graph pulls in a version below the fix.
    IndirectVulnerable,
    /// The lock file flags exposure but the graph does not confirm it.
    Inconclusive,
}

impl Verdict {
    pub fn is_vulnerable(&self) -> bool {
        matches!(self, Verdict::DirectVulnerable | Verdict::IndirectVulnerable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::DirectSafe => "direct safe",
            Verdict::DirectVulnerable => "direct vulnerable",
            Verdict::IndirectSafe => "indirect safe",
            Verdict::IndirectVulnerable => "indirect vulnerable",
            Verdict::Inconclusive => "inconclusive",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of one exposure check: the verdict plus every evidence line
/// gathered along the way, in the order the phases produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub repo_url: String,
    pub package: String,
    pub fixed_version: String,
    pub verdict: Verdict,
    pub evidence: Vec<String>,
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    pub fn new(
        repo_url: impl Into<String>,
        package: impl Into<String>,
        fixed_version: impl Into<String>,
        verdict: Verdict,
        evidence: Vec<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            package: package.into(),
            fixed_version: fixed_version.into(),
            verdict,
            evidence,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_is_vulnerable() {
        assert!(Verdict::DirectVulnerable.is_vulnerable());
        assert!(Verdict::IndirectVulnerable.is_vulnerable());
        assert!(!Verdict::DirectSafe.is_vulnerable());
        assert!(!Verdict::IndirectSafe.is_vulnerable());
        assert!(!Verdict::Inconclusive.is_vulnerable());
    }

    #[test]
    fn test_report_serializes() {
        let report = CheckReport::new(
            "https://github.com/user/repo",
            "example.com/pkg",
            "v1.0.0",
            Verdict::IndirectSafe,
            vec!["evidence line".to_string()],
        );
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"indirect_safe\""));
        assert!(json.contains("evidence line"));
    }
}
