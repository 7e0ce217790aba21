//! User input validation.
//!
//! Identifiers are validated up front so every later phase can assume
//! well-formed input: repository URLs are normalized to `https://` with no
//! trailing slash, CVE and Go advisory IDs must match their canonical
//! patterns.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static CVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CVE-\d{4}-\d{4,}$").expect("valid pattern"));

static GO_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^GO-\d{4}-\d+$").expect("valid pattern"));

/// Normalizes and validates a GitHub repository URL.
///
/// `http://` is upgraded to `https://`, a bare host is given a scheme, and a
/// trailing slash is removed. Anything that is not a github.com URL is
/// rejected.
pub fn validate_repo_url(url: &str) -> Result<String> {
    let url = if url.starts_with("https://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{}", rest)
    } else {
        format!("https://{}", url)
    };

    let url = url.trim_end_matches('/').to_string();

    if !url.contains("github.com") {
        return Err(Error::InputValidation("invalid GitHub URL".to_string()));
    }

    Ok(url)
}

/// Validates a CVE identifier (`CVE-YYYY-NNNN...`).
pub fn validate_cve(cve: &str) -> Result<String> {
    if !cve.starts_with("CVE-") {
        return Err(Error::InputValidation(
            "invalid CVE ID: missing 'CVE-' prefix".to_string(),
        ));
    }

    if !CVE_PATTERN.is_match(cve) {
        return Err(Error::InputValidation(
            "invalid CVE ID: must be in the format CVE-YYYY-XXXX".to_string(),
        ));
    }

    Ok(cve.to_string())
}

/// Validates a Go advisory identifier (`GO-YYYY-NNNN`).
pub fn validate_go_id(id: &str) -> Result<String> {
    if !GO_ID_PATTERN.is_match(id) {
        return Err(Error::InputValidation(format!(
            "invalid Go advisory ID: {} (must be in the format GO-YYYY-NNNN)",
            id
        )));
    }

    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cve_accepts() {
        for case in ["CVE-2021-4238", "CVE-2022-0411", "CVE-2021-1234", "CVE-2022-5678"] {
            assert!(validate_cve(case).is_ok(), "{}", case);
        }
    }

    #[test]
    fn test_validate_cve_rejects() {
        for case in ["CVE-20214238", "CVE-2021-4238sdf", "2021-4238", "GO-2022-0411", ""] {
            assert!(validate_cve(case).is_err(), "{}", case);
        }
    }

    #[test]
    fn test_validate_repo_url() {
        let cases = [
            ("https://github.com/user/repo", "https://github.com/user/repo"),
            ("http://github.com/user/repo", "https://github.com/user/repo"),
            ("github.com/user/repo", "https://github.com/user/repo"),
            ("github.com/user/repo/", "https://github.com/user/repo"),
        ];
        for (input, expected) in cases {
            assert_eq!(validate_repo_url(input).unwrap(), expected);
        }
    }

    #[test]
    fn test_validate_repo_url_rejects_non_github() {
        assert!(validate_repo_url("https://not-a-forge.example/user/repo").is_err());
        assert!(validate_repo_url("this-is-not-a-url").is_err());
    }

    #[test]
    fn test_validate_go_id() {
        assert!(validate_go_id("GO-2023-0001").is_ok());
        assert!(validate_go_id("GO-2021-12345").is_ok());
        assert!(validate_go_id("GO-23-1").is_err());
        assert!(validate_go_id("CVE-2023-0001").is_err());
        assert!(validate_go_id("go-2023-0001").is_err());
    }
}
