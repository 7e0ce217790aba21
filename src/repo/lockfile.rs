//! go.sum lock file scanning.
//!
//! The lock file lists every module version the build has ever resolved, so
//! a vulnerable version showing up here is a candidate for indirect
//! exposure. Candidates are confirmed (or contradicted) by the dependency
//! graph afterwards.

use crate::checker::version;
use std::cmp::Ordering;

/// Outcome of scanning a lock file for one queried package.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LockScan {
    /// True when at least one matching record sits below the fixed version.
    pub vulnerable: bool,
    /// The candidate versions, in file order.
    pub candidates: Vec<String>,
}

/// Scans lock text for versions of `package` below `fixed_version`.
///
/// Records are `name version hash` triplets; the version token may carry a
/// `/go.mod` suffix which is stripped before validation. Malformed lines
/// and invalid versions are skipped. A record matches the queried package
/// when its name equals it or contains it as a substring, which catches
/// submodule entries of the same logical package.
pub fn scan_lock(text: &str, package: &str, fixed_version: &str) -> LockScan {
    let mut scan = LockScan::default();

    for line in text.lines() {
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            tracing::debug!(line, "skipping invalid go.sum line");
            continue;
        }

        let name = fields[0];
        let version = fields[1].strip_suffix("/go.mod").unwrap_or(fields[1]);

        if !version::is_valid(version) {
            tracing::debug!(version, "skipping invalid version in go.sum");
            continue;
        }

        if name != package && !name.contains(package) {
            continue;
        }

        if version::compare(version, fixed_version) == Some(Ordering::Less) {
            scan.vulnerable = true;
            scan.candidates.push(version.to_string());
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_below_fixed() {
        let text = "example.com/pkg v0.9.0 h1:abc=\n";
        let scan = scan_lock(text, "example.com/pkg", "v1.0.0");
        assert!(scan.vulnerable);
        assert_eq!(scan.candidates, vec!["v0.9.0"]);
    }

    #[test]
    fn test_at_or_above_fixed_is_clean() {
        let text = "example.com/pkg v1.0.0 h1:abc=\nexample.com/pkg v1.2.0 h1:def=\n";
        let scan = scan_lock(text, "example.com/pkg", "v1.0.0");
        assert!(!scan.vulnerable);
        assert!(scan.candidates.is_empty());
    }

    #[test]
    fn test_family_matching() {
        let text = "golang.org/x/crypto/bcrypt v0.1.0 h1:abc=\n";
        assert!(scan_lock(text, "crypto", "v1.0.0").vulnerable);
        assert!(!scan_lock(text, "cryptox", "v1.0.0").vulnerable);
    }

    #[test]
    fn test_go_mod_suffix_is_stripped() {
        let text = "example.com/pkg v0.9.0/go.mod h1:abc=\n";
        let scan = scan_lock(text, "example.com/pkg", "v1.0.0");
        assert_eq!(scan.candidates, vec!["v0.9.0"]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "only-two fields\nexample.com/pkg v0.9.0 h1:abc= extra\n\nexample.com/pkg v0.8.0 h1:abc=\n";
        let scan = scan_lock(text, "example.com/pkg", "v1.0.0");
        assert_eq!(scan.candidates, vec!["v0.8.0"]);
    }

    #[test]
    fn test_invalid_version_is_skipped() {
        let text = "example.com/pkg not-a-version h1:abc=\n";
        let scan = scan_lock(text, "example.com/pkg", "v1.0.0");
        assert!(!scan.vulnerable);
    }

    #[test]
    fn test_candidates_keep_file_order() {
        let text = "example.com/pkg v0.9.0 h1:a=\nexample.com/pkg v0.5.0 h1:b=\n";
        let scan = scan_lock(text, "example.com/pkg", "v1.0.0");
        assert_eq!(scan.candidates, vec!["v0.9.0", "v0.5.0"]);
    }
}
