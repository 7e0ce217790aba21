//! `go mod graph` edge classification.
//!
//! Each line of graph output is one resolved edge, `parent child@version`.
//! Edges touching the queried package are classified against the fixed
//! version; everything else is ignored. Lines that do not have the expected
//! shape are skipped.

use crate::checker::version;
use crate::model::GraphEdge;
use std::cmp::Ordering;

/// Outcome of analyzing graph edge text for one queried package.
#[derive(Debug, Default)]
pub struct GraphAnalysis {
    /// True when at least one edge resolves the package below the fix.
    pub vulnerable: bool,
    /// Human-readable findings for edges at or above the fixed version.
    pub safe_findings: Vec<String>,
    /// Human-readable findings for edges below the fixed version.
    pub vulnerable_findings: Vec<String>,
}

/// Classifies every edge mentioning `package` against `fixed_version`.
pub fn analyze_graph(output: &str, package: &str, fixed_version: &str) -> GraphAnalysis {
    let mut analysis = GraphAnalysis::default();

    for line in output.lines() {
        // Substring containment mirrors the lock file's family matching.
        if !line.contains(package) {
            continue;
        }

        let Some(edge) = parse_edge(line) else {
            continue;
        };

        if !version::is_valid(fixed_version) {
            continue;
        }

        match version::compare(&edge.child_version, fixed_version) {
            Some(Ordering::Less) => {
                analysis.vulnerable = true;
                analysis.vulnerable_findings.push(format!(
                    "indirect dependency: [VULNERABLE] package '{}' imports '{}' with version '{}' (is less than {})",
                    edge.parent, package, edge.child_version, fixed_version
                ));
            }
            Some(Ordering::Equal) => {
                analysis.safe_findings.push(format!(
                    "indirect dependency: [SAFE] package '{}' imports '{}' with version '{}' (equals {})",
                    edge.parent, package, edge.child_version, fixed_version
                ));
            }
            Some(Ordering::Greater) => {
                analysis.safe_findings.push(format!(
                    "indirect dependency: [SAFE] package '{}' imports '{}' with version '{}' (newer than {})",
                    edge.parent, package, edge.child_version, fixed_version
                ));
            }
            None => continue,
        }
    }

    analysis
}

/// Parses one `parent child@version` line; `None` when the shape is off or
/// the child version is invalid.
fn parse_edge(line: &str) -> Option<GraphEdge> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return None;
    }

    let child_fields: Vec<&str> = fields[1].split('@').collect();
    if child_fields.len() != 2 {
        return None;
    }

    if !version::is_valid(child_fields[1]) {
        return None;
    }

    Some(GraphEdge {
        parent: fields[0].to_string(),
        child_package: child_fields[0].to_string(),
        child_version: child_fields[1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_below_fixed_is_vulnerable() {
        let analysis = analyze_graph("moduleA modpkg@v1.2.0\n", "modpkg", "v1.3.0");
        assert!(analysis.vulnerable);
        assert_eq!(analysis.vulnerable_findings.len(), 1);
        assert!(analysis.vulnerable_findings[0].contains("moduleA"));
        assert!(analysis.vulnerable_findings[0].contains("v1.2.0"));
    }

    #[test]
    fn test_edge_above_fixed_is_safe() {
        let analysis = analyze_graph("moduleA modpkg@v1.2.0\n", "modpkg", "v1.0.0");
        assert!(!analysis.vulnerable);
        assert_eq!(analysis.safe_findings.len(), 1);
        assert!(analysis.safe_findings[0].contains("newer than"));
    }

    #[test]
    fn test_edge_equal_to_fixed_is_safe() {
        let analysis = analyze_graph("moduleA modpkg@v1.0.0\n", "modpkg", "v1.0.0");
        assert!(!analysis.vulnerable);
        assert!(analysis.safe_findings[0].contains("equals"));
    }

    #[test]
    fn test_unrelated_edges_are_ignored() {
        let analysis = analyze_graph("moduleA other@v0.1.0\n", "modpkg", "v1.0.0");
        assert!(!analysis.vulnerable);
        assert!(analysis.safe_findings.is_empty());
        assert!(analysis.vulnerable_findings.is_empty());
    }

    #[test]
    fn test_matching_parent_side_counts() {
        // The queried name appearing in the parent makes the line eligible;
        // the child is still what gets classified.
        let analysis = analyze_graph("modpkg dep@v0.1.0\n", "modpkg", "v1.0.0");
        assert!(analysis.vulnerable);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "modpkg\nmodpkg one two three\nmoduleA modpkg@v1@v2\nmoduleA modpkg@bogus\n";
        let analysis = analyze_graph(text, "modpkg", "v1.0.0");
        assert!(!analysis.vulnerable);
        assert!(analysis.safe_findings.is_empty());
    }

    #[test]
    fn test_invalid_fixed_version_yields_nothing() {
        let analysis = analyze_graph("moduleA modpkg@v1.2.0\n", "modpkg", "bogus");
        assert!(!analysis.vulnerable);
        assert!(analysis.safe_findings.is_empty());
        assert!(analysis.vulnerable_findings.is_empty());
    }

    #[test]
    fn test_parse_edge() {
        let edge = parse_edge("moduleA modpkg@v1.2.0").unwrap();
        assert_eq!(edge.parent, "moduleA");
        assert_eq!(edge.child_package, "modpkg");
        assert_eq!(edge.child_version, "v1.2.0");
    }
}
