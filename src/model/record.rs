use serde::{Deserialize, Serialize};

/// A single dependency entry from a go.mod manifest.
///
/// Records are unique per module path within one manifest snapshot: a
/// `replace` directive for an already-seen path overwrites the version in
/// place, keeping the first-seen position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// One edge of a `go mod graph` dump: `parent child@version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub parent: String,
    pub child_package: String,
    pub child_version: String,
}

/// A vulnerability advisory resolved to a concrete fixed version.
///
/// Derived from an OSV advisory record by taking, across all affected
/// entries in document order, the last range event whose `fixed` field is
/// non-empty. The fixed version is normalized before the fact is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryFact {
    pub advisory_id: String,
    pub package: String,
    pub fixed_version: String,
}
