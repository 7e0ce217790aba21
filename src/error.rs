//! Error types for modscan.
//!
//! Every failure the check flow can hit maps to one variant here, so the
//! binary can report a precise cause without string matching. The one
//! deliberate non-error: a lock file that flags exposure while the
//! dependency graph disagrees is an inconclusive
//! [`Verdict`](crate::model::Verdict), not an `Error`.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A malformed identifier or URL supplied by the caller.
    #[error("{0}")]
    InputValidation(String),

    /// The advisory or CVE is absent from the queried source.
    #[error("{0}")]
    NotFound(String),

    /// The OSV listing matched more than one distinct Go advisory.
    ///
    /// All distinct candidates are surfaced; modscan never guesses.
    #[error("multiple distinct Go advisory entries were found: {}", .matches.join(", "))]
    AmbiguousAdvisory { matches: Vec<String> },

    /// A network fetch failed or returned a non-success status.
    #[error("failed to fetch {resource}: {reason}")]
    Transport { resource: String, reason: String },

    /// The external graph command failed; stderr is captured verbatim.
    #[error("graph command failed: {reason}: {stderr}")]
    Process { reason: String, stderr: String },

    /// A structured response could not be decoded.
    #[error("malformed {resource} document: {reason}")]
    MalformedDocument { resource: String, reason: String },

    /// A version string that stays invalid even after the `v`-prefix fallback.
    #[error("invalid version: {0} (must be in semver format)")]
    UnresolvableVersion(String),

    /// An advisory that names no affected package or carries no fixed event.
    #[error("advisory {id} is unresolved: {reason}")]
    UnresolvedAdvisory { id: String, reason: String },
}

impl Error {
    pub(crate) fn transport(resource: impl Into<String>, reason: impl ToString) -> Self {
        Error::Transport {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(resource: impl Into<String>, reason: impl ToString) -> Self {
        Error::MalformedDocument {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}
