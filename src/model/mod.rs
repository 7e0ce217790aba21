//! Core data types for advisories, dependency records, and check reports.
//!
//! This module contains the fundamental types used throughout modscan:
//!
//! - [`PackageRecord`] - A `(module, version)` pair from a go.mod manifest
//! - [`GraphEdge`] - One edge of a `go mod graph` dump
//! - [`AdvisoryFact`] - A resolved `(package, fixed version)` advisory fact
//! - [`Verdict`] - The exposure classification for one check
//! - [`CheckReport`] - Verdict plus the evidence lines that justify it

mod record;
mod report;

pub use record::*;
pub use report::*;
