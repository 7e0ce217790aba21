//! Go-style semantic version handling.
//!
//! Go module versions carry a leading `v` marker (`v1.2.3`) and may omit the
//! minor or patch component (`v1`, `v1.2`). This module wraps the `semver`
//! crate with that grammar: [`is_valid`] accepts the short forms,
//! [`normalize`] repairs a missing `v` marker, and [`compare`] orders two
//! valid versions by semver precedence (build metadata never participates).

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Returns true if `v` is a valid Go-style semver token.
pub fn is_valid(v: &str) -> bool {
    parse(v).is_some()
}

/// Coerces a version missing the leading `v` marker by prepending it.
///
/// Already-valid input is returned unchanged, so the function is idempotent.
/// A string that stays invalid after the fallback is a hard input error
/// naming the offending token.
pub fn normalize(v: &str) -> Result<String> {
    if is_valid(v) {
        return Ok(v.to_string());
    }

    // Usually the version is only missing the "v" prefix (1.1.1 vs v1.1.1).
    let prefixed = format!("v{}", v);
    if is_valid(&prefixed) {
        return Ok(prefixed);
    }

    Err(Error::UnresolvableVersion(v.to_string()))
}

/// Compares two versions by semver precedence.
///
/// Returns `None` when either operand is invalid. Versions that differ only
/// in build metadata compare equal.
pub fn compare(a: &str, b: &str) -> Option<Ordering> {
    let a = parse(a)?;
    let b = parse(b)?;
    Some(a.cmp_precedence(&b))
}

fn parse(v: &str) -> Option<semver::Version> {
    let rest = v.strip_prefix('v')?;

    if let Ok(version) = semver::Version::parse(rest) {
        return Some(version);
    }

    // Go permits vMAJOR and vMAJOR.MINOR, but only without a pre-release or
    // build suffix. Pad the core and re-parse.
    let padded = match rest.split('.').count() {
        1 => format!("{}.0.0", rest),
        2 => format!("{}.0", rest),
        _ => return None,
    };
    if padded
        .split('.')
        .any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    semver::Version::parse(&padded).ok()
}
