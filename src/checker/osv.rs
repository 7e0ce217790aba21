//! Advisory resolution against OSV.dev.
//!
//! Two chained lookups: [`OsvResolver::resolve_go_id`] turns a CVE into the
//! matching `GO-YYYY-NNNN` advisory ID by scanning the OSV listing page, and
//! [`OsvResolver::resolve_fact`] fetches that advisory record and reduces it
//! to a `(package, fixed version)` fact.

use crate::checker::version;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::AdvisoryFact;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static GO_ADVISORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"GO-[0-9]{4}-[0-9]+").expect("valid pattern"));

pub struct OsvResolver {
    client: reqwest::Client,
    api_base: String,
    list_base: String,
}

impl OsvResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.osv_api_base.clone(),
            list_base: config.osv_list_base.clone(),
        }
    }

    /// Resolves a CVE to its Go advisory ID.
    ///
    /// The OSV listing page is fetched as text and scanned for advisory ID
    /// tokens. Repeated identical tokens collapse to one; distinct tokens
    /// mean the CVE maps to more than one Go advisory and the lookup fails
    /// with all candidates listed.
    pub async fn resolve_go_id(&self, cve: &str) -> Result<String> {
        let url = format!("{}?ecosystem=&q={}", self.list_base, cve);
        tracing::debug!(%url, "querying OSV listing");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport("OSV listing", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(
                "OSV listing",
                format!("status code {}", status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport("OSV listing", e))?;

        scan_go_ids(&body)
    }

    /// Fetches a Go advisory record and derives its advisory fact.
    pub async fn resolve_fact(&self, go_id: &str) -> Result<AdvisoryFact> {
        let url = format!("{}/vulns/{}", self.api_base, go_id);
        tracing::debug!(%url, "fetching advisory record");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport("advisory record", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(
                "advisory record",
                format!("status code {}", status.as_u16()),
            ));
        }

        let advisory: OsvAdvisory = response
            .json()
            .await
            .map_err(|e| Error::malformed("advisory", e))?;

        derive_fact(go_id, &advisory)
    }
}

#[derive(Deserialize)]
struct OsvAdvisory {
    #[allow(dead_code)]
    id: Option<String>,
    #[serde(default)]
    affected: Vec<OsvAffected>,
}

#[derive(Deserialize)]
struct OsvAffected {
    package: OsvPackage,
    #[serde(default)]
    ranges: Vec<OsvRange>,
}

#[derive(Deserialize)]
struct OsvPackage {
    name: String,
}

#[derive(Deserialize)]
struct OsvRange {
    #[serde(default)]
    events: Vec<OsvEvent>,
}

#[derive(Deserialize)]
struct OsvEvent {
    fixed: Option<String>,
}

/// Scans listing text for `GO-YYYY-NNNN` tokens.
fn scan_go_ids(body: &str) -> Result<String> {
    let mut distinct: Vec<String> = Vec::new();
    let mut any = false;

    for m in GO_ADVISORY_PATTERN.find_iter(body) {
        any = true;
        let token = m.as_str();
        if !distinct.iter().any(|d| d == token) {
            distinct.push(token.to_string());
        }
    }

    if !any {
        return Err(Error::NotFound(
            "couldn't find any Go vulnerability entry for this CVE".to_string(),
        ));
    }

    if distinct.len() > 1 {
        return Err(Error::AmbiguousAdvisory { matches: distinct });
    }

    Ok(distinct.remove(0))
}

/// Reduces an advisory record to its `(package, fixed version)` fact.
///
/// Affected entries are walked in document order and the last non-empty
/// `fixed` event wins, so a later affected entry overrides an earlier one.
fn derive_fact(go_id: &str, advisory: &OsvAdvisory) -> Result<AdvisoryFact> {
    if advisory.affected.is_empty() {
        return Err(Error::UnresolvedAdvisory {
            id: go_id.to_string(),
            reason: "no affected packages found in the data".to_string(),
        });
    }

    let mut package = String::new();
    let mut fixed = String::new();

    for affected in &advisory.affected {
        if affected.ranges.is_empty() {
            continue;
        }
        for range in &affected.ranges {
            for event in &range.events {
                let Some(version) = event.fixed.as_deref() else {
                    continue;
                };
                if version.is_empty() {
                    continue;
                }
                package = affected.package.name.clone();
                fixed = version.to_string();
            }
        }
    }

    if fixed.is_empty() {
        return Err(Error::UnresolvedAdvisory {
            id: go_id.to_string(),
            reason: "no range carries a fixed event".to_string(),
        });
    }

    // Advisories sometimes record the version without the "v" marker.
    let fixed_version = version::normalize(&fixed)?;

    Ok(AdvisoryFact {
        advisory_id: go_id.to_string(),
        package,
        fixed_version,
    })
}
