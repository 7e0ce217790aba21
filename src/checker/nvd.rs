//! CVE existence check against the NVD database.

use crate::config::Config;
use crate::error::{Error, Result};
use serde::Deserialize;

pub struct NvdIndex {
    client: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct NvdResponse {
    #[serde(rename = "totalResults", default)]
    total_results: u64,
}

impl NvdIndex {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.nvd_api_base.clone(),
        }
    }

    /// Returns true when the CVE exists in the NVD database.
    pub async fn exists(&self, cve: &str) -> Result<bool> {
        let url = format!("{}/{}", self.api_base, cve);
        tracing::debug!(%url, "querying NVD");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport("NVD record", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(
                "NVD record",
                format!("status code {}", status.as_u16()),
            ));
        }

        let nvd: NvdResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed("NVD response", e))?;

        Ok(nvd.total_results > 0)
    }
}
