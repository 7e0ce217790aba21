//! Repository collaborators: raw file fetching and graph generation.
//!
//! The exposure check needs three things from a repository: its go.mod
//! text, its go.sum text, and (when the lock file flags a candidate) the
//! output of `go mod graph`. [`RepoSource`] is the seam for all three so
//! tests can substitute in-memory fixtures; [`GithubSource`] is the real
//! implementation.

pub mod graph;
pub mod lockfile;
pub mod manifest;

pub use graph::{analyze_graph, GraphAnalysis};
pub use lockfile::{scan_lock, LockScan};
pub use manifest::parse_manifest;

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::process::Command;

/// Provides the raw dependency documents for one repository.
///
/// Each method is a single external attempt; failures are fatal for the
/// invocation that requested them and are never retried.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Fetches the repository's go.mod text.
    async fn fetch_manifest(&self, repo_url: &str) -> Result<String>;

    /// Fetches the repository's go.sum text.
    async fn fetch_lock(&self, repo_url: &str) -> Result<String>;

    /// Materializes the repository's transitive dependency graph, returning
    /// `go mod graph` edge text.
    async fn generate_graph(&self, repo_url: &str) -> Result<String>;
}

/// Fetches raw files from GitHub and runs the graph command in a
/// disposable container.
pub struct GithubSource {
    client: reqwest::Client,
    branch: String,
}

impl GithubSource {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            branch: config.default_branch.clone(),
        }
    }

    async fn fetch_raw(&self, repo_url: &str, file: &str) -> Result<String> {
        let url = format!(
            "{}/raw/{}/{}",
            repo_url.trim_end_matches('/'),
            self.branch,
            file
        );
        tracing::debug!(%url, "fetching raw file");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(file, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(
                file,
                format!("status code {}", status.as_u16()),
            ));
        }

        response.text().await.map_err(|e| Error::transport(file, e))
    }
}

#[async_trait]
impl RepoSource for GithubSource {
    async fn fetch_manifest(&self, repo_url: &str) -> Result<String> {
        self.fetch_raw(repo_url, "go.mod").await
    }

    async fn fetch_lock(&self, repo_url: &str) -> Result<String> {
        self.fetch_raw(repo_url, "go.sum").await
    }

    async fn generate_graph(&self, repo_url: &str) -> Result<String> {
        let repo_name = repo_name(repo_url);
        tracing::debug!(repo_name, "running go mod graph in container");

        let script = format!(
            "git clone {}.git; cd {}; go mod graph;",
            repo_url, repo_name
        );

        let output = Command::new("docker")
            .args(["run", "--rm", "golang", "sh", "-c", &script])
            .output()
            .map_err(|e| Error::Process {
                reason: e.to_string(),
                stderr: String::new(),
            })?;

        if !output.status.success() {
            return Err(Error::Process {
                reason: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The repository's directory name after cloning: the last URL segment.
fn repo_name(repo_url: &str) -> &str {
    repo_url.rsplit('/').next().unwrap_or(repo_url)
}
