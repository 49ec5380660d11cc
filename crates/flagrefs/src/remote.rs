use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;

use crate::types::BranchRep;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the flag service: fetches the project's flag list and
/// publishes per-branch code reference snapshots.
pub struct ApiClient {
    base_uri: String,
    token: String,
    http: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct FlagList {
    items: Vec<FlagItem>,
}

#[derive(Debug, Deserialize)]
struct FlagItem {
    key: String,
}

impl ApiClient {
    pub fn new(base_uri: &str, token: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("could not build http client")?;
        Ok(ApiClient {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http,
        })
    }

    /// The project's flag keys, in the order the service returns them.
    pub fn flag_keys(&self, proj_key: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/api/v2/flags/{}?summary=true",
            self.base_uri,
            urlencoding::encode(proj_key)
        );
        debug!("fetching flag list from {}", url);
        let resp = self
            .http
            .get(&url)
            .header("Authorization", &self.token)
            .send()
            .context("flag list request failed")?;
        let status = resp.status();
        if !status.is_success() {
            bail!(
                "flag list request returned {}: {}",
                status,
                resp.text().unwrap_or_default()
            );
        }
        let list: FlagList = resp.json().context("malformed flag list response")?;
        Ok(list.items.into_iter().map(|item| item.key).collect())
    }

    /// Replace the code reference snapshot for one branch of `repo_name`.
    pub fn put_code_references(&self, repo_name: &str, branch: &BranchRep) -> Result<()> {
        let url = format!(
            "{}/api/v2/code-refs/repos/{}/branches/{}",
            self.base_uri,
            urlencoding::encode(repo_name),
            urlencoding::encode(&branch.name)
        );
        debug!("publishing {} reference paths to {}", branch.references.len(), url);
        let resp = self
            .http
            .put(&url)
            .header("Authorization", &self.token)
            .json(branch)
            .send()
            .context("code reference publish failed")?;
        let status = resp.status();
        if !status.is_success() {
            bail!(
                "code reference publish returned {}: {}",
                status,
                resp.text().unwrap_or_default()
            );
        }
        Ok(())
    }
}
