//! GitHub implementation of the repository source boundary.
//!
//! All requests are blocking and carry the token from the configured
//! environment variable. The token is not validated up front — a missing or
//! bad token surfaces as an authentication error on the first call.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) → sleep `retry_wait_secs` and retry the identical
//!   request. `max_retries = 0` retries forever.
//! - Other HTTP error statuses → narrate and abort the current branch; for
//!   directory listings this degrades to an empty listing so the run keeps
//!   whatever partial file list it has.
//! - Network errors → treated like any other non-throttling failure.

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::RepoFile;
use crate::source::RepoSource;

pub struct GitHubSource {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
    retry_wait: Duration,
    max_retries: u32,
    page_size: u32,
    max_pages: u32,
}

impl GitHubSource {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let token = std::env::var(&api.token_env).unwrap_or_default();

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent("snippet-harvest")
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token,
            retry_wait: Duration::from_secs(api.retry_wait_secs),
            max_retries: api.max_retries,
            page_size: api.page_size,
            max_pages: api.max_pages,
        })
    }

    /// Issue one GET, sleeping and retrying while the API reports throttling.
    fn get_with_retry(&self, url: &str, query: &[(&str, String)]) -> Result<reqwest::blocking::Response> {
        let mut attempt = 0u32;
        loop {
            let resp = self
                .client
                .get(url)
                .header("Authorization", format!("token {}", self.token))
                .header("Accept", "application/vnd.github+json")
                .query(query)
                .send()
                .with_context(|| format!("Request to {} failed", url))?;

            if resp.status().as_u16() == 429 {
                attempt += 1;
                if self.max_retries > 0 && attempt > self.max_retries {
                    bail!("Rate limit retries exhausted for {}", url);
                }
                println!(
                    "Rate limit reached. Waiting for {} seconds...",
                    self.retry_wait.as_secs()
                );
                std::thread::sleep(self.retry_wait);
                continue;
            }

            return Ok(resp);
        }
    }
}

/// Pull `resources.core.remaining` and `.reset` out of a rate limit payload.
///
/// A payload missing either field is an error, never a silent "quota
/// available".
fn parse_rate_limit(body: &serde_json::Value) -> Result<(u64, i64)> {
    let core = &body["resources"]["core"];
    match (core["remaining"].as_u64(), core["reset"].as_i64()) {
        (Some(remaining), Some(reset)) => Ok((remaining, reset)),
        _ => bail!("Unexpected rate limit payload: {}", body),
    }
}

impl RepoSource for GitHubSource {
    fn search_repos(&self, min_stars: u64, min_forks: u64) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/search/repositories", self.base_url);
        let query_str = format!(
            "language:python stars:>={} forks:>={}",
            min_stars, min_forks
        );

        let mut all_items = Vec::new();

        for page in 1..=self.max_pages {
            let resp = self.get_with_retry(
                &url,
                &[
                    ("q", query_str.clone()),
                    ("sort", "stars".to_string()),
                    ("order", "desc".to_string()),
                    ("per_page", self.page_size.to_string()),
                    ("page", page.to_string()),
                ],
            )?;

            let status = resp.status();
            if !status.is_success() {
                bail!("Repository search failed with status {}", status);
            }

            let body: serde_json::Value = resp.json()?;
            let items = body
                .get("items")
                .and_then(|i| i.as_array())
                .cloned()
                .unwrap_or_default();
            all_items.extend(items);
        }

        Ok(all_items)
    }

    fn list_dir(&self, full_name: &str, path: &str) -> Result<Vec<RepoFile>> {
        let url = format!("{}/repos/{}/contents/{}", self.base_url, full_name, path);
        let resp = self.get_with_retry(&url, &[])?;

        let status = resp.status();
        if !status.is_success() {
            // Not fatal: the traversal keeps whatever it already collected.
            println!("An error occurred (status code: {}).", status.as_u16());
            return Ok(Vec::new());
        }

        let body: serde_json::Value = resp.json()?;

        // An error payload is a JSON object, not an array. Treat it as an
        // empty listing.
        match body.as_array() {
            Some(entries) => {
                let files = entries
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect();
                Ok(files)
            }
            None => Ok(Vec::new()),
        }
    }

    fn fetch_raw(&self, url: &str) -> Result<String> {
        let resp = self.get_with_retry(url, &[])?;
        let status = resp.status();
        if !status.is_success() {
            bail!("Fetching {} failed with status {}", url, status);
        }
        Ok(resp.text()?)
    }

    fn rate_limit_reset(&self) -> Result<Option<String>> {
        let url = format!("{}/rate_limit", self.base_url);
        let resp = self.get_with_retry(&url, &[])?;
        let status = resp.status();
        if !status.is_success() {
            bail!("Rate limit check failed with status {}", status);
        }

        let body: serde_json::Value = resp.json()?;
        let (remaining, reset) = parse_rate_limit(&body)?;

        if remaining == 0 {
            let formatted = Local
                .timestamp_opt(reset, 0)
                .single()
                .map(|t| t.format("%Y-%m-%d %I:%M:%S %p").to_string())
                .unwrap_or_else(|| reset.to_string());
            Ok(Some(formatted))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_payload_parses_remaining_and_reset() {
        let body = serde_json::json!({
            "resources": {"core": {"remaining": 0, "reset": 1_700_000_000}}
        });
        assert_eq!(parse_rate_limit(&body).unwrap(), (0, 1_700_000_000));
    }

    #[test]
    fn malformed_rate_limit_payload_is_an_error() {
        for body in [
            serde_json::json!({"message": "Bad credentials"}),
            serde_json::json!({"resources": {"core": {"remaining": "lots"}}}),
        ] {
            assert!(parse_rate_limit(&body).is_err());
        }
    }
}
