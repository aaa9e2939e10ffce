//! HTTP client for the appliance's filtering control API.
//!
//! [`ApplianceClient`] is the concrete client; [`FilteringApi`] is the seam
//! the panel's command layer depends on, so command handlers can be exercised
//! against stub implementations in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use shared::domain::{FilterEntry, FilteringConfig, FilteringStatusView};
use shared::protocol::{
    AddFilterRequest, CheckHostResponse, FilterJson, FilteringStatusResponse, RefreshRequest,
    RefreshResponse, RemoveFilterRequest, SetFilterUrlRequest, SetRulesRequest,
    UpstreamDnsAddRequest, UpstreamDnsFilesStatusResponse, UpstreamDnsRemoveRequest,
    UpstreamDnsSetRequest,
};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid appliance url: {0}")]
    BadUrl(#[from] url::ParseError),
    #[error("appliance returned {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Operations of the appliance control API used by the panel. One method per
/// endpoint; exactly one HTTP attempt per call, no retries.
#[async_trait]
pub trait FilteringApi: Send + Sync {
    async fn get_filtering_status(&self) -> Result<FilteringStatusResponse, ApiError>;
    async fn set_rules(&self, rules: &[String]) -> Result<(), ApiError>;
    async fn add_filter(&self, req: &AddFilterRequest) -> Result<(), ApiError>;
    async fn remove_filter(&self, req: &RemoveFilterRequest) -> Result<(), ApiError>;
    async fn set_filter_url(&self, req: &SetFilterUrlRequest) -> Result<(), ApiError>;
    async fn refresh_filters(&self, whitelist: bool) -> Result<RefreshResponse, ApiError>;
    async fn set_filters_config(&self, config: &FilteringConfig) -> Result<(), ApiError>;
    async fn check_host(&self, name: &str) -> Result<CheckHostResponse, ApiError>;
    async fn get_upstream_dns_files_status(
        &self,
    ) -> Result<UpstreamDnsFilesStatusResponse, ApiError>;
    async fn add_upstream_dns_file(&self, req: &UpstreamDnsAddRequest) -> Result<(), ApiError>;
    async fn remove_upstream_dns_file(
        &self,
        req: &UpstreamDnsRemoveRequest,
    ) -> Result<(), ApiError>;
    async fn set_upstream_dns_file(&self, req: &UpstreamDnsSetRequest) -> Result<(), ApiError>;
    async fn refresh_upstream_dns_files(&self) -> Result<RefreshResponse, ApiError>;
}

pub struct ApplianceClient {
    http: Client,
    base: Url,
}

impl ApplianceClient {
    /// `base_url` is the appliance root, e.g. `http://192.168.1.1:3000`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        // Url::join treats a path without a trailing slash as a file.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    async fn expect_ok(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        // The appliance reports errors as a plain-text body.
        let message = resp.text().await.unwrap_or_default().trim().to_string();
        Err(ApiError::Http { status, message })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "control api get");
        let resp = self.http.get(url).send().await?;
        Ok(Self::expect_ok(resp).await?.json().await?)
    }

    /// POST a JSON body and discard the response body. Several endpoints
    /// answer with a human-oriented `OK N rules` line the panel never reads.
    async fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "control api post");
        let resp = self.http.post(url).json(body).send().await?;
        Self::expect_ok(resp).await?;
        Ok(())
    }

    async fn post_json_response<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "control api post");
        let resp = self.http.post(url).json(body).send().await?;
        Ok(Self::expect_ok(resp).await?.json().await?)
    }
}

#[async_trait]
impl FilteringApi for ApplianceClient {
    async fn get_filtering_status(&self) -> Result<FilteringStatusResponse, ApiError> {
        self.get_json("control/filtering/status").await
    }

    async fn set_rules(&self, rules: &[String]) -> Result<(), ApiError> {
        let body = SetRulesRequest {
            rules: rules.to_vec(),
        };
        self.post_json("control/filtering/set_rules", &body).await
    }

    async fn add_filter(&self, req: &AddFilterRequest) -> Result<(), ApiError> {
        self.post_json("control/filtering/add_url", req).await
    }

    async fn remove_filter(&self, req: &RemoveFilterRequest) -> Result<(), ApiError> {
        self.post_json("control/filtering/remove_url", req).await
    }

    async fn set_filter_url(&self, req: &SetFilterUrlRequest) -> Result<(), ApiError> {
        self.post_json("control/filtering/set_url", req).await
    }

    async fn refresh_filters(&self, whitelist: bool) -> Result<RefreshResponse, ApiError> {
        self.post_json_response("control/filtering/refresh", &RefreshRequest { whitelist })
            .await
    }

    async fn set_filters_config(&self, config: &FilteringConfig) -> Result<(), ApiError> {
        self.post_json("control/filtering/config", config).await
    }

    async fn check_host(&self, name: &str) -> Result<CheckHostResponse, ApiError> {
        let mut url = self.endpoint("control/filtering/check_host")?;
        url.query_pairs_mut().append_pair("name", name);
        tracing::debug!(%url, "control api get");
        let resp = self.http.get(url).send().await?;
        Ok(Self::expect_ok(resp).await?.json().await?)
    }

    async fn get_upstream_dns_files_status(
        &self,
    ) -> Result<UpstreamDnsFilesStatusResponse, ApiError> {
        self.get_json("control/upstream_dns/status").await
    }

    async fn add_upstream_dns_file(&self, req: &UpstreamDnsAddRequest) -> Result<(), ApiError> {
        self.post_json("control/upstream_dns/add_url", req).await
    }

    async fn remove_upstream_dns_file(
        &self,
        req: &UpstreamDnsRemoveRequest,
    ) -> Result<(), ApiError> {
        self.post_json("control/upstream_dns/remove_url", req).await
    }

    async fn set_upstream_dns_file(&self, req: &UpstreamDnsSetRequest) -> Result<(), ApiError> {
        self.post_json("control/upstream_dns/set_url", req).await
    }

    async fn refresh_upstream_dns_files(&self) -> Result<RefreshResponse, ApiError> {
        self.post_json_response("control/upstream_dns/refresh", &serde_json::json!({}))
            .await
    }
}

/// Converts a wire entry into the domain shape, parsing the RFC 3339
/// timestamp when present.
pub fn filter_entry_from_wire(wire: FilterJson) -> FilterEntry {
    let last_updated = wire
        .last_updated
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));
    FilterEntry {
        id: wire.id,
        url: wire.url,
        name: wire.name,
        enabled: wire.enabled,
        last_updated,
        rules_count: wire.rules_count,
    }
}

/// Normalizes a status response for the panel state: lists become domain
/// entries and the rules vector is joined into the newline-delimited
/// textarea text.
pub fn filtering_status_view(status: FilteringStatusResponse) -> FilteringStatusView {
    FilteringStatusView {
        enabled: Some(status.enabled),
        interval: Some(status.interval),
        filters: Some(
            status
                .filters
                .into_iter()
                .map(filter_entry_from_wire)
                .collect(),
        ),
        whitelist_filters: Some(
            status
                .whitelist_filters
                .into_iter()
                .map(filter_entry_from_wire)
                .collect(),
        ),
        user_rules: Some(status.user_rules.join("\n")),
    }
}

pub fn upstream_files_from_wire(status: UpstreamDnsFilesStatusResponse) -> Vec<FilterEntry> {
    status
        .files
        .into_iter()
        .map(filter_entry_from_wire)
        .collect()
}

/// Prepares free-text rules for `set_rules`: normalizes line endings, trims
/// each line and drops blank ones.
pub fn normalize_rules_textarea(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
