use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which managed list a filter entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterListKind {
    Blocklist,
    Allowlist,
    UpstreamDns,
}

impl FilterListKind {
    /// The `whitelist` flag expected by the filtering endpoints. Upstream DNS
    /// files have their own endpoints and never carry the flag.
    pub fn is_whitelist(self) -> bool {
        matches!(self, FilterListKind::Allowlist)
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterListKind::Blocklist => "Blocklist",
            FilterListKind::Allowlist => "Allowlist",
            FilterListKind::UpstreamDns => "Upstream DNS file",
        }
    }
}

/// One URL-sourced list managed by the appliance. The `url` is the identity
/// key within its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub id: i64,
    pub url: String,
    pub name: String,
    pub enabled: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub rules_count: u64,
}

/// Global filtering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteringConfig {
    pub enabled: bool,
    /// List update interval, in hours.
    pub interval: u32,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 24,
        }
    }
}

/// Outcome of the most recent host check, tagged with the hostname that was
/// queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub hostname: String,
    pub reason: String,
    pub rule: Option<String>,
    pub filter_id: Option<i64>,
    pub service_name: Option<String>,
    pub cname: Option<String>,
    pub ip_addrs: Option<Vec<String>>,
}

impl CheckResult {
    /// The appliance encodes the verdict in the `reason` prefix.
    pub fn is_filtered(&self) -> bool {
        self.reason.starts_with("Filtered")
    }
}

/// Filtering status as consumed by the panel state. Only present fields are
/// merged into the aggregate; absent fields leave it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteringStatusView {
    pub enabled: Option<bool>,
    pub interval: Option<u32>,
    pub filters: Option<Vec<FilterEntry>>,
    pub whitelist_filters: Option<Vec<FilterEntry>>,
    /// Newline-delimited custom rules text.
    pub user_rules: Option<String>,
}
