//! Wire shapes of the appliance control API.
//!
//! Field names follow the appliance's JSON exactly; the client converts
//! these into the domain types the panel state consumes.

use serde::{Deserialize, Serialize};

use crate::domain::FilteringConfig;

/// One list entry as serialized by the appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterJson {
    pub url: String,
    pub name: String,
    /// RFC 3339; omitted when the list was never fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub id: i64,
    pub rules_count: u64,
    pub enabled: bool,
}

/// Response of `GET /control/filtering/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteringStatusResponse {
    pub enabled: bool,
    pub interval: u32,
    #[serde(default)]
    pub filters: Vec<FilterJson>,
    #[serde(default)]
    pub whitelist_filters: Vec<FilterJson>,
    #[serde(default)]
    pub user_rules: Vec<String>,
}

/// Response of `GET /control/upstream_dns/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamDnsFilesStatusResponse {
    #[serde(default)]
    pub files: Vec<FilterJson>,
    pub interval: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRulesRequest {
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFilterRequest {
    pub url: String,
    pub name: String,
    pub whitelist: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveFilterRequest {
    pub url: String,
    pub whitelist: bool,
}

/// New properties for an existing list entry, used by both the toggle and
/// edit flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterUpdateData {
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

/// Body of `POST /control/filtering/set_url`. `url` identifies the entry to
/// update; `data` carries its new properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFilterUrlRequest {
    pub url: String,
    pub whitelist: bool,
    pub data: FilterUpdateData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub whitelist: bool,
}

/// Response of the refresh endpoints: how many lists actually changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub updated: u64,
}

/// Body of `POST /control/filtering/config`.
pub type SetFiltersConfigRequest = FilteringConfig;

/// Response of `GET /control/filtering/check_host`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckHostResponse {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_addrs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamDnsAddRequest {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamDnsRemoveRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamDnsSetRequest {
    pub url: String,
    pub data: FilterUpdateData,
}
