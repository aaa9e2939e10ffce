//! Backend commands queued from UI to the backend worker.

use shared::domain::FilteringConfig;
use shared::protocol::FilterUpdateData;

#[derive(Debug, Clone)]
pub enum BackendCommand {
    GetFilteringStatus,
    SetRules {
        rules_text: String,
    },
    AddFilter {
        url: String,
        name: String,
        whitelist: bool,
    },
    RemoveFilter {
        url: String,
        whitelist: bool,
    },
    ToggleFilter {
        url: String,
        data: FilterUpdateData,
        whitelist: bool,
    },
    EditFilter {
        url: String,
        data: FilterUpdateData,
        whitelist: bool,
    },
    RefreshFilters {
        whitelist: bool,
    },
    SetFiltersConfig {
        config: FilteringConfig,
        /// `enabled` before the user's change, sampled at dispatch time; the
        /// success toast depends on whether it flipped.
        prev_enabled: bool,
    },
    CheckHost {
        name: String,
    },
    GetUpstreamDnsFilesStatus,
    AddUpstreamDnsFile {
        url: String,
        name: String,
    },
    RemoveUpstreamDnsFile {
        url: String,
    },
    ToggleUpstreamDnsFile {
        url: String,
        data: FilterUpdateData,
    },
    EditUpstreamDnsFile {
        url: String,
        data: FilterUpdateData,
    },
    RefreshUpstreamDnsFiles,
}
