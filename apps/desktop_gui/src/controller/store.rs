//! The panel's single source of truth and the pure reducer that owns it.
//!
//! Signals are applied in delivery order by the UI thread; interleaved
//! completions resolve to last-write-wins on the affected fields.

use shared::domain::{CheckResult, FilterEntry, FilteringStatusView};

use crate::controller::actions::{Action, ModalType};

#[derive(Debug, Clone, PartialEq)]
pub struct FilteringState {
    pub is_modal_open: bool,
    pub modal_type: ModalType,
    pub modal_filter_url: String,
    pub is_filter_added: bool,

    /// Newline-delimited custom filtering rules, mirrored from the textarea.
    pub user_rules: String,
    pub filters: Vec<FilterEntry>,
    pub whitelist_filters: Vec<FilterEntry>,
    pub upstream_dns_files: Vec<FilterEntry>,

    pub enabled: bool,
    /// List update interval, in hours.
    pub interval: u32,
    pub check: Option<CheckResult>,

    pub processing_filters: bool,
    pub processing_rules: bool,
    pub processing_add_filter: bool,
    pub processing_remove_filter: bool,
    pub processing_config_filter: bool,
    pub processing_refresh_filters: bool,
    pub processing_set_config: bool,
    pub processing_check: bool,
    pub processing_upstream_dns_files: bool,
    pub processing_add_upstream_dns_file: bool,
    pub processing_remove_upstream_dns_file: bool,
    pub processing_config_upstream_dns_file: bool,
    pub processing_refresh_upstream_dns_files: bool,
}

impl Default for FilteringState {
    fn default() -> Self {
        Self {
            is_modal_open: false,
            modal_type: ModalType::None,
            modal_filter_url: String::new(),
            is_filter_added: false,
            user_rules: String::new(),
            filters: Vec::new(),
            whitelist_filters: Vec::new(),
            upstream_dns_files: Vec::new(),
            enabled: true,
            interval: 24,
            check: None,
            processing_filters: false,
            processing_rules: false,
            processing_add_filter: false,
            processing_remove_filter: false,
            processing_config_filter: false,
            processing_refresh_filters: false,
            processing_set_config: false,
            processing_check: false,
            processing_upstream_dns_files: false,
            processing_add_upstream_dns_file: false,
            processing_remove_upstream_dns_file: false,
            processing_config_upstream_dns_file: false,
            processing_refresh_upstream_dns_files: false,
        }
    }
}

impl FilteringState {
    /// Looks an entry up by its identity key in the given list.
    pub fn entry_by_url<'a>(list: &'a [FilterEntry], url: &str) -> Option<&'a FilterEntry> {
        list.iter().find(|entry| entry.url == url)
    }
}

fn merge_status_view(state: &mut FilteringState, view: FilteringStatusView) {
    if let Some(enabled) = view.enabled {
        state.enabled = enabled;
    }
    if let Some(interval) = view.interval {
        state.interval = interval;
    }
    if let Some(filters) = view.filters {
        state.filters = filters;
    }
    if let Some(whitelist_filters) = view.whitelist_filters {
        state.whitelist_filters = whitelist_filters;
    }
    if let Some(user_rules) = view.user_rules {
        state.user_rules = user_rules;
    }
}

/// Pure, total transition function. Takes the current state by value and
/// returns the next one; the UI thread is the only caller.
pub fn reduce(mut state: FilteringState, action: Action) -> FilteringState {
    match action {
        Action::ToggleModal(Some(payload)) => {
            state.is_modal_open = !state.is_modal_open;
            state.is_filter_added = false;
            state.modal_type = payload.modal_type;
            state.modal_filter_url = payload.url.unwrap_or_default();
        }
        Action::ToggleModal(None) => {
            state.is_modal_open = !state.is_modal_open;
            state.is_filter_added = false;
            state.modal_type = ModalType::None;
        }
        Action::CloseModal => {
            if state.is_modal_open {
                state.is_modal_open = false;
                state.is_filter_added = false;
                state.modal_type = ModalType::None;
                state.modal_filter_url.clear();
            }
        }
        Action::RulesChanged { user_rules } => state.user_rules = user_rules,

        Action::GetFilteringStatusRequest => {
            state.processing_filters = true;
            state.check = None;
        }
        Action::GetFilteringStatusSuccess(view) => {
            merge_status_view(&mut state, view);
            state.processing_filters = false;
        }
        Action::GetFilteringStatusFailure => state.processing_filters = false,

        Action::SetRulesRequest => state.processing_rules = true,
        Action::SetRulesSuccess | Action::SetRulesFailure => state.processing_rules = false,

        Action::AddFilterRequest => {
            state.processing_add_filter = true;
            state.is_filter_added = false;
        }
        Action::AddFilterSuccess { url: _ } => {
            state.processing_add_filter = false;
            state.is_filter_added = true;
        }
        Action::AddFilterFailure => {
            state.processing_add_filter = false;
            state.is_filter_added = false;
        }

        Action::RemoveFilterRequest => state.processing_remove_filter = true,
        Action::RemoveFilterSuccess { url: _ } | Action::RemoveFilterFailure => {
            state.processing_remove_filter = false;
        }

        // Toggle and edit share one flag: both go through set_url.
        Action::ToggleFilterRequest | Action::EditFilterRequest => {
            state.processing_config_filter = true;
        }
        Action::ToggleFilterSuccess { url: _ }
        | Action::ToggleFilterFailure
        | Action::EditFilterSuccess { url: _ }
        | Action::EditFilterFailure => state.processing_config_filter = false,

        Action::RefreshFiltersRequest => state.processing_refresh_filters = true,
        Action::RefreshFiltersSuccess | Action::RefreshFiltersFailure => {
            state.processing_refresh_filters = false;
        }

        Action::SetFiltersConfigRequest => state.processing_set_config = true,
        Action::SetFiltersConfigSuccess(config) => {
            state.enabled = config.enabled;
            state.interval = config.interval;
            state.processing_set_config = false;
        }
        Action::SetFiltersConfigFailure => state.processing_set_config = false,

        Action::CheckHostRequest => state.processing_check = true,
        Action::CheckHostSuccess(result) => {
            state.check = Some(result);
            state.processing_check = false;
        }
        Action::CheckHostFailure => state.processing_check = false,

        Action::GetUpstreamDnsFilesStatusRequest => state.processing_upstream_dns_files = true,
        Action::GetUpstreamDnsFilesStatusSuccess { files } => {
            state.upstream_dns_files = files;
            state.processing_upstream_dns_files = false;
        }
        Action::GetUpstreamDnsFilesStatusFailure => state.processing_upstream_dns_files = false,

        Action::AddUpstreamDnsFileRequest => {
            state.processing_add_upstream_dns_file = true;
            state.is_filter_added = false;
        }
        Action::AddUpstreamDnsFileSuccess { url: _ } => {
            state.processing_add_upstream_dns_file = false;
            state.is_filter_added = true;
        }
        Action::AddUpstreamDnsFileFailure => {
            state.processing_add_upstream_dns_file = false;
            state.is_filter_added = false;
        }

        Action::RemoveUpstreamDnsFileRequest => state.processing_remove_upstream_dns_file = true,
        Action::RemoveUpstreamDnsFileSuccess { url: _ }
        | Action::RemoveUpstreamDnsFileFailure => {
            state.processing_remove_upstream_dns_file = false;
        }

        Action::ToggleUpstreamDnsFileRequest | Action::EditUpstreamDnsFileRequest => {
            state.processing_config_upstream_dns_file = true;
        }
        Action::ToggleUpstreamDnsFileSuccess { url: _ }
        | Action::ToggleUpstreamDnsFileFailure
        | Action::EditUpstreamDnsFileSuccess { url: _ }
        | Action::EditUpstreamDnsFileFailure => {
            state.processing_config_upstream_dns_file = false;
        }

        Action::RefreshUpstreamDnsFilesRequest => {
            state.processing_refresh_upstream_dns_files = true;
        }
        Action::RefreshUpstreamDnsFilesSuccess | Action::RefreshUpstreamDnsFilesFailure => {
            state.processing_refresh_upstream_dns_files = false;
        }
    }

    state
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
