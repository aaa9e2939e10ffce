//! State-transition signals folded by the filtering store.
//!
//! Every async operation family contributes a request/success/failure triple;
//! the remaining variants are user-intent signals. The enum is closed, so the
//! reducer's match is checked for coverage at compile time.

use shared::domain::{CheckResult, FilterEntry, FilteringConfig, FilteringStatusView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalType {
    #[default]
    None,
    AddFilters,
    EditFilters,
}

/// Payload of a modal toggle that opens the dialog. `url` identifies the
/// entry being edited; absent for add mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalPayload {
    pub modal_type: ModalType,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// With a payload: flip the modal open in the given mode. Without one:
    /// flip it closed and forget the mode.
    ToggleModal(Option<ModalPayload>),
    /// Close the modal if it is open; never opens a closed one. Emitted by
    /// the command layer after successful add/remove/edit.
    CloseModal,
    RulesChanged {
        user_rules: String,
    },

    GetFilteringStatusRequest,
    GetFilteringStatusSuccess(FilteringStatusView),
    GetFilteringStatusFailure,

    SetRulesRequest,
    SetRulesSuccess,
    SetRulesFailure,

    AddFilterRequest,
    AddFilterSuccess { url: String },
    AddFilterFailure,

    RemoveFilterRequest,
    RemoveFilterSuccess { url: String },
    RemoveFilterFailure,

    ToggleFilterRequest,
    ToggleFilterSuccess { url: String },
    ToggleFilterFailure,

    EditFilterRequest,
    EditFilterSuccess { url: String },
    EditFilterFailure,

    RefreshFiltersRequest,
    RefreshFiltersSuccess,
    RefreshFiltersFailure,

    SetFiltersConfigRequest,
    SetFiltersConfigSuccess(FilteringConfig),
    SetFiltersConfigFailure,

    CheckHostRequest,
    CheckHostSuccess(CheckResult),
    CheckHostFailure,

    GetUpstreamDnsFilesStatusRequest,
    GetUpstreamDnsFilesStatusSuccess { files: Vec<FilterEntry> },
    GetUpstreamDnsFilesStatusFailure,

    AddUpstreamDnsFileRequest,
    AddUpstreamDnsFileSuccess { url: String },
    AddUpstreamDnsFileFailure,

    RemoveUpstreamDnsFileRequest,
    RemoveUpstreamDnsFileSuccess { url: String },
    RemoveUpstreamDnsFileFailure,

    ToggleUpstreamDnsFileRequest,
    ToggleUpstreamDnsFileSuccess { url: String },
    ToggleUpstreamDnsFileFailure,

    EditUpstreamDnsFileRequest,
    EditUpstreamDnsFileSuccess { url: String },
    EditUpstreamDnsFileFailure,

    RefreshUpstreamDnsFilesRequest,
    RefreshUpstreamDnsFilesSuccess,
    RefreshUpstreamDnsFilesFailure,
}
