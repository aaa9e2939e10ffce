use super::*;
use crate::controller::actions::ModalPayload;
use shared::domain::{CheckResult, FilterEntry, FilteringConfig, FilteringStatusView};

fn entry(url: &str) -> FilterEntry {
    FilterEntry {
        id: 1,
        url: url.to_string(),
        name: "Ads".to_string(),
        enabled: true,
        last_updated: None,
        rules_count: 10,
    }
}

fn processing_flags(state: &FilteringState) -> [bool; 13] {
    [
        state.processing_filters,
        state.processing_rules,
        state.processing_add_filter,
        state.processing_remove_filter,
        state.processing_config_filter,
        state.processing_refresh_filters,
        state.processing_set_config,
        state.processing_check,
        state.processing_upstream_dns_files,
        state.processing_add_upstream_dns_file,
        state.processing_remove_upstream_dns_file,
        state.processing_config_upstream_dns_file,
        state.processing_refresh_upstream_dns_files,
    ]
}

#[test]
fn each_request_sets_exactly_one_processing_flag() {
    let requests = [
        Action::GetFilteringStatusRequest,
        Action::SetRulesRequest,
        Action::AddFilterRequest,
        Action::RemoveFilterRequest,
        Action::ToggleFilterRequest,
        Action::RefreshFiltersRequest,
        Action::SetFiltersConfigRequest,
        Action::CheckHostRequest,
        Action::GetUpstreamDnsFilesStatusRequest,
        Action::AddUpstreamDnsFileRequest,
        Action::RemoveUpstreamDnsFileRequest,
        Action::ToggleUpstreamDnsFileRequest,
        Action::RefreshUpstreamDnsFilesRequest,
    ];

    for request in requests {
        let next = reduce(FilteringState::default(), request.clone());
        let set = processing_flags(&next).iter().filter(|flag| **flag).count();
        assert_eq!(set, 1, "request {request:?} must set exactly one flag");
    }
}

#[test]
fn success_and_failure_both_clear_the_flag() {
    let triples = [
        (
            Action::AddFilterRequest,
            Action::AddFilterSuccess {
                url: "https://x".to_string(),
            },
            Action::AddFilterFailure,
        ),
        (
            Action::RefreshUpstreamDnsFilesRequest,
            Action::RefreshUpstreamDnsFilesSuccess,
            Action::RefreshUpstreamDnsFilesFailure,
        ),
        (
            Action::SetRulesRequest,
            Action::SetRulesSuccess,
            Action::SetRulesFailure,
        ),
    ];

    for (request, success, failure) in triples {
        let pending = reduce(FilteringState::default(), request.clone());

        let after_success = reduce(pending.clone(), success);
        assert_eq!(
            processing_flags(&after_success),
            [false; 13],
            "success after {request:?} must clear the flag"
        );

        let after_failure = reduce(pending, failure);
        assert_eq!(
            processing_flags(&after_failure),
            [false; 13],
            "failure after {request:?} must clear the flag"
        );
    }
}

#[test]
fn toggle_and_edit_share_the_config_flag() {
    let state = reduce(FilteringState::default(), Action::EditFilterRequest);
    assert!(state.processing_config_filter);
    let state = reduce(
        state,
        Action::ToggleFilterSuccess {
            url: "https://x".to_string(),
        },
    );
    assert!(!state.processing_config_filter);
}

#[test]
fn modal_opens_in_edit_mode_and_flips_closed_without_payload() {
    let opened = reduce(
        FilteringState::default(),
        Action::ToggleModal(Some(ModalPayload {
            modal_type: ModalType::EditFilters,
            url: Some("https://x".to_string()),
        })),
    );
    assert!(opened.is_modal_open);
    assert_eq!(opened.modal_type, ModalType::EditFilters);
    assert_eq!(opened.modal_filter_url, "https://x");

    let closed = reduce(opened, Action::ToggleModal(None));
    assert!(!closed.is_modal_open);
    assert_eq!(closed.modal_type, ModalType::None);
}

#[test]
fn close_modal_never_opens_a_closed_modal() {
    let initial = FilteringState::default();
    let after = reduce(initial.clone(), Action::CloseModal);
    assert_eq!(after, initial);

    let opened = reduce(
        initial,
        Action::ToggleModal(Some(ModalPayload {
            modal_type: ModalType::AddFilters,
            url: None,
        })),
    );
    let closed = reduce(opened, Action::CloseModal);
    assert!(!closed.is_modal_open);
    assert_eq!(closed.modal_type, ModalType::None);
    assert!(closed.modal_filter_url.is_empty());
}

#[test]
fn status_success_merges_only_present_fields() {
    let mut state = FilteringState::default();
    state.user_rules = "||ads.example.org^".to_string();
    state.filters = vec![entry("https://x")];

    let view = FilteringStatusView {
        enabled: Some(false),
        interval: Some(12),
        filters: None,
        whitelist_filters: None,
        user_rules: None,
    };
    let next = reduce(state, Action::GetFilteringStatusSuccess(view));

    assert!(!next.enabled);
    assert_eq!(next.interval, 12);
    assert_eq!(next.user_rules, "||ads.example.org^");
    assert_eq!(next.filters, vec![entry("https://x")]);
    assert!(!next.processing_filters);
}

#[test]
fn status_request_clears_the_previous_host_check() {
    let mut state = FilteringState::default();
    state.check = Some(CheckResult {
        hostname: "ads.example.org".to_string(),
        reason: "FilteredBlackList".to_string(),
        rule: None,
        filter_id: None,
        service_name: None,
        cname: None,
        ip_addrs: None,
    });

    let next = reduce(state, Action::GetFilteringStatusRequest);
    assert!(next.check.is_none());
    assert!(next.processing_filters);
}

#[test]
fn add_success_marks_filter_added_until_the_next_modal_toggle() {
    let state = reduce(FilteringState::default(), Action::AddFilterRequest);
    assert!(!state.is_filter_added);

    let state = reduce(
        state,
        Action::AddFilterSuccess {
            url: "https://x".to_string(),
        },
    );
    assert!(state.is_filter_added);

    let state = reduce(state, Action::ToggleModal(None));
    assert!(!state.is_filter_added);
}

#[test]
fn config_success_overwrites_enabled_and_interval() {
    let next = reduce(
        FilteringState::default(),
        Action::SetFiltersConfigSuccess(FilteringConfig {
            enabled: false,
            interval: 72,
        }),
    );
    assert!(!next.enabled);
    assert_eq!(next.interval, 72);
}

#[test]
fn upstream_status_success_replaces_the_file_list() {
    let mut state = FilteringState::default();
    state.upstream_dns_files = vec![entry("https://old")];

    let next = reduce(
        state,
        Action::GetUpstreamDnsFilesStatusSuccess {
            files: vec![entry("https://new")],
        },
    );
    assert_eq!(next.upstream_dns_files, vec![entry("https://new")]);
    assert!(!next.processing_upstream_dns_files);
}

#[test]
fn rules_change_only_touches_user_rules() {
    let initial = FilteringState::default();
    let next = reduce(
        initial.clone(),
        Action::RulesChanged {
            user_rules: "||ads.example.org^".to_string(),
        },
    );
    assert_eq!(next.user_rules, "||ads.example.org^");

    let mut reverted = next;
    reverted.user_rules = String::new();
    assert_eq!(reverted, initial);
}

#[test]
fn default_state_matches_the_documented_defaults() {
    let state = FilteringState::default();
    assert!(state.enabled);
    assert_eq!(state.interval, 24);
    assert!(!state.is_modal_open);
    assert!(state.check.is_none());
    assert_eq!(processing_flags(&state), [false; 13]);
    // No-op application leaves the aggregate untouched.
    assert_eq!(state, FilteringState::default());
}
