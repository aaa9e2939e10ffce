use super::*;
use async_trait::async_trait;
use crossbeam_channel::{unbounded, Receiver};
use shared::domain::FilteringStatusView;
use shared::protocol::{
    CheckHostResponse, FilteringStatusResponse, RefreshResponse, UpstreamDnsFilesStatusResponse,
};
use std::sync::Mutex;

use crate::controller::events::ToastKind;

struct StubApi {
    fail_with: Option<String>,
    refresh_updated: u64,
    calls: Mutex<Vec<&'static str>>,
    captured_rules: Mutex<Option<Vec<String>>>,
}

impl StubApi {
    fn ok() -> Self {
        Self {
            fail_with: None,
            refresh_updated: 0,
            calls: Mutex::new(Vec::new()),
            captured_rules: Mutex::new(None),
        }
    }

    fn failing(message: impl Into<String>) -> Self {
        let mut stub = Self::ok();
        stub.fail_with = Some(message.into());
        stub
    }

    fn with_refresh_updated(updated: u64) -> Self {
        let mut stub = Self::ok();
        stub.refresh_updated = updated;
        stub
    }

    fn record(&self, name: &'static str) -> Result<(), ApiError> {
        self.calls.lock().expect("calls lock").push(name);
        match &self.fail_with {
            Some(message) => Err(ApiError::Http {
                status: reqwest::StatusCode::BAD_REQUEST,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock").clone()
    }
}

fn empty_status() -> FilteringStatusResponse {
    FilteringStatusResponse {
        enabled: true,
        interval: 24,
        filters: Vec::new(),
        whitelist_filters: Vec::new(),
        user_rules: Vec::new(),
    }
}

#[async_trait]
impl FilteringApi for StubApi {
    async fn get_filtering_status(&self) -> Result<FilteringStatusResponse, ApiError> {
        self.record("get_filtering_status")?;
        Ok(empty_status())
    }

    async fn set_rules(&self, rules: &[String]) -> Result<(), ApiError> {
        self.record("set_rules")?;
        *self.captured_rules.lock().expect("rules lock") = Some(rules.to_vec());
        Ok(())
    }

    async fn add_filter(&self, _req: &AddFilterRequest) -> Result<(), ApiError> {
        self.record("add_filter")
    }

    async fn remove_filter(&self, _req: &RemoveFilterRequest) -> Result<(), ApiError> {
        self.record("remove_filter")
    }

    async fn set_filter_url(&self, _req: &SetFilterUrlRequest) -> Result<(), ApiError> {
        self.record("set_filter_url")
    }

    async fn refresh_filters(&self, _whitelist: bool) -> Result<RefreshResponse, ApiError> {
        self.record("refresh_filters")?;
        Ok(RefreshResponse {
            updated: self.refresh_updated,
        })
    }

    async fn set_filters_config(&self, _config: &FilteringConfig) -> Result<(), ApiError> {
        self.record("set_filters_config")
    }

    async fn check_host(&self, _name: &str) -> Result<CheckHostResponse, ApiError> {
        self.record("check_host")?;
        Ok(CheckHostResponse {
            reason: "FilteredBlackList".to_string(),
            rule: Some("||ads.example.org^".to_string()),
            filter_id: Some(1),
            service_name: None,
            cname: None,
            ip_addrs: None,
        })
    }

    async fn get_upstream_dns_files_status(
        &self,
    ) -> Result<UpstreamDnsFilesStatusResponse, ApiError> {
        self.record("get_upstream_dns_files_status")?;
        Ok(UpstreamDnsFilesStatusResponse {
            files: Vec::new(),
            interval: 24,
        })
    }

    async fn add_upstream_dns_file(&self, _req: &UpstreamDnsAddRequest) -> Result<(), ApiError> {
        self.record("add_upstream_dns_file")
    }

    async fn remove_upstream_dns_file(
        &self,
        _req: &UpstreamDnsRemoveRequest,
    ) -> Result<(), ApiError> {
        self.record("remove_upstream_dns_file")
    }

    async fn set_upstream_dns_file(&self, _req: &UpstreamDnsSetRequest) -> Result<(), ApiError> {
        self.record("set_upstream_dns_file")
    }

    async fn refresh_upstream_dns_files(&self) -> Result<RefreshResponse, ApiError> {
        self.record("refresh_upstream_dns_files")?;
        Ok(RefreshResponse {
            updated: self.refresh_updated,
        })
    }
}

fn drain(rx: &Receiver<UiEvent>) -> Vec<UiEvent> {
    rx.try_iter().collect()
}

fn empty_status_view() -> FilteringStatusView {
    FilteringStatusView {
        enabled: Some(true),
        interval: Some(24),
        filters: Some(Vec::new()),
        whitelist_filters: Some(Vec::new()),
        user_rules: Some(String::new()),
    }
}

const LIST_URL: &str = "https://lists.example.org/ads.txt";

#[tokio::test]
async fn add_filter_success_closes_modal_toasts_and_refetches() {
    let api = StubApi::ok();
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(
        &api,
        &tx,
        &locale,
        BackendCommand::AddFilter {
            url: LIST_URL.to_string(),
            name: "Ads".to_string(),
            whitelist: false,
        },
    )
    .await;

    let events = drain(&rx);
    assert_eq!(
        events,
        vec![
            UiEvent::Action(Action::AddFilterRequest),
            UiEvent::Action(Action::AddFilterSuccess {
                url: LIST_URL.to_string(),
            }),
            UiEvent::Action(Action::CloseModal),
            UiEvent::Toast(Toast::success("Filter list added successfully")),
            UiEvent::Action(Action::GetFilteringStatusRequest),
            UiEvent::Action(Action::GetFilteringStatusSuccess(empty_status_view())),
        ]
    );
    assert_eq!(api.call_names(), vec!["add_filter", "get_filtering_status"]);
}

#[tokio::test]
async fn add_filter_failure_emits_error_toast_then_failure() {
    let api = StubApi::failing("Filter URL is invalid");
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(
        &api,
        &tx,
        &locale,
        BackendCommand::AddFilter {
            url: LIST_URL.to_string(),
            name: "Ads".to_string(),
            whitelist: false,
        },
    )
    .await;

    let events = drain(&rx);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], UiEvent::Action(Action::AddFilterRequest));
    match &events[1] {
        UiEvent::Toast(toast) => {
            assert_eq!(toast.kind, ToastKind::Error);
            assert!(toast.message.contains("Filter URL is invalid"));
        }
        other => panic!("expected error toast, got {other:?}"),
    }
    assert_eq!(events[2], UiEvent::Action(Action::AddFilterFailure));
    // One attempt, no follow-up refetch.
    assert_eq!(api.call_names(), vec!["add_filter"]);
}

#[tokio::test]
async fn toggle_filter_refetches_without_touching_modal() {
    let api = StubApi::ok();
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(
        &api,
        &tx,
        &locale,
        BackendCommand::ToggleFilter {
            url: LIST_URL.to_string(),
            data: FilterUpdateData {
                name: "Ads".to_string(),
                url: LIST_URL.to_string(),
                enabled: false,
            },
            whitelist: false,
        },
    )
    .await;

    let events = drain(&rx);
    assert_eq!(
        events,
        vec![
            UiEvent::Action(Action::ToggleFilterRequest),
            UiEvent::Action(Action::ToggleFilterSuccess {
                url: LIST_URL.to_string(),
            }),
            UiEvent::Action(Action::GetFilteringStatusRequest),
            UiEvent::Action(Action::GetFilteringStatusSuccess(empty_status_view())),
        ]
    );
}

#[tokio::test]
async fn refresh_with_no_updates_reports_up_to_date() {
    let api = StubApi::with_refresh_updated(0);
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(&api, &tx, &locale, BackendCommand::RefreshFilters { whitelist: false }).await;

    let events = drain(&rx);
    assert_eq!(events[0], UiEvent::Action(Action::RefreshFiltersRequest));
    assert_eq!(events[1], UiEvent::ShowLoading);
    assert_eq!(events[2], UiEvent::Action(Action::RefreshFiltersSuccess));
    assert_eq!(
        events[3],
        UiEvent::Toast(Toast::success("All lists are already up to date"))
    );
    assert_eq!(events.last(), Some(&UiEvent::HideLoading));
}

#[tokio::test]
async fn refresh_with_updates_reports_pluralized_count() {
    let api = StubApi::with_refresh_updated(3);
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(&api, &tx, &locale, BackendCommand::RefreshFilters { whitelist: true }).await;

    let events = drain(&rx);
    assert!(events.contains(&UiEvent::Toast(Toast::success("3 lists updated"))));
    assert_eq!(events.last(), Some(&UiEvent::HideLoading));
}

#[tokio::test]
async fn refresh_failure_still_hides_loading_bar() {
    let api = StubApi::failing("update procedure is already running");
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(&api, &tx, &locale, BackendCommand::RefreshFilters { whitelist: false }).await;

    let events = drain(&rx);
    assert_eq!(events[1], UiEvent::ShowLoading);
    assert!(events.contains(&UiEvent::Action(Action::RefreshFiltersFailure)));
    assert_eq!(events.last(), Some(&UiEvent::HideLoading));
}

#[tokio::test]
async fn config_toast_depends_on_enabled_transition() {
    let locale = Locale::default();
    let cases = [
        (true, true, "Configuration saved"),
        (true, false, "Filtering disabled"),
        (false, true, "Filtering enabled"),
    ];

    for (prev_enabled, enabled, expected) in cases {
        let api = StubApi::ok();
        let (tx, rx) = unbounded();
        run_command(
            &api,
            &tx,
            &locale,
            BackendCommand::SetFiltersConfig {
                config: FilteringConfig {
                    enabled,
                    interval: 24,
                },
                prev_enabled,
            },
        )
        .await;

        let events = drain(&rx);
        assert_eq!(events[0], UiEvent::Action(Action::SetFiltersConfigRequest));
        assert_eq!(events[1], UiEvent::Toast(Toast::success(expected)));
        assert_eq!(
            events[2],
            UiEvent::Action(Action::SetFiltersConfigSuccess(FilteringConfig {
                enabled,
                interval: 24,
            }))
        );
    }
}

#[tokio::test]
async fn check_host_success_is_tagged_with_hostname() {
    let api = StubApi::ok();
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(
        &api,
        &tx,
        &locale,
        BackendCommand::CheckHost {
            name: "ads.example.org".to_string(),
        },
    )
    .await;

    let events = drain(&rx);
    assert_eq!(events[0], UiEvent::Action(Action::CheckHostRequest));
    match &events[1] {
        UiEvent::Action(Action::CheckHostSuccess(check)) => {
            assert_eq!(check.hostname, "ads.example.org");
            assert_eq!(check.reason, "FilteredBlackList");
        }
        other => panic!("expected check host success, got {other:?}"),
    }
}

#[tokio::test]
async fn set_rules_normalizes_textarea_before_the_call() {
    let api = StubApi::ok();
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(
        &api,
        &tx,
        &locale,
        BackendCommand::SetRules {
            rules_text: "||ads.example.org^\r\n\n  @@||cdn.example.org^  \n".to_string(),
        },
    )
    .await;

    assert_eq!(
        api.captured_rules.lock().expect("rules lock").take(),
        Some(vec![
            "||ads.example.org^".to_string(),
            "@@||cdn.example.org^".to_string(),
        ])
    );
    let events = drain(&rx);
    assert_eq!(
        events,
        vec![
            UiEvent::Action(Action::SetRulesRequest),
            UiEvent::Toast(Toast::success("Custom filtering rules saved")),
            UiEvent::Action(Action::SetRulesSuccess),
        ]
    );
}

#[tokio::test]
async fn upstream_remove_refetches_upstream_status() {
    let api = StubApi::ok();
    let (tx, rx) = unbounded();
    let locale = Locale::default();

    run_command(
        &api,
        &tx,
        &locale,
        BackendCommand::RemoveUpstreamDnsFile {
            url: "https://dns.example.org/upstreams.txt".to_string(),
        },
    )
    .await;

    assert_eq!(
        api.call_names(),
        vec!["remove_upstream_dns_file", "get_upstream_dns_files_status"]
    );
    let events = drain(&rx);
    assert!(events.contains(&UiEvent::Action(Action::CloseModal)));
    assert!(events.contains(&UiEvent::Toast(Toast::success(
        "Upstream DNS file removed successfully"
    ))));
}
