//! Runtime bridge between the UI command queue and the appliance API.
//!
//! A dedicated worker thread owns the tokio runtime and the HTTP client;
//! the UI never performs I/O. Every command follows the same template:
//! emit the request signal, perform exactly one HTTP call, then either emit
//! the success signal (plus toast, modal close and an explicit status
//! refetch where the operation calls for it) or an error toast followed by
//! the failure signal. The failure path always clears the processing flag,
//! so a failed attempt cannot leave the UI stuck loading.

use crossbeam_channel::{Receiver, Sender};

use client_core::{
    filtering_status_view, normalize_rules_textarea, upstream_files_from_wire, ApiError,
    ApplianceClient, FilteringApi,
};
use shared::domain::{CheckResult, FilteringConfig};
use shared::protocol::{
    AddFilterRequest, FilterUpdateData, RemoveFilterRequest, SetFilterUrlRequest,
    UpstreamDnsAddRequest, UpstreamDnsRemoveRequest, UpstreamDnsSetRequest,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::actions::Action;
use crate::controller::events::{describe_api_error, Toast, UiEvent};
use crate::i18n::{CountedMessageKey, Locale, MessageKey};

pub struct BackendConfig {
    pub server_url: String,
    pub locale: Locale,
}

pub fn launch(config: BackendConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                emit(
                    &ui_tx,
                    UiEvent::Toast(Toast::error(format!(
                        "backend worker startup failure: failed to build runtime: {err}"
                    ))),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match ApplianceClient::new(&config.server_url) {
                Ok(client) => client,
                Err(err) => {
                    emit(
                        &ui_tx,
                        UiEvent::Toast(Toast::error(format!(
                            "invalid appliance url '{}': {err}",
                            config.server_url
                        ))),
                    );
                    tracing::error!(url = %config.server_url, "invalid appliance url: {err}");
                    return;
                }
            };

            while let Ok(cmd) = cmd_rx.recv() {
                run_command(&client, &ui_tx, &config.locale, cmd).await;
            }
        });
    });
}

pub async fn run_command(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    cmd: BackendCommand,
) {
    match cmd {
        BackendCommand::GetFilteringStatus => get_filtering_status(api, ui).await,
        BackendCommand::SetRules { rules_text } => set_rules(api, ui, locale, &rules_text).await,
        BackendCommand::AddFilter {
            url,
            name,
            whitelist,
        } => add_filter(api, ui, locale, url, name, whitelist).await,
        BackendCommand::RemoveFilter { url, whitelist } => {
            remove_filter(api, ui, locale, url, whitelist).await
        }
        BackendCommand::ToggleFilter {
            url,
            data,
            whitelist,
        } => toggle_filter(api, ui, url, data, whitelist).await,
        BackendCommand::EditFilter {
            url,
            data,
            whitelist,
        } => edit_filter(api, ui, locale, url, data, whitelist).await,
        BackendCommand::RefreshFilters { whitelist } => {
            refresh_filters(api, ui, locale, whitelist).await
        }
        BackendCommand::SetFiltersConfig {
            config,
            prev_enabled,
        } => set_filters_config(api, ui, locale, config, prev_enabled).await,
        BackendCommand::CheckHost { name } => check_host(api, ui, name).await,
        BackendCommand::GetUpstreamDnsFilesStatus => get_upstream_dns_files_status(api, ui).await,
        BackendCommand::AddUpstreamDnsFile { url, name } => {
            add_upstream_dns_file(api, ui, locale, url, name).await
        }
        BackendCommand::RemoveUpstreamDnsFile { url } => {
            remove_upstream_dns_file(api, ui, locale, url).await
        }
        BackendCommand::ToggleUpstreamDnsFile { url, data } => {
            toggle_upstream_dns_file(api, ui, url, data).await
        }
        BackendCommand::EditUpstreamDnsFile { url, data } => {
            edit_upstream_dns_file(api, ui, locale, url, data).await
        }
        BackendCommand::RefreshUpstreamDnsFiles => {
            refresh_upstream_dns_files(api, ui, locale).await
        }
    }
}

fn emit(ui: &Sender<UiEvent>, event: UiEvent) {
    if ui.send(event).is_err() {
        tracing::warn!("ui event receiver dropped; event discarded");
    }
}

fn emit_action(ui: &Sender<UiEvent>, action: Action) {
    emit(ui, UiEvent::Action(action));
}

fn emit_error(ui: &Sender<UiEvent>, err: &ApiError) {
    tracing::error!("appliance call failed: {err}");
    emit(ui, UiEvent::Toast(Toast::error(describe_api_error(err))));
}

fn emit_success_toast(ui: &Sender<UiEvent>, locale: &Locale, key: MessageKey) {
    emit(ui, UiEvent::Toast(Toast::success(locale.text(key))));
}

async fn get_filtering_status(api: &dyn FilteringApi, ui: &Sender<UiEvent>) {
    emit_action(ui, Action::GetFilteringStatusRequest);
    match api.get_filtering_status().await {
        Ok(status) => emit_action(
            ui,
            Action::GetFilteringStatusSuccess(filtering_status_view(status)),
        ),
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::GetFilteringStatusFailure);
        }
    }
}

async fn set_rules(api: &dyn FilteringApi, ui: &Sender<UiEvent>, locale: &Locale, text: &str) {
    emit_action(ui, Action::SetRulesRequest);
    let rules = normalize_rules_textarea(text);
    match api.set_rules(&rules).await {
        Ok(()) => {
            emit_success_toast(ui, locale, MessageKey::UpdatedCustomFilteringToast);
            emit_action(ui, Action::SetRulesSuccess);
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::SetRulesFailure);
        }
    }
}

async fn add_filter(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    url: String,
    name: String,
    whitelist: bool,
) {
    emit_action(ui, Action::AddFilterRequest);
    let req = AddFilterRequest {
        url: url.clone(),
        name,
        whitelist,
    };
    match api.add_filter(&req).await {
        Ok(()) => {
            emit_action(ui, Action::AddFilterSuccess { url });
            emit_action(ui, Action::CloseModal);
            emit_success_toast(ui, locale, MessageKey::FilterAddedSuccessfully);
            get_filtering_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::AddFilterFailure);
        }
    }
}

async fn remove_filter(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    url: String,
    whitelist: bool,
) {
    emit_action(ui, Action::RemoveFilterRequest);
    let req = RemoveFilterRequest {
        url: url.clone(),
        whitelist,
    };
    match api.remove_filter(&req).await {
        Ok(()) => {
            emit_action(ui, Action::RemoveFilterSuccess { url });
            emit_action(ui, Action::CloseModal);
            emit_success_toast(ui, locale, MessageKey::FilterRemovedSuccessfully);
            get_filtering_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::RemoveFilterFailure);
        }
    }
}

async fn toggle_filter(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    url: String,
    data: FilterUpdateData,
    whitelist: bool,
) {
    emit_action(ui, Action::ToggleFilterRequest);
    let req = SetFilterUrlRequest {
        url: url.clone(),
        whitelist,
        data,
    };
    match api.set_filter_url(&req).await {
        Ok(()) => {
            emit_action(ui, Action::ToggleFilterSuccess { url });
            get_filtering_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::ToggleFilterFailure);
        }
    }
}

async fn edit_filter(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    url: String,
    data: FilterUpdateData,
    whitelist: bool,
) {
    emit_action(ui, Action::EditFilterRequest);
    let req = SetFilterUrlRequest {
        url: url.clone(),
        whitelist,
        data,
    };
    match api.set_filter_url(&req).await {
        Ok(()) => {
            emit_action(ui, Action::EditFilterSuccess { url });
            emit_action(ui, Action::CloseModal);
            emit_success_toast(ui, locale, MessageKey::FilterUpdated);
            get_filtering_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::EditFilterFailure);
        }
    }
}

async fn refresh_filters(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    whitelist: bool,
) {
    emit_action(ui, Action::RefreshFiltersRequest);
    emit(ui, UiEvent::ShowLoading);
    match api.refresh_filters(whitelist).await {
        Ok(resp) => {
            emit_action(ui, Action::RefreshFiltersSuccess);
            let message = if resp.updated > 0 {
                locale.text_count(CountedMessageKey::ListUpdated, resp.updated)
            } else {
                locale.text(MessageKey::AllListsUpToDateToast).to_string()
            };
            emit(ui, UiEvent::Toast(Toast::success(message)));
            get_filtering_status(api, ui).await;
            emit(ui, UiEvent::HideLoading);
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::RefreshFiltersFailure);
            emit(ui, UiEvent::HideLoading);
        }
    }
}

async fn set_filters_config(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    config: FilteringConfig,
    prev_enabled: bool,
) {
    emit_action(ui, Action::SetFiltersConfigRequest);
    // The toast depends on whether the global switch flipped, decided
    // against the pre-call value.
    let message_key = if prev_enabled != config.enabled {
        if config.enabled {
            MessageKey::EnabledFilteringToast
        } else {
            MessageKey::DisabledFilteringToast
        }
    } else {
        MessageKey::ConfigSuccessfullySaved
    };
    match api.set_filters_config(&config).await {
        Ok(()) => {
            emit_success_toast(ui, locale, message_key);
            emit_action(ui, Action::SetFiltersConfigSuccess(config));
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::SetFiltersConfigFailure);
        }
    }
}

async fn check_host(api: &dyn FilteringApi, ui: &Sender<UiEvent>, name: String) {
    emit_action(ui, Action::CheckHostRequest);
    match api.check_host(&name).await {
        Ok(resp) => emit_action(
            ui,
            Action::CheckHostSuccess(CheckResult {
                hostname: name,
                reason: resp.reason,
                rule: resp.rule,
                filter_id: resp.filter_id,
                service_name: resp.service_name,
                cname: resp.cname,
                ip_addrs: resp.ip_addrs,
            }),
        ),
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::CheckHostFailure);
        }
    }
}

async fn get_upstream_dns_files_status(api: &dyn FilteringApi, ui: &Sender<UiEvent>) {
    emit_action(ui, Action::GetUpstreamDnsFilesStatusRequest);
    match api.get_upstream_dns_files_status().await {
        Ok(status) => emit_action(
            ui,
            Action::GetUpstreamDnsFilesStatusSuccess {
                files: upstream_files_from_wire(status),
            },
        ),
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::GetUpstreamDnsFilesStatusFailure);
        }
    }
}

async fn add_upstream_dns_file(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    url: String,
    name: String,
) {
    emit_action(ui, Action::AddUpstreamDnsFileRequest);
    let req = UpstreamDnsAddRequest {
        url: url.clone(),
        name,
    };
    match api.add_upstream_dns_file(&req).await {
        Ok(()) => {
            emit_action(ui, Action::AddUpstreamDnsFileSuccess { url });
            emit_action(ui, Action::CloseModal);
            emit_success_toast(ui, locale, MessageKey::UpstreamDnsFileAddedSuccessfully);
            get_upstream_dns_files_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::AddUpstreamDnsFileFailure);
        }
    }
}

async fn remove_upstream_dns_file(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    url: String,
) {
    emit_action(ui, Action::RemoveUpstreamDnsFileRequest);
    let req = UpstreamDnsRemoveRequest { url: url.clone() };
    match api.remove_upstream_dns_file(&req).await {
        Ok(()) => {
            emit_action(ui, Action::RemoveUpstreamDnsFileSuccess { url });
            emit_action(ui, Action::CloseModal);
            emit_success_toast(ui, locale, MessageKey::UpstreamDnsFileRemovedSuccessfully);
            get_upstream_dns_files_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::RemoveUpstreamDnsFileFailure);
        }
    }
}

async fn toggle_upstream_dns_file(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    url: String,
    data: FilterUpdateData,
) {
    emit_action(ui, Action::ToggleUpstreamDnsFileRequest);
    let req = UpstreamDnsSetRequest {
        url: url.clone(),
        data,
    };
    match api.set_upstream_dns_file(&req).await {
        Ok(()) => {
            emit_action(ui, Action::ToggleUpstreamDnsFileSuccess { url });
            get_upstream_dns_files_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::ToggleUpstreamDnsFileFailure);
        }
    }
}

async fn edit_upstream_dns_file(
    api: &dyn FilteringApi,
    ui: &Sender<UiEvent>,
    locale: &Locale,
    url: String,
    data: FilterUpdateData,
) {
    emit_action(ui, Action::EditUpstreamDnsFileRequest);
    let req = UpstreamDnsSetRequest {
        url: url.clone(),
        data,
    };
    match api.set_upstream_dns_file(&req).await {
        Ok(()) => {
            emit_action(ui, Action::EditUpstreamDnsFileSuccess { url });
            emit_action(ui, Action::CloseModal);
            emit_success_toast(ui, locale, MessageKey::UpstreamDnsFileUpdated);
            get_upstream_dns_files_status(api, ui).await;
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::EditUpstreamDnsFileFailure);
        }
    }
}

async fn refresh_upstream_dns_files(api: &dyn FilteringApi, ui: &Sender<UiEvent>, locale: &Locale) {
    emit_action(ui, Action::RefreshUpstreamDnsFilesRequest);
    emit(ui, UiEvent::ShowLoading);
    match api.refresh_upstream_dns_files().await {
        Ok(resp) => {
            emit_action(ui, Action::RefreshUpstreamDnsFilesSuccess);
            let message = if resp.updated > 0 {
                locale.text_count(CountedMessageKey::UpstreamDnsFilesUpdated, resp.updated)
            } else {
                locale
                    .text(MessageKey::UpstreamDnsFilesUpToDateToast)
                    .to_string()
            };
            emit(ui, UiEvent::Toast(Toast::success(message)));
            get_upstream_dns_files_status(api, ui).await;
            emit(ui, UiEvent::HideLoading);
        }
        Err(err) => {
            emit_error(ui, &err);
            emit_action(ui, Action::RefreshUpstreamDnsFilesFailure);
            emit(ui, UiEvent::HideLoading);
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
