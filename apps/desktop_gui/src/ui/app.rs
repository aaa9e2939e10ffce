//! The panel application: renders the filtering state and turns user input
//! into backend commands. All authoritative state lives in the store; this
//! module only keeps transient widget state (form fields, pending
//! confirmations, toast timers).

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{FilterEntry, FilterListKind, FilteringConfig};
use shared::protocol::FilterUpdateData;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::actions::{Action, ModalPayload, ModalType};
use crate::controller::events::{Toast, ToastKind, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::store::{reduce, FilteringState};
use crate::i18n::{Locale, MessageKey};

const TOAST_LIFETIME_SECS: f64 = 5.0;

const INTERVAL_OPTIONS: [(u32, &str); 5] = [
    (1, "1 hour"),
    (12, "12 hours"),
    (24, "24 hours"),
    (72, "3 days"),
    (168, "7 days"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Blocklists,
    Allowlists,
    UpstreamDnsFiles,
    CustomRules,
    CheckHost,
    Settings,
}

impl Page {
    fn label(self) -> &'static str {
        match self {
            Page::Blocklists => "Blocklists",
            Page::Allowlists => "Allowlists",
            Page::UpstreamDnsFiles => "Upstream DNS files",
            Page::CustomRules => "Custom rules",
            Page::CheckHost => "Check host",
            Page::Settings => "Settings",
        }
    }

    const ALL: [Page; 6] = [
        Page::Blocklists,
        Page::Allowlists,
        Page::UpstreamDnsFiles,
        Page::CustomRules,
        Page::CheckHost,
        Page::Settings,
    ];
}

struct ActiveToast {
    toast: Toast,
    expires_at: f64,
}

#[derive(Default)]
struct ModalForm {
    url: String,
    name: String,
}

struct PendingDelete {
    kind: FilterListKind,
    url: String,
}

/// One row interaction, collected while rendering and dispatched after the
/// table borrow ends.
enum RowOp {
    Toggle(FilterEntry),
    Edit(FilterEntry),
    Delete(String),
}

pub struct PanelApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    locale: Locale,

    state: FilteringState,
    page: Page,
    bootstrapped: bool,

    toasts: Vec<ActiveToast>,
    page_loading_depth: usize,
    status_line: String,

    // Transient widget state.
    modal_kind: FilterListKind,
    modal_form: ModalForm,
    pending_delete: Option<PendingDelete>,
    check_host_input: String,
    config_draft: Option<FilteringConfig>,
}

impl PanelApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, locale: Locale) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            locale,
            state: FilteringState::default(),
            page: Page::Blocklists,
            bootstrapped: false,
            toasts: Vec::new(),
            page_loading_depth: 0,
            status_line: String::new(),
            modal_kind: FilterListKind::Blocklist,
            modal_form: ModalForm::default(),
            pending_delete: None,
            check_host_input: String::new(),
            config_draft: None,
        }
    }

    fn apply(&mut self, action: Action) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status_line);
    }

    fn drain_events(&mut self, now: f64) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Action(action) => self.apply(action),
                UiEvent::Toast(toast) => self.toasts.push(ActiveToast {
                    toast,
                    expires_at: now + TOAST_LIFETIME_SECS,
                }),
                UiEvent::ShowLoading => self.page_loading_depth += 1,
                UiEvent::HideLoading => {
                    self.page_loading_depth = self.page_loading_depth.saturating_sub(1);
                }
            }
        }
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    fn entries_for(&self, kind: FilterListKind) -> &[FilterEntry] {
        match kind {
            FilterListKind::Blocklist => &self.state.filters,
            FilterListKind::Allowlist => &self.state.whitelist_filters,
            FilterListKind::UpstreamDns => &self.state.upstream_dns_files,
        }
    }

    fn list_processing(&self, kind: FilterListKind) -> bool {
        let state = &self.state;
        match kind {
            FilterListKind::Blocklist | FilterListKind::Allowlist => {
                state.processing_filters
                    || state.processing_add_filter
                    || state.processing_remove_filter
                    || state.processing_config_filter
                    || state.processing_refresh_filters
            }
            FilterListKind::UpstreamDns => {
                state.processing_upstream_dns_files
                    || state.processing_add_upstream_dns_file
                    || state.processing_remove_upstream_dns_file
                    || state.processing_config_upstream_dns_file
                    || state.processing_refresh_upstream_dns_files
            }
        }
    }

    fn refresh_processing(&self, kind: FilterListKind) -> bool {
        match kind {
            FilterListKind::UpstreamDns => self.state.processing_refresh_upstream_dns_files,
            _ => self.state.processing_refresh_filters,
        }
    }

    fn open_modal(&mut self, kind: FilterListKind, modal_type: ModalType, entry: Option<&FilterEntry>) {
        self.modal_kind = kind;
        self.modal_form = match entry {
            Some(entry) => ModalForm {
                url: entry.url.clone(),
                name: entry.name.clone(),
            },
            None => ModalForm::default(),
        };
        let url = entry.map(|entry| entry.url.clone());
        self.apply(Action::ToggleModal(Some(ModalPayload { modal_type, url })));
    }

    fn dispatch_toggle(&mut self, kind: FilterListKind, entry: &FilterEntry) {
        let data = FilterUpdateData {
            name: entry.name.clone(),
            url: entry.url.clone(),
            enabled: !entry.enabled,
        };
        let cmd = match kind {
            FilterListKind::UpstreamDns => BackendCommand::ToggleUpstreamDnsFile {
                url: entry.url.clone(),
                data,
            },
            _ => BackendCommand::ToggleFilter {
                url: entry.url.clone(),
                data,
                whitelist: kind.is_whitelist(),
            },
        };
        self.dispatch(cmd);
    }

    fn dispatch_refresh(&mut self, kind: FilterListKind) {
        let cmd = match kind {
            FilterListKind::UpstreamDns => BackendCommand::RefreshUpstreamDnsFiles,
            _ => BackendCommand::RefreshFilters {
                whitelist: kind.is_whitelist(),
            },
        };
        self.dispatch(cmd);
    }

    fn dispatch_remove(&mut self, kind: FilterListKind, url: String) {
        let cmd = match kind {
            FilterListKind::UpstreamDns => BackendCommand::RemoveUpstreamDnsFile { url },
            _ => BackendCommand::RemoveFilter {
                url,
                whitelist: kind.is_whitelist(),
            },
        };
        self.dispatch(cmd);
    }

    fn submit_modal(&mut self) {
        let kind = self.modal_kind;
        let url = self.modal_form.url.trim().to_string();
        let name = self.modal_form.name.trim().to_string();
        match self.state.modal_type {
            ModalType::AddFilters => {
                let cmd = match kind {
                    FilterListKind::UpstreamDns => BackendCommand::AddUpstreamDnsFile { url, name },
                    _ => BackendCommand::AddFilter {
                        url,
                        name,
                        whitelist: kind.is_whitelist(),
                    },
                };
                self.dispatch(cmd);
            }
            ModalType::EditFilters => {
                let target = self.state.modal_filter_url.clone();
                let enabled = FilteringState::entry_by_url(self.entries_for(kind), &target)
                    .map(|entry| entry.enabled)
                    .unwrap_or(true);
                let data = FilterUpdateData { name, url, enabled };
                let cmd = match kind {
                    FilterListKind::UpstreamDns => BackendCommand::EditUpstreamDnsFile {
                        url: target,
                        data,
                    },
                    _ => BackendCommand::EditFilter {
                        url: target,
                        data,
                        whitelist: kind.is_whitelist(),
                    },
                };
                self.dispatch(cmd);
            }
            ModalType::None => {}
        }
    }

    fn show_list_page(&mut self, ui: &mut egui::Ui, kind: FilterListKind) {
        let entries = self.entries_for(kind).to_vec();
        let processing = self.list_processing(kind);
        let mut ops: Vec<RowOp> = Vec::new();

        ui.heading(match kind {
            FilterListKind::Blocklist => "DNS blocklists",
            FilterListKind::Allowlist => "DNS allowlists",
            FilterListKind::UpstreamDns => "Upstream DNS files",
        });
        ui.add_space(4.0);

        if processing {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label("Working...");
            });
        }

        if entries.is_empty() && !processing {
            ui.label(match kind {
                FilterListKind::UpstreamDns => "No upstream DNS files configured",
                _ => "No lists configured",
            });
        } else {
            egui::Grid::new(("list_grid", kind))
                .striped(true)
                .num_columns(6)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("Enabled");
                    ui.strong("Name");
                    ui.strong("URL");
                    ui.strong("Rules");
                    ui.strong("Last updated");
                    ui.strong("");
                    ui.end_row();

                    for entry in &entries {
                        let mut enabled = entry.enabled;
                        if ui
                            .add_enabled(!processing, egui::Checkbox::without_text(&mut enabled))
                            .changed()
                        {
                            ops.push(RowOp::Toggle(entry.clone()));
                        }
                        ui.label(&entry.name);
                        ui.label(&entry.url);
                        ui.label(entry.rules_count.to_string());
                        ui.label(
                            entry
                                .last_updated
                                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_else(|| "never".to_string()),
                        );
                        ui.horizontal(|ui| {
                            if ui.button("Edit").clicked() {
                                ops.push(RowOp::Edit(entry.clone()));
                            }
                            if ui.button("Delete").clicked() {
                                ops.push(RowOp::Delete(entry.url.clone()));
                            }
                        });
                        ui.end_row();
                    }
                });
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let add_label = match kind {
                FilterListKind::Blocklist => "Add blocklist",
                FilterListKind::Allowlist => "Add allowlist",
                FilterListKind::UpstreamDns => "Add upstream DNS file",
            };
            if ui.button(add_label).clicked() && !self.state.is_modal_open {
                self.open_modal(kind, ModalType::AddFilters, None);
            }
            if ui
                .add_enabled(
                    !self.refresh_processing(kind),
                    egui::Button::new("Check for updates"),
                )
                .clicked()
            {
                self.dispatch_refresh(kind);
            }
        });

        for op in ops {
            match op {
                RowOp::Toggle(entry) => self.dispatch_toggle(kind, &entry),
                RowOp::Edit(entry) => self.open_modal(kind, ModalType::EditFilters, Some(&entry)),
                RowOp::Delete(url) => self.pending_delete = Some(PendingDelete { kind, url }),
            }
        }
    }

    fn show_custom_rules_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Custom filtering rules");
        ui.label("One rule per line. Blank lines are ignored.");
        ui.add_space(4.0);

        let mut text = self.state.user_rules.clone();
        let response = ui.add(
            egui::TextEdit::multiline(&mut text)
                .code_editor()
                .desired_rows(14)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.apply(Action::RulesChanged { user_rules: text });
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    !self.state.processing_rules,
                    egui::Button::new("Apply rules"),
                )
                .clicked()
            {
                let rules_text = self.state.user_rules.clone();
                self.dispatch(BackendCommand::SetRules { rules_text });
            }
            if self.state.processing_rules {
                ui.add(egui::Spinner::new());
            }
        });
    }

    fn show_check_host_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Check host");
        ui.label("Ask the appliance how it would resolve a hostname.");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Hostname:");
            ui.text_edit_singleline(&mut self.check_host_input);
            let name = self.check_host_input.trim().to_string();
            if ui
                .add_enabled(
                    !name.is_empty() && !self.state.processing_check,
                    egui::Button::new("Check"),
                )
                .clicked()
            {
                self.dispatch(BackendCommand::CheckHost { name });
            }
            if self.state.processing_check {
                ui.add(egui::Spinner::new());
            }
        });

        ui.add_space(8.0);
        if let Some(check) = &self.state.check {
            let verdict = if check.is_filtered() {
                egui::RichText::new("Filtered").color(egui::Color32::from_rgb(218, 54, 51))
            } else {
                egui::RichText::new("Not filtered").color(egui::Color32::from_rgb(46, 160, 67))
            };
            ui.horizontal(|ui| {
                ui.strong(&check.hostname);
                ui.label(verdict);
            });
            ui.label(format!("Reason: {}", check.reason));
            if let Some(rule) = &check.rule {
                ui.label(format!("Rule: {rule}"));
            }
            if let Some(filter_id) = check.filter_id {
                ui.label(format!("Filter id: {filter_id}"));
            }
            if let Some(service) = &check.service_name {
                ui.label(format!("Blocked service: {service}"));
            }
            if let Some(cname) = &check.cname {
                ui.label(format!("CNAME: {cname}"));
            }
            if let Some(addrs) = &check.ip_addrs {
                ui.label(format!("Rewritten to: {}", addrs.join(", ")));
            }
        }
    }

    fn show_settings_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Filtering settings");
        ui.add_space(4.0);

        let current = FilteringConfig {
            enabled: self.state.enabled,
            interval: self.state.interval,
        };
        let mut draft = self.config_draft.unwrap_or(current);

        ui.checkbox(&mut draft.enabled, "Enable filtering");
        egui::ComboBox::from_label("List update interval")
            .selected_text(
                INTERVAL_OPTIONS
                    .iter()
                    .find(|(hours, _)| *hours == draft.interval)
                    .map(|(_, label)| *label)
                    .unwrap_or("custom"),
            )
            .show_ui(ui, |ui| {
                for (hours, label) in INTERVAL_OPTIONS {
                    ui.selectable_value(&mut draft.interval, hours, label);
                }
            });
        self.config_draft = Some(draft);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    !self.state.processing_set_config,
                    egui::Button::new("Save"),
                )
                .clicked()
            {
                let prev_enabled = self.state.enabled;
                self.dispatch(BackendCommand::SetFiltersConfig {
                    config: draft,
                    prev_enabled,
                });
            }
            if self.state.processing_set_config {
                ui.add(egui::Spinner::new());
            }
        });
    }

    fn show_modal(&mut self, ctx: &egui::Context) {
        if !self.state.is_modal_open {
            return;
        }
        let modal_type = self.state.modal_type;
        let kind = self.modal_kind;
        let title = match (modal_type, kind) {
            (ModalType::EditFilters, FilterListKind::UpstreamDns) => "Edit upstream DNS file",
            (ModalType::EditFilters, _) => "Edit list",
            (_, FilterListKind::UpstreamDns) => "New upstream DNS file",
            (_, _) => "New list",
        };
        let processing = match kind {
            FilterListKind::UpstreamDns => {
                self.state.processing_add_upstream_dns_file
                    || self.state.processing_config_upstream_dns_file
            }
            _ => self.state.processing_add_filter || self.state.processing_config_filter,
        };

        let mut submit = false;
        let mut cancel = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("modal_form").num_columns(2).show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut self.modal_form.name);
                    ui.end_row();
                    ui.label("URL");
                    ui.text_edit_singleline(&mut self.modal_form.url);
                    ui.end_row();
                });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let ready = !self.modal_form.url.trim().is_empty() && !processing;
                    let submit_label = match modal_type {
                        ModalType::EditFilters => "Save",
                        _ => "Add",
                    };
                    if ui
                        .add_enabled(ready, egui::Button::new(submit_label))
                        .clicked()
                    {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                    if processing {
                        ui.add(egui::Spinner::new());
                    }
                });
            });

        if submit {
            self.submit_modal();
        } else if cancel {
            self.apply(Action::ToggleModal(None));
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending_delete else {
            return;
        };
        let kind = pending.kind;
        let url = pending.url.clone();

        let mut confirmed = false;
        let mut dismissed = false;
        egui::Window::new("Confirm deletion")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(self.locale.text(MessageKey::ListConfirmDelete));
                ui.monospace(&url);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        dismissed = true;
                    }
                });
            });

        if confirmed {
            self.pending_delete = None;
            self.dispatch_remove(kind, url);
        } else if dismissed {
            self.pending_delete = None;
        }
    }

    fn show_toasts(&mut self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toast_stack"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                for active in &self.toasts {
                    let color = match active.toast.kind {
                        ToastKind::Success => egui::Color32::from_rgb(46, 160, 67),
                        ToastKind::Error => egui::Color32::from_rgb(218, 54, 51),
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(color, &active.toast.message);
                    });
                    ui.add_space(4.0);
                }
            });
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.bootstrapped {
            self.bootstrapped = true;
            self.dispatch(BackendCommand::GetFilteringStatus);
            self.dispatch(BackendCommand::GetUpstreamDnsFilesStatus);
        }

        let now = ctx.input(|input| input.time);
        self.drain_events(now);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Warden");
                ui.label("DNS filtering");
                if self.page_loading_depth > 0 {
                    ui.add(egui::Spinner::new());
                    ui.label("Updating lists...");
                }
                if !self.state.enabled {
                    ui.colored_label(
                        egui::Color32::from_rgb(218, 54, 51),
                        "Filtering is disabled",
                    );
                }
            });
        });

        egui::SidePanel::left("nav")
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                for page in Page::ALL {
                    if ui
                        .selectable_label(self.page == page, page.label())
                        .clicked()
                    {
                        self.page = page;
                    }
                }
            });

        if !self.status_line.is_empty() {
            let mut clear = false;
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(&self.status_line);
                    if ui.small_button("x").clicked() {
                        clear = true;
                    }
                });
            });
            if clear {
                self.status_line.clear();
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Blocklists => self.show_list_page(ui, FilterListKind::Blocklist),
            Page::Allowlists => self.show_list_page(ui, FilterListKind::Allowlist),
            Page::UpstreamDnsFiles => self.show_list_page(ui, FilterListKind::UpstreamDns),
            Page::CustomRules => self.show_custom_rules_page(ui),
            Page::CheckHost => self.show_check_host_page(ui),
            Page::Settings => self.show_settings_page(ui),
        });

        self.show_modal(ctx);
        self.show_delete_confirmation(ctx);
        self.show_toasts(ctx);

        // Completions arrive on a channel; keep polling while idle.
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}
