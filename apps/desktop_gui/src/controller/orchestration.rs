//! Command orchestration helpers from UI actions to the backend queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::GetFilteringStatus => "get_filtering_status",
        BackendCommand::SetRules { .. } => "set_rules",
        BackendCommand::AddFilter { .. } => "add_filter",
        BackendCommand::RemoveFilter { .. } => "remove_filter",
        BackendCommand::ToggleFilter { .. } => "toggle_filter",
        BackendCommand::EditFilter { .. } => "edit_filter",
        BackendCommand::RefreshFilters { .. } => "refresh_filters",
        BackendCommand::SetFiltersConfig { .. } => "set_filters_config",
        BackendCommand::CheckHost { .. } => "check_host",
        BackendCommand::GetUpstreamDnsFilesStatus => "get_upstream_dns_files_status",
        BackendCommand::AddUpstreamDnsFile { .. } => "add_upstream_dns_file",
        BackendCommand::RemoveUpstreamDnsFile { .. } => "remove_upstream_dns_file",
        BackendCommand::ToggleUpstreamDnsFile { .. } => "toggle_upstream_dns_file",
        BackendCommand::EditUpstreamDnsFile { .. } => "edit_upstream_dns_file",
        BackendCommand::RefreshUpstreamDnsFiles => "refresh_upstream_dns_files",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup failure); restart the panel"
                    .to_string();
        }
    }
}
