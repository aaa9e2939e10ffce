mod backend_bridge;
mod controller;
mod i18n;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::runtime::{self, BackendConfig};
use crate::controller::events::UiEvent;
use crate::i18n::{Lang, Locale};
use crate::ui::app::PanelApp;

#[derive(Debug, Parser)]
#[command(name = "warden-panel", version, about = "Desktop admin panel for a DNS filtering appliance")]
struct Args {
    /// Base URL of the appliance control API.
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,

    /// UI language tag.
    #[arg(long, default_value = "en")]
    lang: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let locale = match Lang::from_tag(&args.lang) {
        Some(lang) => Locale::new(lang),
        None => {
            tracing::warn!(tag = %args.lang, "unknown language tag, falling back to en");
            Locale::default()
        }
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(
        BackendConfig {
            server_url: args.server_url,
            locale,
        },
        cmd_rx,
        ui_tx,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Warden Filtering Panel")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Warden Filtering Panel",
        options,
        Box::new(move |_cc| Ok(Box::new(PanelApp::new(cmd_tx, ui_rx, locale)))),
    )
}
