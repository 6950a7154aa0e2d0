mod config;
mod domain;
mod infra;
mod logging;
mod ui;
mod usecase;


use tracing::{error, info};

use crate::config::default_webview_data_dir;
use crate::logging::{init_logging, LogConfig};
use crate::ui::app::App;

fn main() {
    if let Err(err) = init_logging(&LogConfig::default()) {
        eprintln!("logging already initialised: {err}");
    }

    let mut desktop = dioxus::desktop::Config::new()
        .with_window(dioxus::desktop::WindowBuilder::new().with_title("Products"));
    match default_webview_data_dir() {
        Ok(dir) => desktop = desktop.with_data_directory(dir),
        Err(err) => error!("cannot prepare webview data directory: {err:#}"),
    }

    info!("starting product table");
    dioxus::LaunchBuilder::desktop().with_cfg(desktop).launch(App);
}
