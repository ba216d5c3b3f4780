//! Entry point for the RegSense alerts dashboard.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::sync::Arc;

use eframe::egui;
use regsense::alerts::HttpAlertsApi;
use regsense::app_dirs::AppDirs;
use regsense::config::{self, AppSettings};
use regsense::dashboard::DashboardController;
use regsense::logging;
use regsense::ui::{DashboardApp, MIN_VIEWPORT_SIZE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match AppDirs::resolve() {
        Ok(dirs) => {
            if let Err(err) = logging::init(&dirs) {
                eprintln!("Logging disabled: {err}");
            }
            config::load_or_default(&dirs).unwrap_or_else(|err| {
                tracing::warn!("Using default settings: {err}");
                AppSettings::default()
            })
        }
        Err(err) => {
            eprintln!("App directory unavailable, using defaults: {err}");
            AppSettings::default()
        }
    };
    tracing::info!("Alerts backend at {}", settings.api.base_url);

    let api = Arc::new(HttpAlertsApi::new(settings.api.base_url.clone()));
    let controller = DashboardController::new(api, settings.api);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("RegSense")
            .with_min_inner_size(MIN_VIEWPORT_SIZE)
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RegSense",
        native_options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(controller)))),
    )?;
    Ok(())
}
