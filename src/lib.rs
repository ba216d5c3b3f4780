//! Library exports for reuse in benchmarks and tests.
/// Alert records and the backend client.
pub mod alerts;
/// Application directory resolution.
pub mod app_dirs;
/// Persisted settings.
pub mod config;
/// Dashboard state orchestration: sorting, toasts and background loads.
pub mod dashboard;
pub(crate) mod http_client;
/// Tracing setup.
pub mod logging;
/// egui renderer for the dashboard.
pub mod ui;
