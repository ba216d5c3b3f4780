//! egui renderer for the dashboard.
//!
//! Panels read the controller through shared references and report clicks as
//! [`UiAction`]s, which are applied once the frame has been laid out.

mod panels;
mod style;

use std::time::Instant;

use eframe::egui;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::alerts::{AlertFilters, SortKey};
use crate::dashboard::DashboardController;
use crate::dashboard::sort::parse_published;

/// Smallest window size the layout still works at.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(900.0, 560.0);

/// User intents collected while rendering a frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum UiAction {
    SetFilters(AlertFilters),
    SetSortKey(SortKey),
    Fetch,
    Analyse,
    Select(i64),
    ClearSelection,
    ReloadSelected,
    OpenLink,
}

/// eframe application wrapping the dashboard controller.
pub struct DashboardApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl DashboardApp {
    /// Wrap `controller` and start the initial stats and alerts loads.
    pub fn new(mut controller: DashboardController) -> Self {
        controller.mount();
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::light();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SetFilters(filters) => self.controller.set_filters(filters),
            UiAction::SetSortKey(key) => self.controller.set_sort_key(key),
            UiAction::Fetch => self.controller.trigger_fetch(),
            UiAction::Analyse => self.controller.trigger_analyse(),
            UiAction::Select(id) => self.controller.select_alert(id),
            UiAction::ClearSelection => self.controller.clear_selection(),
            UiAction::ReloadSelected => {
                if let Some(id) = self.controller.selected_alert().map(|alert| alert.id) {
                    self.controller.open_alert(id);
                }
            }
            UiAction::OpenLink => self.controller.open_selected_link(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.tick(now);
        self.apply_visuals(ctx);

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("dashboard_header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(12)))
            .show(ctx, |ui| {
                panels::header(ui, &self.controller);
                ui.add_space(8.0);
                panels::stats_bar(ui, &self.controller);
                ui.add_space(8.0);
                panels::toolbar(ui, &self.controller, &mut actions);
            });
        egui::SidePanel::left("alert_list")
            .resizable(true)
            .default_width(440.0)
            .show(ctx, |ui| panels::alert_list(ui, &self.controller, &mut actions));
        egui::CentralPanel::default()
            .show(ctx, |ui| panels::alert_detail(ui, &self.controller, &mut actions));
        panels::toast_overlay(ctx, &self.controller.toast());

        for action in actions {
            self.apply(action);
        }
        if let Some(delay) = self.controller.repaint_after(now) {
            ctx.request_repaint_after(delay);
        }
    }
}

/// Render a feed date as `1 Jan 2024`; unparseable text is shown unchanged.
pub fn format_date(value: &str) -> String {
    const DATE_FORMAT: &[BorrowedFormatItem<'_>] =
        format_description!("[day padding:none] [month repr:short] [year]");
    if value.trim().is_empty() {
        return String::new();
    }
    parse_published(value.trim())
        .and_then(|stamp| stamp.format(DATE_FORMAT).ok())
        .unwrap_or_else(|| value.to_string())
}

/// Render the last ingestion time as `5 Mar, 14:02`.
pub fn format_last_fetched(stamp: OffsetDateTime) -> String {
    const STAMP_FORMAT: &[BorrowedFormatItem<'_>] =
        format_description!("[day padding:none] [month repr:short], [hour]:[minute]");
    stamp
        .format(STAMP_FORMAT)
        .unwrap_or_else(|_| stamp.to_string())
}
