use eframe::egui::{self, Align, Align2, Color32, Frame, Layout, Margin, RichText, Ui};

use super::style::{palette, severity_colors};
use super::{UiAction, format_date, format_last_fetched};
use crate::alerts::{Alert, AlertFilters, SortKey};
use crate::dashboard::{DashboardController, ToastState};

pub(super) fn header(ui: &mut Ui, controller: &DashboardController) {
    ui.horizontal(|ui| {
        ui.heading(RichText::new("Regulatory Alerts").strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if let Some(stamp) = controller.last_fetched() {
                ui.label(
                    RichText::new(format!("Last updated {}", format_last_fetched(stamp)))
                        .small()
                        .color(palette().text_muted),
                );
            }
        });
    });
}

pub(super) fn stats_bar(ui: &mut Ui, controller: &DashboardController) {
    let palette = palette();
    let loading = controller.activity().loading_stats;
    ui.columns(3, |columns| {
        let cards = [
            ("Total Alerts", controller.stats().map(|s| s.total), palette.text_primary),
            ("Analysed", controller.stats().map(|s| s.analysed), palette.success),
            ("Pending", controller.stats().map(|s| s.pending), palette.pending),
        ];
        for (column, (label, value, accent)) in columns.iter_mut().zip(cards) {
            card_frame().show(column, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(label.to_uppercase()).small().color(palette.text_muted));
                match value {
                    Some(value) if !loading => {
                        ui.label(RichText::new(value.to_string()).size(22.0).color(accent));
                    }
                    _ => {
                        ui.spinner();
                    }
                }
            });
        }
    });
}

pub(super) fn toolbar(ui: &mut Ui, controller: &DashboardController, actions: &mut Vec<UiAction>) {
    let filters = controller.filters();
    let stats = controller.stats();
    let feed_categories = stats.map(|s| s.feed_categories()).unwrap_or_default();
    let categories = stats.map(|s| s.categories()).unwrap_or_default();
    let severities = stats.map(|s| s.severities()).unwrap_or_default();
    let flags = controller.activity();

    ui.horizontal_wrapped(|ui| {
        if let Some(choice) = filter_combo(
            ui,
            "feed_filter",
            "All Feeds",
            filters.feed_category.as_deref(),
            &feed_categories,
        ) {
            actions.push(UiAction::SetFilters(filters.with_feed_category(choice)));
        }
        if let Some(choice) = filter_combo(
            ui,
            "category_filter",
            "All Categories",
            filters.category.as_deref(),
            &categories,
        ) {
            actions.push(UiAction::SetFilters(filters.with_category(choice)));
        }
        if let Some(choice) = filter_combo(
            ui,
            "severity_filter",
            "All Severities",
            filters.severity.as_deref(),
            &severities,
        ) {
            actions.push(UiAction::SetFilters(filters.with_severity(choice)));
        }
        if let Some(choice) = status_combo(ui, filters) {
            actions.push(UiAction::SetFilters(filters.with_analysed(choice)));
        }

        ui.separator();
        ui.label(RichText::new("Sort").color(palette().text_muted));
        let current = controller.sort_key();
        egui::ComboBox::from_id_salt("sort_key")
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                for key in SortKey::ALL {
                    if ui.selectable_label(key == current, key.label()).clicked() && key != current {
                        actions.push(UiAction::SetSortKey(key));
                    }
                }
            });

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let analyse_label = if flags.analysing { "Analysing…" } else { "Analyse" };
            if ui
                .add_enabled(controller.can_analyse(), egui::Button::new(analyse_label))
                .clicked()
            {
                actions.push(UiAction::Analyse);
            }
            let fetch_label = if flags.fetching { "Fetching…" } else { "Fetch Feeds" };
            if ui
                .add_enabled(!flags.fetching, egui::Button::new(fetch_label))
                .clicked()
            {
                actions.push(UiAction::Fetch);
            }
        });
    });
}

/// Returns `Some(new_value)` when the user picked a different option.
fn filter_combo(
    ui: &mut Ui,
    id: &str,
    placeholder: &str,
    current: Option<&str>,
    options: &[&str],
) -> Option<Option<String>> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or(placeholder))
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), placeholder).clicked() {
                picked = Some(None);
            }
            for option in options.iter().filter(|option| !option.is_empty()) {
                if ui
                    .selectable_label(current == Some(*option), *option)
                    .clicked()
                {
                    picked = Some(Some(option.to_string()));
                }
            }
        });
    picked.filter(|choice: &Option<String>| choice.as_deref() != current)
}

fn status_combo(ui: &mut Ui, filters: &AlertFilters) -> Option<Option<bool>> {
    let label = |value: Option<bool>| match value {
        None => "All Status",
        Some(true) => "Analysed",
        Some(false) => "Pending",
    };
    let mut picked = None;
    egui::ComboBox::from_id_salt("status_filter")
        .selected_text(label(filters.analysed))
        .show_ui(ui, |ui| {
            for value in [None, Some(true), Some(false)] {
                if ui
                    .selectable_label(filters.analysed == value, label(value))
                    .clicked()
                {
                    picked = Some(value);
                }
            }
        });
    picked.filter(|choice| *choice != filters.analysed)
}

pub(super) fn alert_list(ui: &mut Ui, controller: &DashboardController, actions: &mut Vec<UiAction>) {
    if controller.activity().loading_alerts && controller.alerts().is_empty() {
        ui.centered_and_justified(|ui| ui.spinner());
        return;
    }
    let sorted = controller.sorted_alerts();
    if sorted.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.label(RichText::new("No alerts found").strong());
            ui.label(
                RichText::new("Try fetching feeds or adjusting your filters.")
                    .small()
                    .color(palette().text_muted),
            );
        });
        return;
    }
    let selected_id = controller.selected_alert().map(|alert| alert.id);
    egui::ScrollArea::vertical()
        .id_salt("alert_list_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for alert in sorted {
                if alert_row(ui, alert, selected_id == Some(alert.id)) {
                    actions.push(UiAction::Select(alert.id));
                }
                ui.add_space(4.0);
            }
        });
}

fn alert_row(ui: &mut Ui, alert: &Alert, selected: bool) -> bool {
    let palette = palette();
    let stroke_color = if selected { palette.accent } else { palette.outline };
    let response = card_frame()
        .stroke(egui::Stroke::new(1.0, stroke_color))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&alert.title).strong());
                if alert.analysed {
                    ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                        severity_badge(ui, &alert.severity);
                    });
                }
            });
            ui.horizontal(|ui| {
                ui.label(RichText::new(&alert.feed_category).small().color(palette.text_muted));
                if alert.analysed && !alert.category.is_empty() {
                    ui.label(RichText::new(&alert.category).small().color(palette.accent));
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(
                        RichText::new(format_date(&alert.published_date))
                            .small()
                            .color(palette.text_muted),
                    );
                });
            });
            if alert.analysed && !alert.summary.is_empty() {
                ui.label(RichText::new(&alert.summary).small().color(palette.text_muted));
            }
        })
        .response;
    response.interact(egui::Sense::click()).clicked()
}

pub(super) fn alert_detail(ui: &mut Ui, controller: &DashboardController, actions: &mut Vec<UiAction>) {
    let palette = palette();
    let Some(alert) = controller.selected_alert() else {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Select an alert to view details").color(palette.text_muted));
        });
        return;
    };
    egui::ScrollArea::vertical()
        .id_salt("alert_detail_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&alert.title);
                ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                    if ui.button("Close").clicked() {
                        actions.push(UiAction::ClearSelection);
                    }
                    if ui.button("Reload").clicked() {
                        actions.push(UiAction::ReloadSelected);
                    }
                });
            });
            ui.horizontal_wrapped(|ui| {
                if alert.analysed {
                    severity_badge(ui, &alert.severity);
                    if !alert.category.is_empty() {
                        ui.label(RichText::new(&alert.category).color(palette.accent));
                    }
                } else {
                    ui.label(RichText::new("Pending analysis").color(palette.pending));
                }
                for part in detail_meta(alert) {
                    ui.label(RichText::new(part).color(palette.text_muted));
                }
            });
            if !alert.link.is_empty() && ui.link(&alert.link).clicked() {
                actions.push(UiAction::OpenLink);
            }
            ui.separator();

            if alert.analysed {
                text_section(ui, "Summary", &alert.summary);
                text_section(ui, "Effective Date", &alert.effective_date);
                list_section(ui, "Subcategories", &alert.subcategories);
                list_section(ui, "Affected Sectors", &alert.affected_sectors);
                list_section(ui, "Action Items", &alert.action_items);
                list_section(ui, "Key Entities", &alert.key_entities);
            }
            egui::CollapsingHeader::new("Raw Content")
                .id_salt("raw_content")
                .show(ui, |ui| {
                    ui.label(RichText::new(&alert.raw_content).small().monospace());
                });
        });
}

/// Feed, source and publication date shown under the detail title.
fn detail_meta(alert: &Alert) -> Vec<String> {
    [
        alert.feed_category.clone(),
        alert.source.clone(),
        format_date(&alert.published_date),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect()
}

fn text_section(ui: &mut Ui, title: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    section_title(ui, title);
    ui.label(body);
    ui.add_space(10.0);
}

fn list_section(ui: &mut Ui, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    section_title(ui, title);
    for item in items {
        ui.label(format!("• {item}"));
    }
    ui.add_space(10.0);
}

fn section_title(ui: &mut Ui, title: &str) {
    ui.label(
        RichText::new(title.to_uppercase())
            .small()
            .strong()
            .color(palette().text_muted),
    );
}

fn severity_badge(ui: &mut Ui, severity: &str) {
    let label = if severity.is_empty() { "Unclassified" } else { severity };
    let (fill, text) = severity_colors(severity);
    Frame::new()
        .fill(fill)
        .corner_radius(3.0)
        .inner_margin(Margin::symmetric(6, 1))
        .show(ui, |ui| {
            ui.label(RichText::new(label).small().color(text));
        });
}

fn card_frame() -> Frame {
    let palette = palette();
    Frame::new()
        .fill(palette.bg_card)
        .stroke(egui::Stroke::new(1.0, palette.outline))
        .corner_radius(4.0)
        .inner_margin(Margin::symmetric(12, 8))
}

pub(super) fn toast_overlay(ctx: &egui::Context, toast: &ToastState) {
    let Some(message) = toast.message.as_deref().filter(|_| toast.visible) else {
        return;
    };
    egui::Area::new(egui::Id::new("dashboard_toast"))
        .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            if toast.exiting {
                ui.set_opacity(0.4);
            }
            card_frame()
                .fill(Color32::WHITE)
                .shadow(egui::epaint::Shadow {
                    offset: [0, 2],
                    blur: 8,
                    spread: 0,
                    color: Color32::from_black_alpha(40),
                })
                .show(ui, |ui| {
                    ui.set_max_width(360.0);
                    ui.label(message);
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_meta_lists_feed_source_and_date() {
        let alert = Alert {
            feed_category: "Banking".into(),
            source: "PRA".into(),
            published_date: "2024-03-15".into(),
            ..Alert::default()
        };
        assert_eq!(detail_meta(&alert), vec!["Banking", "PRA", "15 Mar 2024"]);
    }

    #[test]
    fn detail_meta_skips_missing_parts() {
        let alert = Alert {
            source: "FCA".into(),
            ..Alert::default()
        };
        assert_eq!(detail_meta(&alert), vec!["FCA"]);
    }
}
