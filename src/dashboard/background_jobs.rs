use std::sync::mpsc::TryRecvError;

use super::state::RefreshCause;
use super::*;
use crate::alerts::{AlertsListResponse, AnalyseResult, ApiError, IngestResult};

#[derive(Clone, Copy)]
enum Landed {
    Stats(RequestId),
    Alerts(RequestId),
}

impl DashboardController {
    pub(super) fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            match message {
                JobMessage::StatsLoaded { request_id, result } => {
                    self.handle_stats_loaded(request_id, result)
                }
                JobMessage::AlertsLoaded { request_id, result } => {
                    self.handle_alerts_loaded(request_id, result)
                }
                JobMessage::AlertLoaded {
                    request_id,
                    alert_id,
                    result,
                } => self.handle_alert_loaded(request_id, alert_id, result),
                JobMessage::IngestFinished { result } => self.handle_ingest_finished(result),
                JobMessage::AnalyseFinished { result } => self.handle_analyse_finished(result),
            }
        }
    }

    fn handle_stats_loaded(&mut self, request_id: RequestId, result: Result<AlertStats, ApiError>) {
        self.in_flight.stats = self.in_flight.stats.saturating_sub(1);
        match result {
            Ok(stats) => {
                tracing::debug!(
                    "Stats loaded: {} total, {} pending",
                    stats.total,
                    stats.pending
                );
                self.stats = Some(stats);
            }
            Err(err) => {
                tracing::warn!("Failed to load stats: {err}");
                self.notify(format!("Failed to load stats: {err}"));
            }
        }
        self.settle_refreshes(Landed::Stats(request_id));
    }

    fn handle_alerts_loaded(
        &mut self,
        request_id: RequestId,
        result: Result<AlertsListResponse, ApiError>,
    ) {
        self.in_flight.alerts = self.in_flight.alerts.saturating_sub(1);
        match result {
            Ok(response) => {
                tracing::debug!("Loaded {} alerts", response.alerts.len());
                self.alerts = response.alerts;
            }
            Err(err) => {
                tracing::warn!("Failed to load alerts: {err}");
                self.notify(format!("Failed to load alerts: {err}"));
            }
        }
        self.settle_refreshes(Landed::Alerts(request_id));
    }

    fn handle_alert_loaded(
        &mut self,
        request_id: RequestId,
        alert_id: i64,
        result: Result<Alert, ApiError>,
    ) {
        if self.pending_open != Some(request_id) {
            tracing::debug!("Dropping superseded response for alert {alert_id}");
            return;
        }
        self.pending_open = None;
        match result {
            Ok(alert) => {
                if let Some(slot) = self.alerts.iter_mut().find(|loaded| loaded.id == alert.id) {
                    *slot = alert.clone();
                }
                self.selected = Some(alert);
            }
            Err(err) => {
                tracing::warn!("Failed to load alert {alert_id}: {err}");
                self.notify(format!("Failed to load alert: {err}"));
            }
        }
    }

    fn handle_ingest_finished(&mut self, result: Result<IngestResult, ApiError>) {
        match result {
            Ok(outcome) => {
                tracing::info!(
                    "Ingestion finished: {} feeds, {} entries, {} new, {} duplicates",
                    outcome.feeds_fetched,
                    outcome.entries_found,
                    outcome.new_alerts,
                    outcome.duplicates_skipped
                );
                for error in &outcome.errors {
                    tracing::warn!("Feed error during ingestion: {error}");
                }
                self.notify(format!(
                    "Fetched {} feeds — {} new alerts, {} duplicates skipped",
                    outcome.feeds_fetched, outcome.new_alerts, outcome.duplicates_skipped
                ));
                self.last_fetched = Some(now_local_or_utc());
                self.begin_refresh(RefreshCause::Fetch);
            }
            Err(err) => {
                tracing::warn!("Fetch failed: {err}");
                self.notify(format!("Fetch failed: {err}"));
                self.fetching = false;
            }
        }
    }

    fn handle_analyse_finished(&mut self, result: Result<AnalyseResult, ApiError>) {
        match result {
            Ok(outcome) => {
                tracing::info!("Classified {} alerts", outcome.analysed_count);
                self.notify(format!("Analysed {} alerts", outcome.analysed_count));
                self.begin_refresh(RefreshCause::Analyse {
                    analysed_ids: outcome.analysed_ids,
                });
            }
            Err(err) => {
                tracing::warn!("Analysis failed: {err}");
                self.notify(format!("Analysis failed: {err}"));
                self.analysing = false;
            }
        }
    }

    fn begin_refresh(&mut self, cause: RefreshCause) {
        let stats = self.load_stats();
        let alerts = self.load_alerts();
        self.refreshes.push(PendingRefresh::new(cause, stats, alerts));
    }

    fn settle_refreshes(&mut self, landed: Landed) {
        if self.refreshes.is_empty() {
            return;
        }
        for refresh in &mut self.refreshes {
            match landed {
                Landed::Stats(request_id) => refresh.stats_landed(request_id),
                Landed::Alerts(request_id) => refresh.alerts_landed(request_id),
            }
        }
        let (done, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.refreshes)
            .into_iter()
            .partition(PendingRefresh::is_complete);
        self.refreshes = waiting;
        for refresh in done {
            self.finish_refresh(refresh.cause);
        }
    }

    fn finish_refresh(&mut self, cause: RefreshCause) {
        match cause {
            RefreshCause::Fetch => self.fetching = false,
            RefreshCause::Analyse { analysed_ids } => {
                self.reresolve_selection(&analysed_ids);
                self.analysing = false;
            }
        }
    }

    // Swap a stale selected alert for its freshly loaded copy.
    fn reresolve_selection(&mut self, analysed_ids: &[i64]) {
        let Some(selected_id) = self.selected.as_ref().map(|alert| alert.id) else {
            return;
        };
        if !analysed_ids.contains(&selected_id) {
            return;
        }
        if let Some(updated) = self.alerts.iter().find(|alert| alert.id == selected_id) {
            self.selected = Some(updated.clone());
        }
    }
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
