//! State orchestration for the alerts dashboard.
//!
//! [`DashboardController`] owns every piece of mutable dashboard state. The
//! renderer reads snapshots and calls controller methods; network work runs as
//! background jobs whose results are applied on the owning thread by
//! [`DashboardController::tick`].

mod background_jobs;
mod jobs;
pub mod sort;
mod state;
pub mod toast;


use std::sync::Arc;
use std::time::{Duration, Instant};

use time::OffsetDateTime;

use crate::alerts::{Alert, AlertFilters, AlertStats, AlertsApi, SortKey};
use crate::config::ApiSettings;
use jobs::{ControllerJobs, JobMessage, guarded};
use state::{InFlightLoads, PendingRefresh};

pub use jobs::{JobMode, RequestId};
pub use sort::{SeverityRanks, SortEngine, sort_alerts};
pub use state::ActivityFlags;
pub use toast::{ToastController, ToastPhase, ToastState};

/// Largest classification batch the backend accepts.
pub const MAX_ANALYSE_BATCH: u32 = 200;

/// Owns alerts, stats, filters, selection and activity flags.
pub struct DashboardController {
    api: Arc<dyn AlertsApi>,
    settings: ApiSettings,
    jobs: ControllerJobs,
    toast: ToastController,
    sort_engine: SortEngine,
    now: Instant,
    alerts: Vec<Alert>,
    stats: Option<AlertStats>,
    filters: AlertFilters,
    sort_key: SortKey,
    selected: Option<Alert>,
    pending_open: Option<RequestId>,
    in_flight: InFlightLoads,
    fetching: bool,
    analysing: bool,
    last_fetched: Option<OffsetDateTime>,
    refreshes: Vec<PendingRefresh>,
}

impl DashboardController {
    /// Create a controller whose network calls run on background threads.
    pub fn new(api: Arc<dyn AlertsApi>, settings: ApiSettings) -> Self {
        Self::with_job_mode(api, settings, JobMode::Threaded)
    }

    pub fn with_job_mode(api: Arc<dyn AlertsApi>, settings: ApiSettings, mode: JobMode) -> Self {
        Self {
            api,
            settings: settings.normalized(),
            jobs: ControllerJobs::new(mode),
            toast: ToastController::default(),
            sort_engine: SortEngine::default(),
            now: Instant::now(),
            alerts: Vec::new(),
            stats: None,
            filters: AlertFilters::default(),
            sort_key: SortKey::default(),
            selected: None,
            pending_open: None,
            in_flight: InFlightLoads::default(),
            fetching: false,
            analysing: false,
            last_fetched: None,
            refreshes: Vec::new(),
        }
    }

    /// Start the two independent initial loads.
    pub fn mount(&mut self) {
        self.load_stats();
        self.load_alerts();
    }

    /// Reload aggregate stats.
    pub fn load_stats(&mut self) -> RequestId {
        let request_id = self.jobs.next_request_id();
        self.in_flight.stats += 1;
        let api = Arc::clone(&self.api);
        self.jobs.spawn("stats", move || JobMessage::StatsLoaded {
            request_id,
            result: guarded("stats", || api.stats()),
        });
        request_id
    }

    /// Reload the alert collection with the current filters.
    pub fn load_alerts(&mut self) -> RequestId {
        let request_id = self.jobs.next_request_id();
        self.in_flight.alerts += 1;
        let api = Arc::clone(&self.api);
        let filters = self.filters.clone();
        let limit = self.settings.list_limit;
        self.jobs.spawn("alerts", move || JobMessage::AlertsLoaded {
            request_id,
            result: guarded("alerts", || api.list_alerts(&filters, limit, 0)),
        });
        request_id
    }

    /// Replace the filters wholesale; a changed value reloads the alerts once.
    pub fn set_filters(&mut self, filters: AlertFilters) {
        if filters == self.filters {
            return;
        }
        tracing::debug!("Filters changed to {filters:?}");
        self.filters = filters;
        self.load_alerts();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    /// Ask the backend to ingest its feeds. Ignored while a fetch is running.
    pub fn trigger_fetch(&mut self) {
        if self.fetching {
            tracing::debug!("Fetch already in progress; ignoring trigger");
            return;
        }
        self.fetching = true;
        let api = Arc::clone(&self.api);
        self.jobs.spawn("ingest", move || JobMessage::IngestFinished {
            result: guarded("ingest", || api.trigger_fetch()),
        });
    }

    /// Ask the backend to classify pending alerts. Ignored while a batch is running.
    pub fn trigger_analyse(&mut self) {
        if self.analysing {
            tracing::debug!("Analysis already in progress; ignoring trigger");
            return;
        }
        self.analysing = true;
        let limit = self.analyse_batch_size();
        let api = Arc::clone(&self.api);
        self.jobs.spawn("analyse", move || JobMessage::AnalyseFinished {
            result: guarded("analyse", || api.trigger_analyse(limit)),
        });
    }

    /// Whether the Analyse action should be offered: idle, with pending alerts.
    pub fn can_analyse(&self) -> bool {
        !self.analysing && self.stats.as_ref().is_some_and(|stats| stats.pending > 0)
    }

    /// Batch size for the next classification request.
    pub fn analyse_batch_size(&self) -> u32 {
        let wanted = match &self.stats {
            Some(stats) => u32::try_from(stats.pending).unwrap_or(u32::MAX),
            None => self.settings.default_analyse_batch,
        };
        wanted.clamp(1, MAX_ANALYSE_BATCH)
    }

    /// Select an alert from the loaded collection, or clear the selection if absent.
    pub fn select_alert(&mut self, id: i64) {
        self.pending_open = None;
        self.selected = self.alerts.iter().find(|alert| alert.id == id).cloned();
    }

    pub fn clear_selection(&mut self) {
        self.pending_open = None;
        self.selected = None;
    }

    /// Fetch one alert from the backend and select it when it arrives.
    pub fn open_alert(&mut self, id: i64) -> RequestId {
        let request_id = self.jobs.next_request_id();
        self.pending_open = Some(request_id);
        let api = Arc::clone(&self.api);
        self.jobs.spawn("alert", move || JobMessage::AlertLoaded {
            request_id,
            alert_id: id,
            result: guarded("alert", || api.get_alert(id)),
        });
        request_id
    }

    /// Open the selected alert's source link in the system browser.
    pub fn open_selected_link(&mut self) {
        let Some(link) = self
            .selected
            .as_ref()
            .map(|alert| alert.link.clone())
            .filter(|link| !link.is_empty())
        else {
            return;
        };
        if let Err(err) = open::that(&link) {
            tracing::warn!("Failed to open {link}: {err}");
            self.notify(format!("Failed to open link: {err}"));
        }
    }

    /// Apply finished jobs in arrival order, then advance the toast to `now`.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        self.poll_background_jobs();
        self.toast.tick(now);
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// The list as displayed: the loaded alerts ordered by the current sort key.
    pub fn sorted_alerts(&self) -> Vec<&Alert> {
        self.sort_engine.sort(&self.alerts, self.sort_key)
    }

    pub fn stats(&self) -> Option<&AlertStats> {
        self.stats.as_ref()
    }

    pub fn filters(&self) -> &AlertFilters {
        &self.filters
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn selected_alert(&self) -> Option<&Alert> {
        self.selected.as_ref()
    }

    pub fn last_fetched(&self) -> Option<OffsetDateTime> {
        self.last_fetched
    }

    pub fn activity(&self) -> ActivityFlags {
        ActivityFlags {
            loading_stats: self.in_flight.stats > 0,
            loading_alerts: self.in_flight.alerts > 0,
            fetching: self.fetching,
            analysing: self.analysing,
        }
    }

    pub fn toast(&self) -> ToastState {
        self.toast.snapshot()
    }

    /// True when no job or post-action refresh is outstanding.
    pub fn is_settled(&self) -> bool {
        self.jobs.outstanding() == 0 && self.refreshes.is_empty()
    }

    /// How soon the renderer should wake up again without user input.
    pub fn repaint_after(&self, now: Instant) -> Option<Duration> {
        if self.jobs.outstanding() > 0 {
            return Some(Duration::from_millis(50));
        }
        self.toast
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Run queued jobs when the controller was built with [`JobMode::Deferred`].
    pub fn run_deferred_jobs(&mut self) -> usize {
        self.jobs.run_deferred()
    }

    fn notify(&mut self, message: String) {
        self.toast.show(message, self.now);
    }
}
