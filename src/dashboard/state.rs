//! Bookkeeping owned by the dashboard controller.

use super::jobs::RequestId;

/// Count of outstanding loads per state slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct InFlightLoads {
    pub(crate) stats: usize,
    pub(crate) alerts: usize,
}

/// Action whose completion waits on a stats + alerts reload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RefreshCause {
    Fetch,
    Analyse { analysed_ids: Vec<i64> },
}

/// A post-action reload that has not fully landed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingRefresh {
    pub(crate) cause: RefreshCause,
    stats: Option<RequestId>,
    alerts: Option<RequestId>,
}

impl PendingRefresh {
    pub(crate) fn new(cause: RefreshCause, stats: RequestId, alerts: RequestId) -> Self {
        Self {
            cause,
            stats: Some(stats),
            alerts: Some(alerts),
        }
    }

    pub(crate) fn stats_landed(&mut self, request_id: RequestId) {
        if self.stats == Some(request_id) {
            self.stats = None;
        }
    }

    pub(crate) fn alerts_landed(&mut self, request_id: RequestId) {
        if self.alerts == Some(request_id) {
            self.alerts = None;
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.stats.is_none() && self.alerts.is_none()
    }
}

/// Flags the renderer reads to show spinners and disable actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivityFlags {
    pub loading_stats: bool,
    pub loading_alerts: bool,
    pub fetching: bool,
    pub analysing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_completes_only_when_both_reloads_land() {
        let mut refresh = PendingRefresh::new(RefreshCause::Fetch, 4, 5);
        refresh.alerts_landed(4);
        assert!(!refresh.is_complete());
        refresh.alerts_landed(5);
        assert!(!refresh.is_complete());
        refresh.stats_landed(4);
        assert!(refresh.is_complete());
    }
}
