mod support;

use support::{regsense_env::RegsenseEnvGuard, stub_backend::StubBackend};

use regsense::{
    alerts::{AlertFilters, HttpAlertsApi},
    app_dirs::AppDirs,
    config::{self, ApiSettings},
    dashboard::DashboardController,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tempfile::TempDir;

const STATS_PENDING: &str = r#"{"total":2,"analysed":0,"pending":2,
    "by_feed_category":[{"feed_category":"Banking","count":2}],
    "by_severity":[],"by_category":[]}"#;
const STATS_DONE: &str = r#"{"total":2,"analysed":2,"pending":0,
    "by_feed_category":[{"feed_category":"Banking","count":2}],
    "by_severity":[{"severity":"High","count":1},{"severity":"Low","count":1}],
    "by_category":[{"category":"Capital","count":2}]}"#;
const ALERTS_PENDING: &str = r#"{"count":2,"alerts":[
    {"id":1,"title":"Capital buffers","link":"https://example.org/1","source":"PRA",
     "feed_category":"Banking","published_date":"Mon, 01 Jan 2024 10:00:00 GMT",
     "summary":null,"severity":null,"analysed":false},
    {"id":2,"title":"Liquidity reporting","link":"https://example.org/2","source":"PRA",
     "feed_category":"Banking","published_date":"Tue, 02 Jan 2024 10:00:00 GMT",
     "summary":null,"severity":null,"analysed":false}]}"#;
const ALERTS_DONE: &str = r#"{"count":2,"alerts":[
    {"id":1,"title":"Capital buffers","link":"https://example.org/1","source":"PRA",
     "feed_category":"Banking","published_date":"Mon, 01 Jan 2024 10:00:00 GMT",
     "summary":"Buffers rise","category":"Capital","severity":"High","analysed":true},
    {"id":2,"title":"Liquidity reporting","link":"https://example.org/2","source":"PRA",
     "feed_category":"Banking","published_date":"Tue, 02 Jan 2024 10:00:00 GMT",
     "summary":"New template","category":"Capital","severity":"Low","analysed":true}]}"#;

struct DashboardHarness {
    _config: RegsenseEnvGuard,
    _temp: TempDir,
    backend: StubBackend,
    pub controller: DashboardController,
}

impl DashboardHarness {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let env = RegsenseEnvGuard::set_config_home(temp.path().to_path_buf());

        let analysed = Arc::new(AtomicBool::new(false));
        let backend = StubBackend::start(move |method, path| {
            let done = analysed.load(Ordering::SeqCst);
            match (method, path) {
                ("GET", "/api/alerts/stats") if done => (200, STATS_DONE.to_string()),
                ("GET", "/api/alerts/stats") => (200, STATS_PENDING.to_string()),
                ("GET", p) if p.starts_with("/api/alerts/?") && done => {
                    (200, ALERTS_DONE.to_string())
                }
                ("GET", p) if p.starts_with("/api/alerts/?") => (200, ALERTS_PENDING.to_string()),
                ("POST", "/api/alerts/fetch") => (
                    200,
                    r#"{"feeds_fetched":4,"entries_found":12,"new_alerts":2,"duplicates_skipped":10,"errors":[]}"#
                        .to_string(),
                ),
                ("POST", p) if p.starts_with("/api/alerts/analyse") => {
                    analysed.store(true, Ordering::SeqCst);
                    (200, r#"{"analysed_count":2,"analysed_ids":[1,2]}"#.to_string())
                }
                ("GET", "/api/alerts/99") => (404, r#"{"detail":"Alert not found"}"#.to_string()),
                _ => (500, r#"{"detail":"unexpected"}"#.to_string()),
            }
        });

        let dirs = AppDirs::resolve().expect("resolve app dirs");
        assert!(dirs.root().starts_with(temp.path()));
        let path = dirs.config_file();
        let mut settings = config::load_or_default(&dirs).expect("write default config");
        settings.api = ApiSettings {
            base_url: backend.api_base(),
            ..settings.api
        };
        config::save_to_path(&settings, &path).expect("save config");
        let settings = config::load_from_path(&path).expect("reload config");

        let api = Arc::new(HttpAlertsApi::new(settings.api.base_url.clone()));
        let controller = DashboardController::new(api, settings.api);
        Self {
            _config: env,
            _temp: temp,
            backend,
            controller,
        }
    }

    fn wait_until_settled(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            self.controller.tick(Instant::now());
            if self.controller.is_settled() {
                return;
            }
            assert!(Instant::now() < deadline, "dashboard never settled");
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

#[test]
fn dashboard_round_trips_against_http_backend() {
    let mut harness = DashboardHarness::new();

    harness.controller.mount();
    harness.wait_until_settled();
    assert_eq!(harness.controller.alerts().len(), 2);
    assert_eq!(
        harness.controller.stats().map(|stats| stats.pending),
        Some(2)
    );
    let newest: Vec<i64> = harness
        .controller
        .sorted_alerts()
        .iter()
        .map(|alert| alert.id)
        .collect();
    assert_eq!(newest, vec![2, 1]);

    harness.controller.select_alert(1);
    harness.controller.trigger_fetch();
    harness.wait_until_settled();
    assert!(!harness.controller.activity().fetching);
    assert!(harness.controller.last_fetched().is_some());
    assert_eq!(
        harness.controller.toast().message.as_deref(),
        Some("Fetched 4 feeds — 2 new alerts, 10 duplicates skipped")
    );

    harness.controller.trigger_analyse();
    harness.wait_until_settled();
    assert!(!harness.controller.activity().analysing);
    let selected = harness.controller.selected_alert().expect("selection kept");
    assert!(selected.analysed);
    assert_eq!(selected.severity, "High");

    let requests = harness.backend.requests();
    assert!(requests.contains(&"POST /api/alerts/fetch".to_string()));
    assert!(requests.contains(&"POST /api/alerts/analyse?limit=2".to_string()));
    assert!(requests.contains(&"GET /api/alerts/?limit=200&offset=0".to_string()));
}

#[test]
fn filters_and_missing_alerts_go_over_the_wire() {
    let mut harness = DashboardHarness::new();
    harness.controller.mount();
    harness.wait_until_settled();

    harness.controller.set_filters(
        AlertFilters::default()
            .with_feed_category(Some("Banking".into()))
            .with_analysed(Some(false)),
    );
    harness.wait_until_settled();
    assert!(harness.backend.requests().contains(
        &"GET /api/alerts/?feed_category=Banking&analysed=false&limit=200&offset=0".to_string()
    ));

    harness.controller.open_alert(99);
    harness.wait_until_settled();
    assert!(harness.controller.selected_alert().is_none());
    let message = harness.controller.toast().message.unwrap_or_default();
    assert!(message.starts_with("Failed to load alert: API 404"), "{message}");
}
