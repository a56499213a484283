// tests/fetch_cycle.rs
//
// Fetch-cycle behaviour against simulated news sites:
// - a failing source contributes nothing and does not fail the cycle
// - workers run in parallel: cycle latency tracks the slowest source, not the sum
// - a hanging source is cut off by the request timeout
// - the cache-aware refresh reuses fresh data and replaces stale data

mod common;

use axum::{Router, http::StatusCode, response::Html, routing::get};
use common::{settings_with_sources, source, spawn_site};
use headline_hub::AppState;
use headline_hub::normalize::Normalizer;
use headline_hub::scrapers::{ExtractorTable, FetchSettings, Fetcher, fetch_all};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn fetcher(timeout: Duration) -> Fetcher {
    Fetcher::new(
        &FetchSettings {
            timeout,
            ..FetchSettings::default()
        },
        Normalizer::default(),
        ExtractorTable::new(),
    )
    .expect("build fetcher")
}

async fn site_with(headlines: &'static [&'static str], delay: Duration) -> String {
    let body: String = headlines.iter().map(|h| format!("<h3>{h}</h3>")).collect();
    spawn_site(Router::new().route(
        "/",
        get(move || {
            let body = body.clone();
            async move {
                tokio::time::sleep(delay).await;
                Html(body)
            }
        }),
    ))
    .await
}

async fn failing_site() -> String {
    spawn_site(Router::new().route(
        "/",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failing_source_does_not_break_the_cycle() {
    let a = site_with(&["Alpha one", "Alpha two"], Duration::ZERO).await;
    let b = failing_site().await;
    let c = site_with(&["Gamma one"], Duration::ZERO).await;

    let headlines = fetch_all(
        &fetcher(Duration::from_secs(5)),
        vec![
            source(1, "A", &a, "h3"),
            source(2, "B", &b, "h3"),
            source(3, "C", &c, "h3"),
            source(4, "Down", "http://127.0.0.1:1/", "h3"),
        ],
    )
    .await;

    let texts: Vec<&str> = headlines.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["Alpha one", "Alpha two", "Gamma one"]);
    assert!(headlines.iter().all(|h| h.source != "B"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sources_are_fetched_in_parallel() {
    let delay = Duration::from_millis(400);
    let mut sources = Vec::new();
    for i in 0..5u64 {
        let url = site_with(&["Parallel headline"], delay).await;
        sources.push(source(i + 1, &format!("S{i}"), &url, "h3"));
    }

    let t0 = Instant::now();
    let headlines = fetch_all(&fetcher(Duration::from_secs(5)), sources).await;
    let elapsed = t0.elapsed();

    assert_eq!(headlines.len(), 5);
    // Sequential fetching would need at least 5 × 400ms.
    assert!(elapsed < delay * 3, "cycle took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hanging_source_is_bounded_by_timeout() {
    let ok = site_with(&["Still delivered"], Duration::ZERO).await;
    let hanging = site_with(&["Never seen"], Duration::from_secs(30)).await;

    let t0 = Instant::now();
    let headlines = fetch_all(
        &fetcher(Duration::from_millis(500)),
        vec![source(1, "Ok", &ok, "h3"), source(2, "Hang", &hanging, "h3")],
    )
    .await;

    assert!(t0.elapsed() < Duration::from_secs(5));
    assert_eq!(headlines.len(), 1);
    assert_eq!(headlines[0].text, "Still delivered");
}

#[tokio::test]
async fn empty_source_list_yields_empty_cycle() {
    let headlines = fetch_all(&fetcher(Duration::from_secs(1)), vec![]).await;
    assert!(headlines.is_empty());
}

#[tokio::test]
async fn disabled_sources_are_skipped() {
    let dir = TempDir::new().unwrap();
    let on = site_with(&["Enabled story"], Duration::ZERO).await;
    let off = site_with(&["Disabled story"], Duration::ZERO).await;
    let mut disabled = source(2, "Off", &off, "h3");
    disabled.enabled = false;

    let settings = settings_with_sources(dir.path(), &[source(1, "On", &on, "h3"), disabled]);
    let state = AppState::from_settings(&settings).await.unwrap();

    let entry = state.run_cycle().await.unwrap();
    assert_eq!(entry.headlines.len(), 1);
    assert_eq!(entry.headlines[0].source, "On");
}

#[tokio::test]
async fn fresh_cache_is_reused_and_force_refreshes() {
    let dir = TempDir::new().unwrap();
    let url = site_with(&["Cached story"], Duration::ZERO).await;
    let settings = settings_with_sources(dir.path(), &[source(1, "Site", &url, "h3")]);
    let state = AppState::from_settings(&settings).await.unwrap();

    let first = state.fresh_or_refresh(false).await.unwrap();
    assert_eq!(first.headlines.len(), 1);

    let again = state.fresh_or_refresh(false).await.unwrap();
    assert_eq!(again, first);

    let forced = state.fresh_or_refresh(true).await.unwrap();
    assert_eq!(forced.headlines.len(), 1);
    assert!(forced.stored_at >= first.stored_at);
}

#[tokio::test]
async fn stale_cache_is_replaced_on_refresh() {
    let dir = TempDir::new().unwrap();
    let url = site_with(&["New story"], Duration::ZERO).await;
    let mut settings = settings_with_sources(dir.path(), &[source(1, "Site", &url, "h3")]);
    settings.cache_ttl = Duration::from_secs(60);

    let stale = serde_json::json!({
        "headlines": [{"text": "Old story", "source": "Site", "fetched_at": 1_000_000_000}],
        "last_updated": 1_000_000_000
    });
    std::fs::write(&settings.cache_path, stale.to_string()).unwrap();

    let state = AppState::from_settings(&settings).await.unwrap();
    let entry = state.fresh_or_refresh(false).await.unwrap();

    let texts: Vec<&str> = entry.headlines.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["New story"]);
}
