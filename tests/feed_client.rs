// HTTP feed client against a local mock server.
use mockito::{Matcher, Server};
use prayer_notes::client::{AladhanClient, FeedQuery, TimingsSource};
use prayer_notes::config::Config;
use prayer_notes::context::{AppContext, TestContext};
use prayer_notes::controller::{SyncController, SyncOutcome, SyncPhase, Trigger};
use prayer_notes::error::Error;
use prayer_notes::model::{Preset, TemplateFamily};
use prayer_notes::storage::{DocumentStore, VaultStore};
use prayer_notes::system::LogNotifier;
use std::sync::Arc;

const CAIRO_BODY: &str = r#"{
    "code": 200,
    "status": "OK",
    "data": {
        "timings": {
            "Fajr": "04:31 (EET)",
            "Sunrise": "05:56 (EET)",
            "Dhuhr": "11:40 (EET)",
            "Asr": "14:57 (EET)",
            "Maghrib": "17:24 (EET)",
            "Isha": "18:41 (EET)"
        },
        "date": {
            "readable": "15 Oct 2026",
            "gregorian": {"date": "15-10-2026"}
        }
    }
}"#;

fn cairo() -> FeedQuery {
    FeedQuery {
        city: "Cairo".to_string(),
        country: "Egypt".to_string(),
        method: 5,
    }
}

fn query_matcher(query: &FeedQuery) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("city".into(), query.city.clone()),
        Matcher::UrlEncoded("country".into(), query.country.clone()),
        Matcher::UrlEncoded("method".into(), query.method.to_string()),
    ])
}

#[tokio::test]
async fn test_fetch_parses_schedule_in_feed_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/timingsByCity")
        .match_query(query_matcher(&cairo()))
        .match_header("user-agent", Matcher::Regex("^prayer-notes/".to_string()))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CAIRO_BODY)
        .create_async()
        .await;

    let client = AladhanClient::new(&server.url()).unwrap();
    let schedule = client.fetch(&cairo()).await.unwrap();

    mock.assert_async().await;
    let labels: Vec<&str> = schedule.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Isha"]
    );
    assert_eq!(schedule.date.to_string(), "2026-10-15");
    assert_eq!(
        schedule.entry("Isha").map(|e| e.local_time.to_string()),
        Some("18:41:00".to_string())
    );
}

#[tokio::test]
async fn test_server_error_is_fetch_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/timingsByCity")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let client = AladhanClient::new(&server.url()).unwrap();
    let err = client.fetch(&cairo()).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_payload_without_timings_is_data_shape_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/timingsByCity")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"code": 200, "data": {"date": {"readable": "15 Oct 2026"}}}"#)
        .create_async()
        .await;

    let client = AladhanClient::new(&server.url()).unwrap();
    let err = client.fetch(&cairo()).await.unwrap_err();
    assert!(matches!(err, Error::DataShape(_)));
}

#[tokio::test]
async fn test_non_json_body_is_data_shape_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/timingsByCity")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = AladhanClient::new(&server.url()).unwrap();
    let err = client.fetch(&cairo()).await.unwrap_err();
    assert!(matches!(err, Error::DataShape(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_fetch_error() {
    // Port 9 (discard) on localhost is almost never listening.
    let client = AladhanClient::new("http://127.0.0.1:9").unwrap();
    let err = client.fetch(&cairo()).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
}

#[tokio::test]
async fn test_sync_against_mock_feed_writes_note() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/timingsByCity")
        .match_query(query_matcher(&cairo()))
        .with_status(200)
        .with_body(CAIRO_BODY)
        .expect(1)
        .create_async()
        .await;

    let ctx = TestContext::new();
    let store = Arc::new(VaultStore::new(ctx.get_vault_dir().unwrap()));
    let config = Config {
        city: "Cairo".to_string(),
        country: "Egypt".to_string(),
        method: 5,
        api_url: server.url(),
        output_location: "Daily/%YYYY%-%MM%-%DD%".to_string(),
        selected_preset: Preset::Builtin(TemplateFamily::Simple),
        include_prayer_names: vec!["Fajr".to_string(), "Maghrib".to_string()],
        hour_format: 24,
        include_utc_time: true,
        utc_offset: 3,
        ..Config::default()
    };
    let client = AladhanClient::new(&config.api_url).unwrap();
    let controller = SyncController::new(
        config,
        Arc::new(client),
        store.clone(),
        Arc::new(LogNotifier),
    );

    let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    let outcome = controller.trigger_on(Trigger::Manual, today).await;
    assert!(outcome.is_written(), "unexpected outcome {:?}", outcome);

    mock.assert_async().await;
    assert_eq!(
        store.read("Daily/2026-10-15.md").unwrap().unwrap(),
        "**Location:** Cairo\n**Date:** October 15, 2026\n\nFajr: 04:31 (01:31 UTC)\nMaghrib: 17:24 (14:24 UTC)\n"
    );
}

#[tokio::test]
async fn test_sync_with_failing_feed_leaves_vault_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/timingsByCity")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let ctx = TestContext::new();
    let store = Arc::new(VaultStore::new(ctx.get_vault_dir().unwrap()));
    let client = AladhanClient::new(&server.url()).unwrap();
    let controller = SyncController::new(
        Config::default(),
        Arc::new(client),
        store.clone(),
        Arc::new(LogNotifier),
    );

    let outcome = controller.trigger(Trigger::Startup).await;
    assert!(matches!(
        outcome,
        SyncOutcome::Failed {
            phase: SyncPhase::Fetching,
            ..
        }
    ));
    assert_eq!(store.read("Prayer Times.md").unwrap(), None);
}
