//! Integration tests for the coaching backend client and the session view
//!
//! These tests use wiremock to mock API responses with recorded fixtures.

use chrono::NaiveDate;
use std::time::Duration;

use session_report::client::{BearerToken, CoachClient, ExportFormat};
use session_report::config::Settings;
use session_report::view::{DirectorySink, ExportOutcome, ExportSkip, LoadOutcome, SessionView};
use session_report::{ReportError, ViewError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ATHLETE_FIXTURE: &str = include_str!("fixtures/athlete_7.json");

/// Create a test bearer token
fn test_token() -> BearerToken {
    BearerToken::new("test-access-token")
}

/// Settings pointing at the mock server with fast retries
fn test_settings(mock_server: &MockServer) -> Settings {
    let mut settings = Settings::default().with_base_url(mock_server.uri());
    settings.retry_backoff = Duration::from_millis(10);
    settings
}

/// Create a CoachClient that points to the mock server
fn test_client(mock_server: &MockServer) -> CoachClient {
    CoachClient::with_base_url(&mock_server.uri()).unwrap()
}

fn test_view(settings: Settings) -> SessionView {
    let client = CoachClient::new(&settings).unwrap();
    SessionView::connected(client, test_token(), settings)
}

fn may_3() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()
}

async fn mount_athlete(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/coach/athlete/7"))
        .and(header("Authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATHLETE_FIXTURE))
        .mount(mock_server)
        .await;
}

mod athlete_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_athlete_sends_bearer_token() {
        let mock_server = MockServer::start().await;
        mount_athlete(&mock_server).await;

        let client = test_client(&mock_server);
        let roster = client
            .fetch_athlete(&test_token(), "7")
            .await
            .expect("Failed to fetch athlete");

        assert_eq!(roster.username, "ada");
        assert_eq!(roster.sessions.len(), 2);
        assert!(roster.sessions[1].altitudes.is_empty());
        assert!(roster.sessions[1].positions.is_empty());
    }

    #[tokio::test]
    async fn test_load_athlete_clears_selection_and_lists_days() {
        let mock_server = MockServer::start().await;
        mount_athlete(&mock_server).await;

        let view = test_view(test_settings(&mock_server));
        view.load_from_bytes("old.json", br#"{"sessionsID": 1}"#)
            .unwrap();

        let outcome = view.load_athlete("7").await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied);

        let state = view.snapshot();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.session.is_none());

        let days: Vec<_> = view.session_days().into_iter().collect();
        assert_eq!(days, vec![may_3(), NaiveDate::from_ymd_opt(2024, 5, 5).unwrap()]);
    }

    #[tokio::test]
    async fn test_select_day_builds_report() {
        let mock_server = MockServer::start().await;
        mount_athlete(&mock_server).await;

        let view = test_view(test_settings(&mock_server));
        view.load_athlete("7").await.unwrap();

        assert!(view.select_day(may_3()));
        let report = view
            .report(session_report::report::Rounding::TwoDecimals)
            .unwrap();
        assert_eq!(report.altitude.values[2], None);
        assert_eq!(report.speed.values[2], Some(28.12));
        assert_eq!(report.hills.terrain_split, vec![30.0, 70.0]);

        assert!(!view.select_day(NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()));
        assert!(view.selected().is_none());
    }

    #[tokio::test]
    async fn test_empty_roster() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/8"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"username": "new", "sessions": []}"#),
            )
            .mount(&mock_server)
            .await;

        let view = test_view(test_settings(&mock_server));
        view.load_athlete("8").await.unwrap();

        assert!(view.snapshot().is_empty_roster());
        assert!(view.session_days().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error_flag() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/7"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let view = test_view(test_settings(&mock_server));
        view.load_from_bytes("kept.json", br#"{"sessionsID": 1}"#)
            .unwrap();

        let err = view.load_athlete("7").await.unwrap_err();
        assert!(matches!(
            err,
            ReportError::View(ViewError::FetchFailed { .. })
        ));

        let state = view.snapshot();
        assert!(!state.loading);
        assert!(matches!(state.error, Some(ViewError::FetchFailed { .. })));
        assert!(state.has_session());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"username": "slow", "sessions": []}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"username": "fast", "sessions": []}"#),
            )
            .mount(&mock_server)
            .await;

        let view = test_view(test_settings(&mock_server));

        let (first, second) = tokio::join!(view.load_athlete("1"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            view.load_athlete("2").await
        });

        assert_eq!(first.unwrap(), LoadOutcome::Stale);
        assert_eq!(second.unwrap(), LoadOutcome::Applied);

        let state = view.snapshot();
        assert_eq!(state.roster.unwrap().username, "fast");
        assert!(!state.loading);
    }
}

mod resilience_tests {
    use super::*;

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ATHLETE_FIXTURE)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let mut settings = test_settings(&mock_server);
        settings.request_timeout = Duration::from_millis(200);
        settings.max_retries = 0;
        let view = test_view(settings);

        let err = view.load_athlete("7").await.unwrap_err();
        assert!(matches!(
            err,
            ReportError::View(ViewError::FetchFailed { .. })
        ));
        assert!(!view.snapshot().loading);
    }

    #[tokio::test]
    async fn test_deadline_is_shared_by_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ATHLETE_FIXTURE)
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&mock_server)
            .await;

        let mut settings = test_settings(&mock_server);
        settings.request_timeout = Duration::from_millis(500);
        settings.max_retries = 2;
        let view = test_view(settings);

        let started = std::time::Instant::now();
        let err = view.load_athlete("7").await.unwrap_err();

        assert!(started.elapsed() < Duration::from_millis(1200));
        assert!(matches!(
            err,
            ReportError::View(ViewError::FetchFailed { .. })
        ));
        assert!(!view.snapshot().loading);
    }

    #[tokio::test]
    async fn test_timed_out_request_is_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ATHLETE_FIXTURE)
                    .set_delay(Duration::from_secs(3)),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        mount_athlete(&mock_server).await;

        let mut settings = test_settings(&mock_server);
        settings.request_timeout = Duration::from_millis(300);
        settings.max_retries = 1;
        let client = CoachClient::new(&settings).unwrap();

        let roster = client.fetch_athlete(&test_token(), "7").await.unwrap();
        assert_eq!(roster.username, "ada");
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_refused_connection_is_retried_then_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut settings = Settings::default().with_base_url(format!("http://{}", addr));
        settings.retry_backoff = Duration::from_millis(10);
        let client = CoachClient::new(&settings).unwrap();

        let err = client.fetch_athlete(&test_token(), "7").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_http_error_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/7"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CoachClient::new(&test_settings(&mock_server)).unwrap();
        let err = client.fetch_athlete(&test_token(), "7").await.unwrap_err();
        assert!(matches!(err, ReportError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/401"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        assert!(matches!(
            client.fetch_athlete(&test_token(), "401").await,
            Err(ReportError::NotAuthenticated)
        ));
        assert!(matches!(
            client.fetch_athlete(&test_token(), "404").await,
            Err(ReportError::NotFound(_))
        ));
    }
}

mod export_tests {
    use super::*;
    use tempfile::TempDir;

    async fn view_with_selection(mock_server: &MockServer) -> SessionView {
        mount_athlete(mock_server).await;
        let view = test_view(test_settings(mock_server));
        view.load_athlete("7").await.unwrap();
        assert!(view.select_day(may_3()));
        view
    }

    #[tokio::test]
    async fn test_export_pdf_saves_named_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/import_export/athlete/session/42/export_pdf"))
            .and(header("Authorization", "Bearer test-access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 fake".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let view = view_with_selection(&mock_server).await;
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().to_path_buf());

        let outcome = view.export(ExportFormat::Pdf, &sink).await.unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Saved {
                file_name: "session_report_2024-05-03.pdf".to_string(),
                bytes: 13,
            }
        );

        let saved = std::fs::read(temp_dir.path().join("session_report_2024-05-03.pdf")).unwrap();
        assert_eq!(saved, b"%PDF-1.7 fake");
    }

    #[tokio::test]
    async fn test_export_json_saves_named_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/import_export/athlete/session/42/export_json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"sessionsID": 42}"#))
            .mount(&mock_server)
            .await;

        let view = view_with_selection(&mock_server).await;
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().to_path_buf());

        view.export(ExportFormat::Json, &sink).await.unwrap();
        assert!(temp_dir.path().join("session_2024-05-03.json").is_file());
    }

    #[tokio::test]
    async fn test_export_without_selection_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/import_export/athlete/session/42/export_pdf"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
        mount_athlete(&mock_server).await;

        let view = test_view(test_settings(&mock_server));
        view.load_athlete("7").await.unwrap();

        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().to_path_buf());
        let outcome = view.export(ExportFormat::Pdf, &sink).await.unwrap();

        assert_eq!(outcome, ExportOutcome::Skipped(ExportSkip::NoSession));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_export_failure_keeps_session() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/import_export/athlete/session/42/export_pdf"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let view = view_with_selection(&mock_server).await;
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().to_path_buf());

        let err = view.export(ExportFormat::Pdf, &sink).await.unwrap_err();
        assert!(matches!(
            err,
            ReportError::View(ViewError::ExportFailed { .. })
        ));

        let state = view.snapshot();
        assert!(state.has_session());
        assert!(matches!(state.error, Some(ViewError::ExportFailed { .. })));
    }

    #[tokio::test]
    async fn test_export_escapes_imported_session_id() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/import_export/athlete/session/9%3Fx=1%23frag%2Fb/export_pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let view = test_view(test_settings(&mock_server));
        view.load_from_bytes(
            "imported.json",
            br#"{"sessionsID": "9?x=1#frag/b", "start_time": "2024-05-03"}"#,
        )
        .unwrap();

        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().to_path_buf());
        view.export(ExportFormat::Pdf, &sink).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.query().is_none());
        assert!(requests[0].url.fragment().is_none());
    }

    #[tokio::test]
    async fn test_late_export_failure_leaves_newer_load_alone() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/import_export/athlete/session/42/export_pdf"))
            .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(400)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/coach/athlete/8"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"username": "eve", "sessions": []}"#),
            )
            .mount(&mock_server)
            .await;

        let view = view_with_selection(&mock_server).await;
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().to_path_buf());

        let (exported, loaded) = tokio::join!(view.export(ExportFormat::Pdf, &sink), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            view.load_athlete("8").await
        });

        assert!(matches!(
            exported,
            Err(ReportError::View(ViewError::ExportFailed { .. }))
        ));
        assert_eq!(loaded.unwrap(), LoadOutcome::Applied);

        let state = view.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.roster.unwrap().username, "eve");
    }
}

mod profile_tests {
    use super::*;
    use session_report::models::ProfileUpdate;
    use std::io::Write;

    #[tokio::test]
    async fn test_fetch_profile() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .and(header("Authorization", "Bearer test-access-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("fixtures/profile_cyclist.json")),
            )
            .mount(&mock_server)
            .await;

        let profile = test_client(&mock_server)
            .fetch_profile(&test_token())
            .await
            .unwrap();

        assert!(profile.is_cyclist());
        assert_eq!(profile.weight_kg, Some(62.5));
    }

    #[tokio::test]
    async fn test_update_profile_for_non_cyclist_omits_measurements() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/auth/profile"))
            .and(body_json(serde_json::json!({"username": "robert"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let coach: session_report::models::Profile =
            serde_json::from_str(include_str!("fixtures/profile_coach.json")).unwrap();
        let update =
            ProfileUpdate::for_profile(&coach, Some("robert".to_string()), Some(180.0), Some(80.0));

        test_client(&mock_server)
            .update_profile(&test_token(), &update)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_profile_picture() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/upload_profile_picture"))
            .and(header("Authorization", "Bearer test-access-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut picture = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        picture.write_all(b"\x89PNG fake").unwrap();

        test_client(&mock_server)
            .upload_profile_picture(&test_token(), picture.path())
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"profile_picture\""));
    }
}
