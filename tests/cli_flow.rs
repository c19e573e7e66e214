//! CLI commands against a mock sheet, one wired app per "process".

use std::path::Path;

use codeyatri_dashboard_lib::bootstrap::{wire_app, StorageMode};
use codeyatri_dashboard_lib::cli::{run, Commands, EventPatch, ProjectPatch};
use cy_core::{AppConfig, EventStatus, ProjectStatus};
use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

fn config(data_dir: &Path, sheet_url: String) -> AppConfig {
    let mut config = AppConfig::with_system_defaults(data_dir.to_path_buf());
    config.sheet_url = sheet_url;
    config.http_timeout_secs = 5;
    config
}

async fn exec(config: &AppConfig, command: Commands) -> anyhow::Result<()> {
    let wired = wire_app(config, StorageMode::Persistent)?;
    run(command, wired).await
}

async fn login(config: &AppConfig) {
    exec(
        config,
        Commands::Login {
            username: "admin".into(),
            password: "pw".into(),
        },
    )
    .await
    .unwrap();
}

async fn sheet_with_events() -> ServerGuard {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/exec")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "events".into()),
            Matcher::UrlEncoded("action".into(), "get".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":"e1","title":"Hack Night","date":"2025-07-04","status":"upcoming"}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/exec")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "projects".into()),
            Matcher::UrlEncoded("action".into(), "get".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"data":[{"id":"p1","title":"Atlas","status":"active"}]}"#)
        .create_async()
        .await;
    server
}

#[tokio::test]
async fn dashboard_commands_require_login() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), "http://127.0.0.1:9/exec".into());

    let err = exec(&config, Commands::Projects).await.unwrap_err();
    assert!(err.to_string().contains("Not logged in"));

    let err = exec(
        &config,
        Commands::Login {
            username: "admin".into(),
            password: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Please enter username and password");
}

#[tokio::test]
async fn event_move_is_kept_locally_when_the_sheet_rejects_it() {
    let mut server = sheet_with_events().await;
    server
        .mock("POST", "/exec")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/exec")
        .match_query(Matcher::UrlEncoded("action".into(), "update".into()))
        .with_status(500)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), format!("{}/exec", server.url()));
    login(&config).await;

    exec(
        &config,
        Commands::MoveEvent {
            id: "e1".into(),
            to: EventStatus::Cancelled,
        },
    )
    .await
    .unwrap();

    // Next run: the sheet still says upcoming, the cache says cancelled.
    let wired = wire_app(&config, StorageMode::Persistent).unwrap();
    wired.app.hydrate_events().await;
    assert_eq!(
        wired.app.state().read(|s| s.events.locate("e1")),
        Some(EventStatus::Cancelled)
    );
}

#[tokio::test]
async fn project_move_posts_the_updated_record() {
    let mut server = sheet_with_events().await;
    let update = server
        .mock("POST", "/exec")
        .match_query(Matcher::UrlEncoded("action".into(), "update".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "id": "p1",
            "status": "completed",
        })))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), format!("{}/exec", server.url()));
    login(&config).await;

    exec(
        &config,
        Commands::MoveProject {
            id: "p1".into(),
            to: ProjectStatus::Completed,
        },
    )
    .await
    .unwrap();

    update.assert_async().await;
}

#[tokio::test]
async fn project_edit_posts_patched_fields_only() {
    let mut server = sheet_with_events().await;
    let update = server
        .mock("POST", "/exec")
        .match_query(Matcher::UrlEncoded("type".into(), "projects".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "id": "p1",
            "title": "Atlas v2",
            "status": "active",
        })))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), format!("{}/exec", server.url()));
    login(&config).await;

    exec(
        &config,
        Commands::EditProject(ProjectPatch {
            id: "p1".into(),
            title: Some("Atlas v2".into()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    update.assert_async().await;
}

#[tokio::test]
async fn event_edit_is_cached_for_the_next_run() {
    let mut server = sheet_with_events().await;
    server
        .mock("POST", "/exec")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[{"ok":true}]}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), format!("{}/exec", server.url()));
    login(&config).await;

    exec(
        &config,
        Commands::EditEvent(EventPatch {
            id: "e1".into(),
            date: Some("2025-07-11".into()),
            status: Some(EventStatus::ThisWeek),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    let wired = wire_app(&config, StorageMode::Persistent).unwrap();
    let cached = wired.app.state().read(|s| s.events.find("e1").cloned()).unwrap();
    assert_eq!(cached.date, "2025-07-11");
    assert_eq!(cached.status, EventStatus::ThisWeek);
}

#[tokio::test]
async fn editing_an_unknown_event_is_an_error() {
    let server = sheet_with_events().await;
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), format!("{}/exec", server.url()));
    login(&config).await;

    let err = exec(
        &config,
        Commands::EditEvent(EventPatch {
            id: "e9".into(),
            ..Default::default()
        }),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("No event with id e9"));
}

#[tokio::test]
async fn metric_command_works_without_stats_endpoints() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), "http://127.0.0.1:9/exec".into());
    login(&config).await;

    exec(
        &config,
        Commands::Metric {
            channel: cy_core::Channel::Website,
            down: false,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn moving_an_unknown_project_is_an_error() {
    let server = sheet_with_events().await;
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), format!("{}/exec", server.url()));
    login(&config).await;

    let err = exec(
        &config,
        Commands::MoveProject {
            id: "nope".into(),
            to: ProjectStatus::Paused,
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("No project with id nope"));
}

#[tokio::test]
async fn logout_closes_the_session() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), "http://127.0.0.1:9/exec".into());
    login(&config).await;

    exec(&config, Commands::Logout).await.unwrap();

    assert!(exec(&config, Commands::Events).await.is_err());
}
