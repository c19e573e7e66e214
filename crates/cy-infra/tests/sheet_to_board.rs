//! Sheet responses decoded by the client and bucketed by the core.

use std::sync::Arc;
use std::time::Duration;

use cy_core::normalize::bucketize;
use cy_core::ports::RemoteStorePort;
use cy_core::{Board, Event, EventStatus, LocalIdGenerator, Project, ProjectStatus, ResourceKind};
use cy_infra::{SheetStoreClient, SheetStoreConfig, SystemClock, TransientMessageBoard};
use mockito::{Matcher, Server};

fn sheet(url: String) -> SheetStoreClient {
    SheetStoreClient::new(
        SheetStoreConfig {
            url,
            timeout: Duration::from_secs(5),
            message_ttl: Duration::from_secs(4),
        },
        Arc::new(TransientMessageBoard::new()),
    )
    .unwrap()
}

#[tokio::test]
async fn aliased_project_columns_land_in_buckets() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/exec")
        .match_query(Matcher::UrlEncoded("type".into(), "projects".into()))
        .with_status(200)
        .with_body(
            r#"{"success":true,"projects":[
                {"ID":"p1","name":"Atlas","Leader":"Asha","status":"Active"},
                {"id":"p2","title":"Beacon","status":"archived"},
                {"id":"","title":"Comet"}
            ]}"#,
        )
        .create_async()
        .await;

    let rows = sheet(format!("{}/exec", server.url()))
        .fetch_rows(ResourceKind::Projects)
        .await;
    let ids = LocalIdGenerator::new(Arc::new(SystemClock));
    let board: Board<Project> = bucketize(&rows, &ids);

    assert_eq!(board.len(), 2);
    let active = board.bucket(ProjectStatus::Active);
    assert_eq!(active[0].id, "p1");
    assert_eq!(active[0].title, "Atlas");
    assert_eq!(active[0].lead, "Asha");

    // Missing status defaults to planning; blank id gets a generated one.
    let planning = board.bucket(ProjectStatus::Planning);
    assert_eq!(planning.len(), 1);
    assert_eq!(planning[0].title, "Comet");
    assert!(!planning[0].id.is_empty());
    assert!(board.is_consistent());
}

#[tokio::test]
async fn csv_events_land_in_buckets() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/exec")
        .match_query(Matcher::UrlEncoded("type".into(), "events".into()))
        .with_status(200)
        .with_body(
            "id,title,date,status,type\n\
             e1,Hack Night,2025-07-04,this_week,Workshop\n\
             e2,Demo Day,2025-08-01,\n",
        )
        .create_async()
        .await;

    let rows = sheet(format!("{}/exec", server.url()))
        .fetch_rows(ResourceKind::Events)
        .await;
    let ids = LocalIdGenerator::new(Arc::new(SystemClock));
    let board: Board<Event> = bucketize(&rows, &ids);

    assert_eq!(board.bucket(EventStatus::ThisWeek)[0].eventtype, "Workshop");
    assert_eq!(board.bucket(EventStatus::Upcoming)[0].id, "e2");
    assert_eq!(board.events_on("2025-07-04").len(), 1);
}
