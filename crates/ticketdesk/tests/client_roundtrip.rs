//! End-to-end: a live server on an ephemeral port, driven by `ApiClient`
//! and `Dashboard` the way the CLI drives them.

use std::time::Duration;

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use tokio::net::TcpListener;

use ticketdesk::server::{router, AppState};
use ticketdesk::store::{MemoryStore, SqliteStore};
use ticketdesk::{ApiClient, Dashboard, Error, RecordStore};

const SEED: &[&str] = &["PC", "Laptop", "Printer"];

async fn spawn_server(store: Box<dyn RecordStore>) -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = router(AppState::new(store, true), Duration::from_secs(60));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(format!("http://{address}"), Duration::from_secs(5)).unwrap()
}

async fn fresh_dashboard(client: &ApiClient) -> Dashboard {
    let mut dashboard = Dashboard::new(15).with_offset(FixedOffset::east_opt(0).unwrap());
    dashboard.load(
        client.fetch_records().await.unwrap(),
        client.fetch_devices().await.unwrap(),
    );
    dashboard
}

fn fill(dashboard: &mut Dashboard, name: &str, day: u32) {
    dashboard.set_field("name", name).unwrap();
    dashboard.set_field("division", "Finance").unwrap();
    dashboard.set_field("problem", "Cannot print").unwrap();
    dashboard.set_field("solving", "Reinstalled driver").unwrap();
    dashboard.set_field("device", "Printer").unwrap();
    dashboard.set_form_date(Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap());
}

#[tokio::test]
async fn test_add_edit_delete_through_server() {
    let client = spawn_server(Box::new(MemoryStore::new(SEED))).await;

    // Add two incidents, each followed by a full upload
    let mut dashboard = fresh_dashboard(&client).await;
    assert_eq!(dashboard.devices().len(), 3);
    fill(&mut dashboard, "Andi", 1);
    client.push_records(dashboard.add().unwrap()).await.unwrap();
    fill(&mut dashboard, "Budi", 2);
    client.push_records(dashboard.add().unwrap()).await.unwrap();

    // A second session sees both, newest first
    let mut dashboard = fresh_dashboard(&client).await;
    let names: Vec<&str> = dashboard.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Budi", "Andi"]);

    // Edit Andi's resolution
    let andi = dashboard.records()[1].id;
    dashboard.begin_edit(andi).unwrap();
    dashboard.set_field("solving", "Replaced printer").unwrap();
    client.push_records(dashboard.save().unwrap()).await.unwrap();

    let dashboard = fresh_dashboard(&client).await;
    let edited = dashboard.records().iter().find(|r| r.id == andi).unwrap();
    assert_eq!(edited.solving, "Replaced printer");

    // Delete Budi
    let mut dashboard = dashboard;
    let budi = dashboard.records()[0].id;
    client.push_records(dashboard.delete(budi).unwrap()).await.unwrap();

    let remaining = client.fetch_records().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Andi");
}

#[tokio::test]
async fn test_filter_and_page_fetched_records() {
    let client = spawn_server(Box::new(SqliteStore::open_in_memory(SEED).unwrap())).await;

    let mut dashboard = fresh_dashboard(&client).await;
    for i in 0..20 {
        fill(&mut dashboard, &format!("User {i}"), if i < 17 { 1 } else { 2 });
        dashboard.add().unwrap();
    }
    client.push_records(dashboard.records()).await.unwrap();

    let mut dashboard = fresh_dashboard(&client).await;
    assert_eq!(dashboard.records().len(), 20);
    assert_eq!(dashboard.total_pages(), 2);

    dashboard.set_date_filter(NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(dashboard.filtered().len(), 17);
    dashboard.go_to_page(2);
    assert_eq!(dashboard.current_page_records().len(), 2);

    dashboard.set_date_filter(NaiveDate::from_ymd_opt(2024, 5, 2));
    dashboard.go_to_page(1);
    assert_eq!(dashboard.current_page_records().len(), 3);
}

#[tokio::test]
async fn test_rejected_upload_surfaces_server_message() {
    let client = spawn_server(Box::new(MemoryStore::new(SEED))).await;

    let mut dashboard = fresh_dashboard(&client).await;
    dashboard.set_field("name", "Andi").unwrap();
    let err = client
        .push_records(dashboard.add().unwrap())
        .await
        .unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("division"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}
