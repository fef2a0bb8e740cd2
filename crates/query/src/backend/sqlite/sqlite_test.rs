//! Tests for SQLite backend

use super::*;
use chrono::{NaiveDate, TimeZone};
use tempfile::tempdir;

// =============================================================================
// Test Helpers
// =============================================================================

fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn window(start: (i32, u32, u32), end: (i32, u32, u32)) -> TimeWindow {
    TimeWindow::from_dates(
        NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
    )
    .unwrap()
}

fn sample_sales() -> Vec<Sale> {
    vec![
        Sale::new(ts(2024, 1, 1, 9), "Electronics", "Smartphone", "North America", "Online", 500.0),
        Sale::new(ts(2024, 1, 2, 10), "Electronics", "Laptop", "Europe", "Store", 1200.0),
        Sale::new(ts(2024, 1, 2, 10), "Books", "Tablet", "Europe", "Online", 30.0),
        Sale::new(ts(2024, 1, 3, 23), "Clothing", "Case", "Asia Pacific", "Online", 25.0),
        Sale::new(ts(2024, 2, 1, 12), "Books", "Tablet", "Europe", "Store", 99.0),
    ]
}

async fn seeded() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().await.unwrap();
    backend.insert_sales(&sample_sales()).await.unwrap();
    backend
}

// =============================================================================
// Storage
// =============================================================================

#[tokio::test]
async fn test_insert_and_count() {
    let backend = seeded().await;
    assert_eq!(backend.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_insert_skips_duplicate_ids() {
    let backend = SqliteBackend::in_memory().await.unwrap();
    let sales = sample_sales();

    assert_eq!(backend.insert_sales(&sales).await.unwrap(), 5);
    assert_eq!(backend.insert_sales(&sales).await.unwrap(), 0);
    assert_eq!(backend.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_clear() {
    let backend = seeded().await;
    assert_eq!(backend.clear().await.unwrap(), 5);
    assert_eq!(backend.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_open_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("sales.db");

    let backend = SqliteBackend::open(&path).await.unwrap();
    backend.insert_sales(&sample_sales()).await.unwrap();
    backend.close().await;

    assert!(path.exists());

    let reopened = SqliteBackend::open_with_pool_size(&path, 1).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_health_check() {
    let backend = SqliteBackend::in_memory().await.unwrap();
    assert!(backend.health_check().await.is_ok());
    assert_eq!(backend.name(), "sqlite");
}

// =============================================================================
// Aggregation
// =============================================================================

#[tokio::test]
async fn test_aggregate_by_dimension_sum() {
    let backend = seeded().await;
    let rows = backend
        .aggregate_by_dimension(
            &window((2024, 1, 1), (2024, 1, 31)),
            Dimension::Category,
            &Aggregation::sum("amount"),
        )
        .await
        .unwrap();

    // Ordered by dimension value, February sale excluded
    let labels: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(labels, vec!["Books", "Clothing", "Electronics"]);
    assert_eq!(rows[2].aggregate.sum.get("amount"), Some(&Some(1700.0)));
    assert_eq!(rows[0].aggregate.sum.get("amount"), Some(&Some(30.0)));
}

#[tokio::test]
async fn test_aggregate_by_dimension_count_all() {
    let backend = seeded().await;
    let rows = backend
        .aggregate_by_dimension(
            &window((2024, 1, 1), (2024, 2, 28)),
            Dimension::Region,
            &Aggregation::CountAll,
        )
        .await
        .unwrap();

    let europe = rows.iter().find(|r| r.value == "Europe").unwrap();
    assert_eq!(europe.aggregate.count, Some(3));
}

#[tokio::test]
async fn test_aggregate_by_dimension_avg_and_field_count() {
    let backend = seeded().await;
    let range = window((2024, 1, 1), (2024, 2, 28));

    let rows = backend
        .aggregate_by_dimension(&range, Dimension::Channel, &Aggregation::avg("amount"))
        .await
        .unwrap();
    let store = rows.iter().find(|r| r.value == "Store").unwrap();
    assert_eq!(store.aggregate.avg.get("amount"), Some(&Some(649.5)));

    let rows = backend
        .aggregate_by_dimension(&range, Dimension::Channel, &Aggregation::count_field("product"))
        .await
        .unwrap();
    let online = rows.iter().find(|r| r.value == "Online").unwrap();
    assert_eq!(online.aggregate.field_counts.get("product"), Some(&3));
}

#[tokio::test]
async fn test_end_date_is_inclusive() {
    let backend = seeded().await;
    let rows = backend
        .aggregate_by_timestamp(&window((2024, 1, 3), (2024, 1, 3)), &Aggregation::CountAll)
        .await
        .unwrap();

    // The 23:00 sale on the end date is included
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].occurred_at, ts(2024, 1, 3, 23));
}

#[tokio::test]
async fn test_aggregate_by_timestamp_groups_identical_instants() {
    let backend = seeded().await;
    let rows = backend
        .aggregate_by_timestamp(&window((2024, 1, 1), (2024, 1, 31)), &Aggregation::sum("amount"))
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].occurred_at, ts(2024, 1, 1, 9));
    assert_eq!(rows[1].occurred_at, ts(2024, 1, 2, 10));
    assert_eq!(rows[1].aggregate.sum.get("amount"), Some(&Some(1230.0)));
}

#[tokio::test]
async fn test_aggregate_by_timestamp_and_dimension() {
    let backend = seeded().await;
    let rows = backend
        .aggregate_by_timestamp_and_dimension(
            &window((2024, 1, 1), (2024, 1, 31)),
            Dimension::Channel,
            &Aggregation::sum("amount"),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 4);
    // Same instant, split values ascending
    assert_eq!(rows[1].split_value, "Online");
    assert_eq!(rows[2].split_value, "Store");
    assert_eq!(rows[2].aggregate.sum.get("amount"), Some(&Some(1200.0)));
}

#[tokio::test]
async fn test_empty_window_returns_no_rows() {
    let backend = seeded().await;
    let rows = backend
        .aggregate_by_dimension(
            &window((2023, 1, 1), (2023, 12, 31)),
            Dimension::Category,
            &Aggregation::sum("amount"),
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_unknown_field_rejected_before_query() {
    let backend = seeded().await;
    let result = backend
        .aggregate_by_timestamp(&window((2024, 1, 1), (2024, 1, 31)), &Aggregation::sum("price"))
        .await;
    assert!(matches!(result, Err(QueryError::UnknownField(_))));
}
