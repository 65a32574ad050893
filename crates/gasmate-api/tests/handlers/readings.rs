//! Tests for reading handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use gasmate_api::handlers::readings::*;
use gasmate_core::Reading;

use crate::common::*;

fn reading(check_value: f64, is_leak: bool) -> IngestReadingRequest {
    IngestReadingRequest {
        check_value,
        is_leak,
    }
}

#[tokio::test]
async fn test_ingest_publishes_to_subscribers() {
    let server = create_test_server();
    let mut subscription = server.state.feed.subscribe();

    let Json(value) = ingest_reading_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(reading(3.5, false))),
    )
    .await
    .unwrap();
    assert_eq!(value["subscribers"], 1);
    assert_eq!(value["reading"]["checkValue"], 3.5);
    assert_eq!(value["reading"]["isLeak"], 0);

    let received = subscription.next().await.unwrap();
    assert_eq!(received.check_value, 3.5);
    assert_eq!(server.state.stores.readings.len().unwrap(), 1);
}

#[tokio::test]
async fn test_ingest_requires_identity() {
    let server = create_test_server();
    let err = ingest_reading_handler(
        State(server.state.clone()),
        no_auth(),
        Ok(Json(reading(3.5, false))),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert!(server.state.feed.latest().is_none());
    assert!(server.state.stores.readings.is_empty().unwrap());
}

#[tokio::test]
async fn test_latest_and_history() {
    let server = create_test_server();

    let Json(value) = latest_reading_handler(State(server.state.clone())).await.unwrap();
    assert!(value["reading"].is_null());

    for v in [1.0, 2.0, 3.0] {
        ingest_reading_handler(
            State(server.state.clone()),
            auth(TOKEN),
            Ok(Json(reading(v, false))),
        )
        .await
        .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let Json(value) = latest_reading_handler(State(server.state.clone())).await.unwrap();
    assert_eq!(value["reading"]["checkValue"], 3.0);

    let Json(value) = reading_history_handler(
        State(server.state.clone()),
        Ok(Query(HistoryQuery { limit: Some(2) })),
    )
    .await
    .unwrap();
    assert_eq!(value["count"], 2);
    assert_eq!(value["readings"][0]["checkValue"], 3.0);
    assert_eq!(value["readings"][1]["checkValue"], 2.0);
}

#[tokio::test]
async fn test_latest_falls_back_to_history() {
    let server = create_test_server();
    server
        .state
        .stores
        .readings
        .append(&Reading::new(4.5, true))
        .unwrap();

    let Json(value) = latest_reading_handler(State(server.state.clone())).await.unwrap();
    assert_eq!(value["reading"]["checkValue"], 4.5);
    assert_eq!(value["reading"]["isLeak"], 1);
}

#[tokio::test]
async fn test_stats_over_range() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    for v in [1.0, 5.0, 7.0, 3.0] {
        ingest_reading_handler(
            State(server.state.clone()),
            auth(TOKEN),
            Ok(Json(reading(v, false))),
        )
        .await
        .unwrap();
    }

    let Json(value) = reading_stats_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Query(StatsQuery {
            range: Some("1h".to_string()),
        })),
    )
    .await
    .unwrap();
    assert_eq!(value["range"], "1h");
    assert_eq!(value["stats"]["count"], 4);
    assert_eq!(value["stats"]["average"], 4.0);
    assert_eq!(value["stats"]["criticalEvents"], 2);
    assert_eq!(value["stats"]["dangerEvents"], 1);

    let err = reading_stats_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Query(StatsQuery {
            range: Some("2d".to_string()),
        })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_without_readings() {
    let server = create_test_server();
    let Json(value) = reading_stats_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Query(StatsQuery::default())),
    )
    .await
    .unwrap();
    assert_eq!(value["range"], "24h");
    assert_eq!(value["stats"]["count"], 0);
    assert!(value["stats"]["average"].is_null());
}

#[tokio::test]
async fn test_supply_close_and_open() {
    let server = create_test_server();
    ingest_reading_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(reading(6.5, false))),
    )
    .await
    .unwrap();

    let Json(value) = gas_supply_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(GasSupplyRequest { value: 0 })),
    )
    .await
    .unwrap();
    assert_eq!(value["supply"], 0);
    assert_eq!(value["reading"]["isLeak"], 1);
    assert_eq!(value["reading"]["checkValue"], 6.5);
    assert!(server.state.feed.latest().unwrap().is_leak);

    let Json(value) = gas_supply_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(GasSupplyRequest { value: 1 })),
    )
    .await
    .unwrap();
    assert_eq!(value["supply"], 1);
    assert!(!server.state.feed.latest().unwrap().is_leak);
}

#[tokio::test]
async fn test_supply_rejects_other_values() {
    let server = create_test_server();
    ingest_reading_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(reading(2.0, false))),
    )
    .await
    .unwrap();

    for bad in [2, -1] {
        let err = gas_supply_handler(
            State(server.state.clone()),
            auth(TOKEN),
            Ok(Json(GasSupplyRequest { value: bad })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
    assert!(!server.state.feed.latest().unwrap().is_leak);
    assert_eq!(server.state.stores.readings.len().unwrap(), 1);
}
