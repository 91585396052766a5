#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Semaphore;

use gaexporter_daemon::app_state::AppState;
use gaexporter_daemon::collect::Scheduler;

use common::{rows, wait_for, FakeSource};

fn yaml(extra: &str) -> String {
    format!(
        "interval: 1\nmetrics: [\"rt:activeUsers\", \"rt:pageviews\"]\nviewid: \"ga:1\"\npromport: 9100\n{extra}"
    )
}

#[tokio::test]
async fn tick_writes_every_metric() {
    let source = Arc::new(
        FakeSource::new()
            .respond("rt:activeUsers", rows(&[&["5"]]))
            .respond("rt:pageviews", rows(&[&["US", "mobile", "7"], &["FR", "mobile", "1"]])),
    );
    let state = AppState::new(common::config(&yaml("")), Arc::clone(&source) as _).unwrap();
    let scheduler = Scheduler::new(state.clone());
    assert!(!state.is_ready());

    let handles = scheduler.tick();
    assert_eq!(handles.len(), 2);
    for r in join_all(handles).await {
        r.unwrap();
    }

    assert!(state.is_ready());
    let reg = state.registry();
    assert_eq!(reg.scalar("rt:activeUsers").unwrap().get(), 5.0);
    assert_eq!(reg.vector("rt:_mobile").unwrap().get("US"), Some(7.0));
}

#[tokio::test]
async fn back_to_back_ticks_overlap_by_default() {
    let gate = Arc::new(Semaphore::new(0));
    let source = Arc::new(FakeSource::gated(Arc::clone(&gate)));
    let state = AppState::new(common::config(&yaml("")), Arc::clone(&source) as _).unwrap();
    let scheduler = Scheduler::new(state.clone());

    let first = scheduler.tick();
    let second = scheduler.tick();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);

    // both ticks' workers are in flight at once
    wait_for(|| source.started() == 4).await;

    gate.add_permits(4);
    for r in join_all(first.into_iter().chain(second)).await {
        r.unwrap();
    }
    assert_eq!(state.ticks(), 2);
    assert_eq!(source.calls().len(), 4);
}

#[tokio::test]
async fn skip_policy_skips_metrics_still_in_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let source = Arc::new(FakeSource::gated(Arc::clone(&gate)));
    let state = AppState::new(common::config(&yaml("overlap: skip\n")), Arc::clone(&source) as _).unwrap();
    let scheduler = Scheduler::new(state.clone());

    let first = scheduler.tick();
    let second = scheduler.tick();
    assert_eq!(first.len(), 2);
    assert!(second.is_empty());
    assert_eq!(
        state.metrics().overlap_skips.get(&[("metric", "rt:activeUsers")]),
        1
    );

    gate.add_permits(2);
    for r in join_all(first).await {
        r.unwrap();
    }

    let third = scheduler.tick();
    assert_eq!(third.len(), 2);
    gate.add_permits(2);
    for r in join_all(third).await {
        r.unwrap();
    }
    assert_eq!(source.calls().len(), 4);
}

#[tokio::test]
async fn exit_policy_stops_the_loop_on_first_error() {
    let source = Arc::new(FakeSource::new().fail("rt:pageviews"));
    let state = AppState::new(
        common::config(&yaml("on_fetch_error: exit\n")),
        Arc::clone(&source) as _,
    )
    .unwrap();

    let res = tokio::time::timeout(Duration::from_secs(5), Scheduler::new(state.clone()).run())
        .await
        .expect("run must return on fatal error");

    let err = res.unwrap_err();
    assert_eq!(err.code(), "upstream");
    assert_eq!(
        state
            .metrics()
            .worker_errors
            .get(&[("metric", "rt:pageviews"), ("code", "upstream")]),
        1
    );
}

#[tokio::test]
async fn skip_error_policy_keeps_polling() {
    let source = Arc::new(
        FakeSource::new()
            .fail("rt:pageviews")
            .respond("rt:activeUsers", rows(&[&["3"]])),
    );
    let state = AppState::new(common::config(&yaml("")), Arc::clone(&source) as _).unwrap();

    let res = tokio::time::timeout(Duration::from_millis(1500), Scheduler::new(state.clone()).run()).await;
    assert!(res.is_err(), "run must not return under the skip policy");

    assert!(state.ticks() >= 2);
    assert!(
        state
            .metrics()
            .worker_errors
            .get(&[("metric", "rt:pageviews"), ("code", "upstream")])
            >= 1
    );
    assert_eq!(state.registry().scalar("rt:activeUsers").unwrap().get(), 3.0);
}
