//! Live feed tests under paused tokio time.

mod common;

use std::time::Duration;

use common::*;
use goldcast::feed::LiveFeed;
use tokio::sync::broadcast::error::RecvError;

#[tokio::test(start_paused = true)]
async fn broadcasts_the_same_readings_as_the_sampler() {
    let mut direct = live_sampler(17);
    let expected: Vec<_> = (0..4).map(|_| direct.sample()).collect();

    let feed = LiveFeed::new(live_sampler(17), Duration::from_secs(5)).unwrap();
    let mut rx = feed.subscribe();
    let handle = feed.start();

    let mut received = Vec::new();
    while received.len() < expected.len() {
        received.push(rx.recv().await.unwrap());
    }
    handle.stop().await.unwrap();

    assert_eq!(received, expected);
}

#[tokio::test(start_paused = true)]
async fn readings_arrive_once_per_interval() {
    let feed = LiveFeed::new(live_sampler(2), Duration::from_secs(5)).unwrap();
    let mut rx = feed.subscribe();
    let started = tokio::time::Instant::now();
    let handle = feed.start();

    rx.recv().await.unwrap();
    rx.recv().await.unwrap();
    rx.recv().await.unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(10) && elapsed < Duration::from_secs(15));

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn every_subscriber_sees_every_reading() {
    let feed = LiveFeed::new(live_sampler(6), Duration::from_secs(1)).unwrap();
    let mut a = feed.subscribe();
    let mut b = feed.subscribe();
    let handle = feed.start();

    for _ in 0..3 {
        assert_eq!(a.recv().await.unwrap(), b.recv().await.unwrap());
    }
    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_closes_the_stream() {
    let feed = LiveFeed::new(live_sampler(6), Duration::from_secs(1)).unwrap();
    let mut rx = feed.subscribe();
    let handle = feed.start();
    rx.recv().await.unwrap();
    drop(handle);

    loop {
        match rx.recv().await {
            Ok(_) => continue,
            Err(RecvError::Closed) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn slow_subscriber_lags_while_feed_keeps_running() {
    let feed = LiveFeed::with_capacity(live_sampler(9), Duration::from_secs(1), 2).unwrap();
    let mut slow = feed.subscribe();
    let handle = feed.start();

    // Ticks at 0..=5s fill a two-slot buffer nobody drains.
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert!(handle.is_running());

    match slow.recv().await {
        Err(RecvError::Lagged(skipped)) => assert!(skipped >= 3, "skipped {skipped}"),
        other => panic!("expected lag, got {other:?}"),
    }
    // After the lag the receiver resumes with the newest buffered readings.
    assert!(slow.recv().await.is_ok());

    let sampled = handle.stop().await.unwrap();
    assert!(sampled >= 6);
}
