//! Fan-out integration tests

use helios_core::{Delta, Destination, Path};
use helios_dispatcher::{Dispatcher, Topics};
use rust_decimal_macros::dec;
use std::time::Duration;
use tokio::sync::mpsc;

fn goog_delta() -> Delta {
    let path = Path::new(Destination::new("GOOG", "stock"), dec!(150));
    Delta::realized(path, 12_500, dec!(125))
}

/// Two subscribers on "delta" each receive exactly one equal copy
#[tokio::test]
async fn test_delta_reaches_every_subscriber_once() {
    let _ = env_logger::try_init();

    let (dispatcher, _handle) = Dispatcher::<Delta>::spawn();
    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, mut rx_b) = mpsc::channel(8);
    dispatcher.subscribe(Topics::DELTA, "destiny", tx_a, true).await.unwrap();
    dispatcher.subscribe(Topics::DELTA, "auditor", tx_b, true).await.unwrap();

    let delta = goog_delta();
    let delivered = dispatcher.send(delta.clone(), Topics::DELTA).await.unwrap();
    assert_eq!(delivered, 2);

    assert_eq!(rx_a.recv().await, Some(delta.clone()));
    assert_eq!(rx_b.recv().await, Some(delta));
    assert!(rx_a.try_recv().is_err());
    assert!(rx_b.try_recv().is_err());
}

/// A full endpoint holds the publisher back until the reader catches up
#[tokio::test]
async fn test_full_endpoint_applies_backpressure() {
    let (dispatcher, _handle) = Dispatcher::<u32>::spawn();
    let (tx, mut rx) = mpsc::channel(1);
    dispatcher.subscribe("t", "slow", tx, true).await.unwrap();

    dispatcher.send(1, "t").await.unwrap();

    // The queue is full: the second send stays pending until a read frees a slot
    let publisher = dispatcher.clone();
    let mut pending = tokio::spawn(async move { publisher.send(2, "t").await });
    let stalled = tokio::time::timeout(Duration::from_millis(50), &mut pending).await;
    assert!(stalled.is_err());

    assert_eq!(rx.recv().await, Some(1));
    assert_eq!(pending.await.unwrap(), Ok(1));
    assert_eq!(rx.recv().await, Some(2));
}

/// Many publishers, many subscribers: every subscriber sees every message
#[tokio::test]
async fn test_many_publishers_many_subscribers() {
    let (dispatcher, _handle) = Dispatcher::<u32>::spawn();

    let mut readers = Vec::new();
    for i in 0..3 {
        let (tx, rx) = mpsc::channel(64);
        dispatcher
            .subscribe(Topics::TRADE_PROPOSAL, &format!("exec-{}", i), tx, true)
            .await
            .unwrap();
        readers.push(rx);
    }

    let mut publishers = Vec::new();
    for p in 0..4u32 {
        let dispatcher = dispatcher.clone();
        publishers.push(tokio::spawn(async move {
            for n in 0..5u32 {
                dispatcher
                    .send(p * 100 + n, Topics::TRADE_PROPOSAL)
                    .await
                    .unwrap();
            }
        }));
    }
    for publisher in publishers {
        publisher.await.unwrap();
    }

    for rx in &mut readers {
        let mut seen = Vec::new();
        while let Ok(n) = rx.try_recv() {
            seen.push(n);
        }
        seen.sort();
        let mut expected: Vec<u32> = (0..4).flat_map(|p| (0..5).map(move |n| p * 100 + n)).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }
}
