//! Barrier property of the pulse clock
//!
//! With N subscribers of uneven speed, no subscriber may observe pulse i+1
//! before every subscriber has acknowledged pulse i.

use helios_clock::{Pulsar, StaticSource};
use helios_core::Pulse;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Observe(usize, Pulse),
    Ack(usize, Pulse),
}

#[tokio::test]
async fn test_no_subscriber_runs_ahead() {
    let _ = env_logger::try_init();

    const SUBSCRIBERS: usize = 4;
    let schedule: Vec<i64> = (1..=8).map(|i| i * 60_000).collect();
    let source = StaticSource::new(schedule.clone());
    let mut pulsar = Pulsar::new(&source, 0, i64::MAX).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::new();
    for k in 0..SUBSCRIBERS {
        let mut sub = pulsar.subscribe(format!("sub-{}", k));
        let log = log.clone();
        handles.push(tokio::spawn(async move {
            while let Some(pulse) = sub.next().await {
                log.lock().unwrap().push(Step::Observe(k, pulse));
                // Slower subscribers take longer per step
                tokio::time::sleep(Duration::from_millis(k as u64 * 3)).await;
                log.lock().unwrap().push(Step::Ack(k, pulse));
                sub.ack().await.unwrap();
                if pulse.is_terminal() {
                    break;
                }
            }
        }));
    }

    let report = pulsar.start().await.unwrap();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(report.pulses, schedule.len());
    assert_eq!(report.broadcasts, schedule.len() + 1);

    let log = log.lock().unwrap();
    let mut order: Vec<Pulse> = schedule.into_iter().map(Pulse).collect();
    order.push(Pulse::TERMINAL);

    // Every step of pulse i (observe + ack, all subscribers) precedes any step of pulse i+1
    let mut cursor = 0;
    for pulse in &order {
        let block = &log[cursor..cursor + 2 * SUBSCRIBERS];
        for step in block {
            let p = match step {
                Step::Observe(_, p) | Step::Ack(_, p) => p,
            };
            assert_eq!(p, pulse, "step {:?} leaked into pulse {}", step, pulse);
        }
        for k in 0..SUBSCRIBERS {
            assert!(block.contains(&Step::Observe(k, *pulse)));
            assert!(block.contains(&Step::Ack(k, *pulse)));
        }
        cursor += 2 * SUBSCRIBERS;
    }
    assert_eq!(cursor, log.len());
}

#[tokio::test]
async fn test_empty_schedule_only_terminates() {
    let source = StaticSource::new([10, 20]);
    let mut pulsar = Pulsar::new(&source, 100, 200).unwrap();
    let mut sub = pulsar.subscribe("lonely");

    let handle = tokio::spawn(async move {
        let pulse = sub.next().await;
        sub.ack().await.unwrap();
        pulse
    });

    let report = pulsar.start().await.unwrap();
    assert_eq!(report.pulses, 0);
    assert_eq!(report.broadcasts, 1);
    assert_eq!(handle.await.unwrap(), Some(Pulse::TERMINAL));
}
