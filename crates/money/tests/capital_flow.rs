//! Capital allocator integration tests

use helios_core::Allotment;
use helios_money::{Accumulator, Money, MoneyConfig, MoneyError};

fn seeded(cash: i64) -> Money {
    let (money, _handle) = Money::spawn(MoneyConfig {
        cash,
        ..Default::default()
    });
    money
}

/// Seed 100,000 cents, take one allotment, give it back
#[tokio::test]
async fn test_get_put_round_trip_restores_pool() {
    let _ = env_logger::try_init();

    let money = seeded(100_000);
    let len_before = money.len().await.unwrap();

    let allotment = money.get().await.unwrap();
    assert_eq!(allotment.amount, 1_000);
    assert_eq!(money.available().await.unwrap(), 99_000);

    money.put(Allotment::new(1_000), true).await.unwrap();
    assert_eq!(money.available().await.unwrap(), 100_000);
    assert_eq!(money.len().await.unwrap(), len_before);
}

/// Concurrent borrowers never overdraw and always give back what they took
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_borrowers_conserve_capital() {
    let money = seeded(100_000);

    let mut borrowers = Vec::new();
    for _ in 0..8 {
        let money = money.clone();
        borrowers.push(tokio::spawn(async move {
            let mut taken = 0;
            for _ in 0..25 {
                match money.get().await {
                    Ok(allotment) => {
                        taken += 1;
                        tokio::task::yield_now().await;
                        money.put(allotment, true).await.unwrap();
                    }
                    Err(MoneyError::EmptyPool) => {}
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
            taken
        }));
    }

    let mut total_taken = 0;
    for borrower in borrowers {
        total_taken += borrower.await.unwrap();
    }

    assert!(total_taken > 0);
    assert_eq!(money.available().await.unwrap(), 100_000);
    assert_eq!(money.total().await.unwrap(), 100_000);
    assert_eq!(money.len().await.unwrap(), 100);
}

/// Draining the whole pool ends in EmptyPool, re-allot of nothing stays empty
#[tokio::test]
async fn test_drain_then_reallot() {
    let money = seeded(10_000);
    for _ in 0..100 {
        assert_eq!(money.get().await.unwrap().amount, 100);
    }
    assert_eq!(money.get().await, Err(MoneyError::EmptyPool));

    money.reallot().await.unwrap();
    assert_eq!(money.len().await.unwrap(), 0);
    assert_eq!(money.available().await.unwrap(), 0);
}

/// Returns flow back as allotments sized like the pool's
#[tokio::test]
async fn test_accumulated_returns_become_allotments() {
    let money = seeded(100_000);
    let (accumulator, _handle) = Accumulator::spawn(money.clone());

    for _ in 0..5 {
        accumulator.credit(250, true).await.unwrap();
    }

    assert_eq!(accumulator.pending().await.unwrap(), 250);
    assert_eq!(money.len().await.unwrap(), 101);
    assert_eq!(money.available().await.unwrap(), 101_000);
    assert_eq!(money.get().await.unwrap().amount, 1_000);
}
