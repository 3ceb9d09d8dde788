//! Concurrent registry access tests
//!
//! Each account is serialized behind its own lock, so racing withdrawals can
//! never both pass the balance check.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use rust_decimal::Decimal;

use ledgerline_core::config::AccountSettings;
use ledgerline_core::services::Registry;
use ledgerline_core::{AccountNumber, NewClient, TaxId, Transaction, WithdrawalLimits};

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 8;

/// Registry whose accounts have no practical withdrawal ceiling or cap
fn unlimited_registry() -> Registry {
    Registry::new(AccountSettings {
        agency: "0001".to_string(),
        limits: WithdrawalLimits {
            per_withdrawal_limit: Decimal::new(1_000_000, 0),
            max_withdrawals: u32::MAX,
        },
    })
}

fn register(registry: &Registry, tax_id: &str) -> TaxId {
    registry
        .register_client(NewClient {
            tax_id: tax_id.to_string(),
            name: format!("Client {}", tax_id),
            ..Default::default()
        })
        .unwrap()
        .tax_id()
        .clone()
}

/// Test: many threads race to withdraw from one account holding enough for
/// exactly half of them.
#[test]
fn test_racing_withdrawals_never_overdraw() {
    let registry = Arc::new(unlimited_registry());
    let tax_id = register(&registry, "111");
    let number = registry.open_account(&tax_id).unwrap();

    let funded = (THREAD_COUNT / 2) as i64 * 100;
    registry
        .execute(&tax_id, number, Transaction::deposit(Decimal::new(funded, 0)))
        .unwrap();

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            let success_count = Arc::clone(&success_count);
            let tax_id = tax_id.clone();

            thread::spawn(move || {
                barrier.wait();
                if registry
                    .execute(&tax_id, number, Transaction::withdraw(Decimal::new(100, 0)))
                    .is_ok()
                {
                    success_count.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let shared = registry.account(number).unwrap().unwrap();
    let account = shared.lock().unwrap();
    assert_eq!(success_count.load(Ordering::SeqCst), THREAD_COUNT / 2);
    assert_eq!(account.balance(), Decimal::ZERO);
    assert_eq!(account.history().len(), 1 + THREAD_COUNT / 2);
}

/// Test: threads working on separate accounts don't interfere, and
/// account numbers stay unique when opened concurrently.
#[test]
fn test_parallel_accounts_are_independent() {
    let registry = Arc::new(unlimited_registry());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || -> AccountNumber {
                let tax_id = register(&registry, &format!("{}", 1000 + i));
                barrier.wait();
                let number = registry.open_account(&tax_id).unwrap();
                for _ in 0..10 {
                    registry
                        .execute(&tax_id, number, Transaction::deposit(Decimal::new(5, 0)))
                        .unwrap();
                }
                number
            })
        })
        .collect();

    let mut numbers: Vec<u32> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked").get())
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=THREAD_COUNT as u32).collect::<Vec<_>>());

    for summary in registry.accounts().unwrap() {
        assert_eq!(summary.balance, Decimal::new(50, 0));
    }
}
