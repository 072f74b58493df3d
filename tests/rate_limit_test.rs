use std::{sync::Arc, time::Duration};

use recomix::management::{Admission, RateGovernor};
use tokio::time::Instant;

fn governor() -> Arc<RateGovernor> {
    Arc::new(RateGovernor::new(3, Duration::from_secs(60)))
}

fn admit_and_commit(governor: &Arc<RateGovernor>, key: &str, now: Instant) {
    match governor.admit_at(key, now) {
        Admission::Admitted(permit) => permit.commit(),
        Admission::Denied { retry_after } => panic!("denied, retry after {retry_after}s"),
    }
}

#[test]
fn test_fourth_request_in_window_is_denied() {
    let governor = governor();
    let start = Instant::now();

    for i in 0..3 {
        admit_and_commit(&governor, "caller", start + Duration::from_secs(i * 10));
    }

    match governor.admit_at("caller", start + Duration::from_secs(30)) {
        Admission::Denied { retry_after } => assert_eq!(retry_after, 30),
        Admission::Admitted(_) => panic!("fourth request must be denied"),
    }
}

#[test]
fn test_admitted_again_after_window() {
    let governor = governor();
    let start = Instant::now();

    for _ in 0..3 {
        admit_and_commit(&governor, "caller", start);
    }
    assert!(matches!(
        governor.admit_at("caller", start + Duration::from_secs(59)),
        Admission::Denied { .. }
    ));
    assert!(matches!(
        governor.admit_at("caller", start + Duration::from_secs(60)),
        Admission::Admitted(_)
    ));
}

#[test]
fn test_retry_after_rounds_up() {
    let governor = governor();
    let start = Instant::now();

    for _ in 0..3 {
        admit_and_commit(&governor, "caller", start);
    }

    match governor.admit_at("caller", start + Duration::from_millis(10_500)) {
        Admission::Denied { retry_after } => assert_eq!(retry_after, 50),
        Admission::Admitted(_) => panic!("must be denied"),
    }
}

#[test]
fn test_uncommitted_permit_gives_slot_back() {
    let governor = governor();
    let now = Instant::now();

    for _ in 0..3 {
        match governor.admit_at("caller", now) {
            // Dropped without commit, like a failed generation
            Admission::Admitted(permit) => drop(permit),
            Admission::Denied { .. } => panic!("failed requests must not consume quota"),
        }
    }

    for _ in 0..3 {
        admit_and_commit(&governor, "caller", now);
    }
    assert!(matches!(
        governor.admit_at("caller", now),
        Admission::Denied { .. }
    ));
}

#[test]
fn test_pending_permits_count_against_the_limit() {
    let governor = governor();
    let now = Instant::now();

    let held: Vec<_> = (0..3)
        .map(|_| match governor.admit_at("caller", now) {
            Admission::Admitted(permit) => permit,
            Admission::Denied { .. } => panic!("must be admitted"),
        })
        .collect();

    // In-flight requests already hold every slot
    assert!(matches!(
        governor.admit_at("caller", now),
        Admission::Denied { .. }
    ));

    drop(held);
    assert!(matches!(
        governor.admit_at("caller", now),
        Admission::Admitted(_)
    ));
}

#[test]
fn test_callers_are_independent() {
    let governor = governor();
    let now = Instant::now();

    for _ in 0..3 {
        admit_and_commit(&governor, "alice", now);
    }

    assert!(matches!(
        governor.admit_at("alice", now),
        Admission::Denied { .. }
    ));
    assert!(matches!(
        governor.admit_at("bob", now),
        Admission::Admitted(_)
    ));
}

#[test]
fn test_expired_callers_are_forgotten() {
    let governor = governor();
    let start = Instant::now();

    admit_and_commit(&governor, "alice", start);
    admit_and_commit(&governor, "bob", start + Duration::from_secs(30));
    assert_eq!(governor.tracked_keys(), 2);

    // Any admission sweeps callers whose window emptied
    admit_and_commit(&governor, "carol", start + Duration::from_secs(61));
    assert_eq!(governor.tracked_keys(), 2);

    admit_and_commit(&governor, "carol", start + Duration::from_secs(200));
    assert_eq!(governor.tracked_keys(), 1);
}

#[test]
fn test_denied_first_check_leaves_no_entry() {
    let governor = Arc::new(RateGovernor::new(0, Duration::from_secs(60)));

    assert!(matches!(
        governor.admit_at("caller", Instant::now()),
        Admission::Denied { retry_after: 60 }
    ));
    assert_eq!(governor.tracked_keys(), 0);
}
