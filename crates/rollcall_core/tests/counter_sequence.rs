use rollcall_core::db::open_db_in_memory;
use rollcall_core::{CounterStore, SqliteCounterStore, ROLL_NO_COUNTER};

#[test]
fn increment_from_absent_state_returns_one_to_k_in_order() {
    let conn = open_db_in_memory().unwrap();
    let counters = SqliteCounterStore::new(&conn);

    for expected in 1..=25_i64 {
        assert_eq!(
            counters.increment_and_fetch(ROLL_NO_COUNTER).unwrap(),
            expected
        );
    }
}

#[test]
fn get_returns_none_for_absent_counter() {
    let conn = open_db_in_memory().unwrap();
    let counters = SqliteCounterStore::new(&conn);

    assert_eq!(counters.get(ROLL_NO_COUNTER).unwrap(), None);
}

#[test]
fn get_reflects_increments_without_mutating() {
    let conn = open_db_in_memory().unwrap();
    let counters = SqliteCounterStore::new(&conn);

    counters.increment_and_fetch(ROLL_NO_COUNTER).unwrap();
    counters.increment_and_fetch(ROLL_NO_COUNTER).unwrap();

    assert_eq!(counters.get(ROLL_NO_COUNTER).unwrap(), Some(2));
    assert_eq!(counters.get(ROLL_NO_COUNTER).unwrap(), Some(2));
}

#[test]
fn reset_creates_absent_counter_and_restarts_sequence() {
    let conn = open_db_in_memory().unwrap();
    let counters = SqliteCounterStore::new(&conn);

    counters.reset(ROLL_NO_COUNTER, 0).unwrap();
    assert_eq!(counters.get(ROLL_NO_COUNTER).unwrap(), Some(0));
    assert_eq!(counters.increment_and_fetch(ROLL_NO_COUNTER).unwrap(), 1);
}

#[test]
fn reset_overwrites_existing_counter() {
    let conn = open_db_in_memory().unwrap();
    let counters = SqliteCounterStore::new(&conn);

    for _ in 0..7 {
        counters.increment_and_fetch(ROLL_NO_COUNTER).unwrap();
    }
    counters.reset(ROLL_NO_COUNTER, 0).unwrap();

    assert_eq!(counters.increment_and_fetch(ROLL_NO_COUNTER).unwrap(), 1);
}

#[test]
fn counters_with_different_names_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let counters = SqliteCounterStore::new(&conn);

    assert_eq!(counters.increment_and_fetch("roll_no").unwrap(), 1);
    assert_eq!(counters.increment_and_fetch("admission_no").unwrap(), 1);
    assert_eq!(counters.increment_and_fetch("roll_no").unwrap(), 2);
    assert_eq!(counters.get("admission_no").unwrap(), Some(1));
}
