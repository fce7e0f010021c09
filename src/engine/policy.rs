use chrono::{DateTime, Duration, Utc};

use crate::config::PolicyConfig;
use crate::helper_model::BookingError;
use crate::store::BookingStore;

/// Per-renter rate limits, computed from the booking log alone.
///
/// Two guards: a renter sitting on too many unpaid bookings created
/// inside the pending window (stuck or abandoned payments), and a renter
/// who cancelled too many times inside the history window.
pub fn check(
    store: &dyn BookingStore,
    renter_id: i32,
    now: DateTime<Utc>,
    cfg: &PolicyConfig,
) -> Result<(), BookingError> {
    let pending_cutoff = now - Duration::minutes(cfg.pending_window_minutes);
    let pending = store.count_pending_payment_since(renter_id, pending_cutoff)?;
    if pending >= cfg.max_pending_per_window {
        return Err(BookingError::RateLimit(
            "too many unpaid bookings, settle or cancel them before booking again".into(),
        ));
    }

    let cancel_cutoff = now - Duration::days(cfg.cancellation_history_days);
    let cancelled = store.count_cancellations_since(renter_id, cancel_cutoff)?;
    if cancelled >= cfg.max_recent_cancellations {
        return Err(BookingError::RateLimit(
            "too many recent cancellations, please contact support".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use crate::model::{BookingStatus, PaymentStatus};
    use crate::store::memory::{booking_fixture, MemStore};

    fn base_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn seed_pending(store: &MemStore, id: i32, renter: i32, age: Duration) {
        let mut booking = booking_fixture(id, 1, d(10), d(12), BookingStatus::PaymentPending);
        booking.renter_id = renter;
        booking.payment_status = PaymentStatus::Pending;
        booking.created_at = base_now() - age;
        store.seed_booking(booking);
    }

    fn seed_cancelled(store: &MemStore, id: i32, renter: i32, age: Duration) {
        let mut booking = booking_fixture(id, 1, d(10), d(12), BookingStatus::Cancelled);
        booking.renter_id = renter;
        booking.cancelled_at = Some(base_now() - age);
        store.seed_booking(booking);
    }

    #[test]
    fn two_recent_unpaid_bookings_pass() {
        let store = MemStore::new();
        seed_pending(&store, 1, 7, Duration::minutes(5));
        seed_pending(&store, 2, 7, Duration::minutes(20));
        assert!(check(&store, 7, base_now(), &PolicyConfig::default()).is_ok());
    }

    #[test]
    fn three_recent_unpaid_bookings_block() {
        let store = MemStore::new();
        for id in 1..=3 {
            seed_pending(&store, id, 7, Duration::minutes(10));
        }
        let err = check(&store, 7, base_now(), &PolicyConfig::default()).unwrap_err();
        assert!(matches!(err, BookingError::RateLimit(_)));
    }

    #[test]
    fn old_unpaid_bookings_fall_out_of_the_window() {
        let store = MemStore::new();
        for id in 1..=3 {
            seed_pending(&store, id, 7, Duration::minutes(45));
        }
        assert!(check(&store, 7, base_now(), &PolicyConfig::default()).is_ok());
    }

    #[test]
    fn four_recent_cancellations_pass() {
        let store = MemStore::new();
        for id in 1..=4 {
            seed_cancelled(&store, id, 7, Duration::days(2));
        }
        assert!(check(&store, 7, base_now(), &PolicyConfig::default()).is_ok());
    }

    #[test]
    fn five_recent_cancellations_block() {
        let store = MemStore::new();
        for id in 1..=5 {
            seed_cancelled(&store, id, 7, Duration::days(2));
        }
        let err = check(&store, 7, base_now(), &PolicyConfig::default()).unwrap_err();
        assert!(matches!(err, BookingError::RateLimit(_)));
    }

    #[test]
    fn cancellations_older_than_a_week_do_not_count() {
        let store = MemStore::new();
        for id in 1..=5 {
            seed_cancelled(&store, id, 7, Duration::days(8));
        }
        assert!(check(&store, 7, base_now(), &PolicyConfig::default()).is_ok());
    }

    #[test]
    fn other_renters_history_is_ignored() {
        let store = MemStore::new();
        for id in 1..=3 {
            seed_pending(&store, id, 99, Duration::minutes(10));
        }
        assert!(check(&store, 7, base_now(), &PolicyConfig::default()).is_ok());
    }
}
