use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::config::PolicyConfig;
use crate::helper_model::BookingError;
use crate::model::{Booking, BookingStatus, Vehicle};

/// The legal moves of the booking state machine:
/// PAYMENT_PENDING -> CONFIRMED -> IN_PROGRESS -> COMPLETED, with
/// CANCELLED reachable from PAYMENT_PENDING or CONFIRMED only.
pub fn ensure_transition(from: BookingStatus, to: BookingStatus) -> Result<(), BookingError> {
    use BookingStatus::*;
    let legal = matches!(
        (from, to),
        (PaymentPending, Confirmed)
            | (Confirmed, InProgress)
            | (InProgress, Completed)
            | (PaymentPending, Cancelled)
            | (Confirmed, Cancelled)
    );
    if legal {
        Ok(())
    } else {
        Err(BookingError::State(format!(
            "cannot move a {from} booking to {to}"
        )))
    }
}

/// A confirmed booking may only be cancelled while `now` is more than
/// the configured cutoff before pickup (midnight UTC of the start date).
/// An unpaid booking can always be cancelled.
pub fn ensure_cancellable(
    booking: &Booking,
    now: DateTime<Utc>,
    cfg: &PolicyConfig,
) -> Result<(), BookingError> {
    if booking.status != BookingStatus::Confirmed {
        return Ok(());
    }
    let pickup = booking.start_date.and_time(NaiveTime::MIN).and_utc();
    if now + Duration::hours(cfg.cancellation_cutoff_hours) >= pickup {
        return Err(BookingError::State(format!(
            "bookings can no longer be cancelled within {} hours of pickup",
            cfg.cancellation_cutoff_hours
        )));
    }
    Ok(())
}

/// Charge for kilometres beyond the daily allowance, rounded to the
/// currency unit. Zero when either odometer reading is missing.
pub fn extra_mileage_fee(booking: &Booking, vehicle: &Vehicle) -> f64 {
    let (Some(start), Some(end)) = (booking.mileage_start, booking.mileage_end) else {
        return 0.0;
    };
    let driven = i64::from(end) - i64::from(start);
    let allowed = booking.duration_days() * i64::from(vehicle.mileage_limit_per_day);
    let over = (driven - allowed).max(0);
    (over as f64 * vehicle.extra_mileage_rate).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use crate::store::memory::{booking_fixture, vehicle_fixture};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn forward_path_is_legal() {
        use BookingStatus::*;
        assert!(ensure_transition(PaymentPending, Confirmed).is_ok());
        assert!(ensure_transition(Confirmed, InProgress).is_ok());
        assert!(ensure_transition(InProgress, Completed).is_ok());
    }

    #[test]
    fn cancellation_sources_are_limited() {
        use BookingStatus::*;
        assert!(ensure_transition(PaymentPending, Cancelled).is_ok());
        assert!(ensure_transition(Confirmed, Cancelled).is_ok());
        assert!(ensure_transition(InProgress, Cancelled).is_err());
        assert!(ensure_transition(Completed, Cancelled).is_err());
    }

    #[test]
    fn skipping_and_reversing_are_illegal() {
        use BookingStatus::*;
        assert!(ensure_transition(PaymentPending, InProgress).is_err());
        assert!(ensure_transition(PaymentPending, Completed).is_err());
        assert!(ensure_transition(Confirmed, Completed).is_err());
        assert!(ensure_transition(Confirmed, PaymentPending).is_err());
        assert!(ensure_transition(Completed, InProgress).is_err());
        assert!(ensure_transition(Cancelled, Confirmed).is_err());
    }

    #[test]
    fn confirmed_booking_inside_the_cutoff_cannot_cancel() {
        // pickup at midnight on the 10th, now 12 hours before
        let booking = booking_fixture(1, 1, d(10), d(12), BookingStatus::Confirmed);
        let now = Utc.with_ymd_and_hms(2025, 6, 9, 12, 0, 0).unwrap();
        let err = ensure_cancellable(&booking, now, &PolicyConfig::default()).unwrap_err();
        assert!(matches!(err, BookingError::State(_)));
    }

    #[test]
    fn confirmed_booking_outside_the_cutoff_can_cancel() {
        // 48 hours before pickup
        let booking = booking_fixture(1, 1, d(10), d(12), BookingStatus::Confirmed);
        let now = Utc.with_ymd_and_hms(2025, 6, 8, 0, 0, 0).unwrap();
        assert!(ensure_cancellable(&booking, now, &PolicyConfig::default()).is_ok());
    }

    #[test]
    fn unpaid_booking_can_always_cancel() {
        let booking = booking_fixture(1, 1, d(10), d(12), BookingStatus::PaymentPending);
        let now = Utc.with_ymd_and_hms(2025, 6, 9, 23, 0, 0).unwrap();
        assert!(ensure_cancellable(&booking, now, &PolicyConfig::default()).is_ok());
    }

    #[test]
    fn mileage_within_allowance_is_free() {
        // 2 days * 200 km/day = 400 km allowed
        let vehicle = vehicle_fixture(1, 500_000.0);
        let mut booking = booking_fixture(1, 1, d(10), d(12), BookingStatus::InProgress);
        booking.mileage_start = Some(10_000);
        booking.mileage_end = Some(10_400);
        assert_eq!(extra_mileage_fee(&booking, &vehicle), 0.0);
    }

    #[test]
    fn mileage_over_allowance_is_charged() {
        let vehicle = vehicle_fixture(1, 500_000.0);
        let mut booking = booking_fixture(1, 1, d(10), d(12), BookingStatus::InProgress);
        booking.mileage_start = Some(10_000);
        booking.mileage_end = Some(10_500);
        // 100 km over at 5000/km
        assert_eq!(extra_mileage_fee(&booking, &vehicle), 500_000.0);
    }

    #[test]
    fn missing_readings_mean_no_fee() {
        let vehicle = vehicle_fixture(1, 500_000.0);
        let booking = booking_fixture(1, 1, d(10), d(12), BookingStatus::InProgress);
        assert_eq!(extra_mileage_fee(&booking, &vehicle), 0.0);
    }
}
