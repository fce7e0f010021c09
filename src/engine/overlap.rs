use chrono::NaiveDate;

use crate::model::Booking;

/// Half-open range intersection: `[s1, e1)` and `[s2, e2)` collide iff
/// `s1 < e2 && s2 < e1`. A drop-off on day X and a pickup on day X do
/// not collide, which is what makes back-to-back rentals possible.
pub fn overlaps(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 < e2 && s2 < e1
}

/// Whether the candidate range collides with any booking that still
/// blocks calendar days. Cancelled and completed bookings never block.
/// `exclude` skips one booking id so an in-place edit does not conflict
/// with itself.
pub fn conflicts(
    start: NaiveDate,
    end: NaiveDate,
    existing: &[Booking],
    exclude: Option<i32>,
) -> bool {
    existing
        .iter()
        .filter(|b| b.status.blocks_calendar())
        .filter(|b| exclude != Some(b.id))
        .any(|b| overlaps(start, end, b.start_date, b.end_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookingStatus;
    use crate::store::memory::booking_fixture;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn overlapping_ranges_collide() {
        // existing 2025-01-01..05, candidate 03..06
        assert!(overlaps(d(2025, 1, 3), d(2025, 1, 6), d(2025, 1, 1), d(2025, 1, 5)));
    }

    #[test]
    fn adjacent_ranges_do_not_collide() {
        // drop-off on the 5th, pickup on the 5th
        assert!(!overlaps(d(2025, 1, 5), d(2025, 1, 7), d(2025, 1, 1), d(2025, 1, 5)));
        assert!(!overlaps(d(2025, 1, 1), d(2025, 1, 5), d(2025, 1, 5), d(2025, 1, 7)));
    }

    #[test]
    fn contained_range_collides() {
        assert!(overlaps(d(2025, 1, 2), d(2025, 1, 3), d(2025, 1, 1), d(2025, 1, 10)));
        assert!(overlaps(d(2025, 1, 1), d(2025, 1, 10), d(2025, 1, 2), d(2025, 1, 3)));
    }

    #[test]
    fn identical_ranges_collide() {
        assert!(overlaps(d(2025, 1, 1), d(2025, 1, 5), d(2025, 1, 1), d(2025, 1, 5)));
    }

    #[test]
    fn cancelled_and_completed_never_block() {
        let existing = vec![
            booking_fixture(1, 7, d(2025, 1, 1), d(2025, 1, 5), BookingStatus::Cancelled),
            booking_fixture(2, 7, d(2025, 1, 1), d(2025, 1, 5), BookingStatus::Completed),
        ];
        assert!(!conflicts(d(2025, 1, 2), d(2025, 1, 4), &existing, None));
    }

    #[test]
    fn unpaid_bookings_block() {
        let existing = vec![booking_fixture(
            1,
            7,
            d(2025, 1, 1),
            d(2025, 1, 5),
            BookingStatus::PaymentPending,
        )];
        assert!(conflicts(d(2025, 1, 3), d(2025, 1, 6), &existing, None));
        assert!(!conflicts(d(2025, 1, 5), d(2025, 1, 7), &existing, None));
    }

    #[test]
    fn exclusion_skips_own_booking() {
        let existing = vec![booking_fixture(
            9,
            7,
            d(2025, 1, 1),
            d(2025, 1, 5),
            BookingStatus::Confirmed,
        )];
        assert!(conflicts(d(2025, 1, 2), d(2025, 1, 6), &existing, None));
        assert!(!conflicts(d(2025, 1, 2), d(2025, 1, 6), &existing, Some(9)));
    }
}
