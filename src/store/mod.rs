#[cfg(test)]
pub mod memory;
pub mod pg;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Booking, BookingStatus, NewBooking, Vehicle, VehicleStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

pub trait VehicleStore: Send + Sync {
    fn get(&self, vehicle_id: i32) -> Result<Option<Vehicle>, StoreError>;
    fn set_status(&self, vehicle_id: i32, to: VehicleStatus) -> Result<(), StoreError>;
}

pub trait BookingStore: Send + Sync {
    fn get(&self, booking_id: i32) -> Result<Option<Booking>, StoreError>;
    /// All bookings for one vehicle whose status is in `statuses`.
    fn find_for_vehicle(
        &self,
        for_vehicle: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError>;
    fn create(&self, booking: NewBooking) -> Result<Booking, StoreError>;
    fn update(&self, booking: &Booking) -> Result<Booking, StoreError>;
    fn count_pending_payment_since(
        &self,
        renter: i32,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError>;
    fn count_cancellations_since(
        &self,
        renter: i32,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError>;
    fn confirmation_exists(&self, code: &str) -> Result<bool, StoreError>;
    /// Unpaid bookings created before `cutoff`, for the nightly sweep.
    fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>, StoreError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
