use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use crate::db::PgPool;
use crate::model::{Booking, BookingStatus, NewBooking, Vehicle, VehicleStatus};
use crate::store::{BookingStore, StoreError, VehicleStore};

type PgConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Diesel-backed implementation of both stores, sharing one r2d2 pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PgConn, StoreError> {
        Ok(self.pool.get()?)
    }
}

impl VehicleStore for PgStore {
    fn get(&self, vehicle_id: i32) -> Result<Option<Vehicle>, StoreError> {
        use crate::schema::vehicles::dsl::*;
        let mut conn = self.conn()?;
        Ok(vehicles
            .filter(id.eq(vehicle_id))
            .get_result::<Vehicle>(&mut conn)
            .optional()?)
    }

    fn set_status(&self, vehicle_id: i32, to: VehicleStatus) -> Result<(), StoreError> {
        use crate::schema::vehicles::dsl::*;
        let mut conn = self.conn()?;
        diesel::update(vehicles.filter(id.eq(vehicle_id)))
            .set(status.eq(to))
            .execute(&mut conn)?;
        Ok(())
    }
}

impl BookingStore for PgStore {
    fn get(&self, booking_id: i32) -> Result<Option<Booking>, StoreError> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(bookings
            .filter(id.eq(booking_id))
            .get_result::<Booking>(&mut conn)
            .optional()?)
    }

    fn find_for_vehicle(
        &self,
        for_vehicle: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(bookings
            .filter(vehicle_id.eq(for_vehicle))
            .filter(status.eq_any(statuses.iter().copied()))
            .load::<Booking>(&mut conn)?)
    }

    fn create(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(diesel::insert_into(bookings)
            .values(&booking)
            .get_result::<Booking>(&mut conn)?)
    }

    fn update(&self, booking: &Booking) -> Result<Booking, StoreError> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(diesel::update(bookings.filter(id.eq(booking.id)))
            .set(booking)
            .get_result::<Booking>(&mut conn)?)
    }

    fn count_pending_payment_since(
        &self,
        renter: i32,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        use crate::model::PaymentStatus;
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(bookings
            .filter(renter_id.eq(renter))
            .filter(payment_status.eq(PaymentStatus::Pending))
            .filter(created_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)?)
    }

    fn count_cancellations_since(
        &self,
        renter: i32,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(bookings
            .filter(renter_id.eq(renter))
            .filter(status.eq(BookingStatus::Cancelled))
            .filter(cancelled_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)?)
    }

    fn confirmation_exists(&self, code: &str) -> Result<bool, StoreError> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(diesel::select(diesel::dsl::exists(
            bookings.filter(confirmation.eq(code)),
        ))
        .get_result::<bool>(&mut conn)?)
    }

    fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>, StoreError> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.conn()?;
        Ok(bookings
            .filter(status.eq(BookingStatus::PaymentPending))
            .filter(created_at.lt(cutoff))
            .load::<Booking>(&mut conn)?)
    }
}
