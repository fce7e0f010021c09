//! In-memory stores and a settable clock so the engine can be exercised
//! without a database.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::model::{
    Booking, BookingStatus, NewBooking, PaymentStatus, Vehicle, VehicleStatus,
};
use crate::store::{BookingStore, Clock, StoreError, VehicleStore};

#[derive(Default)]
struct Inner {
    vehicles: HashMap<i32, Vehicle>,
    bookings: HashMap<i32, Booking>,
    next_booking_id: i32,
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vehicle(&self, vehicle: Vehicle) {
        let mut inner = self.inner.lock().unwrap();
        inner.vehicles.insert(vehicle.id, vehicle);
    }

    /// Seed a booking with an explicit id, for history-dependent tests.
    pub fn seed_booking(&self, booking: Booking) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_booking_id = inner.next_booking_id.max(booking.id);
        inner.bookings.insert(booking.id, booking);
    }

    pub fn vehicle(&self, vehicle_id: i32) -> Option<Vehicle> {
        self.inner.lock().unwrap().vehicles.get(&vehicle_id).cloned()
    }

    pub fn booking(&self, booking_id: i32) -> Option<Booking> {
        self.inner.lock().unwrap().bookings.get(&booking_id).cloned()
    }
}

impl VehicleStore for MemStore {
    fn get(&self, vehicle_id: i32) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.vehicle(vehicle_id))
    }

    fn set_status(&self, vehicle_id: i32, to: VehicleStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(vehicle) = inner.vehicles.get_mut(&vehicle_id) {
            vehicle.status = to;
        }
        Ok(())
    }
}

impl BookingStore for MemStore {
    fn get(&self, booking_id: i32) -> Result<Option<Booking>, StoreError> {
        Ok(self.booking(booking_id))
    }

    fn find_for_vehicle(
        &self,
        for_vehicle: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.vehicle_id == for_vehicle && statuses.contains(&b.status))
            .cloned()
            .collect())
    }

    fn create(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_booking_id += 1;
        let id = inner.next_booking_id;
        let stored = Booking {
            id,
            confirmation: booking.confirmation,
            vehicle_id: booking.vehicle_id,
            renter_id: booking.renter_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            pickup_location: booking.pickup_location,
            dropoff_location: booking.dropoff_location,
            actual_start_date: None,
            actual_end_date: None,
            mileage_start: None,
            mileage_end: None,
            base_price: booking.base_price,
            insurance_fee: booking.insurance_fee,
            service_fee: booking.service_fee,
            extra_mileage_fee: booking.extra_mileage_fee,
            deposit: booking.deposit,
            total_price: booking.total_price,
            payment_status: booking.payment_status,
            paid_at: None,
            status: booking.status,
            cancellation_reason: None,
            cancelled_at: None,
            cancelled_by: None,
            created_at: booking.created_at,
        };
        inner.bookings.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, booking: &Booking) -> Result<Booking, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }

    fn count_pending_payment_since(
        &self,
        renter: i32,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bookings
            .values()
            .filter(|b| {
                b.renter_id == renter
                    && b.payment_status == PaymentStatus::Pending
                    && b.created_at >= since
            })
            .count() as i64)
    }

    fn count_cancellations_since(
        &self,
        renter: i32,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bookings
            .values()
            .filter(|b| {
                b.renter_id == renter
                    && b.status == BookingStatus::Cancelled
                    && b.cancelled_at.is_some_and(|at| at >= since)
            })
            .count() as i64)
    }

    fn confirmation_exists(&self, code: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.bookings.values().any(|b| b.confirmation == code))
    }

    fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.status == BookingStatus::PaymentPending && b.created_at < cutoff)
            .cloned()
            .collect())
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn vehicle_fixture(id: i32, rate_per_day: f64) -> Vehicle {
    Vehicle {
        id,
        brand: "Toyota".into(),
        model: "Vios".into(),
        year: 2022,
        plate_number: format!("51A-{:05}", id),
        rate_per_day,
        status: VehicleStatus::Available,
        is_active: true,
        deposit: 0.0,
        mileage_limit_per_day: 200,
        extra_mileage_rate: 5000.0,
    }
}

pub fn booking_fixture(
    id: i32,
    vehicle_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: BookingStatus,
) -> Booking {
    Booking {
        id,
        confirmation: format!("FIX{:05}", id),
        vehicle_id,
        renter_id: 1,
        start_date,
        end_date,
        pickup_location: "District 1 office".into(),
        dropoff_location: "District 1 office".into(),
        actual_start_date: None,
        actual_end_date: None,
        mileage_start: None,
        mileage_end: None,
        base_price: 0.0,
        insurance_fee: 0.0,
        service_fee: 0.0,
        extra_mileage_fee: 0.0,
        deposit: 0.0,
        total_price: 0.0,
        payment_status: PaymentStatus::Pending,
        paid_at: None,
        status,
        cancellation_reason: None,
        cancelled_at: None,
        cancelled_by: None,
        created_at: DateTime::<Utc>::MIN_UTC,
    }
}
