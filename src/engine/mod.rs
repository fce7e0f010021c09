pub mod lifecycle;
pub mod overlap;
pub mod policy;
pub mod pricing;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::{EngineConfig, PolicyConfig};
use crate::helper_model::BookingError;
use crate::model::{
    Booking, BookingStatus, NewBooking, PaymentStatus, Vehicle, VehicleStatus,
};
use crate::store::{BookingStore, Clock, VehicleStore};
use pricing::PriceBreakdown;

/// Actor id recorded on bookings the service itself cancels (nightly
/// stale-payment sweep).
pub const SYSTEM_ACTOR: i32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub vehicle_id: i32,
    pub renter_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub insurance_fee: f64,
    /// Total the client rendered, if it sent one; checked against the
    /// recomputed figure.
    pub client_total: Option<f64>,
}

/// Admission, pricing and lifecycle for bookings. All writes that touch
/// one vehicle (conflict check + insert, status change + vehicle status)
/// are serialized through a per-vehicle lock; different vehicles run in
/// parallel. One `now` is taken per call.
pub struct BookingEngine {
    vehicles: Arc<dyn VehicleStore>,
    bookings: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    vehicle_locks: Mutex<HashMap<i32, Arc<Mutex<()>>>>,
}

impl BookingEngine {
    pub fn new(
        vehicles: Arc<dyn VehicleStore>,
        bookings: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            vehicles,
            bookings,
            clock,
            config,
            vehicle_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and admit a reservation request. Checks run in order and
    /// the first failure wins, with nothing written: dates, rental
    /// length, advance cap, renter rate limits, vehicle state, date
    /// conflicts, pricing. The booking is created unpaid.
    pub fn create_booking(&self, request: &BookingRequest) -> Result<Booking, BookingError> {
        let now = self.clock.now();
        let today = now.date_naive();

        validate_rental_window(
            request.start_date,
            request.end_date,
            today,
            &self.config.policy,
        )?;
        policy::check(
            self.bookings.as_ref(),
            request.renter_id,
            now,
            &self.config.policy,
        )?;

        let lock = self.vehicle_lock(request.vehicle_id);
        let _guard = lock.lock().unwrap();

        let vehicle = self
            .vehicles
            .get(request.vehicle_id)?
            .ok_or_else(|| BookingError::NotFound(format!("vehicle {}", request.vehicle_id)))?;
        ensure_rentable(&vehicle)?;

        let existing = self
            .bookings
            .find_for_vehicle(vehicle.id, &BookingStatus::CALENDAR_BLOCKING)?;
        if overlap::conflicts(request.start_date, request.end_date, &existing, None) {
            return Err(BookingError::Conflict(
                "vehicle is already booked for the requested dates".into(),
            ));
        }

        let quote = pricing::quote(
            &vehicle,
            request.start_date,
            request.end_date,
            request.insurance_fee,
            request.client_total,
            &self.config.pricing,
        )?;

        let confirmation = self.generate_confirmation()?;
        let booking = self.bookings.create(NewBooking {
            confirmation,
            vehicle_id: vehicle.id,
            renter_id: request.renter_id,
            start_date: request.start_date,
            end_date: request.end_date,
            pickup_location: request.pickup_location.clone(),
            dropoff_location: request.dropoff_location.clone(),
            base_price: quote.base_price,
            insurance_fee: quote.insurance_fee,
            service_fee: quote.service_fee,
            extra_mileage_fee: 0.0,
            deposit: quote.deposit,
            total_price: quote.total_price,
            payment_status: PaymentStatus::Pending,
            status: BookingStatus::PaymentPending,
            created_at: now,
        })?;
        Ok(booking)
    }

    /// Whether the vehicle can take a booking over `[start, end)`.
    /// `exclude` lets an edit ignore its own booking.
    pub fn check_availability(
        &self,
        vehicle_id: i32,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<i32>,
    ) -> Result<bool, BookingError> {
        if end <= start {
            return Err(BookingError::Validation(
                "end date must be after start date".into(),
            ));
        }
        let vehicle = self
            .vehicles
            .get(vehicle_id)?
            .ok_or_else(|| BookingError::NotFound(format!("vehicle {vehicle_id}")))?;
        if !vehicle.is_active || vehicle.status != VehicleStatus::Available {
            return Ok(false);
        }
        let existing = self
            .bookings
            .find_for_vehicle(vehicle_id, &BookingStatus::CALENDAR_BLOCKING)?;
        Ok(!overlap::conflicts(start, end, &existing, exclude))
    }

    /// Server-side quote for the given vehicle and range.
    pub fn quote(
        &self,
        vehicle_id: i32,
        start: NaiveDate,
        end: NaiveDate,
        insurance_fee: f64,
    ) -> Result<PriceBreakdown, BookingError> {
        let vehicle = self
            .vehicles
            .get(vehicle_id)?
            .ok_or_else(|| BookingError::NotFound(format!("vehicle {vehicle_id}")))?;
        pricing::quote(
            &vehicle,
            start,
            end,
            insurance_fee,
            None,
            &self.config.pricing,
        )
    }

    /// Move a booking to `target` and apply the coupled vehicle-status
    /// side effect under the same per-vehicle lock. Asking for the
    /// status the booking already has is a no-op. `odometer` carries
    /// the reading for pickup and return.
    pub fn transition(
        &self,
        booking_id: i32,
        target: BookingStatus,
        actor_id: i32,
        reason: Option<&str>,
        odometer: Option<i32>,
    ) -> Result<Booking, BookingError> {
        let now = self.clock.now();
        let found = self
            .bookings
            .get(booking_id)?
            .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id}")))?;

        let lock = self.vehicle_lock(found.vehicle_id);
        let _guard = lock.lock().unwrap();

        // state may have moved while we waited for the lock
        let mut booking = self
            .bookings
            .get(booking_id)?
            .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id}")))?;
        if booking.status == target {
            return Ok(booking);
        }
        lifecycle::ensure_transition(booking.status, target)?;

        let vehicle = self
            .vehicles
            .get(booking.vehicle_id)?
            .ok_or_else(|| BookingError::NotFound(format!("vehicle {}", booking.vehicle_id)))?;

        match target {
            BookingStatus::Confirmed => {
                // the slot could have been taken while payment was pending
                let others = self
                    .bookings
                    .find_for_vehicle(vehicle.id, &BookingStatus::OCCUPYING)?;
                if overlap::conflicts(
                    booking.start_date,
                    booking.end_date,
                    &others,
                    Some(booking.id),
                ) {
                    return Err(BookingError::Conflict(
                        "vehicle was booked for these dates while payment was pending".into(),
                    ));
                }
                booking.status = BookingStatus::Confirmed;
                booking.payment_status = PaymentStatus::Paid;
                booking.paid_at = Some(now);
                let saved = self.bookings.update(&booking)?;
                if vehicle.status != VehicleStatus::Rented {
                    self.vehicles.set_status(vehicle.id, VehicleStatus::Rented)?;
                }
                Ok(saved)
            }
            BookingStatus::InProgress => {
                booking.status = BookingStatus::InProgress;
                booking.actual_start_date = Some(now);
                booking.mileage_start = odometer;
                Ok(self.bookings.update(&booking)?)
            }
            BookingStatus::Completed => {
                booking.actual_end_date = Some(now);
                booking.mileage_end = odometer;
                if let (Some(start), Some(end)) = (booking.mileage_start, booking.mileage_end) {
                    if end < start {
                        return Err(BookingError::Validation(
                            "return odometer reading is below the pickup reading".into(),
                        ));
                    }
                }
                booking.extra_mileage_fee = lifecycle::extra_mileage_fee(&booking, &vehicle);
                booking.total_price = (booking.base_price
                    + booking.insurance_fee
                    + booking.service_fee
                    + booking.extra_mileage_fee)
                    .round();
                booking.status = BookingStatus::Completed;
                let saved = self.bookings.update(&booking)?;
                self.release_vehicle_if_free(&vehicle)?;
                Ok(saved)
            }
            BookingStatus::Cancelled => {
                lifecycle::ensure_cancellable(&booking, now, &self.config.policy)?;
                let was_occupying = booking.status.is_occupying();
                booking.status = BookingStatus::Cancelled;
                booking.cancellation_reason = reason.map(str::to_owned);
                booking.cancelled_at = Some(now);
                booking.cancelled_by = Some(actor_id);
                if booking.payment_status == PaymentStatus::Paid {
                    booking.payment_status = PaymentStatus::Refunded;
                }
                let saved = self.bookings.update(&booking)?;
                if was_occupying {
                    self.release_vehicle_if_free(&vehicle)?;
                }
                Ok(saved)
            }
            BookingStatus::PaymentPending => Err(BookingError::State(
                "bookings cannot return to PAYMENT_PENDING".into(),
            )),
        }
    }

    pub fn cancel(
        &self,
        booking_id: i32,
        reason: &str,
        actor_id: i32,
    ) -> Result<Booking, BookingError> {
        self.transition(
            booking_id,
            BookingStatus::Cancelled,
            actor_id,
            Some(reason),
            None,
        )
    }

    /// Cancel unpaid bookings whose payment window has elapsed. Returns
    /// how many were swept; bookings that move state mid-sweep are
    /// skipped.
    pub fn cancel_stale_pending(&self) -> Result<usize, BookingError> {
        let now = self.clock.now();
        let cutoff = now - Duration::hours(self.config.policy.stale_pending_hours);
        let stale = self.bookings.find_stale_pending(cutoff)?;
        let mut swept = 0;
        for booking in stale {
            match self.cancel(booking.id, "payment window elapsed", SYSTEM_ACTOR) {
                Ok(_) => swept += 1,
                Err(BookingError::State(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(swept)
    }

    fn vehicle_lock(&self, vehicle_id: i32) -> Arc<Mutex<()>> {
        let mut registry = self.vehicle_locks.lock().unwrap();
        registry.entry(vehicle_id).or_default().clone()
    }

    /// AVAILABLE again only once no occupying booking remains; a rented
    /// vehicle with another confirmed booking stays RENTED.
    fn release_vehicle_if_free(&self, vehicle: &Vehicle) -> Result<(), BookingError> {
        if vehicle.status != VehicleStatus::Rented {
            return Ok(());
        }
        let occupying = self
            .bookings
            .find_for_vehicle(vehicle.id, &BookingStatus::OCCUPYING)?;
        if occupying.is_empty() {
            self.vehicles
                .set_status(vehicle.id, VehicleStatus::Available)?;
        }
        Ok(())
    }

    fn generate_confirmation(&self) -> Result<String, BookingError> {
        let charset: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let mut rng = rand::thread_rng();
        loop {
            let code: String = (0..8)
                .map(|_| {
                    let idx = rng.gen_range(0..charset.len());
                    charset[idx] as char
                })
                .collect();
            if !self.bookings.confirmation_exists(&code)? {
                return Ok(code);
            }
        }
    }
}

fn validate_rental_window(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    cfg: &PolicyConfig,
) -> Result<(), BookingError> {
    if end <= start {
        return Err(BookingError::Validation(
            "end date must be after start date".into(),
        ));
    }
    if start < today {
        return Err(BookingError::Validation(
            "start date must not be in the past".into(),
        ));
    }
    let days = (end - start).num_days();
    if days < cfg.min_rental_days || days > cfg.max_rental_days {
        return Err(BookingError::Validation(format!(
            "rental length must be between {} and {} days",
            cfg.min_rental_days, cfg.max_rental_days
        )));
    }
    if (start - today).num_days() > cfg.max_advance_days {
        return Err(BookingError::Validation(format!(
            "bookings can start at most {} days ahead",
            cfg.max_advance_days
        )));
    }
    Ok(())
}

fn ensure_rentable(vehicle: &Vehicle) -> Result<(), BookingError> {
    if !vehicle.is_active {
        return Err(BookingError::Conflict("vehicle is not in service".into()));
    }
    match vehicle.status {
        VehicleStatus::Available => Ok(()),
        VehicleStatus::Rented => Err(BookingError::Conflict(
            "vehicle is currently rented".into(),
        )),
        VehicleStatus::Maintenance => Err(BookingError::Conflict(
            "vehicle is under maintenance".into(),
        )),
        VehicleStatus::Inactive => Err(BookingError::Conflict("vehicle is inactive".into())),
    }
}
