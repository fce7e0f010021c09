use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// Diesel requires us to define a custom mapping between the Rust enum
// and the database type, if we are not using string.
use crate::schema::*;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::{AsExpression, FromSqlRow};
use std::io::Write;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::BookingStatusEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    PaymentPending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses during which the reservation holds the vehicle.
    pub const OCCUPYING: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::InProgress];

    /// Statuses that reserve calendar days for conflict checks. An unpaid
    /// booking already blocks its dates so two renters cannot race each
    /// other to the same car between admission and payment.
    pub const CALENDAR_BLOCKING: [BookingStatus; 3] = [
        BookingStatus::PaymentPending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
    ];

    pub fn is_occupying(&self) -> bool {
        Self::OCCUPYING.contains(self)
    }

    pub fn blocks_calendar(&self) -> bool {
        Self::CALENDAR_BLOCKING.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PaymentPending => "PAYMENT_PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::PaymentStatusEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
    Partial,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::VehicleStatusEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
    Inactive,
}

//This is for postgres. For other databases the type might be different.
impl ToSql<sql_types::BookingStatusEnum, Pg> for BookingStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            BookingStatus::PaymentPending => out.write_all(b"PAYMENT_PENDING")?,
            BookingStatus::Confirmed => out.write_all(b"CONFIRMED")?,
            BookingStatus::InProgress => out.write_all(b"IN_PROGRESS")?,
            BookingStatus::Completed => out.write_all(b"COMPLETED")?,
            BookingStatus::Cancelled => out.write_all(b"CANCELLED")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::BookingStatusEnum, Pg> for BookingStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"PAYMENT_PENDING" => Ok(BookingStatus::PaymentPending),
            b"CONFIRMED" => Ok(BookingStatus::Confirmed),
            b"IN_PROGRESS" => Ok(BookingStatus::InProgress),
            b"COMPLETED" => Ok(BookingStatus::Completed),
            b"CANCELLED" => Ok(BookingStatus::Cancelled),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<sql_types::PaymentStatusEnum, Pg> for PaymentStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            PaymentStatus::Pending => out.write_all(b"PENDING")?,
            PaymentStatus::Paid => out.write_all(b"PAID")?,
            PaymentStatus::Refunded => out.write_all(b"REFUNDED")?,
            PaymentStatus::Failed => out.write_all(b"FAILED")?,
            PaymentStatus::Partial => out.write_all(b"PARTIAL")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::PaymentStatusEnum, Pg> for PaymentStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"PENDING" => Ok(PaymentStatus::Pending),
            b"PAID" => Ok(PaymentStatus::Paid),
            b"REFUNDED" => Ok(PaymentStatus::Refunded),
            b"FAILED" => Ok(PaymentStatus::Failed),
            b"PARTIAL" => Ok(PaymentStatus::Partial),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<sql_types::VehicleStatusEnum, Pg> for VehicleStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            VehicleStatus::Available => out.write_all(b"AVAILABLE")?,
            VehicleStatus::Rented => out.write_all(b"RENTED")?,
            VehicleStatus::Maintenance => out.write_all(b"MAINTENANCE")?,
            VehicleStatus::Inactive => out.write_all(b"INACTIVE")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::VehicleStatusEnum, Pg> for VehicleStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"AVAILABLE" => Ok(VehicleStatus::Available),
            b"RENTED" => Ok(VehicleStatus::Rented),
            b"MAINTENANCE" => Ok(VehicleStatus::Maintenance),
            b"INACTIVE" => Ok(VehicleStatus::Inactive),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Vehicle {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate_number: String,
    pub rate_per_day: f64,
    pub status: VehicleStatus,
    pub is_active: bool,
    /// 0 means "not set"; the pricing engine falls back to the
    /// configured multiple of the daily rate.
    pub deposit: f64,
    pub mileage_limit_per_day: i32,
    pub extra_mileage_rate: f64,
}

#[derive(
    Queryable, Identifiable, Associations, AsChangeset, Debug, Clone, PartialEq, Serialize,
    Deserialize,
)]
#[diesel(belongs_to(Vehicle))]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Booking {
    pub id: i32,
    pub confirmation: String,
    pub vehicle_id: i32,
    pub renter_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub actual_start_date: Option<DateTime<Utc>>,
    pub actual_end_date: Option<DateTime<Utc>>,
    pub mileage_start: Option<i32>,
    pub mileage_end: Option<i32>,
    pub base_price: f64,
    pub insurance_fee: f64,
    pub service_fee: f64,
    pub extra_mileage_fee: f64,
    pub deposit: f64,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whole rental days covered by the half-open `[start_date, end_date)`
    /// range. Always at least 1 for a valid booking.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Vehicle))]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBooking {
    pub confirmation: String,
    pub vehicle_id: i32,
    pub renter_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub base_price: f64,
    pub insurance_fee: f64,
    pub service_fee: f64,
    pub extra_mileage_fee: f64,
    pub deposit: f64,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}
