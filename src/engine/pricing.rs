use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::config::PricingConfig;
use crate::helper_model::BookingError;
use crate::model::Vehicle;

/// Itemized quote for one rental. `discount` is already folded into
/// `base_price`; `deposit` is informational and not part of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub duration_days: i64,
    pub base_price: f64,
    pub weekend_surcharge: f64,
    pub discount: f64,
    pub insurance_fee: f64,
    pub service_fee: f64,
    pub deposit: f64,
    pub total_price: f64,
}

/// Recompute the price server-side. When the client sent along the total
/// it rendered, any gap beyond the configured tolerance rejects the
/// request instead of trusting the client figure.
///
/// Amounts round half-up to the currency unit; intermediates stay
/// unrounded until the service-fee and total roundings.
pub fn quote(
    vehicle: &Vehicle,
    start: NaiveDate,
    end: NaiveDate,
    insurance_fee: f64,
    client_total: Option<f64>,
    cfg: &PricingConfig,
) -> Result<PriceBreakdown, BookingError> {
    if end <= start {
        return Err(BookingError::Validation(
            "end date must be after start date".into(),
        ));
    }
    if insurance_fee < 0.0 {
        return Err(BookingError::Validation(
            "insurance fee cannot be negative".into(),
        ));
    }

    let duration_days = (end - start).num_days();
    let mut base = duration_days as f64 * vehicle.rate_per_day;

    let weekend_days = start
        .iter_days()
        .take_while(|day| *day < end)
        .filter(|day| matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count();
    let weekend_surcharge =
        weekend_days as f64 * vehicle.rate_per_day * cfg.weekend_surcharge_rate;
    base += weekend_surcharge;

    let discount = if duration_days >= cfg.long_term_discount_min_days {
        base * cfg.long_term_discount_rate
    } else if duration_days >= cfg.weekly_discount_min_days {
        base * cfg.weekly_discount_rate
    } else {
        0.0
    };
    base -= discount;

    let service_fee = (base * cfg.service_fee_rate).round();
    let total_price = (base + service_fee + insurance_fee).round();

    let deposit = if vehicle.deposit > 0.0 {
        vehicle.deposit
    } else {
        vehicle.rate_per_day * cfg.deposit_rate_multiplier
    };

    if let Some(provided) = client_total {
        if (provided - total_price).abs() > cfg.mismatch_tolerance {
            return Err(BookingError::PriceMismatch {
                expected: total_price,
                provided,
            });
        }
    }

    Ok(PriceBreakdown {
        duration_days,
        base_price: base.round(),
        weekend_surcharge: weekend_surcharge.round(),
        discount: discount.round(),
        insurance_fee: insurance_fee.round(),
        service_fee,
        deposit,
        total_price,
    })
}
