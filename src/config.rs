use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Pricing knobs. Every rate that used to be a magic number in the
/// checkout path lives here so tests and deployments can override it
/// without code changes.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Extra charge per Saturday/Sunday in the rental range, as a
    /// fraction of the daily rate. Default 0.15.
    pub weekend_surcharge_rate: f64,
    /// Discount applied to the surcharge-adjusted base for rentals of
    /// at least `weekly_discount_min_days`. Default 0.10 from 7 days.
    pub weekly_discount_rate: f64,
    pub weekly_discount_min_days: i64,
    /// Discount for rentals of at least `long_term_discount_min_days`;
    /// wins over the weekly tier. Default 0.15 from 14 days.
    pub long_term_discount_rate: f64,
    pub long_term_discount_min_days: i64,
    /// Platform fee as a fraction of the discounted base. Default 0.10.
    pub service_fee_rate: f64,
    /// Fallback deposit when a vehicle has none configured, as a
    /// multiple of its daily rate. Default 3.
    pub deposit_rate_multiplier: f64,
    /// Largest tolerated gap between a client-supplied total and the
    /// recomputed one before the request is rejected. Default 1 unit.
    pub mismatch_tolerance: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            weekend_surcharge_rate: 0.15,
            weekly_discount_rate: 0.10,
            weekly_discount_min_days: 7,
            long_term_discount_rate: 0.15,
            long_term_discount_min_days: 14,
            service_fee_rate: 0.10,
            deposit_rate_multiplier: 3.0,
            mismatch_tolerance: 1.0,
        }
    }
}

/// Admission and lifecycle limits.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Rental length bounds in whole days. Defaults 1 and 30.
    pub min_rental_days: i64,
    pub max_rental_days: i64,
    /// How far ahead a rental may start. Default 90 days.
    pub max_advance_days: i64,
    /// A confirmed booking can only be cancelled while `now` is more
    /// than this many hours before pickup. Default 24.
    pub cancellation_cutoff_hours: i64,
    /// Stuck-payment guard: reject a renter holding this many unpaid
    /// bookings created inside the window. Defaults 3 within 30 minutes.
    pub max_pending_per_window: i64,
    pub pending_window_minutes: i64,
    /// Cancellation-abuse guard: reject a renter with this many
    /// cancellations inside the history window. Defaults 5 within 7 days.
    pub max_recent_cancellations: i64,
    pub cancellation_history_days: i64,
    /// Unpaid bookings older than this are swept by the nightly task.
    /// Default 24 hours.
    pub stale_pending_hours: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_rental_days: 1,
            max_rental_days: 30,
            max_advance_days: 90,
            cancellation_cutoff_hours: 24,
            max_pending_per_window: 3,
            pending_window_minutes: 30,
            max_recent_cancellations: 5,
            cancellation_history_days: 7,
            stale_pending_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub pricing: PricingConfig,
    pub policy: PolicyConfig,
}

impl EngineConfig {
    /// Defaults overridden by environment variables of the same name,
    /// uppercased (e.g. `WEEKEND_SURCHARGE_RATE=0.2`). Unparseable
    /// values fall back to the default.
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();
        Self {
            pricing: PricingConfig {
                weekend_surcharge_rate: env_or(
                    "WEEKEND_SURCHARGE_RATE",
                    defaults.pricing.weekend_surcharge_rate,
                ),
                weekly_discount_rate: env_or(
                    "WEEKLY_DISCOUNT_RATE",
                    defaults.pricing.weekly_discount_rate,
                ),
                weekly_discount_min_days: env_or(
                    "WEEKLY_DISCOUNT_MIN_DAYS",
                    defaults.pricing.weekly_discount_min_days,
                ),
                long_term_discount_rate: env_or(
                    "LONG_TERM_DISCOUNT_RATE",
                    defaults.pricing.long_term_discount_rate,
                ),
                long_term_discount_min_days: env_or(
                    "LONG_TERM_DISCOUNT_MIN_DAYS",
                    defaults.pricing.long_term_discount_min_days,
                ),
                service_fee_rate: env_or("SERVICE_FEE_RATE", defaults.pricing.service_fee_rate),
                deposit_rate_multiplier: env_or(
                    "DEPOSIT_RATE_MULTIPLIER",
                    defaults.pricing.deposit_rate_multiplier,
                ),
                mismatch_tolerance: env_or(
                    "PRICE_MISMATCH_TOLERANCE",
                    defaults.pricing.mismatch_tolerance,
                ),
            },
            policy: PolicyConfig {
                min_rental_days: env_or("MIN_RENTAL_DAYS", defaults.policy.min_rental_days),
                max_rental_days: env_or("MAX_RENTAL_DAYS", defaults.policy.max_rental_days),
                max_advance_days: env_or("MAX_ADVANCE_DAYS", defaults.policy.max_advance_days),
                cancellation_cutoff_hours: env_or(
                    "CANCELLATION_CUTOFF_HOURS",
                    defaults.policy.cancellation_cutoff_hours,
                ),
                max_pending_per_window: env_or(
                    "MAX_PENDING_PER_WINDOW",
                    defaults.policy.max_pending_per_window,
                ),
                pending_window_minutes: env_or(
                    "PENDING_WINDOW_MINUTES",
                    defaults.policy.pending_window_minutes,
                ),
                max_recent_cancellations: env_or(
                    "MAX_RECENT_CANCELLATIONS",
                    defaults.policy.max_recent_cancellations,
                ),
                cancellation_history_days: env_or(
                    "CANCELLATION_HISTORY_DAYS",
                    defaults.policy.cancellation_history_days,
                ),
                stale_pending_hours: env_or(
                    "STALE_PENDING_HOURS",
                    defaults.policy.stale_pending_hours,
                ),
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
