use chrono::{NaiveTime, Utc};
use std::time::Duration;

use crate::ENGINE;

/// Sleep until midnight UTC, then sweep unpaid bookings whose payment
/// window has elapsed so abandoned checkouts stop pinning calendar
/// days. Runs for the lifetime of the process.
pub async fn nightly_task() {
    loop {
        let now = Utc::now();
        let midnight = now
            .date_naive()
            .succ_opt()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let duration_until_midnight = (midnight - now.naive_utc())
            .to_std()
            .unwrap_or_else(|_| Duration::from_secs(1));

        tokio::time::sleep(duration_until_midnight).await;

        tracing::info!("running nightly booking sweep");
        if let Err(err) = sweep_stale_pending().await {
            tracing::error!(error = %err, "stale booking sweep failed");
        }
    }
}

async fn sweep_stale_pending() -> anyhow::Result<()> {
    let swept = tokio::task::spawn_blocking(|| ENGINE.cancel_stale_pending()).await??;
    if swept > 0 {
        tracing::info!(swept, "cancelled stale unpaid bookings");
    }
    Ok(())
}
