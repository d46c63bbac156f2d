//! Background scheduler for periodic snapshot capture.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use crate::main_lib::AppState;

/// Initial delay before the first capture, to let the server finish starting
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts capturing a snapshot for every user each `period`.
pub fn start_snapshot_scheduler(state: Arc<AppState>, period: Duration) {
    tokio::spawn(async move {
        info!("Snapshot scheduler started ({:?} interval)", period);

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        // First tick is immediate
        let mut capture_interval = interval(period);
        capture_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            capture_interval.tick().await;
            run_scheduled_capture(&state).await;
        }
    });
}

async fn run_scheduled_capture(state: &Arc<AppState>) {
    info!("Running scheduled snapshot capture...");
    match state.snapshot_service.capture_all_snapshots().await {
        Ok(summary) => info!(
            "Scheduled capture done: {} captured, {} skipped, {} failed",
            summary.captured, summary.skipped, summary.failed
        ),
        Err(e) => error!("Scheduled snapshot capture failed: {}", e),
    }
}
