//! Background sensor polling
//!
//! A single periodic task drives the sensor reader and publishes each
//! snapshot through the controller. A tick that fails records the error kind
//! and the loop proceeds; it never terminates on an I/O error. Cancellation
//! is cooperative: the signal is checked once per tick, and at most one
//! in-flight read completes before the loop returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::controller::FanController;

/// Cooperative stop signal for the poll loop
#[derive(Default)]
pub struct PollSignal {
    stop: AtomicBool,
    notify: Notify,
}

impl PollSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop scheduling further ticks; wakes the loop if it is sleeping
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Run the poll loop until the signal is triggered
///
/// The tick interval is owned by the caller; see
/// [`crate::constants::timing::DEFAULT_POLL_INTERVAL`] for the usual value.
pub async fn run_poll_loop(
    controller: Arc<FanController>,
    interval: Duration,
    signal: Arc<PollSignal>,
) {
    info!(interval_ms = interval.as_millis() as u64, "Poll loop starting");

    loop {
        if signal.is_stopped() {
            break;
        }

        // One in-flight read at a time. The sysfs reads are blocking, so
        // they run on the blocking pool instead of stalling the executor.
        let ctrl = Arc::clone(&controller);
        match tokio::task::spawn_blocking(move || ctrl.refresh_sensors()).await {
            Ok(None) => {}
            Ok(Some(kind)) => debug!(error = %kind, "Tick completed with sensor failures"),
            Err(e) => warn!(error = %e, "Sensor read task failed"),
        }

        if signal.is_stopped() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = signal.wait() => {}
        }
    }

    info!("Poll loop stopped");
}
