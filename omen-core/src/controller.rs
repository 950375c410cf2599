//! Shared controller state and access arbitration
//!
//! [`FanController`] owns the only mutable shared state in the system and is
//! its single exclusion domain. A mode change holds the write lock for the
//! whole hardware transaction and snapshot publication takes the same lock,
//! so a status read never observes a half-applied change. Status reads share
//! the read lock and do not serialize against each other. Sensor reads
//! happen outside the lock entirely; they never touch the mode cache.

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::data::{CapabilityRecord, FanMode, SensorSnapshot};
use crate::error::{ErrorKind, Result};
use crate::hw::sensors;
use crate::modes;

/// The mutable state behind the lock
///
/// `current_mode` is a best-effort cache of the last mode this process
/// successfully applied. Another process writing the sysfs paths out-of-band
/// will not be reflected here; callers needing strict accuracy can
/// reconcile through [`modes::read_applied_mode`].
struct ControllerState {
    current_mode: FanMode,
    /// Last profile-backed mode; the thermal baseline `Max`/`Off` layer over
    profile_mode: FanMode,
    last_snapshot: SensorSnapshot,
    last_error: Option<ErrorKind>,
}

/// Combined result of a status query
#[derive(Debug, Clone)]
pub struct ControllerStatus {
    pub mode: FanMode,
    pub profile_mode: FanMode,
    pub snapshot: SensorSnapshot,
    pub last_error: Option<ErrorKind>,
}

/// Serializes concurrent mode changes and snapshot publication from any mix
/// of callers (GUI handlers, tray menu, one-shot CLI, the poll loop)
pub struct FanController {
    record: CapabilityRecord,
    state: RwLock<ControllerState>,
}

impl FanController {
    /// Build a controller for the probed capabilities
    ///
    /// The mode cache is seeded from a fresh hardware read when any surface
    /// is readable, and defaults to `Balanced` otherwise. Nothing is written.
    pub fn new(record: CapabilityRecord) -> Self {
        let seeded = modes::read_applied_mode(&record);
        let current_mode = seeded.unwrap_or(FanMode::Balanced);
        let profile_mode =
            modes::read_profile_baseline(&record).unwrap_or(FanMode::Balanced);

        info!(
            mode = %current_mode,
            seeded = seeded.is_some(),
            "Controller initialized"
        );

        Self {
            record,
            state: RwLock::new(ControllerState {
                current_mode,
                profile_mode,
                last_snapshot: SensorSnapshot::empty(),
                last_error: None,
            }),
        }
    }

    /// The capability record this controller operates against
    pub fn capabilities(&self) -> &CapabilityRecord {
        &self.record
    }

    /// Current status; read-only, callable concurrently from any thread
    pub fn status(&self) -> ControllerStatus {
        let state = self.state.read();
        ControllerStatus {
            mode: state.current_mode,
            profile_mode: state.profile_mode,
            snapshot: state.last_snapshot.clone(),
            last_error: state.last_error,
        }
    }

    /// Apply a fan mode
    ///
    /// Holds the write lock for the full hardware transaction, so concurrent
    /// `set_mode` calls fully order against each other and against snapshot
    /// publication. Not cancellable once started. On failure the mode cache
    /// is left untouched and the error kind is recorded for status readers.
    pub fn set_mode(&self, requested: FanMode) -> Result<FanMode> {
        let mut state = self.state.write();
        match modes::apply_mode(requested, &self.record) {
            Ok(applied) => {
                state.current_mode = applied;
                if applied.is_profile_backed() {
                    state.profile_mode = applied;
                }
                state.last_error = None;
                Ok(applied)
            }
            Err(e) => {
                state.last_error = Some(e.kind());
                Err(e)
            }
        }
    }

    /// Read all sensors and publish the snapshot
    ///
    /// The sysfs reads run outside the lock; only the publication excludes a
    /// concurrent mode change. Returns the error kind recorded for this
    /// pass, if any entry failed; a clean pass clears `last_error`.
    pub fn refresh_sensors(&self) -> Option<ErrorKind> {
        let snapshot = sensors::read_snapshot(&self.record);
        let failed = snapshot
            .readings
            .iter()
            .filter(|reading| reading.value.is_none())
            .count();

        let error = if failed > 0 {
            warn!(failed, total = snapshot.readings.len(), "Snapshot has missing sensor values");
            Some(ErrorKind::SensorRead)
        } else {
            None
        };

        let mut state = self.state.write();
        state.last_snapshot = snapshot;
        state.last_error = error;
        error
    }
}
