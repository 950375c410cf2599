//! Sensor reading over the hwmon tree
//!
//! Stateless, read-only access to the sensors enumerated at probe time.
//! Values are normalized at read time (millidegrees to degrees Celsius, fan
//! RPM passed through) so downstream consumers never re-interpret raw kernel
//! units.
//!
//! A failed read marks that one entry as missing; partial snapshots are
//! valid and never escalate into a whole-snapshot failure.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

use crate::constants::temperature;
use crate::data::{CapabilityRecord, SensorKind, SensorReading, SensorSnapshot};
use crate::error::{OmenError, Result};

/// Read temperature sensor value in degrees Celsius
///
/// Linux hwmon reports temperatures in millidegrees (e.g., 45000 = 45.0°C);
/// the conversion happens here.
pub fn read_temperature(temp_path: &Path) -> Result<f32> {
    let content =
        fs::read_to_string(temp_path).map_err(|e| OmenError::read_error(temp_path, e))?;

    let millidegrees = content
        .trim()
        .parse::<i32>()
        .map_err(|e| OmenError::Parse {
            path: temp_path.to_path_buf(),
            reason: format!("'{}': {}", content.trim(), e),
        })?;

    Ok(millidegrees as f32 / temperature::MILLIDEGREE_DIVISOR)
}

/// Read current fan speed in RPM
pub fn read_fan_rpm(fan_path: &Path) -> Result<u32> {
    let content = fs::read_to_string(fan_path).map_err(|e| OmenError::read_error(fan_path, e))?;

    content
        .trim()
        .parse::<u32>()
        .map_err(|e| OmenError::Parse {
            path: fan_path.to_path_buf(),
            reason: format!("'{}': {}", content.trim(), e),
        })
}

/// Read every sensor in the record into a fresh snapshot
///
/// Entries that fail to read come back with `value: None`; the snapshot
/// itself always succeeds. An empty record yields an empty snapshot.
pub fn read_snapshot(record: &CapabilityRecord) -> SensorSnapshot {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut readings = Vec::with_capacity(record.sensors.len());
    for sensor in &record.sensors {
        let value = match sensor.kind {
            SensorKind::Temp => read_temperature(&sensor.path),
            SensorKind::Fan => read_fan_rpm(&sensor.path).map(|rpm| rpm as f32),
        };

        let value = match value {
            Ok(v) => {
                trace!(sensor = %sensor.label, value = v, "Read sensor");
                Some(v)
            }
            Err(e) => {
                debug!(sensor = %sensor.label, error = %e, "Sensor read failed");
                None
            }
        };

        readings.push(SensorReading {
            label: sensor.label.clone(),
            kind: sensor.kind,
            value,
        });
    }

    SensorSnapshot {
        timestamp_ms,
        readings,
    }
}
