//! Core data types for omenctl
//!
//! Defines the value objects shared between the prober, the sensor reader and
//! the mode controller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// User-facing fan mode, matching the names of the vendor UI
///
/// `Max` and `Off` are boost-only modes: they drive the hp-wmi override and
/// leave the active thermal profile untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    Quiet,
    Balanced,
    Performance,
    Max,
    Off,
}

impl FanMode {
    pub const ALL: [FanMode; 5] = [
        FanMode::Quiet,
        FanMode::Balanced,
        FanMode::Performance,
        FanMode::Max,
        FanMode::Off,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FanMode::Quiet => "quiet",
            FanMode::Balanced => "balanced",
            FanMode::Performance => "performance",
            FanMode::Max => "max",
            FanMode::Off => "off",
        }
    }

    /// Whether this mode is applied through a platform-profile write
    pub fn is_profile_backed(self) -> bool {
        !matches!(self, FanMode::Max | FanMode::Off)
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(FanMode::Quiet),
            "balanced" => Ok(FanMode::Balanced),
            "performance" => Ok(FanMode::Performance),
            "max" => Ok(FanMode::Max),
            // "auto" kept as an alias: disengaging boost returns the fans
            // to firmware-automatic control
            "off" | "auto" => Ok(FanMode::Off),
            other => Err(format!(
                "unknown fan mode '{}' (expected quiet, balanced, performance, max or off)",
                other
            )),
        }
    }
}

/// Sensor classification under the hwmon tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temp,
    Fan,
}

/// A sensor input file discovered at probe time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorPath {
    pub label: String,
    pub path: PathBuf,
    pub kind: SensorKind,
}

/// Immutable capability snapshot, built once per process lifetime
///
/// Absence of a surface degrades the record instead of failing the probe; a
/// machine without platform_profile still works through hp-wmi alone and
/// vice versa. Re-probing (e.g. after suspend/resume) is the caller's call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub platform_profile_available: bool,
    pub platform_profile_path: PathBuf,
    pub platform_profile_choices: BTreeSet<String>,
    /// pwm1_enable under the hp-wmi hwmon, when the driver exposes it
    pub boost_path: Option<PathBuf>,
    /// Discovered sensors in deterministic order (chip directory, file name)
    pub sensors: Vec<SensorPath>,
}

impl CapabilityRecord {
    /// True when at least one control surface is present
    pub fn any_control_available(&self) -> bool {
        self.platform_profile_available || self.boost_path.is_some()
    }
}

/// One entry of a snapshot
///
/// `value: None` marks a read that failed on this pass. A sensor that never
/// existed is absent from the sequence entirely, so the two cases stay
/// distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub label: String,
    pub kind: SensorKind,
    /// Temperatures in degrees Celsius, fan speeds in RPM
    pub value: Option<f32>,
}

/// Point-in-time sensor values, superseded (never mutated) by the next poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Timestamp in milliseconds since Unix epoch
    pub timestamp_ms: u64,
    pub readings: Vec<SensorReading>,
}

impl SensorSnapshot {
    /// Placeholder snapshot for a controller that has not polled yet
    pub fn empty() -> Self {
        Self {
            timestamp_ms: 0,
            readings: Vec::new(),
        }
    }
}
