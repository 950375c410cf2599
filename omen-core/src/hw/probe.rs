//! Capability probing for the control surfaces
//!
//! Runs once at process start and produces the [`CapabilityRecord`] every
//! other component consults. Three disjoint kernel interfaces are scanned:
//!
//! - ACPI platform profile (`platform_profile` + `platform_profile_choices`)
//! - the hp-wmi fan boost control (`pwm1_enable` under the hp-wmi hwmon)
//! - the generic hwmon sensor tree (`tempN_input` / `fanN_input`)
//!
//! Absence of any surface degrades the record; the probe itself never fails.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use crate::constants::{boost, paths};
use crate::data::{CapabilityRecord, SensorKind, SensorPath};

/// Locations of the kernel surfaces the prober scans.
///
/// Defaults to the live sysfs paths; tests point this at a scratch tree.
#[derive(Debug, Clone)]
pub struct SysfsLayout {
    pub platform_profile: PathBuf,
    pub platform_profile_choices: PathBuf,
    pub hp_wmi_platform: PathBuf,
    pub hwmon_base: PathBuf,
}

impl Default for SysfsLayout {
    fn default() -> Self {
        Self {
            platform_profile: PathBuf::from(paths::PLATFORM_PROFILE),
            platform_profile_choices: PathBuf::from(paths::PLATFORM_PROFILE_CHOICES),
            hp_wmi_platform: PathBuf::from(paths::HP_WMI_PLATFORM),
            hwmon_base: PathBuf::from(paths::HWMON_BASE),
        }
    }
}

/// Probe the default sysfs locations
pub fn probe() -> CapabilityRecord {
    probe_layout(&SysfsLayout::default())
}

/// Probe a specific layout
///
/// Idempotent and side-effect-free beyond filesystem reads. Two probes with
/// no hardware change in between return identical records: all enumeration
/// is sorted before it lands in the record.
pub fn probe_layout(layout: &SysfsLayout) -> CapabilityRecord {
    let platform_profile_available = layout.platform_profile.is_file();
    let platform_profile_choices = read_profile_choices(&layout.platform_profile_choices);

    if platform_profile_available {
        check_writable(&layout.platform_profile);
    } else {
        info!(path = ?layout.platform_profile, "Platform profile interface not present");
    }

    let boost_path = detect_boost_control(layout);
    if let Some(ref path) = boost_path {
        check_writable(path);
    } else {
        info!("No hp-wmi fan boost control found");
    }

    let sensors = enumerate_sensors(&layout.hwmon_base);

    info!(
        platform_profile = platform_profile_available,
        choices = platform_profile_choices.len(),
        boost = boost_path.is_some(),
        sensors = sensors.len(),
        "Capability probe complete"
    );

    CapabilityRecord {
        platform_profile_available,
        platform_profile_path: layout.platform_profile.clone(),
        platform_profile_choices,
        boost_path,
        sensors,
    }
}

fn read_profile_choices(path: &Path) -> BTreeSet<String> {
    match fs::read_to_string(path) {
        Ok(content) => content.split_whitespace().map(str::to_string).collect(),
        Err(e) => {
            debug!(path = ?path, error = %e, "No platform profile choices");
            BTreeSet::new()
        }
    }
}

/// Non-destructive writability check; logs a warning but keeps the
/// capability, so the eventual write can surface the precise error.
fn check_writable(path: &Path) {
    if OpenOptions::new().write(true).open(path).is_err() {
        warn!(path = ?path, "Control path present but not writable by this user");
    }
}

/// Find the hp-wmi boost control (`pwm1_enable`)
///
/// Looks under the hp-wmi platform device first, then falls back to scanning
/// the hwmon class tree for a chip whose name contains "hp".
fn detect_boost_control(layout: &SysfsLayout) -> Option<PathBuf> {
    if layout.hp_wmi_platform.exists() {
        if let Some(control) = boost_in_hwmon_dir(&layout.hp_wmi_platform.join("hwmon")) {
            debug!(path = ?control, "Found boost control under hp-wmi device");
            return Some(control);
        }
    }

    for chip_dir in sorted_subdirs(&layout.hwmon_base) {
        let name = match fs::read_to_string(chip_dir.join("name")) {
            Ok(name) => name.trim().to_string(),
            Err(_) => continue,
        };
        if name.to_ascii_lowercase().contains("hp") {
            let control = chip_dir.join(boost::CONTROL_FILE);
            if control.is_file() {
                debug!(path = ?control, chip = %name, "Found boost control via hwmon name scan");
                return Some(control);
            }
        }
    }

    None
}

fn boost_in_hwmon_dir(base: &Path) -> Option<PathBuf> {
    sorted_subdirs(base)
        .into_iter()
        .map(|dir| dir.join(boost::CONTROL_FILE))
        .find(|control| control.is_file())
}

fn sorted_subdirs(base: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(base) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Enumerate temperature and fan inputs across all hwmon chips
fn enumerate_sensors(hwmon_base: &Path) -> Vec<SensorPath> {
    let mut sensors = Vec::new();

    debug!(path = ?hwmon_base, "Scanning hwmon chips");

    for chip_dir in sorted_subdirs(hwmon_base) {
        let chip = fs::read_to_string(chip_dir.join("name"))
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|_| {
                chip_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unknown".to_string())
            });

        let entries = match fs::read_dir(&chip_dir) {
            Ok(entries) => entries,
            Err(e) => {
                trace!(path = ?chip_dir, error = %e, "Skipping unreadable hwmon directory");
                continue;
            }
        };
        let mut file_names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        file_names.sort();

        for file_name in file_names {
            let kind = if file_name.starts_with("temp") && file_name.ends_with("_input") {
                SensorKind::Temp
            } else if file_name.starts_with("fan") && file_name.ends_with("_input") {
                SensorKind::Fan
            } else {
                continue;
            };

            let input_path = chip_dir.join(&file_name);
            let base_name = file_name.trim_end_matches("_input");
            let label_path = chip_dir.join(format!("{}_label", base_name));
            let label = match fs::read_to_string(&label_path) {
                Ok(label) => label.trim().to_string(),
                Err(_) => format!("{}_{}", chip, base_name),
            };

            trace!(sensor = %label, path = ?input_path, "Found sensor");
            sensors.push(SensorPath {
                label,
                path: input_path,
                kind,
            });
        }
    }

    sensors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn layout_in(dir: &TempDir) -> SysfsLayout {
        let root = dir.path();
        SysfsLayout {
            platform_profile: root.join("platform_profile"),
            platform_profile_choices: root.join("platform_profile_choices"),
            hp_wmi_platform: root.join("hp-wmi"),
            hwmon_base: root.join("hwmon"),
        }
    }

    fn write_full_tree(dir: &TempDir) -> SysfsLayout {
        let layout = layout_in(dir);
        fs::write(&layout.platform_profile, "balanced\n").unwrap();
        fs::write(&layout.platform_profile_choices, "quiet balanced performance\n").unwrap();

        let wmi_hwmon = layout.hp_wmi_platform.join("hwmon").join("hwmon4");
        fs::create_dir_all(&wmi_hwmon).unwrap();
        fs::write(wmi_hwmon.join("pwm1_enable"), "2\n").unwrap();

        let coretemp = layout.hwmon_base.join("hwmon0");
        fs::create_dir_all(&coretemp).unwrap();
        fs::write(coretemp.join("name"), "coretemp\n").unwrap();
        fs::write(coretemp.join("temp1_input"), "45000\n").unwrap();
        fs::write(coretemp.join("temp1_label"), "Package id 0\n").unwrap();

        let hp = layout.hwmon_base.join("hwmon1");
        fs::create_dir_all(&hp).unwrap();
        fs::write(hp.join("name"), "hp\n").unwrap();
        fs::write(hp.join("fan1_input"), "2400\n").unwrap();

        layout
    }

    #[test]
    fn missing_surfaces_degrade_instead_of_failing() {
        let dir = TempDir::new().unwrap();
        let record = probe_layout(&layout_in(&dir));

        assert!(!record.platform_profile_available);
        assert!(record.platform_profile_choices.is_empty());
        assert!(record.boost_path.is_none());
        assert!(record.sensors.is_empty());
        assert!(!record.any_control_available());
    }

    #[test]
    fn full_tree_is_discovered() {
        let dir = TempDir::new().unwrap();
        let layout = write_full_tree(&dir);
        let record = probe_layout(&layout);

        assert!(record.platform_profile_available);
        assert_eq!(record.platform_profile_choices.len(), 3);
        assert!(record.platform_profile_choices.contains("balanced"));
        assert_eq!(
            record.boost_path.as_deref(),
            Some(
                layout
                    .hp_wmi_platform
                    .join("hwmon")
                    .join("hwmon4")
                    .join("pwm1_enable")
                    .as_path()
            )
        );

        assert_eq!(record.sensors.len(), 2);
        assert_eq!(record.sensors[0].label, "Package id 0");
        assert_eq!(record.sensors[0].kind, SensorKind::Temp);
        assert_eq!(record.sensors[1].label, "hp_fan1");
        assert_eq!(record.sensors[1].kind, SensorKind::Fan);
    }

    #[test]
    fn probe_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let layout = write_full_tree(&dir);

        let first = probe_layout(&layout);
        let second = probe_layout(&layout);
        assert_eq!(first, second);
    }

    #[test]
    fn boost_control_found_via_hwmon_name_fallback() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(&dir);

        // No hp-wmi platform device; the chip only shows up in the class tree
        let hp = layout.hwmon_base.join("hwmon2");
        fs::create_dir_all(&hp).unwrap();
        fs::write(hp.join("name"), "hp\n").unwrap();
        fs::write(hp.join("pwm1_enable"), "2\n").unwrap();

        let record = probe_layout(&layout);
        assert_eq!(
            record.boost_path.as_deref(),
            Some(hp.join("pwm1_enable").as_path())
        );
    }

    #[test]
    fn unrelated_chips_do_not_claim_boost_control() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(&dir);

        let other = layout.hwmon_base.join("hwmon0");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("name"), "nct6775\n").unwrap();
        fs::write(other.join("pwm1_enable"), "2\n").unwrap();

        let record = probe_layout(&layout);
        assert!(record.boost_path.is_none());
    }
}
