//! Constants and configuration values for omenctl
//!
//! Centralizes the sysfs paths and magic values of the kernel interfaces this
//! crate drives. Never use magic numbers in other files - add them here first.

use std::time::Duration;

/// Kernel sysfs paths consumed by the controller
pub mod paths {
    /// ACPI platform profile (thermal policy), read+write
    pub const PLATFORM_PROFILE: &str = "/sys/firmware/acpi/platform_profile";

    /// Space-separated list of profiles the firmware accepts
    pub const PLATFORM_PROFILE_CHOICES: &str = "/sys/firmware/acpi/platform_profile_choices";

    /// hp-wmi platform device; presence means the vendor driver is loaded
    pub const HP_WMI_PLATFORM: &str = "/sys/devices/platform/hp-wmi";

    /// Base path for hwmon devices
    pub const HWMON_BASE: &str = "/sys/class/hwmon";
}

/// Fan boost (max fan) control values
///
/// The hp-wmi hwmon exposes the override through `pwm1_enable`:
/// 0 engages the firmware max-fan override, 2 returns to automatic control.
pub mod boost {
    /// pwm1_enable value that forces maximum fan speed
    pub const ENGAGED: &str = "0";

    /// pwm1_enable value for firmware-automatic fan control
    pub const AUTOMATIC: &str = "2";

    /// File name of the boost control under the hp-wmi hwmon directory
    pub const CONTROL_FILE: &str = "pwm1_enable";
}

/// Temperature constants
pub mod temperature {
    /// Temperature readings are in millidegrees, divide by this to get Celsius
    pub const MILLIDEGREE_DIVISOR: f32 = 1000.0;
}

/// Timing constants
pub mod timing {
    use super::*;

    /// Default sensor poll interval; callers own the actual value
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
}
