//! omenctl Core Library
//!
//! Fan-mode and thermal-policy control for HP OMEN laptops, bridging three
//! disjoint kernel interfaces behind one controller:
//!
//! - **ACPI platform profile**: the enumerated thermal policy presets
//! - **hp-wmi**: the vendor driver's max-fan (boost) override
//! - **hwmon**: temperature and fan-speed sensors
//!
//! # Module Structure
//!
//! - `hw/` - hardware interaction (capability probing, sensors, sysfs writes)
//! - `data/` - value types shared across the crate
//! - `modes` - the fan mode table and mode application with rollback
//! - `controller` - shared state behind a single exclusion boundary
//! - `poll` - the cancellable background sensor poll loop
//!
//! # Example
//!
//! ```no_run
//! use omen_core::{probe, FanController, FanMode};
//!
//! let controller = FanController::new(probe());
//! controller.set_mode(FanMode::Performance)?;
//! let status = controller.status();
//! println!("active mode: {}", status.mode);
//! # Ok::<(), omen_core::OmenError>(())
//! ```

// Grouped modules
pub mod data;
pub mod hw;

// Standalone modules
pub mod constants;
pub mod controller;
pub mod error;
pub mod modes;
pub mod poll;

// Re-export primary types from data/
pub use data::{
    CapabilityRecord, FanMode, SensorKind, SensorPath, SensorReading, SensorSnapshot,
};

// Re-export error types
pub use error::{ErrorKind, OmenError, Result};

// Re-export hardware functions from hw/
pub use hw::{
    probe, probe_layout, read_boost, read_fan_rpm, read_profile, read_snapshot,
    read_temperature, write_boost, write_profile, SysfsLayout,
};

// Re-export mode control
pub use modes::{apply_mode, read_applied_mode, read_profile_baseline};

// Re-export the controller
pub use controller::{ControllerStatus, FanController};

// Re-export the poll loop
pub use poll::{run_poll_loop, PollSignal};
