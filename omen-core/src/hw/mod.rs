//! Hardware interaction (probing, sensors, sysfs control primitives)

pub mod probe;
pub mod profile;
pub mod sensors;

pub use probe::{probe, probe_layout, SysfsLayout};
pub use profile::{read_boost, read_profile, write_boost, write_profile};
pub use sensors::{read_fan_rpm, read_snapshot, read_temperature};
