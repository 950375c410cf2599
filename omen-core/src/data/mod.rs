//! Data types for the hardware controller

mod types;

pub use types::{
    CapabilityRecord, FanMode, SensorKind, SensorPath, SensorReading, SensorSnapshot,
};
