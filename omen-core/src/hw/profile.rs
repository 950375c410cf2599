//! Low-level platform-profile and fan boost operations
//!
//! Thin wrappers over the two writable sysfs surfaces. Writes are blocking,
//! unbuffered, single-shot; retry policy belongs to the caller.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants::boost;
use crate::error::{OmenError, Result};

/// Read the currently active platform profile string
pub fn read_profile(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| OmenError::read_error(path, e))?;
    Ok(content.trim().to_string())
}

/// Write a platform profile string (thermal policy)
pub fn write_profile(path: &Path, profile: &str) -> Result<()> {
    fs::write(path, profile).map_err(|e| OmenError::write_error(path, e))?;
    debug!(profile = %profile, "Wrote platform profile");
    Ok(())
}

/// Read the fan boost state; true means the max-fan override is engaged
pub fn read_boost(path: &Path) -> Result<bool> {
    let content = fs::read_to_string(path).map_err(|e| OmenError::read_error(path, e))?;
    let value = content
        .trim()
        .parse::<u8>()
        .map_err(|e| OmenError::Parse {
            path: path.to_path_buf(),
            reason: format!("'{}': {}", content.trim(), e),
        })?;
    // pwm1_enable: 0 = boost engaged, anything else = firmware control
    Ok(value == 0)
}

/// Engage or disengage the fan boost override
pub fn write_boost(path: &Path, engaged: bool) -> Result<()> {
    let value = if engaged {
        boost::ENGAGED
    } else {
        boost::AUTOMATIC
    };
    fs::write(path, value).map_err(|e| OmenError::write_error(path, e))?;
    debug!(engaged, "Wrote fan boost flag");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn profile_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("platform_profile");
        fs::write(&path, "balanced\n").unwrap();

        assert_eq!(read_profile(&path).unwrap(), "balanced");
        write_profile(&path, "performance").unwrap();
        assert_eq!(read_profile(&path).unwrap(), "performance");
    }

    #[test]
    fn boost_flag_semantics() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pwm1_enable");
        fs::write(&path, "2\n").unwrap();

        assert!(!read_boost(&path).unwrap());
        write_boost(&path, true).unwrap();
        assert!(read_boost(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");
        write_boost(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "2");
    }

    #[test]
    fn vanished_path_is_device_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone").join("pwm1_enable");

        let err = write_boost(&path, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeviceUnavailable);
    }
}
