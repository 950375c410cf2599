//! Unified error handling for omenctl
//!
//! This crate provides the single error type used across all omenctl
//! components. It uses thiserror for ergonomic error definitions with proper
//! Display and Error trait impls, and carries the coarse [`ErrorKind`]
//! discriminant that the CLI maps onto process exit codes.

use std::io;
use std::path::PathBuf;

/// Result type alias using OmenError
pub type Result<T> = std::result::Result<T, OmenError>;

/// Unified error type for all omenctl operations
#[derive(thiserror::Error, Debug)]
pub enum OmenError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    Parse {
        path: PathBuf,
        reason: String,
    },

    // ============================================================================
    // Mode Control Errors
    // ============================================================================
    #[error("Mode '{mode}' is not supported on this machine: {reason}")]
    UnsupportedMode {
        mode: String,
        reason: String,
    },

    #[error("Permission denied writing {path} (udev rule missing, or run as root)")]
    PermissionDenied {
        path: PathBuf,
    },

    #[error("Control path unavailable: {path} (hp-wmi module unloaded?)")]
    DeviceUnavailable {
        path: PathBuf,
    },

    #[error("Mode '{mode}' partially applied: boost write failed after the thermal profile was set (rollback succeeded: {rollback_succeeded})")]
    PartialApply {
        mode: String,
        rollback_succeeded: bool,
    },

    // ============================================================================
    // Sensor Errors
    // ============================================================================
    #[error("Sensor read failed for {label}: {reason}")]
    SensorRead {
        label: String,
        reason: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("{0}")]
    Generic(String),
}

/// Coarse discriminant of an [`OmenError`].
///
/// Cheap to copy into shared state (the full error is not `Clone`) and the
/// unit the CLI exit-code mapping is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    UnsupportedMode,
    PermissionDenied,
    DeviceUnavailable,
    PartialApply,
    SensorRead,
}

impl ErrorKind {
    /// Process exit code for this kind, one distinct non-zero code each.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Io => 1,
            ErrorKind::UnsupportedMode => 2,
            ErrorKind::PermissionDenied => 3,
            ErrorKind::DeviceUnavailable => 4,
            ErrorKind::PartialApply => 5,
            ErrorKind::SensorRead => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Io => "io-error",
            ErrorKind::UnsupportedMode => "unsupported-mode",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::DeviceUnavailable => "device-unavailable",
            ErrorKind::PartialApply => "partial-apply",
            ErrorKind::SensorRead => "sensor-read-failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OmenError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create an unsupported-mode error
    pub fn unsupported(mode: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedMode {
            mode: mode.into(),
            reason: reason.into(),
        }
    }

    /// Classify a failed sysfs read into a domain error.
    ///
    /// A vanished path means the backing driver went away between probe and
    /// use, which is a distinct condition from an ordinary read failure.
    pub fn read_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::DeviceUnavailable { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::FileRead { path, source },
        }
    }

    /// Classify a failed sysfs write into a domain error.
    pub fn write_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::DeviceUnavailable { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::FileWrite { path, source },
        }
    }

    /// The coarse discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedMode { .. } => ErrorKind::UnsupportedMode,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::DeviceUnavailable { .. } => ErrorKind::DeviceUnavailable,
            Self::PartialApply { .. } => ErrorKind::PartialApply,
            Self::SensorRead { .. } => ErrorKind::SensorRead,
            Self::Io(_)
            | Self::FileRead { .. }
            | Self::FileWrite { .. }
            | Self::Parse { .. }
            | Self::JsonParse(_)
            | Self::Generic(_) => ErrorKind::Io,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

// Allow converting from String to OmenError
impl From<String> for OmenError {
    fn from(s: String) -> Self {
        Self::Generic(s)
    }
}

// Allow converting from &str to OmenError
impl From<&str> for OmenError {
    fn from(s: &str) -> Self {
        Self::Generic(s.to_string())
    }
}
