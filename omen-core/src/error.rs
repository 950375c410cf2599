//! Error types, re-exported from the shared omen-error crate

pub use omen_error::{ErrorKind, OmenError, Result};
