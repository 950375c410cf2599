//! Fan mode resolution and application
//!
//! Each [`FanMode`] carries a declarative mapping onto the two control
//! surfaces: an ordered list of platform-profile candidates and a target
//! boost flag. The mapping is checked against the [`CapabilityRecord`]
//! before any write is attempted, so an unsupported mode fails cleanly
//! instead of being silently substituted.
//!
//! Write order is profile first, then boost: the boost override is layered
//! on top of the thermal policy baseline, and writing it last keeps it from
//! being clobbered by a profile-driven fan curve reset.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::data::{CapabilityRecord, FanMode};
use crate::error::{OmenError, Result};
use crate::hw::profile;

/// Declarative mapping from one fan mode onto the control surfaces
struct ModeMapping {
    mode: FanMode,
    /// Profile names to try against the firmware's choices, in order.
    /// Empty for boost-only modes, which leave the thermal policy untouched.
    profile_candidates: &'static [&'static str],
    /// Target state of the hp-wmi max-fan override
    boost_engaged: bool,
}

/// The static mode table; not configurable at runtime.
///
/// Firmware generations disagree on the low-power profile name, hence the
/// candidate list for Quiet.
static MODE_TABLE: &[ModeMapping] = &[
    ModeMapping {
        mode: FanMode::Quiet,
        profile_candidates: &["low-power", "quiet"],
        boost_engaged: false,
    },
    ModeMapping {
        mode: FanMode::Balanced,
        profile_candidates: &["balanced"],
        boost_engaged: false,
    },
    ModeMapping {
        mode: FanMode::Performance,
        profile_candidates: &["performance"],
        boost_engaged: false,
    },
    ModeMapping {
        mode: FanMode::Max,
        profile_candidates: &[],
        boost_engaged: true,
    },
    ModeMapping {
        mode: FanMode::Off,
        profile_candidates: &[],
        boost_engaged: false,
    },
];

fn mapping_for(mode: FanMode) -> &'static ModeMapping {
    let idx = match mode {
        FanMode::Quiet => 0,
        FanMode::Balanced => 1,
        FanMode::Performance => 2,
        FanMode::Max => 3,
        FanMode::Off => 4,
    };
    let mapping = &MODE_TABLE[idx];
    debug_assert_eq!(mapping.mode, mode);
    mapping
}

/// Resolved write plan for a single apply call
struct WritePlan<'a> {
    profile: Option<&'static str>,
    boost: Option<(&'a Path, bool)>,
}

/// Check the requested mode against the capability record and produce the
/// concrete writes, or refuse with `UnsupportedMode`.
fn resolve<'a>(requested: FanMode, record: &'a CapabilityRecord) -> Result<WritePlan<'a>> {
    let mapping = mapping_for(requested);

    let profile = if mapping.profile_candidates.is_empty() {
        None
    } else {
        if !record.platform_profile_available {
            return Err(OmenError::unsupported(
                requested.as_str(),
                "platform profile interface not present",
            ));
        }
        let choice = mapping
            .profile_candidates
            .iter()
            .find(|candidate| record.platform_profile_choices.contains(**candidate))
            .copied();
        match choice {
            Some(choice) => Some(choice),
            None => {
                return Err(OmenError::unsupported(
                    requested.as_str(),
                    format!(
                        "no matching profile among firmware choices {:?}",
                        record.platform_profile_choices
                    ),
                ))
            }
        }
    };

    let boost = match record.boost_path.as_deref() {
        Some(path) => Some((path, mapping.boost_engaged)),
        None if profile.is_none() => {
            // Max and Off are pure boost modes; without the control they
            // have no viable mapping at all.
            return Err(OmenError::unsupported(
                requested.as_str(),
                "hp-wmi fan boost control not present",
            ));
        }
        None => {
            debug!(mode = %requested, "No boost control; profile write only");
            None
        }
    };

    Ok(WritePlan { profile, boost })
}

/// Apply a fan mode to the hardware
///
/// On success returns the applied mode. If the boost write fails after the
/// profile write succeeded, the previous profile is rewritten before
/// returning, and the result reports whether that rollback worked - the
/// hardware is never left in a mixed state silently.
pub fn apply_mode(requested: FanMode, record: &CapabilityRecord) -> Result<FanMode> {
    let plan = resolve(requested, record)?;

    info!(
        mode = %requested,
        profile = ?plan.profile,
        boost = ?plan.boost.map(|(_, engaged)| engaged),
        "Applying fan mode"
    );

    // Snapshot the active profile before touching it; this is the rollback
    // value if the second write fails.
    let previous_profile = match plan.profile {
        Some(_) => Some(profile::read_profile(&record.platform_profile_path)?),
        None => None,
    };

    if let Some(target) = plan.profile {
        profile::write_profile(&record.platform_profile_path, target)?;
    }

    if let Some((boost_path, engaged)) = plan.boost {
        if let Err(boost_err) = profile::write_boost(boost_path, engaged) {
            if let Some(previous) = previous_profile.as_deref() {
                let rollback_succeeded =
                    profile::write_profile(&record.platform_profile_path, previous).is_ok();
                warn!(
                    mode = %requested,
                    error = %boost_err,
                    rollback_succeeded,
                    "Boost write failed after profile write; reverted thermal policy"
                );
                return Err(OmenError::PartialApply {
                    mode: requested.to_string(),
                    rollback_succeeded,
                });
            }
            return Err(boost_err);
        }
    }

    Ok(requested)
}

/// Best-effort read of the mode the hardware currently reflects
///
/// An engaged boost override reads as `Max` regardless of the underlying
/// profile, matching what the fans are actually doing. Returns `None` when
/// neither surface is readable or the profile string is not in the mode
/// vocabulary.
pub fn read_applied_mode(record: &CapabilityRecord) -> Option<FanMode> {
    if let Some(ref boost_path) = record.boost_path {
        match profile::read_boost(boost_path) {
            Ok(true) => return Some(FanMode::Max),
            Ok(false) => {}
            Err(e) => debug!(error = %e, "Could not read boost state"),
        }
    }

    read_profile_baseline(record)
}

/// The profile-backed mode currently in the hardware, ignoring the boost
/// override. This is the baseline `Max`/`Off` leave in place.
pub fn read_profile_baseline(record: &CapabilityRecord) -> Option<FanMode> {
    if !record.platform_profile_available {
        return None;
    }
    match profile::read_profile(&record.platform_profile_path) {
        Ok(active) => mode_for_profile(&active),
        Err(e) => {
            debug!(error = %e, "Could not read platform profile");
            None
        }
    }
}

/// Reverse-map a platform profile string onto the fan mode vocabulary
fn mode_for_profile(active: &str) -> Option<FanMode> {
    match active {
        "low-power" | "quiet" => Some(FanMode::Quiet),
        "balanced" => Some(FanMode::Balanced),
        "performance" => Some(FanMode::Performance),
        other => {
            debug!(profile = %other, "Platform profile outside the mode vocabulary");
            None
        }
    }
}
