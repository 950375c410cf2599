//! Command Line Interface
//!
//! Flag parsing and output formatting. All hardware work goes through
//! [`omen_core::FanController`]; this layer only maps flags onto the
//! controller's contract and errors onto exit codes.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use omen_core::{
    FanController, FanMode, PollSignal, SensorKind, SensorReading,
};
use omen_error::{OmenError, Result};
use serde_json::json;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "omenctl")]
#[command(version)]
#[command(about = "Fan and thermal control for HP OMEN laptops")]
#[command(long_about = "Fan and thermal control for HP OMEN laptops

Bridges the ACPI platform profile, the hp-wmi fan boost override and the
hwmon sensor tree behind one set of fan modes.

EXAMPLES:
    omenctl                       Show current status
    omenctl --status              Show current status
    omenctl --mode performance    Switch to the performance profile
    omenctl --mode max            Force maximum fan speed
    omenctl --max-fan off         Back to automatic fan control
    omenctl --watch               Print a status line per poll tick
    omenctl --diagnostics         Dump capabilities and sensors as JSON

When several action flags are given, the first of --diagnostics, --mode,
--max-fan, --watch wins; with none, status is shown.

EXIT CODES:
    1  generic I/O failure          4  control path vanished
    2  unsupported mode             5  partial apply (rollback attempted)
    3  permission denied            6  sensor read failure

ENVIRONMENT VARIABLES:
    OMENCTL_LOG    Log level on stderr (trace, debug, info, warn, error)")]
pub struct Cli {
    /// Show current fan mode, temperatures and fan speeds
    #[arg(long, short = 's')]
    pub status: bool,

    /// Set the fan mode (quiet, balanced, performance, max, off)
    #[arg(long, short = 'm', value_name = "MODE")]
    pub mode: Option<FanMode>,

    /// Engage or disengage the maximum-fan override
    #[arg(long, value_name = "ON|OFF")]
    pub max_fan: Option<String>,

    /// Dump capabilities, applied mode and sensors as JSON
    #[arg(long, short = 'd')]
    pub diagnostics: bool,

    /// Keep running and print a status line per poll tick (ctrl-c to stop)
    #[arg(long)]
    pub watch: bool,

    /// Poll interval for --watch in milliseconds
    #[arg(long, default_value_t = 2000, value_name = "MS")]
    pub interval_ms: u64,
}

pub async fn run(cli: Cli) -> Result<()> {
    let record = omen_core::probe();
    debug!(
        platform_profile = record.platform_profile_available,
        boost = record.boost_path.is_some(),
        sensors = record.sensors.len(),
        "Probed control surfaces"
    );
    let controller = Arc::new(FanController::new(record));

    if cli.diagnostics {
        return cmd_diagnostics(&controller);
    }
    if let Some(mode) = cli.mode {
        return cmd_set_mode(&controller, mode);
    }
    if let Some(ref toggle) = cli.max_fan {
        return cmd_max_fan(&controller, toggle);
    }
    if cli.watch {
        let interval = Duration::from_millis(cli.interval_ms.max(100));
        return cmd_watch(controller, interval).await;
    }
    cmd_status(&controller)
}

// ============================================================================
// Status
// ============================================================================

fn cmd_status(controller: &FanController) -> Result<()> {
    let caps = controller.capabilities();
    if !caps.any_control_available() {
        eprintln!("Warning: no fan control interface found (is the hp-wmi module loaded?)");
    }

    controller.refresh_sensors();
    let status = controller.status();

    println!("OMEN Fan Control");
    println!("================");
    println!("Mode:    {}", status.mode);
    match status.mode {
        FanMode::Max => println!("Profile: {} (boost engaged)", status.profile_mode),
        FanMode::Off => println!("Profile: {}", status.profile_mode),
        _ => {}
    }
    println!();

    if status.snapshot.readings.is_empty() {
        println!("No sensors available");
    } else {
        for reading in &status.snapshot.readings {
            println!("  {}", format_reading(reading));
        }
    }

    if let Some(kind) = status.last_error {
        println!();
        println!("Last error: {}", kind);
    }

    Ok(())
}

fn format_reading(reading: &SensorReading) -> String {
    match (reading.kind, reading.value) {
        (SensorKind::Temp, Some(v)) => format!("{}: {:.0}°C", reading.label, v),
        (SensorKind::Fan, Some(v)) => format!("{}: {} RPM", reading.label, v as u32),
        (_, None) => format!("{}: N/A", reading.label),
    }
}

// ============================================================================
// Mode changes
// ============================================================================

fn cmd_set_mode(controller: &FanController, mode: FanMode) -> Result<()> {
    let applied = controller.set_mode(mode)?;
    println!("Fan mode set to {}", applied);
    Ok(())
}

fn cmd_max_fan(controller: &FanController, value: &str) -> Result<()> {
    if parse_on_off(value)? {
        controller.set_mode(FanMode::Max)?;
        println!("Max fan engaged");
    } else {
        controller.set_mode(FanMode::Off)?;
        let baseline = controller.status().profile_mode;
        println!("Max fan disengaged; fans back on the {} profile", baseline);
    }
    Ok(())
}

fn parse_on_off(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" | "yes" => Ok(true),
        "off" | "0" | "false" | "no" => Ok(false),
        other => Err(OmenError::generic(format!(
            "invalid --max-fan value '{}' (expected on or off)",
            other
        ))),
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

fn cmd_diagnostics(controller: &FanController) -> Result<()> {
    controller.refresh_sensors();
    let status = controller.status();

    let doc = json!({
        "capabilities": controller.capabilities(),
        "applied_mode": omen_core::read_applied_mode(controller.capabilities()),
        "cached_mode": status.mode,
        "profile_mode": status.profile_mode,
        "snapshot": status.snapshot,
        "last_error": status.last_error.map(|kind| kind.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

// ============================================================================
// Watch
// ============================================================================

async fn cmd_watch(controller: Arc<FanController>, interval: Duration) -> Result<()> {
    let signal = Arc::new(PollSignal::new());
    let poll = tokio::spawn(omen_core::run_poll_loop(
        Arc::clone(&controller),
        interval,
        Arc::clone(&signal),
    ));

    info!(interval_ms = interval.as_millis() as u64, "Watching sensors");
    println!("Watching sensors every {}ms (ctrl-c to stop)", interval.as_millis());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(interval) => {
                let status = controller.status();
                let readings: Vec<String> = status
                    .snapshot
                    .readings
                    .iter()
                    .map(format_reading)
                    .collect();
                println!("mode={} {}", status.mode, readings.join("  "));
            }
        }
    }

    signal.request_stop();
    let _ = poll.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn on_off_parsing() {
        assert!(parse_on_off("on").unwrap());
        assert!(parse_on_off("ON").unwrap());
        assert!(!parse_on_off("off").unwrap());
        assert!(!parse_on_off("0").unwrap());
        assert!(parse_on_off("sideways").is_err());
    }

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        use omen_error::ErrorKind;
        let kinds = [
            ErrorKind::Io,
            ErrorKind::UnsupportedMode,
            ErrorKind::PermissionDenied,
            ErrorKind::DeviceUnavailable,
            ErrorKind::PartialApply,
            ErrorKind::SensorRead,
        ];
        let codes: Vec<i32> = kinds.iter().map(|k| k.exit_code()).collect();
        for (i, code) in codes.iter().enumerate() {
            assert_ne!(*code, 0);
            for other in &codes[i + 1..] {
                assert_ne!(code, other);
            }
        }
    }
}
