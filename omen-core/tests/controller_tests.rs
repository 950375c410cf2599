/*
 * Integration tests for omen-core
 *
 * Exercise the full stack from capability probing through the controller,
 * with a scratch sysfs tree standing in for the kernel surfaces.
 */

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use omen_core::{probe_layout, FanController, FanMode, PollSignal, SensorKind, SysfsLayout};
use tempfile::TempDir;

/// Build a machine with every surface present: platform profile with three
/// choices, an hp-wmi boost control, one CPU temperature and one fan.
fn scratch_sysfs(dir: &TempDir) -> SysfsLayout {
    let root = dir.path();
    let layout = SysfsLayout {
        platform_profile: root.join("platform_profile"),
        platform_profile_choices: root.join("platform_profile_choices"),
        hp_wmi_platform: root.join("hp-wmi"),
        hwmon_base: root.join("hwmon"),
    };

    fs::write(&layout.platform_profile, "balanced").unwrap();
    fs::write(&layout.platform_profile_choices, "quiet balanced performance\n").unwrap();

    let wmi_hwmon = layout.hp_wmi_platform.join("hwmon").join("hwmon3");
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

fn profile_of(layout: &SysfsLayout) -> String {
    fs::read_to_string(&layout.platform_profile).unwrap()
}

fn boost_of(layout: &SysfsLayout) -> String {
    fs::read_to_string(
        layout
            .hp_wmi_platform
            .join("hwmon")
            .join("hwmon3")
            .join("pwm1_enable"),
    )
    .unwrap()
}

#[test]
fn mode_sequence_drives_both_surfaces() {
    let dir = TempDir::new().unwrap();
    let layout = scratch_sysfs(&dir);
    let controller = FanController::new(probe_layout(&layout));

    // Performance sets the thermal policy and keeps boost disengaged
    assert_eq!(
        controller.set_mode(FanMode::Performance).unwrap(),
        FanMode::Performance
    );
    assert_eq!(profile_of(&layout), "performance");
    assert_eq!(boost_of(&layout), "2");
    assert_eq!(controller.status().mode, FanMode::Performance);

    // Max engages boost and leaves the profile exactly as it was
    controller.set_mode(FanMode::Max).unwrap();
    assert_eq!(profile_of(&layout), "performance");
    assert_eq!(boost_of(&layout), "0");
    assert_eq!(controller.status().mode, FanMode::Max);
    assert_eq!(controller.status().profile_mode, FanMode::Performance);

    // Returning to Balanced writes both surfaces again
    controller.set_mode(FanMode::Balanced).unwrap();
    assert_eq!(profile_of(&layout), "balanced");
    assert_eq!(boost_of(&layout), "2");
}

#[test]
fn probing_twice_yields_the_same_record() {
    let dir = TempDir::new().unwrap();
    let layout = scratch_sysfs(&dir);
    assert_eq!(probe_layout(&layout), probe_layout(&layout));
}

#[test]
fn sensors_surface_through_status() {
    let dir = TempDir::new().unwrap();
    let layout = scratch_sysfs(&dir);
    let controller = FanController::new(probe_layout(&layout));

    assert!(controller.refresh_sensors().is_none());
    let status = controller.status();

    assert_eq!(status.snapshot.readings.len(), 2);
    assert_eq!(status.snapshot.readings[0].label, "Package id 0");
    assert_eq!(status.snapshot.readings[0].kind, SensorKind::Temp);
    assert_eq!(status.snapshot.readings[0].value, Some(45.0));
    assert_eq!(status.snapshot.readings[1].label, "hp_fan1");
    assert_eq!(status.snapshot.readings[1].kind, SensorKind::Fan);
    assert_eq!(status.snapshot.readings[1].value, Some(2400.0));
}

#[tokio::test]
async fn poll_loop_feeds_the_status_surface() {
    let dir = TempDir::new().unwrap();
    let layout = scratch_sysfs(&dir);
    let controller = Arc::new(FanController::new(probe_layout(&layout)));
    let signal = Arc::new(PollSignal::new());

    let task = tokio::spawn(omen_core::run_poll_loop(
        Arc::clone(&controller),
        Duration::from_millis(10),
        Arc::clone(&signal),
    ));

    tokio::time::sleep(Duration::from_millis(60)).await;

    // A mode change mid-polling still leaves every status read coherent
    controller.set_mode(FanMode::Quiet).unwrap();
    let status = controller.status();
    assert_eq!(status.mode, FanMode::Quiet);
    assert_eq!(status.snapshot.readings.len(), 2);

    signal.request_stop();
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("poll loop did not stop")
        .unwrap();
}
