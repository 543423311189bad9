// Set up espidf and bake the motion configuration into the firmware image.

use std::path::PathBuf;
use serde::Deserialize;

const CONFIG_FILE: &str = "motion.yml";

fn main() {
    embuild::espidf::sysenv::output();

    let config_path = config_path();
    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rerun-if-env-changed=MOTION_CONFIG");

    let config_string = std::fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Unable to read {} file: {}", config_path.display(), e));

    // The typed mirror rejects unknown keys and wrongly typed values.
    let _typed: Config = serde_yaml::from_str(&config_string)
        .unwrap_or_else(|e| panic!("Unable to parse {} file: {}", config_path.display(), e));
    let value: serde_json::Value = serde_yaml::from_str(&config_string)
        .unwrap_or_else(|e| panic!("Unable to parse {} file: {}", config_path.display(), e));

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let json = serde_json::to_string_pretty(&value).expect("YAML values are valid JSON");
    std::fs::write(out_dir.join("motion.json"), json)
        .unwrap_or_else(|e| panic!("Unable to write motion.json: {}", e));
}

/// `MOTION_CONFIG` may point at another file, e.g. `$HOME/bench/motion.yml`.
fn config_path() -> PathBuf {
    let raw = envmnt::get_or("MOTION_CONFIG", CONFIG_FILE);
    let expanded = envmnt::expand(&raw, None);
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(manifest_dir).join(path)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct Config {
    stance_samples: Option<u32>,
    stance_interval_ms: Option<u32>,
    settle_delay_ms: Option<u32>,
    countdown_seconds: Option<u32>,
    countdown_tick_ms: Option<u32>,
    yaw_window_ms: Option<u32>,
    yaw_interval_ms: Option<u32>,
    idle_poll_ms: Option<u32>,
    accel_lsb_per_g: Option<f32>,
    gyro_lsb_per_dps: Option<f32>,
    wired_baud: Option<u32>,
    wireless_baud: Option<u32>,
}
