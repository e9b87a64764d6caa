//! Build script for lightgate-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lightgate.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sections the firmware reads, with their keys
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "timing",
        &[
            "min_trigger_ms",
            "stop_dwell_ms",
            "reset_holdoff_ms",
            "tick_ms",
            "start_marker",
        ],
    ),
    ("gate", &["inverted"]),
    ("display", &["i2c_address"]),
    ("remote", &["enabled", "baudrate"]),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate lightgate.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=lightgate.toml");

    let config_path = Path::new("lightgate.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: lightgate.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a lightgate.toml configuration file.        ║\n\
            ║  Please create one in the lightgate-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read lightgate.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in lightgate.toml                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_known_keys(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_hardware(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in lightgate.toml                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=lightgate.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The on-target parser rejects anything it does not know
fn validate_known_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some(keys) = SECTIONS
            .iter()
            .find(|(section, _)| *section == name.as_str())
            .map(|(_, keys)| *keys)
        else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };

        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
        return;
    };
    match value.as_integer() {
        Some(n) if range.contains(&n) => {}
        Some(_) => errors.push(format!(
            "{}.{} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
        None => errors.push(format!("{}.{} must be an integer", section, key)),
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "timing", "min_trigger_ms", 1..=1000, errors);
    check_range(config, "timing", "stop_dwell_ms", 0..=60_000, errors);
    check_range(config, "timing", "reset_holdoff_ms", 0..=10_000, errors);
    check_range(config, "timing", "tick_ms", 1..=100, errors);

    if let Some(marker) = config.get("timing").and_then(|t| t.get("start_marker")) {
        let ok = marker
            .as_str()
            .is_some_and(|s| s.len() == 1 && s.bytes().all(|b| b.is_ascii_graphic()));
        if !ok {
            errors.push("timing.start_marker must be one printable ASCII character".into());
        }
    }
}

fn validate_hardware(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "display", "i2c_address", 0x08..=0x77, errors);
    check_range(config, "remote", "baudrate", 1200..=921_600, errors);

    for (section, key) in [("gate", "inverted"), ("remote", "enabled")] {
        if let Some(value) = config.get(section).and_then(|s| s.get(key)) {
            if value.as_bool().is_none() {
                errors.push(format!("{}.{} must be true or false", section, key));
            }
        }
    }
}
