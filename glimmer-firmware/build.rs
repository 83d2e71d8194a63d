//! Build script for glimmer-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates glimmer.toml at compile time
//! - Emits the panel size as constants for the static frame buffer

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest panel a 16-bit TPM2.NET frame size can describe
const MAX_PIXELS: i64 = u16::MAX as i64 / 3;

/// HUB75 address lines wired on the board (A-E)
const ADDRESS_LINES: u32 = 5;

/// Tallest panel the address lines can scan
const MAX_HEIGHT: i64 = 2 << ADDRESS_LINES;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    setup_linker(&out_dir);
    let config = validate_config();
    emit_panel_size(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

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

/// Validate glimmer.toml at compile time
fn validate_config() -> toml::Value {
    println!("cargo:rerun-if-changed=glimmer.toml");

    let config_path = Path::new("glimmer.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: glimmer.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a glimmer.toml configuration file.        ║\n\
            ║  Please create one in the glimmer-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read glimmer.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in glimmer.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_matrix(&config, &mut errors);
    validate_network(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_panel(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in glimmer.toml                    ║\n\
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

    println!("cargo:warning=glimmer.toml validated successfully");
    config
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

/// Known sections and their keys
const SCHEMA: &[(&str, &[&str])] = &[
    ("matrix", &["width", "height"]),
    ("network", &["hostname", "port"]),
    ("timing", &["data_timeout_s", "refresh_hz", "idle_poll_ms"]),
    ("panel", &["bit_planes", "base_on_time_us"]),
];

/// Reject unknown sections and keys, require [matrix] and [network]
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".into());
        return;
    };

    for (name, section) in root {
        let Some((_, keys)) = SCHEMA.iter().find(|(s, _)| s == name) else {
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

    for required in ["matrix", "network"] {
        if root.get(required).is_none() {
            errors.push(format!("missing [{}] section", required));
        }
    }
}

/// Fetch an integer and check its range, if present
fn int_in(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let value = config.get(section)?.get(key)?;
    match value.as_integer() {
        Some(n) if range.contains(&n) => Some(n),
        Some(_) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            None
        }
        None => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn validate_matrix(config: &toml::Value, errors: &mut Vec<String>) {
    let width = int_in(config, "matrix", "width", 1..=u16::MAX as i64, errors);
    let height = int_in(config, "matrix", "height", 2..=u16::MAX as i64, errors);

    if let (Some(w), Some(h)) = (width, height) {
        if w * h > MAX_PIXELS {
            errors.push(format!(
                "[matrix] {}x{} exceeds {} pixels (16-bit frame size)",
                w, h, MAX_PIXELS
            ));
        }
        if h % 2 != 0 {
            errors.push("[matrix] height must be even (two scan halves)".into());
        }
        if h > MAX_HEIGHT {
            errors.push(format!(
                "[matrix] height {} needs more than {} address lines",
                h, ADDRESS_LINES
            ));
        }
    }
}

fn validate_network(config: &toml::Value, errors: &mut Vec<String>) {
    int_in(config, "network", "port", 1..=u16::MAX as i64, errors);

    if let Some(hostname) = config.get("network").and_then(|n| n.get("hostname")) {
        match hostname.as_str() {
            Some(name) if name.is_empty() || name.len() > 32 => {
                errors.push("[network] hostname must be 1-32 characters".into());
            }
            Some(name)
                if !name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-') =>
            {
                errors.push("[network] hostname may only use letters, digits and '-'".into());
            }
            Some(_) => {}
            None => errors.push("[network] hostname must be a string".into()),
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    int_in(config, "timing", "data_timeout_s", 1..=3600, errors);
    int_in(config, "timing", "refresh_hz", 1..=10_000, errors);
    int_in(config, "timing", "idle_poll_ms", 1..=1000, errors);
}

fn validate_panel(config: &toml::Value, errors: &mut Vec<String>) {
    let planes = int_in(config, "panel", "bit_planes", 1..=8, errors);
    let base = int_in(config, "panel", "base_on_time_us", 1..=1000, errors);

    // Longest plane must fit in one refresh period
    let hz = config
        .get("timing")
        .and_then(|t| t.get("refresh_hz"))
        .and_then(|v| v.as_integer())
        .unwrap_or(512);
    let rows = config
        .get("matrix")
        .and_then(|m| m.get("height"))
        .and_then(|v| v.as_integer())
        .unwrap_or(32)
        / 2;
    if let (Some(planes), Some(base)) = (planes, base) {
        let longest_us = (base << (planes - 1)) * rows;
        if hz > 0 && longest_us > 1_000_000 / hz {
            errors.push(format!(
                "[panel] top bit plane ({}us) exceeds the refresh period",
                longest_us
            ));
        }
    }
}

/// Write the panel size as constants for `include!`
fn emit_panel_size(out_dir: &Path, config: &toml::Value) {
    let dim = |key: &str, default: i64| {
        config
            .get("matrix")
            .and_then(|m| m.get(key))
            .and_then(|v| v.as_integer())
            .unwrap_or(default)
    };

    let source = format!(
        "/// Panel width from glimmer.toml\n\
         pub const PANEL_WIDTH: usize = {};\n\
         /// Panel height from glimmer.toml\n\
         pub const PANEL_HEIGHT: usize = {};\n",
        dim("width", 64),
        dim("height", 32)
    );
    fs::write(out_dir.join("panel.rs"), source).expect("write panel.rs");
}
