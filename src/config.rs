/*
 *  config.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Layered configuration: defaults, then YAML, then command line
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::display::renderer::ScrollTiming;
use crate::display::scheduler::SchedulerTiming;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,     // e.g., "info" | "debug"
    /// Run against the in-memory panel and read the button from stdin
    pub emulated: bool,
    pub lcd: LcdConfig,
    pub button: ButtonConfig,
    pub schedule: ScheduleConfig,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcdConfig {
    pub bus: String,        // e.g. "/dev/i2c-1"
    pub address: u8,        // 7-bit PCF8574 address, usually 0x27 or 0x3F
    pub backlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub pin: u8,            // BCM numbering
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub auto_advance_ms: u64,
    pub poll_ms: u64,
    pub dwell_ms: u32,
    pub step_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub refresh_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            emulated: false,
            lcd: LcdConfig::default(),
            button: ButtonConfig::default(),
            schedule: ScheduleConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self { bus: "/dev/i2c-1".into(), address: 0x27, backlight: true }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self { pin: 15, debounce_ms: 250 }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { auto_advance_ms: 5000, poll_ms: 50, dwell_ms: 3000, step_ms: 250 }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        // Port of Rotterdam
        Self { enabled: true, latitude: 51.92, longitude: 4.48, refresh_secs: 600 }
    }
}

impl Config {
    pub fn scroll_timing(&self) -> ScrollTiming {
        ScrollTiming { dwell_ms: self.schedule.dwell_ms, step_ms: self.schedule.step_ms }
    }

    pub fn scheduler_timing(&self) -> SchedulerTiming {
        SchedulerTiming {
            auto_advance: Duration::from_millis(self.schedule.auto_advance_ms),
            poll: Duration::from_millis(self.schedule.poll_ms),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.button.debounce_ms)
    }

    pub fn weather_refresh(&self) -> Duration {
        Duration::from_secs(self.weather.refresh_secs)
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "portlcd", version, about = "Rotterdam port dashboard on a 16x2 character LCD")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Shorthand for --log-level debug
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// I2C character device, e.g. /dev/i2c-1
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub i2c_bus: Option<String>,
    /// Backpack address, hex (0x27) or decimal (39)
    #[arg(long, value_parser = parse_i2c_address)]
    pub address: Option<u8>,
    /// BCM pin of the advance button
    #[arg(long)]
    pub button_pin: Option<u8>,
    #[arg(long)]
    pub auto_advance_ms: Option<u64>,
    /// No hardware: log the panel and press Enter for the button
    #[arg(long, action = ArgAction::SetTrue)]
    pub emulated: bool,
    /// Skip the weather feed, show simulated conditions
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_weather: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Accept `0x27`, `0X27` or `39`
pub fn parse_i2c_address(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{}': {}", s, e))
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Everything [`load`] does short of parsing argv and dumping
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl) and 2) YAML file (explicit path or search)
    let mut cfg = if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            read_yaml(p)?
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        read_yaml(&p)?
    } else {
        Config::default()
    };

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/portlcd/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/portlcd/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/portlcd.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["portlcd.yaml", "config.yaml", "config/portlcd.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

/// Missing keys keep their defaults
fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    // an empty file is an empty mapping
    if s.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if let Some(level) = cli.log_level.as_ref() { cfg.log_level = level.clone(); }
    if cli.debug                                 { cfg.log_level = "debug".into(); }
    if let Some(bus) = cli.i2c_bus.as_ref()      { cfg.lcd.bus = bus.clone(); }
    if let Some(addr) = cli.address              { cfg.lcd.address = addr; }
    if let Some(pin) = cli.button_pin            { cfg.button.pin = pin; }
    if let Some(ms) = cli.auto_advance_ms        { cfg.schedule.auto_advance_ms = ms; }
    if cli.emulated                              { cfg.emulated = true; }
    if cli.no_weather                            { cfg.weather.enabled = false; }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(0x03..=0x77).contains(&cfg.lcd.address) {
        return Err(ConfigError::Validation(format!(
            "lcd address 0x{:02X} outside 0x03..=0x77",
            cfg.lcd.address
        )));
    }
    if cfg.lcd.bus.is_empty() && !cfg.emulated {
        return Err(ConfigError::Validation("lcd bus must be set".into()));
    }
    let schedule = &cfg.schedule;
    if schedule.auto_advance_ms == 0 || schedule.poll_ms == 0 || schedule.step_ms == 0 {
        return Err(ConfigError::Validation(
            "schedule auto_advance_ms, poll_ms and step_ms must be > 0".into(),
        ));
    }
    let weather = &cfg.weather;
    if !(-90.0..=90.0).contains(&weather.latitude) {
        return Err(ConfigError::Validation("weather latitude must be -90..=90".into()));
    }
    if !(-180.0..=180.0).contains(&weather.longitude) {
        return Err(ConfigError::Validation("weather longitude must be -180..=180".into()));
    }
    if weather.enabled && weather.refresh_secs < 60 {
        return Err(ConfigError::Validation("weather refresh_secs must be >= 60".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["portlcd"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.lcd.bus, "/dev/i2c-1");
        assert_eq!(cfg.lcd.address, 0x27);
        assert!(cfg.lcd.backlight);
        assert_eq!(cfg.button.pin, 15);
        assert_eq!(cfg.debounce(), Duration::from_millis(250));
        assert_eq!(cfg.scheduler_timing(), SchedulerTiming::default());
        assert_eq!(cfg.scroll_timing(), ScrollTiming::default());
        assert!(cfg.weather.enabled);
        assert_eq!(cfg.weather_refresh(), Duration::from_secs(600));
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = parse_yaml(
            "log_level: debug\nlcd:\n  address: 63\nschedule:\n  auto_advance_ms: 8000\n",
        )
        .unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.lcd.address, 0x3F);
        assert_eq!(cfg.lcd.bus, "/dev/i2c-1");
        assert_eq!(cfg.schedule.auto_advance_ms, 8000);
        assert_eq!(cfg.schedule.poll_ms, 50);
        assert_eq!(cfg.button, ButtonConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_defaults() {
        assert_eq!(parse_yaml("").unwrap(), Config::default());
        assert!(matches!(parse_yaml("lcd: [1, 2"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_address_parser() {
        assert_eq!(parse_i2c_address("0x27"), Ok(0x27));
        assert_eq!(parse_i2c_address("0X3f"), Ok(0x3F));
        assert_eq!(parse_i2c_address("39"), Ok(39));
        assert!(parse_i2c_address("0x1FF").is_err());
        assert!(parse_i2c_address("lcd").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut cfg = Config::default();
        let args = cli(&[
            "--address", "0x3F",
            "--i2c-bus", "/dev/i2c-0",
            "--button-pin", "17",
            "--auto-advance-ms", "7000",
            "--no-weather",
            "--debug",
            "--emulated",
        ]);
        apply_cli_overrides(&mut cfg, &args);
        assert_eq!(cfg.lcd.address, 0x3F);
        assert_eq!(cfg.lcd.bus, "/dev/i2c-0");
        assert_eq!(cfg.button.pin, 17);
        assert_eq!(cfg.schedule.auto_advance_ms, 7000);
        assert!(!cfg.weather.enabled);
        assert!(cfg.emulated);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_debug_beats_log_level() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--log-level", "warn", "--debug"]));
        assert_eq!(cfg.log_level, "debug");
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--log-level", "warn"]));
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn test_bad_address_rejected_by_clap() {
        assert!(Cli::try_parse_from(["portlcd", "--address", "0x100"]).is_err());
    }

    #[test]
    fn test_validation() {
        let mut cfg = Config::default();
        cfg.lcd.address = 0x78;
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));

        let mut cfg = Config::default();
        cfg.schedule.poll_ms = 0;
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.weather.latitude = 91.0;
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.weather.longitude = -181.0;
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.weather.refresh_secs = 30;
        assert!(validate(&cfg).is_err());
        cfg.weather.enabled = false;
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_missing_explicit_file() {
        let args = cli(&["--config", "/nonexistent/portlcd.yaml"]);
        assert!(matches!(load_from(&args), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!("portlcd-test-{}.yaml", std::process::id()));
        fs::write(&path, "button:\n  pin: 22\nweather:\n  enabled: false\n").unwrap();
        let args = cli(&["--config", path.to_str().unwrap(), "--button-pin", "23"]);
        let cfg = load_from(&args).unwrap();
        fs::remove_file(&path).unwrap();
        // CLI wins over the file
        assert_eq!(cfg.button.pin, 23);
        assert!(!cfg.weather.enabled);
    }

    #[test]
    fn test_dump_round_trips() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert_eq!(parse_yaml(&yaml).unwrap(), cfg);
    }
}
