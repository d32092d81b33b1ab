//! Configuration module for `GradPlanner`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside path values
const DIR_VARIABLE: &str = "$GRAD_PLANNER";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Planning engine configuration
///
/// Numeric fields use `0` for "not set" so older config files pick up defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// First quarter any plan may start from, e.g. `"Winter 2026"`
    #[serde(default)]
    pub epoch: String,
    /// Courses recommended per quarter when a request does not say
    #[serde(default)]
    pub courses_per_quarter: usize,
    /// Longest plan accepted, in quarters
    #[serde(default)]
    pub max_terms: usize,
    /// Seconds a session may sit unused before it is dropped
    #[serde(default)]
    pub session_idle_secs: u64,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Course catalog JSON file
    #[serde(default)]
    pub catalog_file: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Planning settings
    #[serde(default)]
    pub planning: PlanningConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override planning epoch
    pub epoch: Option<String>,
    /// Override courses per quarter
    pub courses_per_quarter: Option<usize>,
    /// Override catalog file
    pub catalog_file: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

/// Copy `default` into `value` when `value` is empty and `default` is not
fn fill_str(value: &mut String, default: &str) -> bool {
    if value.is_empty() && !default.is_empty() {
        default.clone_into(value);
        true
    } else {
        false
    }
}

/// Copy `default` into `value` when `value` is zero and `default` is not
fn fill_num<T: Copy + Default + PartialEq>(value: &mut T, default: T) -> bool {
    if *value == T::default() && default != T::default() {
        *value = default;
        true
    } else {
        false
    }
}

/// Parse a numeric config value, naming the key on failure
fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid number for '{key}': '{value}'"))
}

impl Config {
    /// Get the `$GRAD_PLANNER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradplanner`
    /// - macOS: `~/Library/Application Support/gradplanner`
    /// - Windows: `%APPDATA%\gradplanner`
    #[must_use]
    pub fn get_gradplanner_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradplanner")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are unset in the current config and set in `defaults`
    /// are updated, so upgrades add new fields without touching user settings.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let results = [
            fill_str(&mut self.logging.level, &defaults.logging.level),
            fill_str(&mut self.logging.file, &defaults.logging.file),
            fill_str(&mut self.planning.epoch, &defaults.planning.epoch),
            fill_num(
                &mut self.planning.courses_per_quarter,
                defaults.planning.courses_per_quarter,
            ),
            fill_num(&mut self.planning.max_terms, defaults.planning.max_terms),
            fill_num(
                &mut self.planning.session_idle_secs,
                defaults.planning.session_idle_secs,
            ),
            fill_str(&mut self.paths.catalog_file, &defaults.paths.catalog_file),
            fill_str(&mut self.paths.reports_dir, &defaults.paths.reports_dir),
        ];
        results.contains(&true)
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides only last for the current run; the config file is untouched.
    /// Only non-`None` values in `overrides` replace config values.
    ///
    /// # Arguments
    ///
    /// * `overrides` - A `ConfigOverrides` struct with optional override values
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(epoch) = &overrides.epoch {
            self.planning.epoch.clone_from(epoch);
        }
        if let Some(courses) = overrides.courses_per_quarter {
            self.planning.courses_per_quarter = courses;
        }

        if let Some(catalog_file) = &overrides.catalog_file {
            self.paths.catalog_file = Self::expand_variables(catalog_file);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir = Self::expand_variables(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// the directory returned by [`get_gradplanner_dir`].
    ///
    /// [`get_gradplanner_dir`]: Self::get_gradplanner_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradplanner_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$GRAD_PLANNER` in a string to the config directory
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let expanded = Config::expand_variables("$GRAD_PLANNER/logs/app.log");
    /// // Returns something like "/home/user/.config/gradplanner/logs/app.log"
    /// ```
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradplanner_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Expands `$GRAD_PLANNER` in path values. Missing fields use their serde
    /// defaults (empty strings, zero, or false).
    ///
    /// # Arguments
    ///
    /// * `toml_str` - A TOML-formatted configuration string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.catalog_file = Self::expand_variables(&config.paths.catalog_file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds use
    /// `DefaultCLIConfigRelease.toml`.
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The defaults
    /// are compiled in and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from
    ///   defaults, and saves the merged result
    /// - On first run: creates the config directory and writes the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose`: logging
    /// - `epoch`, `courses_per_quarter`, `max_terms`, `session_idle_secs`: planning
    /// - `catalog_file`, `reports_dir`: paths
    ///
    /// Keys also accept dashes in place of underscores.
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "epoch" => Some(self.planning.epoch.clone()),
            "courses_per_quarter" | "courses-per-quarter" => {
                Some(self.planning.courses_per_quarter.to_string())
            }
            "max_terms" | "max-terms" => Some(self.planning.max_terms.to_string()),
            "session_idle_secs" | "session-idle-secs" => {
                Some(self.planning.session_idle_secs.to_string())
            }
            "catalog_file" | "catalog-file" => Some(self.paths.catalog_file.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be
    /// parsed (e.g. `"maybe"` for `verbose`, `"three"` for `max_terms`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "epoch" => self.planning.epoch = value.to_string(),
            "courses_per_quarter" | "courses-per-quarter" => {
                self.planning.courses_per_quarter = parse_num(key, value)?;
            }
            "max_terms" | "max-terms" => self.planning.max_terms = parse_num(key, value)?,
            "session_idle_secs" | "session-idle-secs" => {
                self.planning.session_idle_secs = parse_num(key, value)?;
            }
            "catalog_file" | "catalog-file" => self.paths.catalog_file = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "epoch" => self.planning.epoch.clone_from(&defaults.planning.epoch),
            "courses_per_quarter" | "courses-per-quarter" => {
                self.planning.courses_per_quarter = defaults.planning.courses_per_quarter;
            }
            "max_terms" | "max-terms" => self.planning.max_terms = defaults.planning.max_terms,
            "session_idle_secs" | "session-idle-secs" => {
                self.planning.session_idle_secs = defaults.planning.session_idle_secs;
            }
            "catalog_file" | "catalog-file" => self
                .paths
                .catalog_file
                .clone_from(&defaults.paths.catalog_file),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds without doing anything if no file exists.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[planning]")?;
        writeln!(f, "  epoch = \"{}\"", self.planning.epoch)?;
        writeln!(
            f,
            "  courses_per_quarter = {}",
            self.planning.courses_per_quarter
        )?;
        writeln!(f, "  max_terms = {}", self.planning.max_terms)?;
        writeln!(f, "  session_idle_secs = {}", self.planning.session_idle_secs)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  catalog_file = \"{}\"", self.paths.catalog_file)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}
