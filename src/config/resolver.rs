//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (`--set key=value`)
//! 2. File given with `--config`
//! 3. File named by the `MINDMAP_CONFIG` environment variable
//! 4. System config.kdl (`~/.config/mindmap/config.kdl`)
//! 5. Built-in defaults

use super::schema::{self, KEYS, MindmapConfig};
use crate::gui::{DragConfig, SimulationConfig, ViewBoxMargin};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming an extra config file.
pub const MINDMAP_CONFIG_ENV: &str = "MINDMAP_CONFIG";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from the `--config` file
    File(String),
    /// Value from the file named by an environment variable
    EnvFile(String),
    /// Value from system-level config.kdl
    System,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::File(path) => write!(f, "file:{}", path),
            ValueSource::EnvFile(path) => write!(f, "env:{}={}", MINDMAP_CONFIG_ENV, path),
            ValueSource::System => write!(f, "system"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    entries: Vec<(&'static str, Resolved<f64>)>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let entries = KEYS
            .iter()
            .map(|key| {
                let value = schema::default_value(key).unwrap_or_default();
                (*key, Resolved::new(value, ValueSource::Default))
            })
            .collect();
        Self { entries }
    }
}

impl ResolvedConfig {
    /// All settings in display order
    pub fn entries(&self) -> &[(&'static str, Resolved<f64>)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&Resolved<f64>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, resolved)| resolved)
    }

    fn value(&self, key: &str) -> f64 {
        self.get(key)
            .map(|r| r.value)
            .or_else(|| schema::default_value(key))
            .unwrap_or_default()
    }

    /// Apply one layer on top of the current values.
    fn apply_layer(&mut self, layer: &MindmapConfig, source: &ValueSource) {
        for (key, resolved) in &mut self.entries {
            if let Some(value) = layer.get(key) {
                *resolved = Resolved::new(value, source.clone());
            }
        }
    }

    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            alpha_min: self.value(schema::ALPHA_MIN),
            alpha_decay: self.value(schema::ALPHA_DECAY),
            velocity_decay: self.value(schema::VELOCITY_DECAY),
            gravity_strength: self.value(schema::GRAVITY),
            repulsion_strength: self.value(schema::REPULSION),
            spring_strength: self.value(schema::SPRING_STRENGTH),
            spring_length: self.value(schema::SPRING_LENGTH),
            max_velocity: self.value(schema::MAX_VELOCITY),
            ..SimulationConfig::default()
        }
    }

    pub fn drag(&self) -> DragConfig {
        DragConfig {
            warm_energy: self.value(schema::WARM_ENERGY),
            rest_energy: self.value(schema::REST_ENERGY),
            margin: self.margin(),
        }
    }

    pub fn scale_extent(&self) -> (f64, f64) {
        (self.value(schema::MIN_SCALE), self.value(schema::MAX_SCALE))
    }

    pub fn margin(&self) -> ViewBoxMargin {
        ViewBoxMargin {
            horizontal: self.value(schema::HORIZONTAL_MARGIN),
            vertical: self.value(schema::VERTICAL_MARGIN),
        }
    }

    /// Validate the resolved values.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.scale_extent();
        if min <= 0.0 || min > max {
            return Err(Error::Config(format!(
                "zoom scale extent must satisfy 0 < min-scale <= max-scale, got [{}, {}]",
                min, max
            )));
        }

        let unit = [
            schema::WARM_ENERGY,
            schema::REST_ENERGY,
            schema::ALPHA_MIN,
            schema::VELOCITY_DECAY,
        ];
        for key in unit {
            let value = self.value(key);
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{} must be in [0, 1], got {}", key, value)));
            }
        }

        let decay = self.value(schema::ALPHA_DECAY);
        if decay <= 0.0 || decay > 1.0 {
            return Err(Error::Config(format!(
                "{} must be in (0, 1], got {}",
                schema::ALPHA_DECAY,
                decay
            )));
        }

        for key in [
            schema::HORIZONTAL_MARGIN,
            schema::VERTICAL_MARGIN,
            schema::MAX_VELOCITY,
            schema::SPRING_LENGTH,
        ] {
            if self.value(key) < 0.0 {
                return Err(Error::Config(format!("{} must not be negative", key)));
            }
        }

        Ok(())
    }
}

/// Path of the system-level config file.
pub fn system_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mindmap").join("config.kdl"))
}

/// Resolve layers given in increasing precedence, then validate.
pub fn resolve_layers(layers: &[(ValueSource, MindmapConfig)]) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();
    for (source, layer) in layers {
        resolved.apply_layer(layer, source);
    }
    resolved.validate()?;
    Ok(resolved)
}

/// Resolve configuration from the filesystem, environment and CLI overrides.
///
/// A missing system file is skipped; a missing `--config` or
/// `MINDMAP_CONFIG` file is an error.
pub fn resolve_config(explicit: Option<&Path>, overrides: &MindmapConfig) -> Result<ResolvedConfig> {
    let env_file = std::env::var_os(MINDMAP_CONFIG_ENV).map(PathBuf::from);
    resolve_files(
        system_config_path().as_deref(),
        env_file.as_deref(),
        explicit,
        overrides,
    )
}

/// Layer the given files and overrides without consulting the environment.
fn resolve_files(
    system: Option<&Path>,
    env_file: Option<&Path>,
    explicit: Option<&Path>,
    overrides: &MindmapConfig,
) -> Result<ResolvedConfig> {
    let mut layers = Vec::new();

    if let Some(path) = system.filter(|p| p.is_file()) {
        tracing::debug!(path = %path.display(), "loading system config");
        layers.push((ValueSource::System, MindmapConfig::load(path)?));
    }

    if let Some(path) = env_file {
        let config = load_required(path)?;
        layers.push((ValueSource::EnvFile(path.display().to_string()), config));
    }

    if let Some(path) = explicit {
        let config = load_required(path)?;
        layers.push((ValueSource::File(path.display().to_string()), config));
    }

    if !overrides.is_empty() {
        layers.push((ValueSource::CliFlag, overrides.clone()));
    }

    resolve_layers(&layers)
}

fn load_required(path: &Path) -> Result<MindmapConfig> {
    if !path.is_file() {
        return Err(Error::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    MindmapConfig::load(path)
}
