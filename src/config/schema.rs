//! KDL schema for config.kdl.
//!
//! Settings are grouped in one block per concern. Every value is numeric:
//!
//! ```kdl
//! simulation {
//!     alpha-decay 0.0228
//!     repulsion 2500.0
//! }
//! drag {
//!     warm-energy 0.2
//! }
//! zoom {
//!     min-scale 0.3
//!     max-scale 5.0
//! }
//! ```
//!
//! Unknown blocks or keys are rejected so typos surface immediately.

use crate::gui::{DEFAULT_SCALE_EXTENT, DragConfig, SimulationConfig, ViewBoxMargin};
use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use std::collections::BTreeMap;
use std::path::Path;

pub const ALPHA_DECAY: &str = "simulation.alpha-decay";
pub const ALPHA_MIN: &str = "simulation.alpha-min";
pub const VELOCITY_DECAY: &str = "simulation.velocity-decay";
pub const GRAVITY: &str = "simulation.gravity";
pub const REPULSION: &str = "simulation.repulsion";
pub const SPRING_STRENGTH: &str = "simulation.spring-strength";
pub const SPRING_LENGTH: &str = "simulation.spring-length";
pub const MAX_VELOCITY: &str = "simulation.max-velocity";
pub const WARM_ENERGY: &str = "drag.warm-energy";
pub const REST_ENERGY: &str = "drag.rest-energy";
pub const MIN_SCALE: &str = "zoom.min-scale";
pub const MAX_SCALE: &str = "zoom.max-scale";
pub const HORIZONTAL_MARGIN: &str = "viewbox.horizontal-margin";
pub const VERTICAL_MARGIN: &str = "viewbox.vertical-margin";

/// Every recognised key, in display order.
pub const KEYS: &[&str] = &[
    ALPHA_DECAY,
    ALPHA_MIN,
    VELOCITY_DECAY,
    GRAVITY,
    REPULSION,
    SPRING_STRENGTH,
    SPRING_LENGTH,
    MAX_VELOCITY,
    WARM_ENERGY,
    REST_ENERGY,
    MIN_SCALE,
    MAX_SCALE,
    HORIZONTAL_MARGIN,
    VERTICAL_MARGIN,
];

/// Built-in value for a key.
pub fn default_value(key: &str) -> Option<f64> {
    let sim = SimulationConfig::default();
    let drag = DragConfig::default();
    let margin = ViewBoxMargin::default();
    let value = match key {
        ALPHA_DECAY => sim.alpha_decay,
        ALPHA_MIN => sim.alpha_min,
        VELOCITY_DECAY => sim.velocity_decay,
        GRAVITY => sim.gravity_strength,
        REPULSION => sim.repulsion_strength,
        SPRING_STRENGTH => sim.spring_strength,
        SPRING_LENGTH => sim.spring_length,
        MAX_VELOCITY => sim.max_velocity,
        WARM_ENERGY => drag.warm_energy,
        REST_ENERGY => drag.rest_energy,
        MIN_SCALE => DEFAULT_SCALE_EXTENT.0,
        MAX_SCALE => DEFAULT_SCALE_EXTENT.1,
        HORIZONTAL_MARGIN => margin.horizontal,
        VERTICAL_MARGIN => margin.vertical,
        _ => return None,
    };
    Some(value)
}

/// Settings read from one config.kdl file (or one set of CLI overrides).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MindmapConfig {
    values: BTreeMap<String, f64>,
}

impl MindmapConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Set a value for a recognised key.
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        if !KEYS.contains(&key) {
            return Err(Error::Config(format!("unknown setting '{}'", key)));
        }
        if !value.is_finite() {
            return Err(Error::Config(format!("{} must be a finite number", key)));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a `key=value` assignment, as given to `--set`.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            Error::Config(format!("expected key=value, got '{}'", assignment))
        })?;
        let value: f64 = value.trim().parse().map_err(|_| {
            Error::Config(format!("{} expects a number, got '{}'", key, value.trim()))
        })?;
        self.set(key.trim(), value)
    }

    /// Parse config from a KDL document.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self> {
        let mut config = Self::new();

        for section in doc.nodes() {
            let section_name = section.name().value();
            let Some(children) = section.children() else {
                return Err(Error::Config(format!(
                    "'{}' must be a block of settings",
                    section_name
                )));
            };

            for setting in children.nodes() {
                let key = format!("{}.{}", section_name, setting.name().value());
                let value = setting
                    .entries()
                    .first()
                    .and_then(|entry| number(entry.value()))
                    .ok_or_else(|| Error::Config(format!("{} expects a number", key)))?;
                config.set(&key, value)?;
            }
        }

        Ok(config)
    }

    /// Parse config from KDL text.
    pub fn parse(text: &str) -> Result<Self> {
        let doc: KdlDocument = text
            .parse()
            .map_err(|e: kdl::KdlError| Error::Config(e.to_string()))?;
        Self::from_kdl(&doc)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();
        let mut sections: BTreeMap<&str, KdlDocument> = BTreeMap::new();

        for (key, value) in &self.values {
            let Some((section, name)) = key.split_once('.') else {
                continue;
            };
            let mut node = KdlNode::new(name);
            node.push(KdlEntry::new(KdlValue::Float(*value)));
            sections.entry(section).or_default().nodes_mut().push(node);
        }

        for (section, children) in sections {
            let mut node = KdlNode::new(section);
            node.set_children(children);
            doc.nodes_mut().push(node);
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self`.
    pub fn merge(&mut self, other: &MindmapConfig) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), *value);
        }
    }
}

fn number(value: &KdlValue) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_a_default() {
        for key in KEYS {
            assert!(default_value(key).is_some(), "missing default for {}", key);
        }
        assert!(default_value("zoom.nope").is_none());
    }

    #[test]
    fn test_defaults_match_components() {
        assert_eq!(default_value(MIN_SCALE), Some(0.3));
        assert_eq!(default_value(MAX_SCALE), Some(5.0));
        assert_eq!(default_value(WARM_ENERGY), Some(0.2));
        assert_eq!(default_value(HORIZONTAL_MARGIN), Some(200.0));
    }

    #[test]
    fn test_config_from_kdl_empty() {
        let config = MindmapConfig::parse("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_config_from_kdl_full() {
        let kdl = r#"
simulation {
    repulsion 1800
    alpha-decay 0.05
}
zoom {
    max-scale 8.0
}
"#;
        let config = MindmapConfig::parse(kdl).unwrap();
        assert_eq!(config.get(REPULSION), Some(1800.0));
        assert_eq!(config.get(ALPHA_DECAY), Some(0.05));
        assert_eq!(config.get(MAX_SCALE), Some(8.0));
        assert_eq!(config.get(MIN_SCALE), None);
    }

    #[test]
    fn test_config_rejects_unknown_key() {
        let err = MindmapConfig::parse("zoom { max-zoom 3.0 }").unwrap_err();
        assert!(err.to_string().contains("zoom.max-zoom"));
    }

    #[test]
    fn test_config_rejects_non_numeric_value() {
        let err = MindmapConfig::parse("drag { warm-energy \"hot\" }").unwrap_err();
        assert!(err.to_string().contains("drag.warm-energy"));
    }

    #[test]
    fn test_config_rejects_flat_node() {
        assert!(MindmapConfig::parse("zoom 3.0").is_err());
    }

    #[test]
    fn test_config_invalid_syntax() {
        assert!(matches!(
            MindmapConfig::parse("zoom {"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_to_kdl_roundtrip() {
        let mut config = MindmapConfig::new();
        config.set(WARM_ENERGY, 0.4).unwrap();
        config.set(VERTICAL_MARGIN, 50.0).unwrap();
        let doc = config.to_kdl();
        let parsed = MindmapConfig::from_kdl(&doc).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_set_assignment() {
        let mut config = MindmapConfig::new();
        config.set_assignment("zoom.min-scale = 0.5").unwrap();
        assert_eq!(config.get(MIN_SCALE), Some(0.5));
        assert!(config.set_assignment("zoom.min-scale").is_err());
        assert!(config.set_assignment("zoom.min-scale=abc").is_err());
        assert!(config.set_assignment("zoom.scale=1").is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = MindmapConfig::new();
        base.set(REPULSION, 1.0).unwrap();
        base.set(GRAVITY, 2.0).unwrap();
        let mut other = MindmapConfig::new();
        other.set(GRAVITY, 3.0).unwrap();
        base.merge(&other);
        assert_eq!(base.get(REPULSION), Some(1.0));
        assert_eq!(base.get(GRAVITY), Some(3.0));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.kdl");
        std::fs::write(&path, "zoom { bogus 1 }").unwrap();
        let err = MindmapConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("config.kdl"));
    }
}
