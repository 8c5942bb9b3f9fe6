use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shadow_mapping::{ConfidenceMode, MatchConfig};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_shadow_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reference: ReferenceSection,
    pub matching: MatchingSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSection {
    /// Reference CSV with `Description` and `Subtask` columns
    pub path: PathBuf,
    /// Written into non-key columns of appended rows
    pub filler: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSection {
    pub threshold: f64,
    pub confidence: ConfidenceMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub employee: String,
    pub pretty: bool,
}

impl Default for ReferenceSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/Shadow_Calendar_Task_Mapping.csv"),
            filler: "-".to_string(),
        }
    }
}

impl Default for MatchingSection {
    fn default() -> Self {
        let m = MatchConfig::default();
        Self {
            threshold: m.threshold,
            confidence: m.confidence,
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            employee: "UNKNOWN".to_string(),
            pretty: true,
        }
    }
}

impl MatchingSection {
    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.threshold.clamp(0.0, 1.0),
            confidence: self.confidence,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_shadow_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg = parse_config(
            r#"
[matching]
confidence = "graded"

[export]
employee = "Markus Lange"
"#,
        )
        .unwrap();
        assert_eq!(cfg.matching.confidence, ConfidenceMode::Graded);
        assert_eq!(cfg.matching.threshold, 0.6);
        assert_eq!(cfg.export.employee, "Markus Lange");
        assert!(cfg.export.pretty);
        assert_eq!(cfg.reference.filler, "-");
    }

    #[test]
    fn test_default_roundtrips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(parse_config(&s).unwrap(), cfg);
    }

    #[test]
    fn test_threshold_is_clamped() {
        let cfg = parse_config("[matching]\nthreshold = 4.0\n").unwrap();
        assert_eq!(cfg.matching.to_match_config().threshold, 1.0);
    }

    #[test]
    fn test_bad_confidence_mode_is_error() {
        assert!(parse_config("[matching]\nconfidence = \"fuzzy\"\n").is_err());
    }
}
