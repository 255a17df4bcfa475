use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for the estimator CLI. Every field has a default, so a config
/// file only needs the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Share of the total taken upfront when booking.
    pub deposit_rate: f64,
    /// Relative spread of the quoted cost range.
    pub cost_variance: f64,
    /// Relative spread of the quoted timeline range.
    pub timeline_variance: f64,
    pub currency_symbol: String,
    pub quotes_dir: String,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            deposit_rate: 0.3,
            cost_variance: 0.2,
            timeline_variance: 0.15,
            currency_symbol: "$".to_string(),
            quotes_dir: "quotes".to_string(),
        }
    }
}

impl EstimatorConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: EstimatorConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        for (name, value) in [
            ("deposit_rate", self.deposit_rate),
            ("cost_variance", self.cost_variance),
            ("timeline_variance", self.timeline_variance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} must be between 0 and 1, got {}", name, value);
            }
        }
        Ok(())
    }
}
