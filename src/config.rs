//! Calculator configuration
//!
//! Defaults reproduce the standard five-year projection. A JSON file can
//! override any subset of fields, and environment variables override both:
//!   ROI_HORIZON_YEARS, ROI_ANNUAL_CMC_INR, ROI_CMC_START_YEAR, ROI_IRR_METHOD

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};
use crate::projection::{
    IrrMethod, ProjectionConfig, DEFAULT_ANNUAL_CMC_INR, DEFAULT_CMC_START_YEAR,
    DEFAULT_HORIZON_YEARS,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,

    #[serde(default = "default_annual_cmc_inr")]
    pub annual_cmc_inr: f64,

    #[serde(default = "default_cmc_start_year")]
    pub cmc_start_year: u32,

    #[serde(default)]
    pub irr_method: IrrMethod,
}

fn default_horizon_years() -> u32 {
    DEFAULT_HORIZON_YEARS
}

fn default_annual_cmc_inr() -> f64 {
    DEFAULT_ANNUAL_CMC_INR
}

fn default_cmc_start_year() -> u32 {
    DEFAULT_CMC_START_YEAR
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            horizon_years: DEFAULT_HORIZON_YEARS,
            annual_cmc_inr: DEFAULT_ANNUAL_CMC_INR,
            cmc_start_year: DEFAULT_CMC_START_YEAR,
            irr_method: IrrMethod::NewtonRaphson,
        }
    }
}

impl FromStr for IrrMethod {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newton" | "newton_raphson" => Ok(IrrMethod::NewtonRaphson),
            "guarded" => Ok(IrrMethod::Guarded),
            other => Err(RoiError::Config {
                key: "irr_method".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl CalculatorConfig {
    /// Defaults, then the optional JSON file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_json_path(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        info!("Loaded calculator config from {}", path.display());
        Ok(config)
    }

    /// Override fields from ROI_* environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| env::var(key).ok())
    }

    fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(years) = parse_var(&lookup, "ROI_HORIZON_YEARS")? {
            self.horizon_years = years;
        }
        if let Some(cmc) = parse_var(&lookup, "ROI_ANNUAL_CMC_INR")? {
            self.annual_cmc_inr = cmc;
        }
        if let Some(start) = parse_var(&lookup, "ROI_CMC_START_YEAR")? {
            self.cmc_start_year = start;
        }
        if let Some(method) = parse_var(&lookup, "ROI_IRR_METHOD")? {
            self.irr_method = method;
        }
        Ok(())
    }

    pub fn projection_config(&self) -> ProjectionConfig {
        ProjectionConfig {
            horizon_years: self.horizon_years,
            annual_cmc_inr: self.annual_cmc_inr,
            cmc_start_year: self.cmc_start_year,
            irr_method: self.irr_method,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| RoiError::Config {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_matches_projection_default() {
        assert_eq!(
            CalculatorConfig::default().projection_config(),
            ProjectionConfig::default()
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "annual_cmc_inr": 5000000.0, "irr_method": "guarded" }"#;
        let config: CalculatorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.annual_cmc_inr, 5_000_000.0);
        assert_eq!(config.irr_method, IrrMethod::Guarded);
        assert_eq!(config.horizon_years, 5);
        assert_eq!(config.cmc_start_year, 2);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            [("ROI_HORIZON_YEARS", "7"), ("ROI_IRR_METHOD", "Guarded")].into_iter().collect();
        let mut config = CalculatorConfig::default();
        config
            .apply_vars(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.horizon_years, 7);
        assert_eq!(config.irr_method, IrrMethod::Guarded);
        assert_eq!(config.annual_cmc_inr, DEFAULT_ANNUAL_CMC_INR);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = CalculatorConfig::default();
        let err = config
            .apply_vars(|key| (key == "ROI_CMC_START_YEAR").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, RoiError::Config { .. }));
    }
}
