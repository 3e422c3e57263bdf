//! Simulation parameters.
//!
//! This module provides the parameter structures that control how a tree is
//! grown (horizon and capacity) and how generated trees are accepted.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the population is held at or below its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityMethod {
    /// Births are suppressed while the population is at capacity.
    #[default]
    Birth,
    /// Births always happen; random lineages are then killed until the
    /// population is back at capacity.
    Hard,
}

impl CapacityMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for CapacityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapacityMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "birth" => Ok(Self::Birth),
            "hard" => Ok(Self::Hard),
            _ => Err(ConfigurationError::UnknownCapacityMethod(s.to_string())),
        }
    }
}

/// Parameters of a single tree growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolveConfig {
    /// Time at which growth stops.
    pub horizon: f64,
    /// Maximum number of simultaneously active lineages; `None` is unbounded.
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub capacity_method: CapacityMethod,
    /// Fewer lineages than this at the horizon counts as extinction.
    #[serde(default = "default_min_survivors")]
    pub min_survivors: usize,
}

fn default_min_survivors() -> usize {
    1
}

impl EvolveConfig {
    /// Unbounded growth to `horizon` requiring one survivor.
    pub fn new(horizon: f64) -> Self {
        Self {
            horizon,
            capacity: None,
            capacity_method: CapacityMethod::default(),
            min_survivors: default_min_survivors(),
        }
    }

    pub fn with_capacity(mut self, capacity: usize, method: CapacityMethod) -> Self {
        self.capacity = Some(capacity);
        self.capacity_method = method;
        self
    }

    pub fn with_min_survivors(mut self, min_survivors: usize) -> Self {
        self.min_survivors = min_survivors;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(ConfigurationError::InvalidHorizon(self.horizon));
        }
        if self.capacity == Some(0) {
            return Err(ConfigurationError::ZeroCapacity);
        }
        Ok(())
    }
}

/// Acceptance rules of the caller-level retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Probability with which each survivor is sampled.
    pub sampling_probability: f64,
    /// Trees with fewer sampled leaves are rejected and regrown.
    #[serde(default = "default_min_sampled")]
    pub min_sampled: usize,
    /// Attempts per tree before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_min_sampled() -> usize {
    1
}

fn default_max_attempts() -> usize {
    10_000
}

impl RetryPolicy {
    pub fn new(sampling_probability: f64) -> Self {
        Self {
            sampling_probability,
            min_sampled: default_min_sampled(),
            max_attempts: default_max_attempts(),
        }
    }

    pub fn with_min_sampled(mut self, min_sampled: usize) -> Self {
        self.min_sampled = min_sampled;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.sampling_probability) {
            return Err(ConfigurationError::InvalidProbability(
                "sampling",
                self.sampling_probability,
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_method_parse() {
        assert_eq!("birth".parse::<CapacityMethod>(), Ok(CapacityMethod::Birth));
        assert_eq!("HARD".parse::<CapacityMethod>(), Ok(CapacityMethod::Hard));
        assert_eq!(
            "soft".parse::<CapacityMethod>(),
            Err(ConfigurationError::UnknownCapacityMethod("soft".into()))
        );
        assert_eq!(CapacityMethod::Hard.to_string(), "hard");
    }

    #[test]
    fn test_evolve_config_validate() {
        assert!(EvolveConfig::new(15.0).validate().is_ok());
        assert_eq!(
            EvolveConfig::new(0.0).validate(),
            Err(ConfigurationError::InvalidHorizon(0.0))
        );
        assert!(EvolveConfig::new(f64::INFINITY).validate().is_err());
        assert_eq!(
            EvolveConfig::new(1.0)
                .with_capacity(0, CapacityMethod::Hard)
                .validate(),
            Err(ConfigurationError::ZeroCapacity)
        );
    }

    #[test]
    fn test_evolve_config_serde_defaults() {
        let config: EvolveConfig = serde_json::from_str(r#"{"horizon": 5.0}"#).unwrap();
        assert_eq!(config, EvolveConfig::new(5.0));

        let config: EvolveConfig = serde_json::from_str(
            r#"{"horizon": 5.0, "capacity": 100, "capacity_method": "hard", "min_survivors": 0}"#,
        )
        .unwrap();
        assert_eq!(config.capacity, Some(100));
        assert_eq!(config.capacity_method, CapacityMethod::Hard);
        assert_eq!(config.min_survivors, 0);
    }

    #[test]
    fn test_retry_policy_validate() {
        assert!(RetryPolicy::new(0.1).validate().is_ok());
        assert!(RetryPolicy::new(1.1).validate().is_err());
        assert!(RetryPolicy::new(0.1).with_max_attempts(0).validate().is_err());
    }
}
