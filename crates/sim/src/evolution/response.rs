//! Rate responses: event rates as functions of lineage state and time.

use super::context::MotifModel;
use crate::errors::ConfigurationError;
use crate::tree::LineageState;
use std::sync::Arc;

/// Instantaneous rate of one event type for a lineage.
///
/// Every variant except `Scheduled` depends on the lineage state only, so the
/// engine can draw waiting times by exact inversion. `Scheduled` varies in
/// time and is handled by thinning against [`Response::rate_bound`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The same rate for every lineage.
    Constant { value: f64 },

    /// Logistic function of the phenotype,
    /// `yscale / (1 + exp(-xscale * (x - xshift))) + yshift`.
    ///
    /// Ranges from `yshift` (low phenotypes when `xscale > 0`) to
    /// `yshift + yscale`, with its midpoint at `x = xshift`.
    Sigmoid {
        xscale: f64,
        xshift: f64,
        yscale: f64,
        yshift: f64,
    },

    /// `intensity` times the summed context mutability of the lineage's
    /// sequence. Lineages without a sequence have rate zero.
    SequenceContext {
        model: Arc<MotifModel>,
        intensity: f64,
    },

    /// A time-homogeneous `base` response scaled by a piecewise-constant
    /// multiplier: `multipliers[k]` applies on the `k`-th interval cut by the
    /// sorted `breakpoints`.
    Scheduled {
        base: Box<Response>,
        breakpoints: Vec<f64>,
        multipliers: Vec<f64>,
    },
}

impl Response {
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    pub fn sigmoid(xscale: f64, xshift: f64, yscale: f64, yshift: f64) -> Self {
        Self::Sigmoid {
            xscale,
            xshift,
            yscale,
            yshift,
        }
    }

    pub fn sequence_context(model: Arc<MotifModel>, intensity: f64) -> Self {
        Self::SequenceContext { model, intensity }
    }

    pub fn scheduled(base: Response, breakpoints: Vec<f64>, multipliers: Vec<f64>) -> Self {
        Self::Scheduled {
            base: Box::new(base),
            breakpoints,
            multipliers,
        }
    }

    /// Rate for a lineage in `state` at time `t`.
    pub fn rate(&self, state: &LineageState, t: f64) -> f64 {
        match self {
            Self::Constant { value } => *value,
            Self::Sigmoid {
                xscale,
                xshift,
                yscale,
                yshift,
            } => yscale / (1.0 + (-xscale * (state.phenotype - xshift)).exp()) + yshift,
            Self::SequenceContext { model, intensity } => state
                .sequence
                .as_ref()
                .map_or(0.0, |seq| intensity * model.total_mutability(seq)),
            Self::Scheduled {
                base,
                breakpoints,
                multipliers,
            } => {
                let k = breakpoints.partition_point(|&b| b <= t);
                base.rate(state, t) * multipliers[k]
            }
        }
    }

    #[inline]
    pub fn is_time_homogeneous(&self) -> bool {
        !matches!(self, Self::Scheduled { .. })
    }

    /// An upper bound on `rate(state, s)` for `s` in `[t0, t1]`.
    ///
    /// Exact for time-homogeneous responses. For `Scheduled` it is the base
    /// rate times the largest multiplier on an interval overlapping the
    /// window.
    pub fn rate_bound(&self, state: &LineageState, t0: f64, t1: f64) -> f64 {
        match self {
            Self::Scheduled {
                base,
                breakpoints,
                multipliers,
            } => {
                let first = breakpoints.partition_point(|&b| b <= t0);
                let last = breakpoints.partition_point(|&b| b <= t1).max(first);
                let peak = multipliers[first..=last].iter().copied().fold(0.0, f64::max);
                base.rate(state, t0) * peak
            }
            _ => self.rate(state, t0),
        }
    }

    /// True when the response reads the lineage's sequence.
    pub fn requires_sequence(&self) -> bool {
        match self {
            Self::SequenceContext { .. } => true,
            Self::Scheduled { base, .. } => base.requires_sequence(),
            _ => false,
        }
    }

    /// Check that the response can never produce a negative or non-finite
    /// rate. `name` identifies the event in the error.
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigurationError> {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        match self {
            Self::Constant { value } if !non_negative(*value) => {
                Err(ConfigurationError::NegativeRate(name, *value))
            }
            Self::Constant { .. } => Ok(()),
            Self::Sigmoid {
                xscale,
                xshift,
                yscale,
                yshift,
            } => {
                if [xscale, xshift, yscale, yshift].iter().any(|v| !v.is_finite()) {
                    return Err(ConfigurationError::InvalidParameter(format!(
                        "sigmoid {name} response has a non-finite parameter"
                    )));
                }
                // the curve stays between yshift and yshift + yscale
                let lowest = yshift.min(yshift + yscale);
                if lowest < 0.0 {
                    return Err(ConfigurationError::NegativeRate(name, lowest));
                }
                Ok(())
            }
            Self::SequenceContext { intensity, .. } if !non_negative(*intensity) => {
                Err(ConfigurationError::NegativeRate(name, *intensity))
            }
            Self::SequenceContext { .. } => Ok(()),
            Self::Scheduled {
                base,
                breakpoints,
                multipliers,
            } => {
                if !base.is_time_homogeneous() {
                    return Err(ConfigurationError::InvalidSchedule(
                        "schedules cannot be nested".into(),
                    ));
                }
                if multipliers.len() != breakpoints.len() + 1 {
                    return Err(ConfigurationError::InvalidSchedule(format!(
                        "{} breakpoints need {} multipliers, found {}",
                        breakpoints.len(),
                        breakpoints.len() + 1,
                        multipliers.len()
                    )));
                }
                if breakpoints.iter().any(|b| !b.is_finite())
                    || breakpoints.windows(2).any(|w| w[0] >= w[1])
                {
                    return Err(ConfigurationError::InvalidSchedule(
                        "breakpoints must be finite and strictly increasing".into(),
                    ));
                }
                if let Some(&m) = multipliers.iter().find(|&&m| !non_negative(m)) {
                    return Err(ConfigurationError::NegativeRate(name, m));
                }
                base.validate(name)
            }
        }
    }
}
