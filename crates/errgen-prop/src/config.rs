//! Propagator configuration.
//!
//! Every field has a default, so a job file may carry a partial (or empty)
//! `config` table.

use serde::{Deserialize, Serialize};

use crate::bch::MAX_BCH_ORDER;
use crate::cumulant::SUPPORTED_CUMULANT_ORDER;
use crate::error::{PropError, PropResult};

/// Rates below this magnitude are dropped after composition.
pub const DEFAULT_TRUNCATION_THRESHOLD: f64 = 1e-14;

/// Which pipeline [`ErrorPropagator`](crate::ErrorPropagator) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationMode {
    /// Propagate every layer to the end of the circuit and sum.
    Plain,
    /// Fold layers left to right with BCH combination.
    LayerwiseBch,
    /// Per-timestep layers, optionally with cumulant corrections.
    NonMarkovian,
}

/// Knobs for error-generator propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropagatorConfig {
    /// Number of BCH orders kept (1 = plain sum, 2 = first commutator).
    #[serde(default = "default_bch_order")]
    pub bch_order: usize,

    /// Combine layers pairwise with BCH instead of summing at the end.
    #[serde(default)]
    pub bch_layerwise: bool,

    /// Return per-timestep layers with cumulant corrections.
    #[serde(default)]
    pub nonmarkovian: bool,

    /// Drop composed terms with `|rate|` below this.
    #[serde(default = "default_truncation_threshold")]
    pub truncation_threshold: f64,

    /// Cumulant expansion order (only 2).
    #[serde(default = "default_cumulant_order")]
    pub cumulant_order: usize,
}

fn default_bch_order() -> usize {
    1
}

fn default_truncation_threshold() -> f64 {
    DEFAULT_TRUNCATION_THRESHOLD
}

fn default_cumulant_order() -> usize {
    SUPPORTED_CUMULANT_ORDER
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            bch_order: default_bch_order(),
            bch_layerwise: false,
            nonmarkovian: false,
            truncation_threshold: default_truncation_threshold(),
            cumulant_order: default_cumulant_order(),
        }
    }
}

impl PropagatorConfig {
    /// Default configuration (plain mode, first order).
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bch_order(mut self, bch_order: usize) -> Self {
        self.bch_order = bch_order;
        self
    }

    #[must_use]
    pub fn with_bch_layerwise(mut self, layerwise: bool) -> Self {
        self.bch_layerwise = layerwise;
        self
    }

    #[must_use]
    pub fn with_nonmarkovian(mut self, nonmarkovian: bool) -> Self {
        self.nonmarkovian = nonmarkovian;
        self
    }

    #[must_use]
    pub fn with_truncation_threshold(mut self, threshold: f64) -> Self {
        self.truncation_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_cumulant_order(mut self, order: usize) -> Self {
        self.cumulant_order = order;
        self
    }

    /// The pipeline selected by the flags. Non-Markovian wins over
    /// layerwise BCH.
    pub fn mode(&self) -> PropagationMode {
        if self.nonmarkovian {
            PropagationMode::NonMarkovian
        } else if self.bch_layerwise {
            PropagationMode::LayerwiseBch
        } else {
            PropagationMode::Plain
        }
    }

    /// Reject malformed values and unsupported orders.
    pub fn validate(&self) -> PropResult<()> {
        if !self.truncation_threshold.is_finite() || self.truncation_threshold < 0.0 {
            return Err(PropError::InvalidConfig(format!(
                "truncation_threshold must be finite and non-negative, got {}",
                self.truncation_threshold
            )));
        }
        if self.bch_order == 0 {
            return Err(PropError::InvalidConfig("bch_order must be at least 1".into()));
        }
        if self.bch_order > MAX_BCH_ORDER {
            return Err(PropError::not_implemented(format!(
                "BCH order {} (at most {MAX_BCH_ORDER} is supported)",
                self.bch_order
            )));
        }
        if self.mode() == PropagationMode::Plain && self.bch_order != 1 {
            return Err(PropError::not_implemented(format!(
                "BCH order {} without layerwise combination (set bch_layerwise)",
                self.bch_order
            )));
        }
        if self.cumulant_order != SUPPORTED_CUMULANT_ORDER {
            return Err(PropError::not_implemented(format!(
                "cumulant order {} (only {SUPPORTED_CUMULANT_ORDER} is supported)",
                self.cumulant_order
            )));
        }
        Ok(())
    }
}
