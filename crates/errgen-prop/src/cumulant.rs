//! Second-order cumulant expansion for non-Markovian noise.
//!
//! For timestep `i` with propagated layers `L₀ … Lᵢ`, the effective layer is
//!
//!   Lᵢ + Σ_{j<i} Σ cov · (l₁ ∘ l₂) + ½ Σ_{j=i} cov · (l₁ ∘ l₂)
//!
//! with `l₁ ∈ Lᵢ`, `l₂ ∈ Lⱼ`, and `cov` looked up on the generators'
//! pre-propagation forms, weighted by the signs propagation attached to them.

use tracing::{debug, trace};

use crate::algebra::compose;
use crate::covariance::CovarianceFunction;
use crate::error::{PropError, PropResult};
use crate::errorgen::{ErrorGeneratorLabel, Provenance};
use crate::layer::{ErrorGeneratorLayer, SignCorrectionMap};

/// The only supported cumulant order.
pub const SUPPORTED_CUMULANT_ORDER: usize = 2;

/// Cumulant expansion over a covariance function.
pub struct CumulantExpansion<'a> {
    covariance: &'a dyn CovarianceFunction,
    truncation_threshold: f64,
}

impl<'a> CumulantExpansion<'a> {
    /// Fails with [`PropError::NotImplemented`] unless `order == 2`.
    pub fn new(
        covariance: &'a dyn CovarianceFunction,
        order: usize,
        truncation_threshold: f64,
    ) -> PropResult<Self> {
        if order != SUPPORTED_CUMULANT_ORDER {
            return Err(PropError::not_implemented(format!(
                "cumulant order {order} (only {SUPPORTED_CUMULANT_ORDER} is supported)"
            )));
        }
        Ok(Self {
            covariance,
            truncation_threshold,
        })
    }

    /// Covariance-weighted compositions `l₁ ∘ l₂` for `l₁ ∈ later`,
    /// `l₂ ∈ earlier`, accumulated into `into` with an extra `scale`.
    pub fn accumulate_pair(
        &self,
        later: (&ErrorGeneratorLayer, &SignCorrectionMap),
        earlier: (&ErrorGeneratorLayer, &SignCorrectionMap),
        scale: f64,
        into: &mut ErrorGeneratorLayer,
    ) -> PropResult<()> {
        let (later_layer, later_signs) = later;
        let (earlier_layer, earlier_signs) = earlier;
        for (l1, _) in later_layer.iter() {
            let p1 = provenance(l1)?;
            let s1 = sign(later_signs, p1, l1)?;
            for (l2, _) in earlier_layer.iter() {
                let p2 = provenance(l2)?;
                let cov = self.covariance.covariance(
                    &p1.initial,
                    &p1.gate,
                    p1.circuit_time,
                    &p2.initial,
                    &p2.gate,
                    p2.circuit_time,
                );
                if cov == 0.0 {
                    continue;
                }
                let s2 = sign(earlier_signs, p2, l2)?;
                let weight = scale * s1 * s2 * cov;
                for (errgen, c) in compose(l1.generator(), l2.generator())? {
                    into.add(errgen, weight * c);
                }
            }
        }
        Ok(())
    }

    /// The effective layer at timestep `i`.
    pub fn timestep(
        &self,
        layers: &[ErrorGeneratorLayer],
        signs: &[SignCorrectionMap],
        i: usize,
    ) -> PropResult<ErrorGeneratorLayer> {
        check_lengths(layers, signs)?;
        let current = layers.get(i).ok_or(PropError::LayerCountMismatch {
            expected: i + 1,
            got: layers.len(),
        })?;
        let mut correction = ErrorGeneratorLayer::new();
        for (j, earlier) in layers.iter().zip(signs).enumerate().take(i + 1) {
            let scale = if j == i { 0.5 } else { 1.0 };
            self.accumulate_pair((current, &signs[i]), earlier, scale, &mut correction)?;
        }
        let mut effective = correction.truncated(self.truncation_threshold);
        trace!(timestep = i, correction_terms = effective.len(), "cumulant correction");
        effective.merge(current);
        Ok(effective)
    }

    /// The effective layer for every timestep.
    pub fn expand(
        &self,
        layers: &[ErrorGeneratorLayer],
        signs: &[SignCorrectionMap],
    ) -> PropResult<Vec<ErrorGeneratorLayer>> {
        check_lengths(layers, signs)?;
        let expanded = (0..layers.len())
            .map(|i| self.timestep(layers, signs, i))
            .collect::<PropResult<Vec<_>>>()?;
        debug!(timesteps = expanded.len(), "cumulant expansion complete");
        Ok(expanded)
    }
}

fn check_lengths(layers: &[ErrorGeneratorLayer], signs: &[SignCorrectionMap]) -> PropResult<()> {
    if layers.len() != signs.len() {
        return Err(PropError::LayerCountMismatch {
            expected: layers.len(),
            got: signs.len(),
        });
    }
    Ok(())
}

fn provenance(label: &ErrorGeneratorLabel) -> PropResult<&Provenance> {
    label
        .provenance()
        .ok_or_else(|| PropError::MissingProvenance(label.to_string()))
}

fn sign(signs: &SignCorrectionMap, provenance: &Provenance, label: &ErrorGeneratorLabel) -> PropResult<f64> {
    signs
        .get(&provenance.initial)
        .ok_or_else(|| PropError::MissingSignCorrection(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errorgen::ElementaryErrorgen;
    use errgen_ir::GateInstance;

    fn g(s: &str) -> ElementaryErrorgen {
        s.parse().unwrap()
    }

    fn tracked(errgen: &str, time: usize, rate: f64) -> (ErrorGeneratorLayer, SignCorrectionMap) {
        let label = ErrorGeneratorLabel::inserted(g(errgen), GateInstance::new("Gi", vec![0]), time);
        let mut signs = SignCorrectionMap::new();
        signs.insert(g(errgen), 1.0);
        ([(label, rate)].into_iter().collect(), signs)
    }

    fn zero(_: &ElementaryErrorgen, _: &GateInstance, _: usize, _: &ElementaryErrorgen, _: &GateInstance, _: usize) -> f64 {
        0.0
    }

    fn unit(_: &ElementaryErrorgen, _: &GateInstance, _: usize, _: &ElementaryErrorgen, _: &GateInstance, _: usize) -> f64 {
        1.0
    }

    #[test]
    fn test_order_rejected() {
        assert!(matches!(
            CumulantExpansion::new(&zero, 3, 1e-14),
            Err(PropError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_zero_covariance_returns_means() {
        let (l0, s0) = tracked("H(X)", 0, 0.1);
        let (l1, s1) = tracked("S(Z)", 1, 0.0);
        let engine = CumulantExpansion::new(&zero, 2, 1e-14).unwrap();
        let out = engine.expand(&[l0.clone(), l1.clone()], &[s0, s1]).unwrap();
        assert_eq!(out[0], l0);
        assert_eq!(out[1], l1);
    }

    #[test]
    fn test_diagonal_term_is_halved() {
        // One H_X term with unit variance: ½ H_X ∘ H_X = ½ (2 S_X) = S_X.
        let (l0, s0) = tracked("H(X)", 0, 0.0);
        let engine = CumulantExpansion::new(&unit, 2, 1e-14).unwrap();
        let out = engine.timestep(&[l0], &[s0], 0).unwrap();
        assert_eq!(out.rate(&g("S(X)")), 1.0);
        assert_eq!(out.get(&g("H(X)")), Some(0.0));
    }

    #[test]
    fn test_cross_timestep_term_not_halved() {
        let (l0, s0) = tracked("H(X)", 0, 0.0);
        let (l1, s1) = tracked("H(X)", 1, 0.0);
        let engine = CumulantExpansion::new(&unit, 2, 1e-14).unwrap();
        let out = engine.timestep(&[l0, l1], &[s0, s1], 1).unwrap();
        // j = 0 contributes 2 S_X, j = 1 contributes S_X.
        assert_eq!(out.rate(&g("S(X)")), 3.0);
    }

    #[test]
    fn test_sign_corrections_applied() {
        let (l0, mut s0) = tracked("H(X)", 0, 0.0);
        let (l1, s1) = tracked("H(X)", 1, 0.0);
        s0.insert(g("H(X)"), -1.0);
        let engine = CumulantExpansion::new(&unit, 2, 1e-14).unwrap();
        let out = engine.timestep(&[l0, l1], &[s0, s1], 1).unwrap();
        // The j = 0 term flips sign: -2 S_X + S_X.
        assert_eq!(out.rate(&g("S(X)")), -1.0);
    }

    #[test]
    fn test_missing_provenance_and_sign() {
        let engine = CumulantExpansion::new(&unit, 2, 1e-14).unwrap();
        let bare: ErrorGeneratorLayer = [(g("H(X)"), 0.1)].into_iter().collect();
        assert!(matches!(
            engine.timestep(&[bare], &[SignCorrectionMap::new()], 0),
            Err(PropError::MissingProvenance(_))
        ));

        let (l0, _) = tracked("H(X)", 0, 0.1);
        assert!(matches!(
            engine.timestep(&[l0], &[SignCorrectionMap::new()], 0),
            Err(PropError::MissingSignCorrection(_))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let (l0, _) = tracked("H(X)", 0, 0.1);
        let engine = CumulantExpansion::new(&zero, 2, 1e-14).unwrap();
        assert!(matches!(
            engine.expand(&[l0], &[]),
            Err(PropError::LayerCountMismatch { .. })
        ));
    }
}
