//! Baker–Campbell–Hausdorff combination of adjacent error layers.
//!
//! Layers are lists of BCH orders: index 0 holds first-order rates, index 1
//! the commutator contributions. `combine(first, second)` approximates
//!
//!   log(exp(first) · exp(second)) ≈ first + second + ½[first, second]
//!
//! where `second` acts on the state before `first`.

use tracing::trace;

use crate::algebra::commutator;
use crate::error::{PropError, PropResult};
use crate::layer::ErrorGeneratorLayer;

/// Highest supported number of BCH orders.
pub const MAX_BCH_ORDER: usize = 2;

/// Combines temporally adjacent error layers to a fixed BCH order.
#[derive(Debug, Clone)]
pub struct BchCombiner {
    order: usize,
    truncation_threshold: f64,
}

impl BchCombiner {
    /// `bch_order = 1` keeps the plain sum, `bch_order = 2` adds the
    /// commutator term.
    pub fn new(bch_order: usize, truncation_threshold: f64) -> PropResult<Self> {
        if bch_order == 0 {
            return Err(PropError::InvalidConfig("bch_order must be at least 1".into()));
        }
        if bch_order > MAX_BCH_ORDER {
            return Err(PropError::not_implemented(format!(
                "BCH order {bch_order} (at most {MAX_BCH_ORDER} is supported)"
            )));
        }
        Ok(Self {
            order: bch_order,
            truncation_threshold,
        })
    }

    /// Number of orders produced.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Merge `first` (applied later) with `second` (applied earlier).
    ///
    /// Missing orders in either input count as empty; orders beyond
    /// [`order`](Self::order) are ignored.
    pub fn combine(
        &self,
        first: &[ErrorGeneratorLayer],
        second: &[ErrorGeneratorLayer],
    ) -> PropResult<Vec<ErrorGeneratorLayer>> {
        let empty = ErrorGeneratorLayer::new();

        let mut combined = Vec::with_capacity(self.order);

        let mut sum = order_or_empty(first, 0, &empty).clone();
        sum.merge(order_or_empty(second, 0, &empty));
        combined.push(sum);

        if self.order >= 2 {
            let mut working = ErrorGeneratorLayer::new();
            for (l1, r1) in order_or_empty(first, 0, &empty).iter() {
                for (l2, r2) in order_or_empty(second, 0, &empty).iter() {
                    let weight = 0.5 * r1 * r2;
                    if weight == 0.0 {
                        continue;
                    }
                    for (errgen, c) in commutator(l1.generator(), l2.generator())? {
                        working.add(errgen, weight * c);
                    }
                }
            }
            let mut second_order = working.truncated(self.truncation_threshold);
            trace!(
                commutator_terms = second_order.len(),
                "accumulated second-order BCH terms"
            );
            second_order.merge(order_or_empty(first, 1, &empty));
            second_order.merge(order_or_empty(second, 1, &empty));
            combined.push(second_order);
        }

        Ok(combined)
    }
}

fn order_or_empty<'a>(
    layers: &'a [ErrorGeneratorLayer],
    k: usize,
    empty: &'a ErrorGeneratorLayer,
) -> &'a ErrorGeneratorLayer {
    layers.get(k).unwrap_or(empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errorgen::ElementaryErrorgen;

    fn g(s: &str) -> ElementaryErrorgen {
        s.parse().unwrap()
    }

    fn layer(terms: &[(&str, f64)]) -> Vec<ErrorGeneratorLayer> {
        vec![terms.iter().map(|&(s, r)| (g(s), r)).collect()]
    }

    #[test]
    fn test_order_validation() {
        assert!(matches!(
            BchCombiner::new(0, 1e-14),
            Err(PropError::InvalidConfig(_))
        ));
        assert!(matches!(
            BchCombiner::new(3, 1e-14),
            Err(PropError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_first_order_is_union() {
        let bch = BchCombiner::new(1, 1e-14).unwrap();
        let a = layer(&[("H(X)", 0.1), ("S(Z)", 0.2)]);
        let b = layer(&[("H(X)", 0.05)]);
        let ab = bch.combine(&a, &b).unwrap();
        let ba = bch.combine(&b, &a).unwrap();
        assert_eq!(ab.len(), 1);
        assert!(ab[0].approx_eq(&ba[0], 1e-15));
        assert!((ab[0].rate(&g("H(X)")) - 0.15).abs() < 1e-15);
    }

    #[test]
    fn test_second_order_antisymmetry() {
        let bch = BchCombiner::new(2, 1e-14).unwrap();
        let a = layer(&[("H(X)", 0.1)]);
        let b = layer(&[("H(Y)", 0.05)]);
        let ab = bch.combine(&a, &b).unwrap();
        let ba = bch.combine(&b, &a).unwrap();
        assert!((ab[1].rate(&g("H(Z)")) - 0.005).abs() < 1e-15);
        assert!((ba[1].rate(&g("H(Z)")) + 0.005).abs() < 1e-15);
    }

    #[test]
    fn test_existing_second_order_folded_in() {
        let bch = BchCombiner::new(2, 1e-14).unwrap();
        let mut a = layer(&[("H(X)", 0.1)]);
        a.push([(g("S(Y)"), 1e-3)].into_iter().collect());
        let b = layer(&[("H(X)", 0.2)]);
        let out = bch.combine(&a, &b).unwrap();
        // [H_X, H_X] = 0, so only the carried term remains.
        assert_eq!(out[1].len(), 1);
        assert_eq!(out[1].rate(&g("S(Y)")), 1e-3);
    }
}
