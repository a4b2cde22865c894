//! Error-generator layers and sign-correction maps.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;

use crate::errorgen::{ElementaryErrorgen, ErrorGeneratorLabel};

/// A sparse map from error-generator label to a signed real rate.
///
/// Adding a label that is already present sums the rates; zero-rate terms
/// are kept until [`truncated`](Self::truncated) drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<LayerEntry>", from = "Vec<LayerEntry>")]
pub struct ErrorGeneratorLayer {
    rates: FxHashMap<ErrorGeneratorLabel, f64>,
}

/// Serialised form of one layer term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEntry {
    /// The generator.
    pub generator: ElementaryErrorgen,
    /// Its rate.
    pub rate: f64,
}

impl ErrorGeneratorLayer {
    /// An empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of terms (including zero-rate ones).
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// True if the layer has no terms.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Add `rate` to `label`, summing on collision. The first inserted
    /// label keeps its provenance.
    pub fn add(&mut self, label: impl Into<ErrorGeneratorLabel>, rate: f64) {
        match self.rates.entry(label.into()) {
            Entry::Occupied(mut slot) => *slot.get_mut() += rate,
            Entry::Vacant(slot) => {
                slot.insert(rate);
            }
        }
    }

    /// Rate of a generator, if present.
    pub fn get(&self, generator: &ElementaryErrorgen) -> Option<f64> {
        self.rates.get(generator).copied()
    }

    /// Rate of a generator, zero if absent.
    pub fn rate(&self, generator: &ElementaryErrorgen) -> f64 {
        self.get(generator).unwrap_or(0.0)
    }

    /// True if the generator is present.
    pub fn contains(&self, generator: &ElementaryErrorgen) -> bool {
        self.rates.contains_key(generator)
    }

    /// Iterate over `(label, rate)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&ErrorGeneratorLabel, f64)> + '_ {
        self.rates.iter().map(|(label, &rate)| (label, rate))
    }

    /// Terms sorted by generator.
    pub fn sorted(&self) -> Vec<(&ErrorGeneratorLabel, f64)> {
        let mut terms: Vec<_> = self.iter().collect();
        terms.sort_by(|a, b| a.0.generator().cmp(b.0.generator()));
        terms
    }

    /// Add every term of `other` into `self`.
    pub fn merge(&mut self, other: &ErrorGeneratorLayer) {
        for (label, rate) in other.iter() {
            self.add(label.clone(), rate);
        }
    }

    /// A copy with every rate multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            rates: self
                .rates
                .iter()
                .map(|(label, &rate)| (label.clone(), rate * factor))
                .collect(),
        }
    }

    /// A copy without the terms whose `|rate| < threshold`.
    #[must_use]
    pub fn truncated(&self, threshold: f64) -> Self {
        Self {
            rates: self
                .rates
                .iter()
                .filter(|(_, rate)| rate.abs() >= threshold)
                .map(|(label, &rate)| (label.clone(), rate))
                .collect(),
        }
    }

    /// True if both layers hold the same generators with rates within `tol`.
    /// Generators missing from one side count as rate zero.
    pub fn approx_eq(&self, other: &ErrorGeneratorLayer, tol: f64) -> bool {
        self.iter()
            .all(|(label, rate)| (rate - other.rate(label.generator())).abs() <= tol)
            && other
                .iter()
                .all(|(label, rate)| (rate - self.rate(label.generator())).abs() <= tol)
    }
}

impl<L: Into<ErrorGeneratorLabel>> FromIterator<(L, f64)> for ErrorGeneratorLayer {
    fn from_iter<T: IntoIterator<Item = (L, f64)>>(iter: T) -> Self {
        let mut layer = Self::new();
        layer.extend(iter);
        layer
    }
}

impl<L: Into<ErrorGeneratorLabel>> Extend<(L, f64)> for ErrorGeneratorLayer {
    fn extend<T: IntoIterator<Item = (L, f64)>>(&mut self, iter: T) {
        for (label, rate) in iter {
            self.add(label, rate);
        }
    }
}

impl From<ErrorGeneratorLayer> for Vec<LayerEntry> {
    fn from(layer: ErrorGeneratorLayer) -> Self {
        layer
            .sorted()
            .into_iter()
            .map(|(label, rate)| LayerEntry {
                generator: label.generator().clone(),
                rate,
            })
            .collect()
    }
}

impl From<Vec<LayerEntry>> for ErrorGeneratorLayer {
    fn from(entries: Vec<LayerEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.generator, entry.rate))
            .collect()
    }
}

/// Sum a list of BCH orders into one layer.
pub fn sum_orders(orders: &[ErrorGeneratorLayer]) -> ErrorGeneratorLayer {
    let mut total = ErrorGeneratorLayer::new();
    for order in orders {
        total.merge(order);
    }
    total
}

/// Sign picked up by each generator during propagation, keyed by the
/// generator's pre-propagation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignCorrectionMap {
    signs: FxHashMap<ElementaryErrorgen, f64>,
}

impl SignCorrectionMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sign for an initial generator.
    pub fn insert(&mut self, initial: ElementaryErrorgen, sign: f64) {
        self.signs.insert(initial, sign);
    }

    /// Sign recorded for an initial generator.
    pub fn get(&self, initial: &ElementaryErrorgen) -> Option<f64> {
        self.signs.get(initial).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.signs.len()
    }

    /// True if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }
}
