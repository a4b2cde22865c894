//! Pushing error generators through Clifford tableaus.
//!
//! Conjugating a generator by a Clifford `U` maps each Pauli operand to
//! `U P U† = s · P'`. The rate picks up:
//!
//! - `H`: `s`
//! - `S`: nothing, since `s² = 1`
//! - `C`, `A`: `s₁ · s₂`, and `A` flips once more if `P₁' > P₂'`

use errgen_ir::CliffordTableau;

use crate::error::PropResult;
use crate::errorgen::{ElementaryErrorgen, ErrorGeneratorLabel};
use crate::layer::{ErrorGeneratorLayer, SignCorrectionMap};

/// A conjugated generator with its new rate and the sign it picked up.
#[derive(Debug, Clone)]
pub struct PropagatedErrorgen {
    /// The new label, with the input's provenance.
    pub label: ErrorGeneratorLabel,
    /// `rate · sign`.
    pub rate: f64,
    /// Sign picked up by the rate.
    pub sign: f64,
}

/// Conjugate a bare generator through `tableau`, returning the new generator
/// and the sign its rate picks up.
pub fn conjugate_errorgen(
    errgen: &ElementaryErrorgen,
    tableau: &CliffordTableau,
) -> PropResult<(ElementaryErrorgen, f64)> {
    Ok(match errgen {
        ElementaryErrorgen::Hamiltonian(p) => {
            let image = tableau.image(p)?;
            let sign = image.sign();
            (ElementaryErrorgen::Hamiltonian(image.pauli), sign)
        }
        ElementaryErrorgen::Stochastic(p) => {
            (ElementaryErrorgen::Stochastic(tableau.image(p)?.pauli), 1.0)
        }
        ElementaryErrorgen::Correlation(p, q) | ElementaryErrorgen::Active(p, q) => {
            let p_image = tableau.image(p)?;
            let q_image = tableau.image(q)?;
            let sign = p_image.sign() * q_image.sign();
            let (errgen_image, order_sign) =
                ElementaryErrorgen::ordered_pair(errgen.kind(), p_image.pauli, q_image.pauli);
            (errgen_image, sign * order_sign)
        }
    })
}

/// Conjugate one labelled generator with its rate.
pub fn propagate_errorgen(
    label: &ErrorGeneratorLabel,
    rate: f64,
    tableau: &CliffordTableau,
) -> PropResult<PropagatedErrorgen> {
    let (generator, sign) = conjugate_errorgen(label.generator(), tableau)?;
    Ok(PropagatedErrorgen {
        label: label.with_generator(generator),
        rate: rate * sign,
        sign,
    })
}

/// Conjugate a whole layer. The sign map is keyed by each term's initial
/// generator and holds the sign picked up in this step.
pub fn propagate_layer(
    layer: &ErrorGeneratorLayer,
    tableau: &CliffordTableau,
) -> PropResult<(ErrorGeneratorLayer, SignCorrectionMap)> {
    let mut propagated = ErrorGeneratorLayer::new();
    let mut signs = SignCorrectionMap::new();
    for (label, rate) in layer.iter() {
        let out = propagate_errorgen(label, rate, tableau)?;
        signs.insert(label.initial().clone(), out.sign);
        propagated.add(out.label, out.rate);
    }
    Ok((propagated, signs))
}
