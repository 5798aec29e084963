//! The canonical product on basis elements and the operators derived from it.
//!
//! Multiplication follows the algebra's simplification rules:
//!
//! 1. `αp · αμ = αμ · αp = αμ` — the point element is the identity.
//! 2. Repeated generator indices contract: popping a duplicate past the
//!    indices between its two occurrences flips the sign once per pop, and
//!    the metric contributes the square of the generator.
//! 3. Whatever indices remain are permuted into the configuration's
//!    canonical label order, flipping the sign once per pop.
//!
//! The pop-count for an arbitrary permutation is found by looking at the
//! first element alone: if its final position is even, an odd number of pops
//! is needed. Dropping it and densely re-ranking the rest reduces the
//! problem to a smaller one of the same shape.
//!
//! Every product over the 16-element basis is precomputed into the
//! configuration's Cayley table at construction time; the public operators
//! here are table lookups plus sign bookkeeping.

use std::collections::BTreeSet;

use crate::alpha::{Alpha, Sign};
use crate::config::{ArConfig, Metric};
use crate::error::AlgebraError;
use crate::multivector::MultiVector;
use crate::term::Term;
use crate::xi::XiValue;

/// Compute the canonical product of two basis elements.
///
/// Total over all pairs of Alphas whose indices are basis labels of `cfg`;
/// group labels (`i`, `jk`, ...) do not multiply and produce an error.
pub fn find_prod(i: &Alpha, j: &Alpha, cfg: &ArConfig) -> Result<Alpha, AlgebraError> {
    let (index, sign) = cfg.cayley_lookup(i.index(), j.index())?;
    Alpha::with_sign(index, sign * i.sign() * j.sign(), cfg)
}

/// The inverse of a basis element: the element itself, signed so that
/// `a · inverse(a) = +αp`.
pub fn inverse(a: &Alpha, cfg: &ArConfig) -> Result<Alpha, AlgebraError> {
    let square = find_prod(a, a, cfg)?;
    Ok(a.signed(square.sign() * a.sign()))
}

/// Divide `a` by `b`: `a · b⁻¹`.
pub fn div_by(a: &Alpha, b: &Alpha, cfg: &ArConfig) -> Result<Alpha, AlgebraError> {
    let b_inv = inverse(b, cfg)?;
    find_prod(a, &b_inv, cfg)
}

/// Divide `a` into `b`: `a⁻¹ · b`.
pub fn div_into(a: &Alpha, b: &Alpha, cfg: &ArConfig) -> Result<Alpha, AlgebraError> {
    let a_inv = inverse(a, cfg)?;
    find_prod(&a_inv, b, cfg)
}

/// The group commutator `a · b · a⁻¹ · b⁻¹`.
///
/// Always evaluates to `±αp`: the basis elements form a group that is
/// abelian up to sign.
pub fn commutator(a: &Alpha, b: &Alpha, cfg: &ArConfig) -> Result<Alpha, AlgebraError> {
    let mut product = find_prod(a, b, cfg)?;
    product = find_prod(&product, &inverse(a, cfg)?, cfg)?;
    find_prod(&product, &inverse(b, cfg)?, cfg)
}

/// Hermitian conjugate of a single basis element: negated iff it squares to
/// `-αp`.
pub fn dagger_alpha(a: &Alpha, cfg: &ArConfig) -> Result<Alpha, AlgebraError> {
    if find_prod(a, a, cfg)?.sign().is_neg() {
        Ok(-a)
    } else {
        Ok(a.clone())
    }
}

/// Grade projection for a bare basis element.
pub fn project_alpha(a: &Alpha, grade: usize) -> Option<Alpha> {
    if a.grade() == grade {
        Some(a.clone())
    } else {
        None
    }
}

/// Grade projection for a term.
pub fn project_term(t: &Term, grade: usize) -> Option<Term> {
    if t.alpha().grade() == grade {
        Some(t.clone())
    } else {
        None
    }
}

/// Hermitian conjugate of a term: negated iff its alpha squares to `-αp`.
pub fn dagger_term(t: &Term, cfg: &ArConfig) -> Result<Term, AlgebraError> {
    if find_prod(t.alpha(), t.alpha(), cfg)?.sign().is_neg() {
        Ok(-t)
    } else {
        Ok(t.clone())
    }
}

/// Full product of two terms: alphas multiply through the Cayley table and
/// the values combine into a product value.
pub fn full(a: &Term, b: &Term, cfg: &ArConfig) -> Result<Term, AlgebraError> {
    let alpha = find_prod(a.alpha(), b.alpha(), cfg)?;
    let xi = XiValue::product_of(a.xi(), b.xi(), cfg);
    Ok(Term::new(alpha, xi))
}

/// Full product of a bare basis element and a term: the value rides along.
pub fn full_alpha_term(a: &Alpha, b: &Term, cfg: &ArConfig) -> Result<Term, AlgebraError> {
    let alpha = find_prod(a, b.alpha(), cfg)?;
    Ok(Term::new(alpha, b.xi().clone()))
}

/// Full product of a term and a bare basis element.
pub fn full_term_alpha(a: &Term, b: &Alpha, cfg: &ArConfig) -> Result<Term, AlgebraError> {
    let alpha = find_prod(a.alpha(), b, cfg)?;
    Ok(Term::new(alpha, a.xi().clone()))
}

/// Left-multiply every term of a multivector by a basis element.
pub fn full_alpha_mvec(a: &Alpha, m: &MultiVector) -> Result<MultiVector, AlgebraError> {
    let cfg = m.config_arc();
    let terms: Vec<Term> = m
        .iter()
        .map(|t| full_alpha_term(a, &t, &cfg))
        .collect::<Result<_, _>>()?;
    let mut result = MultiVector::from_terms(terms, cfg)?;
    result.carry_labels(m);
    Ok(result)
}

/// Right-multiply every term of a multivector by a basis element.
pub fn full_mvec_alpha(m: &MultiVector, a: &Alpha) -> Result<MultiVector, AlgebraError> {
    let cfg = m.config_arc();
    let terms: Vec<Term> = m
        .iter()
        .map(|t| full_term_alpha(&t, a, &cfg))
        .collect::<Result<_, _>>()?;
    let mut result = MultiVector::from_terms(terms, cfg)?;
    result.carry_labels(m);
    Ok(result)
}

/// Full (geometric) product of two multivectors: the Cartesian set of term
/// products, rebuilt and re-cancelled.
pub fn full_mvec(a: &MultiVector, b: &MultiVector) -> Result<MultiVector, AlgebraError> {
    let cfg = a.config_arc();
    let mut terms = Vec::with_capacity(a.len() * b.len());
    for ta in a.iter() {
        for tb in b.iter() {
            terms.push(full(&ta, &tb, &cfg)?);
        }
    }
    let mut result = MultiVector::from_terms(terms, cfg)?;
    result.carry_labels(a);
    result.carry_labels(b);
    Ok(result)
}

/// Raw string-level product used to build the Cayley table.
///
/// `targets` maps each generator set to its canonical label in the active
/// configuration. Operand signs are handled by the caller.
pub(crate) fn raw_product(
    i: &str,
    j: &str,
    metric: &Metric,
    targets: &[(BTreeSet<char>, String)],
) -> Result<(String, Sign), AlgebraError> {
    let mut sign = Sign::Pos;
    let components = format!("{i}{j}");

    // Multiplication by the point element is idempotent.
    if components.contains('p') {
        return Ok((components.replacen('p', "", 1), sign));
    }

    // Pop and cancel repeated generators.
    let mut working: Vec<char> = components.chars().collect();
    let i_set: BTreeSet<char> = i.chars().collect();
    let j_set: BTreeSet<char> = j.chars().collect();
    for &repeated in i_set.intersection(&j_set) {
        let mut occurrences = working
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == repeated)
            .map(|(pos, _)| pos);
        if let (Some(first), Some(second)) = (occurrences.next(), occurrences.next()) {
            let n_pops = second - first - 1;
            if n_pops % 2 == 1 {
                sign = sign.flip();
            }
            sign = sign * metric.sign_for(repeated)?;
            working.retain(|&c| c != repeated);
        }
    }

    if working.is_empty() {
        return Ok(("p".to_string(), sign));
    }

    let working_set: BTreeSet<char> = working.iter().copied().collect();
    let target = targets
        .iter()
        .find(|(set, _)| *set == working_set)
        .map(|(_, label)| label.clone())
        .ok_or_else(|| AlgebraError::InvalidIndex {
            index: working.iter().collect(),
        })?;

    if target.chars().eq(working.iter().copied()) {
        return Ok((target, sign));
    }

    // Count the pops needed to permute `working` into the target's order.
    let mut ordering = [0usize; 4];
    for (pos, c) in target.chars().enumerate() {
        ordering[generator_slot(c)?] = pos + 1;
    }
    let mut current: Vec<usize> = working
        .iter()
        .map(|&c| generator_slot(c).map(|slot| ordering[slot]))
        .collect::<Result<_, _>>()?;

    while current.len() > 1 {
        if current[0] % 2 == 0 {
            sign = sign.flip();
        }
        current.remove(0);
        let mut ranked = current.clone();
        ranked.sort_unstable();
        current = current
            .iter()
            .map(|v| ranked.iter().position(|r| r == v).map(|pos| pos + 1))
            .collect::<Option<_>>()
            .ok_or_else(|| AlgebraError::InvalidIndex {
                index: target.clone(),
            })?;
    }

    Ok((target, sign))
}

fn generator_slot(c: char) -> Result<usize, AlgebraError> {
    match c {
        '0' => Ok(0),
        '1' => Ok(1),
        '2' => Ok(2),
        '3' => Ok(3),
        _ => Err(AlgebraError::InvalidIndex {
            index: c.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ArConfig {
        ArConfig::default()
    }

    #[test]
    fn point_is_the_identity() {
        let cfg = cfg();
        let ap = Alpha::point();
        for index in cfg.allowed() {
            let a = Alpha::new(index, &cfg).unwrap();
            assert_eq!(find_prod(&ap, &a, &cfg).unwrap(), a);
            assert_eq!(find_prod(&a, &ap, &cfg).unwrap(), a);
        }
    }

    #[test]
    fn negative_point_negates() {
        let cfg = cfg();
        let neg_ap = -Alpha::point();
        for index in cfg.allowed() {
            let a = Alpha::new(index, &cfg).unwrap();
            assert_eq!(find_prod(&neg_ap, &a, &cfg).unwrap(), -a.clone());
            assert_eq!(find_prod(&a, &neg_ap, &cfg).unwrap(), -a);
        }
    }

    #[test]
    fn every_element_squares_to_signed_point() {
        let cfg = cfg();
        for index in cfg.allowed() {
            let a = Alpha::new(index, &cfg).unwrap();
            let sq = find_prod(&a, &a, &cfg).unwrap();
            assert!(sq.is_point(), "{index} squared to {}", sq.index());
        }
    }

    #[test]
    fn single_generators_anticommute() {
        let cfg = cfg();
        for i in ["0", "1", "2", "3"] {
            for j in ["0", "1", "2", "3"] {
                if i == j {
                    continue;
                }
                let ai = Alpha::new(i, &cfg).unwrap();
                let aj = Alpha::new(j, &cfg).unwrap();
                let ij = find_prod(&ai, &aj, &cfg).unwrap();
                let ji = find_prod(&aj, &ai, &cfg).unwrap();
                assert_eq!(ij.index(), ji.index());
                assert_eq!(ij.sign(), ji.sign().flip());
            }
        }
    }

    #[test]
    fn product_with_inverse_is_positive_point() {
        let cfg = cfg();
        for index in cfg.allowed() {
            let a = Alpha::new(index, &cfg).unwrap();
            let inv = inverse(&a, &cfg).unwrap();
            assert_eq!(find_prod(&a, &inv, &cfg).unwrap(), Alpha::point());
        }
    }

    #[test]
    fn division_round_trip() {
        let cfg = cfg();
        for index in cfg.allowed() {
            let a = Alpha::new(index, &cfg).unwrap();
            assert_eq!(div_by(&a, &a, &cfg).unwrap(), Alpha::point());
        }
    }

    #[test]
    fn commutator_closes_on_signed_point() {
        let cfg = cfg();
        for i in cfg.allowed() {
            for j in cfg.allowed() {
                let a = Alpha::new(i, &cfg).unwrap();
                let b = Alpha::new(j, &cfg).unwrap();
                let c = commutator(&a, &b, &cfg).unwrap();
                assert!(c.is_point(), "[{i}, {j}] = {}", c.index());
            }
        }
    }

    #[test]
    fn group_labels_do_not_multiply() {
        let cfg = cfg();
        let i = Alpha::new("i", &cfg).unwrap();
        let a = Alpha::new("1", &cfg).unwrap();
        assert!(find_prod(&i, &a, &cfg).is_err());
    }

    #[test]
    fn known_products() {
        let cfg = cfg();
        let a1 = Alpha::new("1", &cfg).unwrap();
        let a2 = Alpha::new("2", &cfg).unwrap();
        let a12 = find_prod(&a1, &a2, &cfg).unwrap();
        assert_eq!(a12.index(), "12");
        assert_eq!(a12.sign(), Sign::Pos);

        // α2 · α1 = -α12
        let a21 = find_prod(&a2, &a1, &cfg).unwrap();
        assert_eq!(a21.index(), "12");
        assert_eq!(a21.sign(), Sign::Neg);

        // α0 squares to +αp under the (+---) metric, spatial to -αp.
        let a0 = Alpha::new("0", &cfg).unwrap();
        assert_eq!(find_prod(&a0, &a0, &cfg).unwrap(), Alpha::point());
        assert_eq!(find_prod(&a1, &a1, &cfg).unwrap(), -Alpha::point());
    }

    #[test]
    fn contraction_order_is_immaterial() {
        // The contraction sign must not depend on the order repeated
        // generators are processed in: popping them in descending order
        // leaves the same working string and sign as ascending order.
        fn contract(i: &str, j: &str, metric: &Metric, descending: bool) -> (Vec<char>, Sign) {
            let mut sign = Sign::Pos;
            let mut working: Vec<char> = format!("{i}{j}").chars().collect();
            let i_set: BTreeSet<char> = i.chars().collect();
            let j_set: BTreeSet<char> = j.chars().collect();
            let mut repeats: Vec<char> = i_set.intersection(&j_set).copied().collect();
            if descending {
                repeats.reverse();
            }
            for repeated in repeats {
                let mut occurrences = working
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c == repeated)
                    .map(|(pos, _)| pos);
                if let (Some(first), Some(second)) = (occurrences.next(), occurrences.next()) {
                    if (second - first - 1) % 2 == 1 {
                        sign = sign.flip();
                    }
                    sign = sign * metric.sign_for(repeated).unwrap();
                    working.retain(|&c| c != repeated);
                }
            }
            (working, sign)
        }

        let cfg = cfg();
        let metric = cfg.metric();
        for i in cfg.allowed() {
            for j in cfg.allowed() {
                if i == "p" || j == "p" {
                    continue;
                }
                let ascending = contract(i, j, &metric, false);
                let descending = contract(i, j, &metric, true);
                assert_eq!(ascending, descending, "order-dependent contraction for {i}·{j}");
            }
        }
    }

    #[test]
    fn dagger_negates_negative_squares() {
        let cfg = cfg();
        let a0 = Alpha::new("0", &cfg).unwrap();
        let a1 = Alpha::new("1", &cfg).unwrap();
        assert_eq!(dagger_alpha(&a0, &cfg).unwrap(), a0);
        assert_eq!(dagger_alpha(&a1, &cfg).unwrap(), -a1);
    }
}
