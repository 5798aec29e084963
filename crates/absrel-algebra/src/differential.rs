//! Symbolic differentiation.
//!
//! Differentiating a term divides its alpha by the differentiation variable
//! under the configured division convention and records the variable as the
//! outermost partial on the value. Operators are values: a `Differential`
//! holds the set of basis elements it differentiates with respect to and can
//! be applied to any multivector from the same configuration.

use std::sync::Arc;

use crate::alpha::Alpha;
use crate::config::{ArConfig, DivisionType};
use crate::error::AlgebraError;
use crate::multivector::MultiVector;
use crate::product::{div_by, div_into};
use crate::term::Term;
use crate::zet::{Orientation, Zet};

/// Divide an alpha by the differentiation variable under a division
/// convention.
fn divided_alpha(
    alpha: &Alpha,
    wrt: &Alpha,
    cfg: &ArConfig,
    division: DivisionType,
) -> Result<Alpha, AlgebraError> {
    match division {
        DivisionType::By => div_by(alpha, wrt, cfg),
        DivisionType::Into => div_into(wrt, alpha, cfg),
    }
}

/// Symbolically differentiate one term with respect to one basis element.
///
/// Returns a new term; the input is untouched. The differentiation variable
/// is prepended to the value's partials so index 0 is always the outermost
/// operator.
pub fn component_partial(
    term: &Term,
    wrt: &Alpha,
    cfg: &ArConfig,
    division: DivisionType,
) -> Result<Term, AlgebraError> {
    let alpha = divided_alpha(term.alpha(), wrt, cfg, division)?;
    let xi = term.xi().with_prepended_partial(wrt);
    Ok(Term::new(alpha, xi))
}

/// A differential operator: `Dμ`, `DG` and friends are instances of this.
#[derive(Clone, Debug, PartialEq)]
pub struct Differential {
    wrt: Vec<Alpha>,
    cfg: Arc<ArConfig>,
}

impl Differential {
    /// Build from a whitespace-separated list of basis labels, e.g.
    /// `"0 1 2 3"`.
    pub fn new(wrt: &str, cfg: Arc<ArConfig>) -> Result<Differential, AlgebraError> {
        let wrt = wrt
            .split_whitespace()
            .map(|label| Alpha::new(label, &cfg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Differential { wrt, cfg })
    }

    /// Build from explicit basis labels.
    pub fn from_indices<'a>(
        wrt: impl IntoIterator<Item = &'a str>,
        cfg: Arc<ArConfig>,
    ) -> Result<Differential, AlgebraError> {
        let wrt = wrt
            .into_iter()
            .map(|label| Alpha::new(label, &cfg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Differential { wrt, cfg })
    }

    /// Build from the occupied alphas of a multivector.
    pub fn from_multivector(mvec: &MultiVector) -> Differential {
        let wrt = mvec.iter().map(|t| t.alpha().clone()).collect();
        Differential {
            wrt,
            cfg: mvec.config_arc(),
        }
    }

    pub fn wrt(&self) -> &[Alpha] {
        &self.wrt
    }

    pub fn config(&self) -> &ArConfig {
        &self.cfg
    }

    /// Differentiate every term of `mvec` by every element of this
    /// operator, under the configuration's division convention.
    pub fn apply(&self, mvec: &MultiVector) -> Result<MultiVector, AlgebraError> {
        self.apply_with(mvec, self.cfg.division())
    }

    /// Differentiate with an explicit division convention, overriding the
    /// configured one.
    pub fn apply_with(
        &self,
        mvec: &MultiVector,
        division: DivisionType,
    ) -> Result<MultiVector, AlgebraError> {
        if *self.cfg != *mvec.config() {
            return Err(AlgebraError::ConfigMismatch);
        }
        let mut terms = Vec::with_capacity(mvec.len() * self.wrt.len());
        for term in mvec.iter() {
            for wrt in &self.wrt {
                terms.push(component_partial(&term, wrt, &self.cfg, division)?);
            }
        }
        let mut result = MultiVector::from_terms(terms, mvec.config_arc())?;
        result.carry_labels(mvec);
        Ok(result)
    }
}

/// The 4-differential `Dμ`: all four generators.
pub fn d_mu(cfg: Arc<ArConfig>) -> Result<Differential, AlgebraError> {
    Differential::from_indices(["0", "1", "2", "3"], cfg)
}

/// Differentiation with respect to all sixteen basis elements.
pub fn d_g(cfg: Arc<ArConfig>) -> Result<Differential, AlgebraError> {
    let labels: Vec<String> = cfg.allowed().to_vec();
    Differential::from_indices(labels.iter().map(|s| s.as_str()), cfg)
}

/// Differentiation with respect to one zet (its time-like element plus its
/// 3-vector).
pub fn d_zet(zet: Zet, cfg: Arc<ArConfig>) -> Result<Differential, AlgebraError> {
    let labels: Vec<String> = Orientation::ALL
        .iter()
        .map(|&o| cfg.zet_component(zet, o).to_string())
        .collect();
    Differential::from_indices(labels.iter().map(|s| s.as_str()), cfg)
}

/// Differentiation with respect to the six field components `E + B`.
pub fn d_f(cfg: Arc<ArConfig>) -> Result<Differential, AlgebraError> {
    let labels: Vec<String> = [Zet::E, Zet::B]
        .iter()
        .flat_map(|&zet| {
            Orientation::SPATIAL
                .iter()
                .map(|&o| cfg.zet_component(zet, o).to_string())
                .collect::<Vec<_>>()
        })
        .collect();
    Differential::from_indices(labels.iter().map(|s| s.as_str()), cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha::Sign;

    fn cfg() -> Arc<ArConfig> {
        ArConfig::default_shared()
    }

    #[test]
    fn component_partial_returns_a_new_term() {
        let cfg = cfg();
        let original = Term::parse("012", &cfg).unwrap();
        let wrt = Alpha::new("2", &cfg).unwrap();
        let differentiated =
            component_partial(&original, &wrt, &cfg, DivisionType::By).unwrap();
        assert_ne!(differentiated, original);
        // The original is untouched: no partials were attached to it.
        assert!(original.xi().partials().is_empty());
        assert_eq!(differentiated.xi().partials(), &[wrt]);
    }

    #[test]
    fn division_conventions_differ_by_inverted_operand() {
        let cfg = cfg();
        let term = Term::parse("01", &cfg).unwrap();
        let wrt = Alpha::new("1", &cfg).unwrap();
        let by = component_partial(&term, &wrt, &cfg, DivisionType::By).unwrap();
        let into = component_partial(&term, &wrt, &cfg, DivisionType::Into).unwrap();
        // Same target element, opposite sign: the conventions disagree by
        // which operand gets inverted.
        assert_eq!(by.index(), "0");
        assert_eq!(into.index(), "0");
        assert_eq!(by.sign(), into.sign().flip());
    }

    #[test]
    fn d_mu_produces_one_term_per_wrt_element() {
        let cfg = cfg();
        let mvec = MultiVector::parse("p", Arc::clone(&cfg)).unwrap();
        let derivative = d_mu(Arc::clone(&cfg)).unwrap().apply(&mvec).unwrap();
        assert_eq!(derivative.len(), 4);
        // ∂0 ξp lands on α0, ∂i ξp on the spatial αi.
        assert_eq!(derivative.at("0").unwrap().len(), 1);
        assert_eq!(derivative.at("1").unwrap().len(), 1);
    }

    #[test]
    fn grad_like_signs_under_into_division() {
        let cfg = cfg();
        let mvec = MultiVector::parse("p", Arc::clone(&cfg)).unwrap();
        let derivative = d_mu(Arc::clone(&cfg)).unwrap().apply(&mvec).unwrap();
        // div_into(α1, αp) = α1⁻¹ = -α1: spatial partials of ξp are negated.
        let spatial = derivative.at("1").unwrap();
        assert_eq!(spatial[0].sign(), Sign::Neg);
        let time = derivative.at("0").unwrap();
        assert_eq!(time[0].sign(), Sign::Pos);
    }

    #[test]
    fn zet_operator_collects_four_elements() {
        let cfg = cfg();
        let op = d_zet(Zet::B, Arc::clone(&cfg)).unwrap();
        let labels: Vec<&str> = op.wrt().iter().map(|a| a.index()).collect();
        assert_eq!(labels, vec!["p", "23", "31", "12"]);
    }

    #[test]
    fn field_operator_collects_six_elements() {
        let cfg = cfg();
        let op = d_f(Arc::clone(&cfg)).unwrap();
        assert_eq!(op.wrt().len(), 6);
    }
}
