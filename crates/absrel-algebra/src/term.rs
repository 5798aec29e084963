//! A term: one monomial of a multivector.

use std::ops::Neg;

use crate::alpha::{Alpha, Sign};
use crate::config::ArConfig;
use crate::error::AlgebraError;
use crate::xi::{Xi, XiValue};

/// One `(alpha, value)` monomial.
///
/// The constructor folds a negative alpha sign into the value, so a Term's
/// alpha sign is always positive. Grouping terms by alpha for cancellation
/// needs sign-free keys, and this is where that invariant is established.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term {
    alpha: Alpha,
    xi: XiValue,
}

impl Term {
    pub fn new(alpha: Alpha, xi: XiValue) -> Term {
        let (alpha, xi) = if alpha.sign().is_neg() {
            let flipped = xi.sign() * Sign::Neg;
            (alpha.signed(Sign::Pos), xi.signed(flipped))
        } else {
            (alpha, xi)
        };
        Term { alpha, xi }
    }

    /// A term whose value is the alpha's own label (`α1 ↦ ξ1`).
    pub fn from_alpha(alpha: Alpha) -> Term {
        let xi = Xi::new(alpha.index());
        Term::new(alpha, XiValue::Atom(xi))
    }

    /// Parse a term from a label string.
    ///
    /// Accepts a plain basis label (`"-23"`), or the explicit-value form
    /// `"012[Sin(kx-ωt)]"` binding an arbitrary symbolic expression to a
    /// basis element.
    pub fn parse(input: &str, cfg: &ArConfig) -> Result<Term, AlgebraError> {
        let (body, sign) = Sign::strip(input);

        if let Some(open) = body.find('[') {
            let close = body.rfind(']').ok_or_else(|| AlgebraError::InvalidTerm {
                input: input.to_string(),
                reason: "unterminated '['".to_string(),
            })?;
            if close != body.len() - 1 || close <= open {
                return Err(AlgebraError::InvalidTerm {
                    input: input.to_string(),
                    reason: "malformed explicit value".to_string(),
                });
            }
            let alpha = Alpha::with_sign(&body[..open], sign, cfg)?;
            let xi = Xi::new(&body[open + 1..close]);
            return Ok(Term::new(alpha, XiValue::Atom(xi)));
        }

        let alpha = Alpha::with_sign(body, sign, cfg)?;
        Ok(Term::from_alpha(alpha))
    }

    pub fn alpha(&self) -> &Alpha {
        &self.alpha
    }

    pub fn xi(&self) -> &XiValue {
        &self.xi
    }

    pub fn index(&self) -> &str {
        self.alpha.index()
    }

    /// The term's effective sign (always carried on the value).
    pub fn sign(&self) -> Sign {
        self.xi.sign()
    }

    /// The alpha with the value's sign folded back in, for callers that
    /// need the signed basis element on its own.
    pub fn extract_alpha(&self) -> Alpha {
        self.alpha.signed(self.xi.sign())
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term {
            alpha: self.alpha,
            xi: -self.xi,
        }
    }
}

impl Neg for &Term {
    type Output = Term;

    fn neg(self) -> Term {
        -self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_alpha_folds_into_value() {
        let cfg = ArConfig::default();
        let alpha = Alpha::new("-12", &cfg).unwrap();
        let term = Term::from_alpha(alpha);
        assert_eq!(term.alpha().sign(), Sign::Pos);
        assert_eq!(term.sign(), Sign::Neg);
    }

    #[test]
    fn parse_plain_and_explicit_forms() {
        let cfg = ArConfig::default();
        let t = Term::parse("-23", &cfg).unwrap();
        assert_eq!(t.index(), "23");
        assert_eq!(t.sign(), Sign::Neg);

        let t = Term::parse("012[Sin(kx-ωt)]", &cfg).unwrap();
        assert_eq!(t.index(), "012");
        assert_eq!(t.xi().components()[0].val(), "Sin(kx-ωt)");

        assert!(Term::parse("012[oops", &cfg).is_err());
        assert!(Term::parse("4", &cfg).is_err());
    }

    #[test]
    fn double_negation_round_trips() {
        let cfg = ArConfig::default();
        let t = Term::parse("01", &cfg).unwrap();
        assert_eq!(-(-t.clone()), t);
    }
}
