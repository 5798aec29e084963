//! Abstract term patterns and the variable bindings they accumulate.
//!
//! A pattern slot constrains one position of a term: its alpha, one of its
//! partial operators, or one of its value factors. Slots can require an
//! orientation, tag a free zet-group variable, or capture a raw value into a
//! free variable. Bindings collected while assembling a match must stay
//! consistent across every pattern in a template.

use std::collections::HashMap;

use absrel_algebra::{Orientation, Sign, Term, XiValue, Zet};

/// One constrained position of a term pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Requires the position's orientation and optionally binds its zet to
    /// a group variable.
    Oriented {
        orientation: Orientation,
        group: Option<char>,
    },
    /// Captures the position's raw label into a free variable.
    Free(char),
    /// Matches anything.
    Any,
}

impl Slot {
    pub fn oriented(orientation: Orientation) -> Slot {
        Slot::Oriented {
            orientation,
            group: None,
        }
    }

    pub fn grouped(orientation: Orientation, group: char) -> Slot {
        Slot::Oriented {
            orientation,
            group: Some(group),
        }
    }

    pub fn free(var: char) -> Slot {
        Slot::Free(var)
    }
}

/// The shape one term must have to participate in a template match.
///
/// `partials` and `xis` distinguish "unconstrained" (`None`) from "exactly
/// this many, slot by slot" (`Some`); in particular `Some(vec![])` demands a
/// bare, underived value.
#[derive(Clone, Debug)]
pub struct TermPattern {
    pub sign: Sign,
    pub alpha: Slot,
    pub partials: Option<Vec<Slot>>,
    pub xis: Option<Vec<Slot>>,
}

impl TermPattern {
    pub fn new(sign: Sign, alpha: Slot) -> TermPattern {
        TermPattern {
            sign,
            alpha,
            partials: None,
            xis: None,
        }
    }

    pub fn partials(mut self, slots: impl IntoIterator<Item = Slot>) -> TermPattern {
        self.partials = Some(slots.into_iter().collect());
        self
    }

    pub fn xis(mut self, slots: impl IntoIterator<Item = Slot>) -> TermPattern {
        self.xis = Some(slots.into_iter().collect());
        self
    }

    /// Shape-only check used at the binding stage: orientations and factor
    /// counts, ignoring signs and free variables.
    pub fn shape_matches(&self, term: &Term) -> bool {
        if let Some(slots) = &self.xis {
            let components = term.xi().components();
            // A bare value only fits patterns asking for at most one factor.
            let is_product = matches!(term.xi(), XiValue::Product(_));
            if is_product {
                if slots.len() != components.len() {
                    return false;
                }
            } else if slots.len() > 1 {
                return false;
            }
            for (slot, comp) in slots.iter().zip(components) {
                if let Slot::Oriented { orientation, .. } = slot {
                    if Orientation::of_index(comp.val()) != Ok(*orientation) {
                        return false;
                    }
                }
            }
        }

        if let Slot::Oriented { orientation, .. } = self.alpha {
            if Orientation::of_index(term.index()) != Ok(orientation) {
                return false;
            }
        }

        if let Some(slots) = &self.partials {
            let partials = term.xi().partials();
            if partials.len() != slots.len() {
                return false;
            }
            for (slot, partial) in slots.iter().zip(partials) {
                if let Slot::Oriented { orientation, .. } = slot {
                    if Orientation::of_index(partial.index()) != Ok(*orientation) {
                        return false;
                    }
                }
            }
        }

        true
    }
}

/// What a free variable is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Group(Zet),
    Value(String),
}

/// The requirements accumulated while assembling a template match: the
/// relative sign of the whole group plus every variable binding.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    global_sign: Option<Sign>,
    vars: HashMap<char, Binding>,
}

/// Raised (as a value) when a candidate conflicts with the requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedMatch;

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    /// The sign the whole match carries relative to the template (all
    /// patterns may be globally negated together).
    pub fn sign(&self) -> Sign {
        self.global_sign.unwrap_or(Sign::Pos)
    }

    pub fn get_zet(&self, var: char) -> Option<Zet> {
        match self.vars.get(&var) {
            Some(Binding::Group(zet)) => Some(*zet),
            _ => None,
        }
    }

    pub fn get_value(&self, var: char) -> Option<&str> {
        match self.vars.get(&var) {
            Some(Binding::Value(v)) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn get(&self, var: char) -> Option<&Binding> {
        self.vars.get(&var)
    }

    /// Record the relative sign implied by a candidate, or fail if it
    /// conflicts with the sign already established.
    pub(crate) fn check_sign(
        &mut self,
        pattern_sign: Sign,
        candidate_sign: Sign,
    ) -> Result<(), FailedMatch> {
        match self.global_sign {
            None => {
                self.global_sign = Some(pattern_sign * candidate_sign);
                Ok(())
            }
            Some(sign) => {
                if pattern_sign * sign == candidate_sign {
                    Ok(())
                } else {
                    Err(FailedMatch)
                }
            }
        }
    }

    /// Bind a group variable to an index's zet, or fail on conflict.
    pub(crate) fn check_group(&mut self, var: char, index: &str) -> Result<(), FailedMatch> {
        let zet = Zet::of_index(index).map_err(|_| FailedMatch)?;
        self.check(var, Binding::Group(zet))
    }

    /// Bind a free variable to a raw label, or fail on conflict.
    pub(crate) fn check_value(&mut self, var: char, value: &str) -> Result<(), FailedMatch> {
        self.check(var, Binding::Value(value.to_string()))
    }

    fn check(&mut self, var: char, binding: Binding) -> Result<(), FailedMatch> {
        match self.vars.get(&var) {
            None => {
                self.vars.insert(var, binding);
                Ok(())
            }
            Some(existing) if *existing == binding => Ok(()),
            Some(_) => Err(FailedMatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use absrel_algebra::{Alpha, ArConfig, Xi};
    use Orientation::{X, Y};

    fn term(alpha: &str, val: &str, partial: &str, sign: Sign, cfg: &ArConfig) -> Term {
        let xi = Xi::with_partials(val, vec![Alpha::new(partial, cfg).unwrap()], sign);
        Term::new(Alpha::new(alpha, cfg).unwrap(), XiValue::Atom(xi))
    }

    #[test]
    fn shape_checks_orientations() {
        let cfg = ArConfig::default();
        let pattern = TermPattern::new(Sign::Pos, Slot::grouped(X, 'G'))
            .partials([Slot::grouped(X, 'H')])
            .xis([Slot::free('k')]);

        // α1 is x-oriented, ∂1 is x-oriented.
        assert!(pattern.shape_matches(&term("1", "p", "1", Sign::Pos, &cfg)));
        // α2 is y-oriented: the alpha slot rejects it.
        assert!(!pattern.shape_matches(&term("2", "p", "1", Sign::Pos, &cfg)));
        // Wrong partial orientation.
        assert!(!pattern.shape_matches(&term("1", "p", "2", Sign::Pos, &cfg)));
    }

    #[test]
    fn empty_partials_demand_underived_values() {
        let cfg = ArConfig::default();
        let pattern = TermPattern::new(Sign::Pos, Slot::grouped(X, 'F'))
            .partials([])
            .xis([Slot::free('k')]);
        let underived = Term::parse("1", &cfg).unwrap();
        assert!(pattern.shape_matches(&underived));
        assert!(!pattern.shape_matches(&term("1", "p", "1", Sign::Pos, &cfg)));
    }

    #[test]
    fn bindings_enforce_consistency() {
        let mut bindings = Bindings::new();
        bindings.check_group('G', "1").unwrap();
        // α2 is also in the A zet: consistent.
        bindings.check_group('G', "2").unwrap();
        // α23 is in the B zet: conflict.
        assert_eq!(bindings.check_group('G', "23"), Err(FailedMatch));

        bindings.check_value('k', "p").unwrap();
        assert_eq!(bindings.check_value('k', "q"), Err(FailedMatch));
        assert_eq!(bindings.get_value('k'), Some("p"));
    }

    #[test]
    fn relative_sign_allows_global_negation() {
        let mut bindings = Bindings::new();
        // First candidate: pattern '+' saw a negative term, so the whole
        // match is negated.
        bindings.check_sign(Sign::Pos, Sign::Neg).unwrap();
        assert_eq!(bindings.sign(), Sign::Neg);
        // A '-' pattern must now see a positive term.
        bindings.check_sign(Sign::Neg, Sign::Pos).unwrap();
        assert_eq!(bindings.check_sign(Sign::Neg, Sign::Neg), Err(FailedMatch));
    }

    #[test]
    fn orientation_mix_in_xis() {
        let cfg = ArConfig::default();
        let pattern = TermPattern::new(Sign::Pos, Slot::oriented(X))
            .xis([Slot::grouped(Y, 'G')]);
        // ξ31 is y-oriented.
        assert!(pattern.shape_matches(&Term::new(
            Alpha::new("1", &cfg).unwrap(),
            XiValue::Atom(Xi::new("31")),
        )));
        assert!(!pattern.shape_matches(&Term::new(
            Alpha::new("1", &cfg).unwrap(),
            XiValue::Atom(Xi::new("23")),
        )));
    }
}
