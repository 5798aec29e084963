//! Multi-term structural matching and substitution.
//!
//! A template is an ordered list of term patterns plus the replacements to
//! emit when every pattern finds a consistent candidate. Matching is a
//! greedy left-to-right assignment:
//!
//! 1. **Bind**: every input term is tested against the patterns in order and
//!    attached to the first one it fits; terms fitting none pass through.
//! 2. **Assemble**: each candidate bound to the first pattern seeds a match.
//!    The remaining patterns are walked in order, scanning their candidates
//!    for one consistent with the accumulated requirements (variable
//!    bindings and the group's relative sign). A pattern with no consistent
//!    candidate abandons the seed, which passes through unmatched.
//! 3. **Substitute**: on a complete match the replacement constraints are
//!    checked (designated variables pairwise distinct, designated variables
//!    all equal) and the first satisfied replacement's term is emitted; the
//!    consumed candidates leave the pool either way.
//!
//! When several overlapping matches are possible the engine makes no claim
//! of optimality; the candidate iteration order decides which terms are
//! consumed, deterministically.

use tracing::{debug, trace};

use absrel_algebra::{ArConfig, Term};

use crate::pattern::{Bindings, FailedMatch, Slot, TermPattern};

/// Constraints plus a builder for the term that replaces a complete match.
#[derive(Clone)]
pub struct Replacement {
    /// Variables whose bindings must be pairwise distinct.
    pub distinct: &'static [char],
    /// Variables whose bindings must all be equal.
    pub equal: &'static [char],
    /// Builds the replacement term from the accumulated bindings; `None`
    /// withdraws the replacement (the consumed terms still cancel).
    pub build: fn(&Bindings, &ArConfig) -> Option<Term>,
}

/// An ordered list of term patterns with replacement rules.
#[derive(Clone)]
pub struct Template {
    name: &'static str,
    patterns: Vec<TermPattern>,
    replacements: Vec<Replacement>,
}

impl Template {
    pub fn new(
        name: &'static str,
        patterns: Vec<TermPattern>,
        replacements: Vec<Replacement>,
    ) -> Template {
        Template {
            name,
            patterns,
            replacements,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the template over a term stream: consumed matches are replaced,
    /// everything else passes through.
    pub fn replace(&self, terms: Vec<Term>, cfg: &ArConfig) -> Vec<Term> {
        if self.patterns.is_empty() {
            return terms;
        }
        let mut output: Vec<Term> = Vec::new();
        let mut match_map: Vec<Vec<Term>> = vec![Vec::new(); self.patterns.len()];

        // Bind: first matching pattern wins.
        for term in terms {
            match self
                .patterns
                .iter()
                .position(|pattern| pattern.shape_matches(&term))
            {
                Some(pos) => match_map[pos].push(term),
                None => output.push(term),
            }
        }

        // Assemble: each first-pattern candidate seeds a potential match.
        let seeds: Vec<Term> = match_map[0].clone();
        for seed in seeds {
            let mut bindings = Bindings::new();
            if update_requirements(&self.patterns[0], &seed, &mut bindings).is_err() {
                remove_one(&mut match_map[0], &seed);
                output.push(seed);
                continue;
            }

            let mut matched: Vec<(usize, Term)> = vec![(0, seed.clone())];
            let mut complete = true;
            for (pos, pattern) in self.patterns.iter().enumerate().skip(1) {
                let mut found = None;
                for candidate in &match_map[pos] {
                    let mut trial = bindings.clone();
                    if update_requirements(pattern, candidate, &mut trial).is_ok() {
                        bindings = trial;
                        found = Some(candidate.clone());
                        break;
                    }
                }
                match found {
                    Some(candidate) => matched.push((pos, candidate)),
                    None => {
                        // The seed cannot complete; the other patterns'
                        // candidates stay available for the next seed.
                        remove_one(&mut match_map[0], &seed);
                        output.push(seed);
                        complete = false;
                        break;
                    }
                }
            }

            if complete {
                trace!(template = self.name, "complete match assembled");
                if let Some(replacement) = self.generate_replacement(&bindings, cfg) {
                    output.push(replacement);
                }
                for (pos, candidate) in matched {
                    remove_one(&mut match_map[pos], &candidate);
                }
            }
        }

        // Unconsumed candidates from every pattern pass through.
        let leftover: usize = match_map.iter().map(Vec::len).sum();
        if leftover > 0 {
            trace!(template = self.name, leftover, "unconsumed candidates pass through");
        }
        for bucket in match_map {
            output.extend(bucket);
        }
        output
    }

    /// Check each replacement's constraints against the bindings and build
    /// the first one that satisfies them.
    fn generate_replacement(&self, bindings: &Bindings, cfg: &ArConfig) -> Option<Term> {
        for replacement in &self.replacements {
            let distinct: Vec<_> = replacement
                .distinct
                .iter()
                .filter_map(|&var| bindings.get(var))
                .collect();
            if distinct.len() != replacement.distinct.len() {
                continue;
            }
            let all_distinct = (0..distinct.len())
                .all(|i| (i + 1..distinct.len()).all(|j| distinct[i] != distinct[j]));
            if !all_distinct {
                continue;
            }

            let equal: Vec<_> = replacement
                .equal
                .iter()
                .filter_map(|&var| bindings.get(var))
                .collect();
            if equal.len() != replacement.equal.len() {
                continue;
            }
            if equal.windows(2).any(|pair| pair[0] != pair[1]) {
                continue;
            }

            let built = (replacement.build)(bindings, cfg);
            if let Some(term) = &built {
                debug!(template = self.name, replacement = %term, "substituted");
            }
            return built;
        }
        None
    }
}

/// Fold one candidate into the requirements, or report the conflict.
fn update_requirements(
    pattern: &TermPattern,
    candidate: &Term,
    bindings: &mut Bindings,
) -> Result<(), FailedMatch> {
    bindings.check_sign(pattern.sign, candidate.sign())?;

    match pattern.alpha {
        Slot::Oriented {
            group: Some(var), ..
        } => bindings.check_group(var, candidate.index())?,
        Slot::Oriented { group: None, .. } => {}
        Slot::Free(var) => bindings.check_value(var, candidate.index())?,
        Slot::Any => {}
    }

    if let Some(slots) = &pattern.partials {
        for (slot, partial) in slots.iter().zip(candidate.xi().partials()) {
            match slot {
                Slot::Oriented {
                    group: Some(var), ..
                } => bindings.check_group(*var, partial.index())?,
                Slot::Free(var) => bindings.check_value(*var, partial.index())?,
                _ => {}
            }
        }
    }

    if let Some(slots) = &pattern.xis {
        for (slot, component) in slots.iter().zip(candidate.xi().components()) {
            match slot {
                Slot::Oriented {
                    group: Some(var), ..
                } => bindings.check_group(*var, component.val())?,
                Slot::Free(var) => bindings.check_value(*var, component.val())?,
                _ => {}
            }
        }
    }

    Ok(())
}

fn remove_one(bucket: &mut Vec<Term>, term: &Term) {
    if let Some(pos) = bucket.iter().position(|t| t == term) {
        bucket.remove(pos);
    }
}
