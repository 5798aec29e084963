//! Result containers keyed by the grouped alphabet.
//!
//! After reduction, terms no longer live on the 16-element basis: replaced
//! terms carry 3-vector group alphas (`i`, `jk`, ...) and leftover terms are
//! collected under their group. [`DelMultiVector`] buckets everything under
//! the 8 `allowed_groups` labels; [`GroupedMultiVector`] keeps the full 16
//! basis labels alongside the 4 group labels so unreduced structure stays
//! visible.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use absrel_algebra::{subscripted, Alpha, ArConfig, MultiVector, Sign, XiValue};

use crate::reducers::{del_stages, full_stages, reduce_terms};

/// Shared bucket layout for the grouped containers.
#[derive(Clone, Debug, PartialEq)]
struct GroupedBuckets {
    keys: Vec<String>,
    buckets: Vec<Vec<XiValue>>,
}

impl GroupedBuckets {
    fn new(keys: Vec<String>) -> GroupedBuckets {
        let buckets = vec![Vec::new(); keys.len()];
        GroupedBuckets { keys, buckets }
    }

    fn insert(&mut self, key: &str, xi: XiValue) {
        if let Some(pos) = self.keys.iter().position(|k| k == key) {
            self.buckets[pos].push(xi);
        }
    }

    fn sort(&mut self) {
        for bucket in &mut self.buckets {
            bucket.sort();
        }
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    fn occupied(&self) -> impl Iterator<Item = (&str, &[XiValue])> + '_ {
        self.keys
            .iter()
            .zip(&self.buckets)
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(key, bucket)| (key.as_str(), bucket.as_slice()))
    }

    fn at(&self, key: &str) -> Vec<XiValue> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|pos| self.buckets[pos].clone())
            .unwrap_or_default()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for (key, values) in self.occupied() {
            let label = subscripted(key).unwrap_or_else(|| key.to_string());
            let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            writeln!(f, "  α{label:<5}( {} )", rendered.join(" "))?;
        }
        write!(f, "}}")
    }
}

/// A multivector reduced to del notation: partial, grad, div and curl
/// groupings applied, everything bucketed under the 8 group labels.
#[derive(Clone, Debug, PartialEq)]
pub struct DelMultiVector {
    cfg: Arc<ArConfig>,
    inner: GroupedBuckets,
}

impl DelMultiVector {
    /// Reduce a multivector through the del-grouping stages.
    pub fn from_multivector(mvec: &MultiVector) -> DelMultiVector {
        let cfg = mvec.config_arc();
        let reduced = reduce_terms(mvec.iter().collect(), &del_stages(), &cfg);
        debug!(terms = reduced.len(), "del grouping complete");

        let mut inner = GroupedBuckets::new(cfg.allowed_groups().to_vec());
        for term in reduced {
            // Leftover terms on basis labels collect under their group.
            let key = if cfg.is_allowed(term.index()) {
                cfg.alpha_group(term.index()).unwrap_or(term.index())
            } else {
                term.index()
            };
            let key = key.to_string();
            inner.insert(&key, term.xi().clone());
        }
        inner.sort();
        DelMultiVector { cfg, inner }
    }

    pub fn config(&self) -> &ArConfig {
        &self.cfg
    }

    /// Total surviving terms across all group buckets.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// The values grouped under one label; empty for unknown labels.
    pub fn at(&self, key: &str) -> Vec<XiValue> {
        self.inner.at(key)
    }

    /// Iterate `(alpha, values)` per occupied group, in group order.
    pub fn iter_groups(&self) -> impl Iterator<Item = (Alpha, Vec<XiValue>)> + '_ {
        self.inner.occupied().map(move |(key, values)| {
            let alpha = Alpha::with_sign(key, Sign::Pos, &self.cfg)
                .expect("group keys come from the configuration");
            (alpha, values.to_vec())
        })
    }
}

impl fmt::Display for DelMultiVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.render(f)
    }
}

/// A fully reduced multivector: every standard template applied, keyed by
/// the 16 basis labels plus the 4 3-vector group labels.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedMultiVector {
    cfg: Arc<ArConfig>,
    inner: GroupedBuckets,
}

impl GroupedMultiVector {
    /// Reduce a multivector through every standard stage.
    pub fn from_multivector(mvec: &MultiVector) -> GroupedMultiVector {
        let cfg = mvec.config_arc();
        let reduced = reduce_terms(mvec.iter().collect(), &full_stages(), &cfg);
        debug!(terms = reduced.len(), "full reduction complete");

        let mut keys: Vec<String> = cfg.allowed().to_vec();
        keys.extend(cfg.vector_groups().iter().cloned());
        let mut inner = GroupedBuckets::new(keys);
        for term in reduced {
            inner.insert(term.index(), term.xi().clone());
        }
        inner.sort();
        GroupedMultiVector { cfg, inner }
    }

    pub fn config(&self) -> &ArConfig {
        &self.cfg
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    pub fn at(&self, key: &str) -> Vec<XiValue> {
        self.inner.at(key)
    }

    pub fn iter_groups(&self) -> impl Iterator<Item = (Alpha, Vec<XiValue>)> + '_ {
        self.inner.occupied().map(move |(key, values)| {
            let alpha = Alpha::with_sign(key, Sign::Pos, &self.cfg)
                .expect("group keys come from the configuration");
            (alpha, values.to_vec())
        })
    }
}

impl fmt::Display for GroupedMultiVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.render(f)
    }
}

/// Reduce a multivector's terms into del notation under the group alphabet.
pub fn del_notation(mvec: &MultiVector) -> DelMultiVector {
    DelMultiVector::from_multivector(mvec)
}

/// Run the complete reduction pipeline and repackage under the grouped
/// alphabet.
pub fn reduce_to_del_notation(mvec: &MultiVector) -> GroupedMultiVector {
    GroupedMultiVector::from_multivector(mvec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use absrel_algebra::{d_mu, Term, Xi};

    fn atom(v: &XiValue) -> &str {
        v.components()[0].val()
    }

    #[test]
    fn four_differential_of_the_field_reduces() {
        // Dμ applied to F = E + B produces the familiar div/curl/partial
        // groupings of electromagnetism.
        let cfg = absrel_algebra::ArConfig::default_shared();
        let f = MultiVector::parse("01 02 03 23 31 12", Arc::clone(&cfg)).unwrap();
        let d = d_mu(Arc::clone(&cfg)).unwrap();
        let result = d.apply(&f).unwrap();
        assert_eq!(result.len(), 24);

        let del = del_notation(&result);
        // 24 raw terms collapse into div/grad/curl/partial groupings.
        assert!(del.len() < result.len());
        let rendered: Vec<String> = del
            .iter_groups()
            .flat_map(|(_, values)| values.iter().map(|v| v.to_string()).collect::<Vec<_>>())
            .collect();
        assert!(
            rendered.iter().any(|label| label.contains("∇•")),
            "expected a divergence grouping in {rendered:?}"
        );
        assert!(
            rendered.iter().any(|label| label.contains("∇x")),
            "expected a curl grouping in {rendered:?}"
        );
    }

    #[test]
    fn leftover_terms_collect_under_their_group() {
        let cfg = absrel_algebra::ArConfig::default_shared();
        // A lone spatial term cannot complete any template.
        let m = MultiVector::parse("1", Arc::clone(&cfg)).unwrap();
        let del = del_notation(&m);
        assert_eq!(del.len(), 1);
        let values = del.at("i");
        assert_eq!(values.len(), 1);
        assert_eq!(atom(&values[0]), "1");
    }

    #[test]
    fn scalar_terms_keep_their_own_bucket() {
        let cfg = absrel_algebra::ArConfig::default_shared();
        let m = MultiVector::parse("p 0123", Arc::clone(&cfg)).unwrap();
        let del = del_notation(&m);
        assert_eq!(del.at("p").len(), 1);
        assert_eq!(del.at("0123").len(), 1);
    }

    #[test]
    fn grouped_container_keeps_unreduced_basis_labels() {
        let cfg = absrel_algebra::ArConfig::default_shared();
        let m = MultiVector::parse("1 23", Arc::clone(&cfg)).unwrap();
        let grouped = reduce_to_del_notation(&m);
        assert_eq!(grouped.at("1").len(), 1);
        assert_eq!(grouped.at("23").len(), 1);
        assert!(grouped.at("i").is_empty());
    }

    #[test]
    fn grad_terms_reduce_inside_a_multivector() {
        let cfg = absrel_algebra::ArConfig::default_shared();
        let terms: Vec<Term> = ["1", "2", "3"]
            .iter()
            .map(|direction| {
                let alpha = Alpha::new(direction, &cfg).unwrap();
                let xi = Xi::with_partials(
                    "p",
                    vec![Alpha::new(direction, &cfg).unwrap()],
                    Sign::Pos,
                );
                Term::new(alpha, XiValue::Atom(xi))
            })
            .collect();
        let m = MultiVector::from_terms(terms, Arc::clone(&cfg)).unwrap();
        let grouped = reduce_to_del_notation(&m);
        assert_eq!(grouped.len(), 1);
        let values = grouped.at("i");
        assert_eq!(atom(&values[0]), "∇Ξₚ");
    }
}
