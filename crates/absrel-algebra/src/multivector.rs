//! The multivector container.
//!
//! A multivector keeps one bucket of symbolic values per basis label of its
//! configuration, in the configured order. Every construction path funnels
//! through the `Term` constructor (so alpha signs are folded into values)
//! and then through cancellation, so a multivector is always in canonical,
//! cancellation-free form. Arithmetic builds new multivectors; nothing is
//! mutated in place except the explicit `cancel_terms` helper.

use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use crate::alpha::{Alpha, Sign};
use crate::config::ArConfig;
use crate::error::AlgebraError;
use crate::product;
use crate::term::Term;
use crate::xi::{Xi, XiValue};

/// One reversible relabelling: the fresh value standing in for a recorded
/// list of original values.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSubstitution {
    pub label: Xi,
    pub originals: Vec<XiValue>,
}

/// A canonical, auto-cancelling sum of terms.
#[derive(Clone, Debug)]
pub struct MultiVector {
    cfg: Arc<ArConfig>,
    // Parallel to cfg.allowed(); buckets hold surviving values only.
    buckets: Vec<Vec<XiValue>>,
    labels: Vec<LabelSubstitution>,
}

impl MultiVector {
    /// An empty multivector over the given configuration.
    pub fn new(cfg: Arc<ArConfig>) -> MultiVector {
        let buckets = vec![Vec::new(); cfg.allowed().len()];
        MultiVector {
            cfg,
            buckets,
            labels: Vec::new(),
        }
    }

    /// Build from any collection of terms, normalizing and cancelling.
    pub fn from_terms(
        terms: impl IntoIterator<Item = Term>,
        cfg: Arc<ArConfig>,
    ) -> Result<MultiVector, AlgebraError> {
        let mut mvec = MultiVector::new(cfg);
        for term in terms {
            let pos = mvec
                .cfg
                .index_position(term.index())
                .ok_or_else(|| AlgebraError::InvalidIndex {
                    index: term.index().to_string(),
                })?;
            mvec.buckets[pos].push(term.xi().clone());
        }
        mvec.normalize();
        Ok(mvec)
    }

    /// Parse a whitespace-separated list of term labels, e.g.
    /// `"1 2 -12 012[Sin(kx-ωt)]"`.
    pub fn parse(input: &str, cfg: Arc<ArConfig>) -> Result<MultiVector, AlgebraError> {
        let terms: Vec<Term> = input
            .split_whitespace()
            .map(|label| Term::parse(label, &cfg))
            .collect::<Result<_, _>>()?;
        MultiVector::from_terms(terms, cfg)
    }

    pub fn config(&self) -> &ArConfig {
        &self.cfg
    }

    pub fn config_arc(&self) -> Arc<ArConfig> {
        Arc::clone(&self.cfg)
    }

    /// Total count of surviving terms across all buckets (not the count of
    /// occupied buckets).
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Whether at least one term survives under the given alpha.
    pub fn contains_alpha(&self, alpha: &Alpha) -> bool {
        if alpha.sign().is_neg() {
            return false;
        }
        self.cfg
            .index_position(alpha.index())
            .map(|pos| !self.buckets[pos].is_empty())
            .unwrap_or(false)
    }

    /// Whether this exact term (alpha and value) is present.
    pub fn contains_term(&self, term: &Term) -> bool {
        self.cfg
            .index_position(term.index())
            .map(|pos| self.buckets[pos].contains(term.xi()))
            .unwrap_or(false)
    }

    /// The surviving terms at a basis label; empty if the bucket is clear,
    /// an error only if the label itself is invalid.
    pub fn at(&self, index: &str) -> Result<Vec<Term>, AlgebraError> {
        let (index, _) = Sign::strip(index);
        let pos = self
            .cfg
            .index_position(index)
            .ok_or_else(|| AlgebraError::InvalidIndex {
                index: index.to_string(),
            })?;
        let alpha = Alpha::with_sign(index, Sign::Pos, &self.cfg)?;
        Ok(self.buckets[pos]
            .iter()
            .map(|xi| Term::new(alpha.clone(), xi.clone()))
            .collect())
    }

    /// Iterate the surviving terms in configured basis order.
    pub fn iter(&self) -> impl Iterator<Item = Term> + '_ {
        self.buckets.iter().enumerate().flat_map(move |(pos, bucket)| {
            let alpha = Alpha::known(&self.cfg.allowed()[pos], Sign::Pos);
            bucket
                .iter()
                .map(move |xi| Term::new(alpha.clone(), xi.clone()))
        })
    }

    /// Iterate `(alpha, terms)` for each occupied bucket, in basis order.
    pub fn iter_alphas(&self) -> impl Iterator<Item = (Alpha, Vec<Term>)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(move |(pos, bucket)| {
                let alpha = Alpha::known(&self.cfg.allowed()[pos], Sign::Pos);
                let terms = bucket
                    .iter()
                    .map(|xi| Term::new(alpha.clone(), xi.clone()))
                    .collect();
                (alpha, terms)
            })
    }

    /// Checked addition: concatenates terms and rebuilds, so cancellation
    /// re-runs. Errors if the operands were built from different
    /// configurations.
    pub fn try_add(&self, other: &MultiVector) -> Result<MultiVector, AlgebraError> {
        if *self.cfg != *other.cfg {
            return Err(AlgebraError::ConfigMismatch);
        }
        let mut result = self.clone();
        for (pos, bucket) in other.buckets.iter().enumerate() {
            result.buckets[pos].extend(bucket.iter().cloned());
        }
        result.labels.extend(other.labels.iter().cloned());
        result.normalize();
        Ok(result)
    }

    /// Checked subtraction: `self + (-other)`.
    pub fn try_sub(&self, other: &MultiVector) -> Result<MultiVector, AlgebraError> {
        self.try_add(&-other)
    }

    /// Checked full (geometric) product.
    pub fn try_full(&self, other: &MultiVector) -> Result<MultiVector, AlgebraError> {
        if *self.cfg != *other.cfg {
            return Err(AlgebraError::ConfigMismatch);
        }
        product::full_mvec(self, other)
    }

    /// Grade projection: only buckets whose label has the given grade, with
    /// the identity label at grade 0.
    pub fn project(&self, grade: usize) -> MultiVector {
        let mut result = MultiVector::new(Arc::clone(&self.cfg));
        for (pos, bucket) in self.buckets.iter().enumerate() {
            let index = &self.cfg.allowed()[pos];
            let index_grade = if index == "p" { 0 } else { index.len() };
            if index_grade == grade {
                result.buckets[pos] = bucket.clone();
            }
        }
        result.labels = self.labels.clone();
        result
    }

    /// Hermitian conjugate: negates every term whose alpha squares to
    /// `-αp`.
    pub fn dagger(&self) -> Result<MultiVector, AlgebraError> {
        let mut result = self.clone();
        for (pos, bucket) in result.buckets.iter_mut().enumerate() {
            let alpha = Alpha::with_sign(&self.cfg.allowed()[pos], Sign::Pos, &self.cfg)?;
            if product::find_prod(&alpha, &alpha, &self.cfg)?.sign().is_neg() {
                for xi in bucket.iter_mut() {
                    *xi = -xi.clone();
                }
            }
        }
        Ok(result)
    }

    /// Re-run cancellation in place. Construction already cancels; this is
    /// for callers that have poked at buckets through relabelling helpers.
    pub fn cancel_terms(&mut self) {
        self.normalize();
    }

    /// Replace the terms under one basis label (or every member of a named
    /// 3-vector group) with a single fresh symbolic value, recording the
    /// originals so `remove_labels` can restore them.
    pub fn relabel(&self, index: &str, replacement: &str) -> Result<MultiVector, AlgebraError> {
        let (index, index_sign) = Sign::strip(index);
        let (replacement, repl_sign) = Sign::strip(replacement);
        let sign = index_sign * repl_sign;

        let mut result = self.clone();

        if let Some(pos) = self.cfg.index_position(index) {
            let label = Xi::new(replacement).signed(sign);
            result.labels.push(LabelSubstitution {
                label: label.clone(),
                originals: self.buckets[pos].clone(),
            });
            result.buckets[pos] = vec![XiValue::Atom(label)];
            return Ok(result);
        }

        if let Some(zet) = self.cfg.group_zet(index) {
            let subscripts = ["₁", "₂", "₃"];
            let members = crate::zet::Orientation::SPATIAL
                .iter()
                .map(|&o| self.cfg.zet_component(zet, o).to_string())
                .collect::<Vec<_>>();
            for (subscript, member) in subscripts.iter().zip(members) {
                let pos = self
                    .cfg
                    .index_position(&member)
                    .ok_or_else(|| AlgebraError::InvalidIndex {
                        index: member.clone(),
                    })?;
                let label = Xi::new(&format!("{replacement}{subscript}")).signed(sign);
                result.labels.push(LabelSubstitution {
                    label: label.clone(),
                    originals: result.buckets[pos].clone(),
                });
                result.buckets[pos] = vec![XiValue::Atom(label)];
            }
            return Ok(result);
        }

        Err(AlgebraError::InvalidIndex {
            index: index.to_string(),
        })
    }

    /// Relabel several `(index, replacement)` pairs in order.
    pub fn relabel_many<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<MultiVector, AlgebraError> {
        let mut result = self.clone();
        for (index, replacement) in pairs {
            result = result.relabel(index, replacement)?;
        }
        Ok(result)
    }

    /// Undo every recorded relabelling, restoring the original values. Any
    /// partials and sign accumulated on a label are pushed down onto the
    /// restored values.
    pub fn remove_labels(&self) -> Result<MultiVector, AlgebraError> {
        if self.labels.is_empty() {
            return Ok(self.clone());
        }

        let restore = |xi: &Xi| -> Option<Vec<Xi>> {
            self.labels
                .iter()
                .find(|sub| sub.label.val() == xi.val())
                .map(|sub| {
                    sub.originals
                        .iter()
                        .flat_map(|orig| orig.components().iter())
                        .map(|orig| {
                            // Partials and sign accumulated on the label
                            // apply to the restored value too.
                            let mut partials = orig.partials().to_vec();
                            partials.extend(xi.partials().iter().cloned());
                            Xi::with_partials(orig.val(), partials, orig.sign() * xi.sign())
                        })
                        .collect()
                })
        };

        let mut terms: Vec<Term> = Vec::new();
        for term in self.iter() {
            match term.xi() {
                XiValue::Atom(xi) => match restore(xi) {
                    Some(restored) => {
                        for value in restored {
                            terms.push(Term::new(term.alpha().clone(), XiValue::Atom(value)));
                        }
                    }
                    None => terms.push(term.clone()),
                },
                XiValue::Product(prod) => {
                    let mut components: Vec<Xi> = Vec::new();
                    for comp in prod.components() {
                        match restore(comp) {
                            Some(restored) => components.extend(restored),
                            None => components.push(comp.clone()),
                        }
                    }
                    let rebuilt = crate::xi::XiProduct::with_partials(
                        components,
                        prod.partials().to_vec(),
                        prod.sign(),
                        &self.cfg,
                    );
                    terms.push(Term::new(term.alpha().clone(), XiValue::Product(rebuilt)));
                }
            }
        }

        MultiVector::from_terms(terms, Arc::clone(&self.cfg))
    }

    pub(crate) fn carry_labels(&mut self, other: &MultiVector) {
        self.labels.extend(other.labels.iter().cloned());
    }

    /// The relabelling log, oldest first.
    pub fn labels(&self) -> &[LabelSubstitution] {
        &self.labels
    }

    /// Cancel exact value/negation pairs within each bucket, then sort each
    /// bucket so equality is order-insensitive.
    fn normalize(&mut self) {
        for bucket in &mut self.buckets {
            let mut kept: Vec<XiValue> = Vec::with_capacity(bucket.len());
            for value in bucket.drain(..) {
                let negated = -&value;
                if let Some(pos) = kept.iter().position(|k| *k == negated) {
                    kept.remove(pos);
                } else {
                    kept.push(value);
                }
            }
            kept.sort();
            *bucket = kept;
        }
    }
}

impl PartialEq for MultiVector {
    fn eq(&self, other: &MultiVector) -> bool {
        // Multivectors from different algebras are never equal.
        *self.cfg == *other.cfg && self.buckets == other.buckets
    }
}

impl Eq for MultiVector {}

impl Neg for &MultiVector {
    type Output = MultiVector;

    fn neg(self) -> MultiVector {
        let mut result = self.clone();
        for bucket in &mut result.buckets {
            for xi in bucket.iter_mut() {
                *xi = -xi.clone();
            }
        }
        result
    }
}

impl Neg for MultiVector {
    type Output = MultiVector;

    fn neg(self) -> MultiVector {
        -&self
    }
}

impl Add for &MultiVector {
    type Output = MultiVector;

    /// Panics if the operands were built from different configurations; use
    /// [`MultiVector::try_add`] for a fallible version.
    fn add(self, other: &MultiVector) -> MultiVector {
        self.try_add(other)
            .expect("multivectors built from different configurations cannot be combined")
    }
}

impl Add for MultiVector {
    type Output = MultiVector;

    fn add(self, other: MultiVector) -> MultiVector {
        &self + &other
    }
}

impl Sub for &MultiVector {
    type Output = MultiVector;

    /// Panics if the operands were built from different configurations; use
    /// [`MultiVector::try_sub`] for a fallible version.
    fn sub(self, other: &MultiVector) -> MultiVector {
        self.try_sub(other)
            .expect("multivectors built from different configurations cannot be combined")
    }
}

impl Sub for MultiVector {
    type Output = MultiVector;

    fn sub(self, other: MultiVector) -> MultiVector {
        &self - &other
    }
}

impl Mul for &MultiVector {
    type Output = MultiVector;

    /// The full (geometric) product. Panics if the operands were built from
    /// different configurations; use [`MultiVector::try_full`] for a
    /// fallible version.
    fn mul(self, other: &MultiVector) -> MultiVector {
        self.try_full(other)
            .expect("multivectors built from different configurations cannot be combined")
    }
}

impl Mul for MultiVector {
    type Output = MultiVector;

    fn mul(self, other: MultiVector) -> MultiVector {
        &self * &other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Arc<ArConfig> {
        ArConfig::default_shared()
    }

    #[test]
    fn like_multivectors_cancel_entirely() {
        let cfg = cfg();
        let m1 = MultiVector::parse("1 2 3", Arc::clone(&cfg)).unwrap();
        assert_eq!(&m1 - &m1, MultiVector::new(cfg));
    }

    #[test]
    fn unmatched_terms_are_unaffected() {
        let cfg = cfg();
        let m1 = MultiVector::parse("1 2 3", Arc::clone(&cfg)).unwrap();
        let m2 = MultiVector::parse("1 2", Arc::clone(&cfg)).unwrap();
        assert_eq!(&m1 - &m2, MultiVector::parse("3", cfg).unwrap());
    }

    #[test]
    fn subtraction_with_simplification() {
        let cfg = cfg();
        let m1 = MultiVector::parse("1 2 3", Arc::clone(&cfg)).unwrap();
        let m3 = MultiVector::parse("1 2 12", Arc::clone(&cfg)).unwrap();
        assert_eq!(&m1 - &m3, MultiVector::parse("3 -12", cfg).unwrap());
    }

    #[test]
    fn addition_concatenates_and_recancels() {
        let cfg = cfg();
        let m1 = MultiVector::parse("1 2 3", Arc::clone(&cfg)).unwrap();
        let m2 = MultiVector::parse("1 2", Arc::clone(&cfg)).unwrap();
        let sum = &m1 + &m2;
        assert_eq!(sum, MultiVector::parse("1 1 2 2 3", cfg).unwrap());
        assert_eq!(sum.len(), 5);
    }

    #[test]
    fn len_counts_terms_not_buckets() {
        let cfg = cfg();
        let m = MultiVector::parse("1 1 1 2", cfg).unwrap();
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn cancellation_preserves_multiplicity() {
        let cfg = cfg();
        let m = MultiVector::parse("1 1 1 -1", cfg).unwrap();
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn membership_and_indexing() {
        let cfg = cfg();
        let m = MultiVector::parse("1 -2", Arc::clone(&cfg)).unwrap();
        let a1 = Alpha::new("1", &cfg).unwrap();
        let a3 = Alpha::new("3", &cfg).unwrap();
        assert!(m.contains_alpha(&a1));
        assert!(!m.contains_alpha(&a3));

        let at_two = m.at("2").unwrap();
        assert_eq!(at_two.len(), 1);
        assert_eq!(at_two[0].sign(), Sign::Neg);

        assert!(m.at("nope").is_err());
        assert_eq!(m.at("3").unwrap(), Vec::new());
    }

    #[test]
    fn projection_by_grade() {
        let cfg = cfg();
        let m = MultiVector::parse("p 1 2 12 123 0123", Arc::clone(&cfg)).unwrap();
        assert_eq!(m.project(0), MultiVector::parse("p", Arc::clone(&cfg)).unwrap());
        assert_eq!(m.project(1), MultiVector::parse("1 2", Arc::clone(&cfg)).unwrap());
        assert_eq!(m.project(2), MultiVector::parse("12", Arc::clone(&cfg)).unwrap());
        assert_eq!(m.project(4), MultiVector::parse("0123", cfg).unwrap());
    }

    #[test]
    fn dagger_negates_negative_squares() {
        let cfg = cfg();
        let m = MultiVector::parse("0 1", Arc::clone(&cfg)).unwrap();
        // Under (+---): α0² = +αp, α1² = -αp.
        assert_eq!(m.dagger().unwrap(), MultiVector::parse("0 -1", cfg).unwrap());
    }

    #[test]
    fn full_product_of_vectors() {
        let cfg = cfg();
        let m1 = MultiVector::parse("1", Arc::clone(&cfg)).unwrap();
        let m2 = MultiVector::parse("2", Arc::clone(&cfg)).unwrap();
        let prod = &m1 * &m2;
        assert_eq!(prod.len(), 1);
        let terms = prod.at("12").unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].sign(), Sign::Pos);
    }

    #[test]
    fn full_product_cancels() {
        let cfg = cfg();
        let m = MultiVector::parse("1 2", Arc::clone(&cfg)).unwrap();
        let n = MultiVector::parse("1 2", Arc::clone(&cfg)).unwrap();
        let prod = &m * &n;
        // α1α2 and α2α1 cancel; the squares survive on αp.
        assert!(prod.at("12").unwrap().is_empty());
        assert_eq!(prod.at("p").unwrap().len(), 2);
    }

    #[test]
    fn mismatched_configs_do_not_combine() {
        let cfg_a = cfg();
        let cfg_b = Arc::new(cfg_a.with_metric("----".parse().unwrap()).unwrap());
        let m1 = MultiVector::parse("1", cfg_a).unwrap();
        let m2 = MultiVector::parse("1", cfg_b).unwrap();
        assert!(m1.try_add(&m2).is_err());
        assert_ne!(m1, m2);
    }

    #[test]
    fn relabel_and_restore() {
        let cfg = cfg();
        let m = MultiVector::parse("01 02 03", Arc::clone(&cfg)).unwrap();
        let relabelled = m.relabel("0i", "E").unwrap();
        assert_eq!(relabelled.at("01").unwrap()[0].xi().components()[0].val(), "E₁");
        assert_eq!(relabelled.at("02").unwrap()[0].xi().components()[0].val(), "E₂");

        let restored = relabelled.remove_labels().unwrap();
        assert_eq!(restored, m);
    }

    #[test]
    fn relabel_single_index_with_sign() {
        let cfg = cfg();
        let m = MultiVector::parse("12", Arc::clone(&cfg)).unwrap();
        let relabelled = m.relabel("12", "-W").unwrap();
        let terms = relabelled.at("12").unwrap();
        assert_eq!(terms[0].xi().components()[0].val(), "W");
        assert_eq!(terms[0].sign(), Sign::Neg);
    }
}
