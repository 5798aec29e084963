//! Property-based tests for the algebra core.
//!
//! These validate invariants that must hold for every metric signature and
//! every combination of basis elements, plus the container laws the rest of
//! the engine leans on.

use std::sync::Arc;

use proptest::prelude::*;

use absrel_algebra::{
    commutator, find_prod, inverse, Alpha, ArConfig, Metric, MultiVector, Sign, Term,
};

fn arb_metric() -> impl Strategy<Value = Metric> {
    prop::array::uniform4(prop_oneof![Just(Sign::Pos), Just(Sign::Neg)]).prop_map(Metric::new)
}

fn arb_config() -> impl Strategy<Value = Arc<ArConfig>> {
    arb_metric().prop_map(|metric| {
        Arc::new(
            ArConfig::default()
                .with_metric(metric)
                .expect("metric variants are always valid"),
        )
    })
}

/// An index into the 16 allowed labels.
fn arb_label_pos() -> impl Strategy<Value = usize> {
    0..16usize
}

/// A small multiset of signed basis labels.
fn arb_term_labels() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((arb_label_pos(), any::<bool>()), 0..12)
}

fn build_mvec(labels: &[(usize, bool)], cfg: &Arc<ArConfig>) -> MultiVector {
    let terms: Vec<Term> = labels
        .iter()
        .map(|(pos, negate)| {
            let index = &cfg.allowed()[*pos];
            let sign = if *negate { Sign::Neg } else { Sign::Pos };
            Term::from_alpha(Alpha::with_sign(index, sign, cfg).unwrap())
        })
        .collect();
    MultiVector::from_terms(terms, Arc::clone(cfg)).unwrap()
}

proptest! {
    #[test]
    fn prop_products_close_over_the_basis(cfg in arb_config(), i in arb_label_pos(), j in arb_label_pos()) {
        let a = Alpha::new(&cfg.allowed()[i], &cfg).unwrap();
        let b = Alpha::new(&cfg.allowed()[j], &cfg).unwrap();
        let prod = find_prod(&a, &b, &cfg).unwrap();
        prop_assert!(cfg.is_allowed(prod.index()));
    }

    #[test]
    fn prop_inverse_round_trips(cfg in arb_config(), i in arb_label_pos()) {
        let a = Alpha::new(&cfg.allowed()[i], &cfg).unwrap();
        let inv = inverse(&a, &cfg).unwrap();
        prop_assert_eq!(find_prod(&a, &inv, &cfg).unwrap(), Alpha::point());
    }

    #[test]
    fn prop_commutator_is_signed_point(cfg in arb_config(), i in arb_label_pos(), j in arb_label_pos()) {
        let a = Alpha::new(&cfg.allowed()[i], &cfg).unwrap();
        let b = Alpha::new(&cfg.allowed()[j], &cfg).unwrap();
        prop_assert!(commutator(&a, &b, &cfg).unwrap().is_point());
    }

    #[test]
    fn prop_product_signs_antisymmetric_for_distinct_generators(
        cfg in arb_config(), i in 0..4usize, j in 0..4usize
    ) {
        prop_assume!(i != j);
        let gens = ["0", "1", "2", "3"];
        let a = Alpha::new(gens[i], &cfg).unwrap();
        let b = Alpha::new(gens[j], &cfg).unwrap();
        let ab = find_prod(&a, &b, &cfg).unwrap();
        let ba = find_prod(&b, &a, &cfg).unwrap();
        prop_assert_eq!(ab.index(), ba.index());
        prop_assert_eq!(ab.sign(), ba.sign().flip());
    }

    #[test]
    fn prop_self_subtraction_cancels(cfg in arb_config(), labels in arb_term_labels()) {
        let m = build_mvec(&labels, &cfg);
        prop_assert!((&m - &m).is_empty());
    }

    #[test]
    fn prop_adding_negation_cancels(cfg in arb_config(), labels in arb_term_labels()) {
        let m = build_mvec(&labels, &cfg);
        prop_assert!((&m + &-&m).is_empty());
    }

    #[test]
    fn prop_addition_is_commutative(
        cfg in arb_config(), a in arb_term_labels(), b in arb_term_labels()
    ) {
        let ma = build_mvec(&a, &cfg);
        let mb = build_mvec(&b, &cfg);
        prop_assert_eq!(&ma + &mb, &mb + &ma);
    }

    #[test]
    fn prop_len_is_total_terms(cfg in arb_config(), labels in arb_term_labels()) {
        // After cancellation, the survivor count matches the net
        // multiplicity of each signed label.
        let m = build_mvec(&labels, &cfg);
        let mut net = vec![0i64; 16];
        for (pos, negate) in &labels {
            net[*pos] += if *negate { -1 } else { 1 };
        }
        let expected: i64 = net.iter().map(|n| n.abs()).sum();
        prop_assert_eq!(m.len() as i64, expected);
    }
}
