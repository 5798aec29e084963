//! The standard reduction templates and their replacement builders.
//!
//! Pattern slots name an orientation (`e` time-like, then `x`/`y`/`z`) and
//! may tag a zet-group variable; replacement builders read the assembled
//! bindings and emit the compact del-notation term. The naming follows the
//! vector-calculus identities being recognized:
//!
//! - grad:  `∇f    = αx ∂f/∂x + αy ∂f/∂y + αz ∂f/∂z`
//! - div:   `∇•F   = ∂Fx/∂x + ∂Fy/∂y + ∂Fz/∂z`
//! - curl:  `∇xF   = αx[∂Fz/∂y - ∂Fy/∂z] + αy[∂Fx/∂z - ∂Fz/∂x] + αz[∂Fy/∂x - ∂Fx/∂y]`
//! - partial: `∂F  = the same-direction derivative of a whole 3-vector`
//!
//! plus the product groupings (dot, wedge, blade·3-vector, whole 3-vector
//! and its square) used when multivector products are reduced.

use absrel_algebra::{
    subscripted, Alpha, ArConfig, Orientation, Sign, Term, Xi, XiValue, Zet,
};

use crate::pattern::{Bindings, Slot, TermPattern};
use crate::template::{Replacement, Template};

use Orientation::{T as E, X, Y, Z};

/// Superscript tag for non-standard zets; the A zet carries the plain
/// 3-vector calculus operators.
fn zet_tag(zet: Zet) -> &'static str {
    if zet == Zet::A {
        ""
    } else {
        zet.superscript()
    }
}

fn label_term(alpha_label: &str, sign: Sign, value: String, cfg: &ArConfig) -> Option<Term> {
    let alpha = Alpha::with_sign(alpha_label, sign, cfg).ok()?;
    Some(Term::new(alpha, XiValue::Atom(Xi::new(&value))))
}

fn grad_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let field = b.get_value('k')?;
    let alpha_zet = b.get_zet('G')?;
    let partial_zet = b.get_zet('H')?;
    let field = subscripted(field).unwrap_or_else(|| field.to_string());
    let alpha = cfg.alpha_group(cfg.zet_component(alpha_zet, X))?;
    label_term(alpha, b.sign(), format!("∇{}Ξ{field}", zet_tag(partial_zet)), cfg)
}

fn div_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha_zet = b.get_zet('F')?;
    let partial_zet = b.get_zet('G')?;
    let field_zet = b.get_zet('H')?;
    let alpha = cfg.zet_component(alpha_zet, E);
    label_term(
        alpha,
        b.sign(),
        format!("∇{}•{}", zet_tag(partial_zet), field_zet.name()),
        cfg,
    )
}

fn curl_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha_zet = b.get_zet('F')?;
    let partial_zet = b.get_zet('G')?;
    let field_zet = b.get_zet('H')?;
    let alpha = cfg.alpha_group(cfg.zet_component(alpha_zet, X))?;
    label_term(
        alpha,
        b.sign(),
        format!("∇{}x{}", zet_tag(partial_zet), field_zet.name()),
        cfg,
    )
}

fn partial_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha_zet = b.get_zet('F')?;
    let partial_zet = b.get_zet('G')?;
    let field_zet = b.get_zet('H')?;
    let alpha = cfg.alpha_group(cfg.zet_component(alpha_zet, X))?;
    let wrt = cfg.zet_component(partial_zet, E);
    let wrt = subscripted(wrt).unwrap_or_else(|| wrt.to_string());
    label_term(
        alpha,
        b.sign(),
        format!("∂{wrt}{}", field_zet.name()),
        cfg,
    )
}

fn dot_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha_zet = b.get_zet('F')?;
    let left = b.get_zet('G')?;
    let right = b.get_zet('H')?;
    let alpha = cfg.zet_component(alpha_zet, E);
    label_term(
        alpha,
        b.sign(),
        format!("{}•{}", left.name(), right.name()),
        cfg,
    )
}

fn dot_square_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha_zet = b.get_zet('F')?;
    let vector = b.get_zet('G')?;
    let alpha = cfg.zet_component(alpha_zet, E);
    label_term(alpha, b.sign(), format!("{}²", vector.name()), cfg)
}

fn wedge_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha_zet = b.get_zet('F')?;
    let left = b.get_zet('G')?;
    let right = b.get_zet('H')?;
    let alpha = cfg.alpha_group(cfg.zet_component(alpha_zet, X))?;
    label_term(
        alpha,
        b.sign(),
        format!("{}Λ{}", left.name(), right.name()),
        cfg,
    )
}

fn blade_3vec_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha_zet = b.get_zet('F')?;
    let blade_zet = b.get_zet('G')?;
    let vector_zet = b.get_zet('H')?;
    // The time-like element of each zet under its scalar shorthand.
    let blade = match blade_zet {
        Zet::B => 'p',
        Zet::T => 't',
        Zet::A => 'h',
        Zet::E => 'q',
    };
    let alpha = cfg.zet_component(alpha_zet, X);
    label_term(
        alpha,
        b.sign(),
        format!("{blade}{}", vector_zet.name()),
        cfg,
    )
}

fn whole_3vec_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha = b.get_value('k')?.to_string();
    let vector = b.get_zet('G')?;
    label_term(&alpha, b.sign(), vector.name().to_string(), cfg)
}

fn whole_3vec_squared_build(b: &Bindings, cfg: &ArConfig) -> Option<Term> {
    let alpha = b.get_value('k')?.to_string();
    let vector = b.get_zet('G')?;
    label_term(&alpha, b.sign(), format!("{}²", vector.name()), cfg)
}

fn plain(replacement: fn(&Bindings, &ArConfig) -> Option<Term>) -> Vec<Replacement> {
    vec![Replacement {
        distinct: &[],
        equal: &[],
        build: replacement,
    }]
}

/// `∇f`: the three same-field spatial derivatives, one per direction.
pub fn grad_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::grouped(o, 'G'))
            .partials([Slot::grouped(o, 'H')])
            .xis([Slot::free('k')])
    };
    Template::new(
        "grad",
        vec![pattern(X), pattern(Y), pattern(Z)],
        plain(grad_build),
    )
}

/// `∇•F`: same-direction derivatives of a 3-vector's components, collected
/// on a time-like alpha.
pub fn div_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::grouped(E, 'F'))
            .partials([Slot::grouped(o, 'G')])
            .xis([Slot::grouped(o, 'H')])
    };
    Template::new(
        "div",
        vec![pattern(X), pattern(Y), pattern(Z)],
        plain(div_build),
    )
}

/// `∇xF`: six cross-direction derivatives with alternating signs.
pub fn curl_template() -> Template {
    let pattern = |sign: Sign, alpha: Orientation, partial: Orientation, xi: Orientation| {
        TermPattern::new(sign, Slot::grouped(alpha, 'F'))
            .partials([Slot::grouped(partial, 'G')])
            .xis([Slot::grouped(xi, 'H')])
    };
    Template::new(
        "curl",
        vec![
            pattern(Sign::Pos, X, Y, Z),
            pattern(Sign::Neg, X, Z, Y),
            pattern(Sign::Pos, Y, Z, X),
            pattern(Sign::Neg, Y, X, Z),
            pattern(Sign::Pos, Z, X, Y),
            pattern(Sign::Neg, Z, Y, X),
        ],
        plain(curl_build),
    )
}

/// `∂F`: one time-like derivative applied across a whole 3-vector.
pub fn partial_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::grouped(o, 'F'))
            .partials([Slot::grouped(E, 'G')])
            .xis([Slot::grouped(o, 'H')])
    };
    Template::new(
        "partial",
        vec![pattern(X), pattern(Y), pattern(Z)],
        plain(partial_build),
    )
}

/// `F•G`: same-direction products collected on a time-like alpha. A product
/// of a 3-vector with itself collapses to its square instead.
pub fn dot_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::grouped(E, 'F'))
            .partials([])
            .xis([Slot::grouped(o, 'G'), Slot::grouped(o, 'H')])
    };
    Template::new(
        "dot",
        vec![pattern(X), pattern(Y), pattern(Z)],
        vec![
            Replacement {
                distinct: &[],
                equal: &['G', 'H'],
                build: dot_square_build,
            },
            Replacement {
                distinct: &[],
                equal: &[],
                build: dot_build,
            },
        ],
    )
}

/// `FΛG`: cross-direction products with alternating signs.
pub fn wedge_template() -> Template {
    let pattern = |sign: Sign, alpha: Orientation, left: Orientation, right: Orientation| {
        TermPattern::new(sign, Slot::grouped(alpha, 'F'))
            .partials([])
            .xis([Slot::grouped(left, 'G'), Slot::grouped(right, 'H')])
    };
    Template::new(
        "wedge",
        vec![
            pattern(Sign::Pos, X, Y, Z),
            pattern(Sign::Neg, X, Z, Y),
            pattern(Sign::Pos, Y, Z, X),
            pattern(Sign::Neg, Y, X, Z),
            pattern(Sign::Pos, Z, X, Y),
            pattern(Sign::Neg, Z, Y, X),
        ],
        plain(wedge_build),
    )
}

/// A time-like blade multiplying each component of a 3-vector.
pub fn blade_3vec_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::grouped(o, 'F'))
            .partials([])
            .xis([Slot::grouped(E, 'G'), Slot::grouped(o, 'H')])
    };
    Template::new(
        "blade_3vec",
        vec![pattern(X), pattern(Y), pattern(Z)],
        plain(blade_3vec_build),
    )
}

/// The flipped factor order of [`blade_3vec_template`] (`Fb` as well as
/// `bF`).
pub fn blade_3vec_flipped_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::grouped(o, 'F'))
            .partials([])
            .xis([Slot::grouped(o, 'H'), Slot::grouped(E, 'G')])
    };
    Template::new(
        "blade_3vec_flipped",
        vec![pattern(X), pattern(Y), pattern(Z)],
        plain(blade_3vec_build),
    )
}

/// All three components of one 3-vector sitting under a single alpha.
pub fn whole_3vec_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::free('k'))
            .partials([])
            .xis([Slot::grouped(o, 'G')])
    };
    Template::new(
        "whole_3vec",
        vec![pattern(X), pattern(Y), pattern(Z)],
        plain(whole_3vec_build),
    )
}

/// The squared components of one 3-vector sitting under a single alpha.
pub fn whole_3vec_squared_template() -> Template {
    let pattern = |o: Orientation| {
        TermPattern::new(Sign::Pos, Slot::free('k'))
            .partials([])
            .xis([Slot::grouped(o, 'G'), Slot::grouped(o, 'G')])
    };
    Template::new(
        "whole_3vec_squared",
        vec![pattern(X), pattern(Y), pattern(Z)],
        plain(whole_3vec_squared_build),
    )
}

/// Cancel exact value/negation pairs under each alpha, preserving net
/// multiplicity.
pub fn cancel_like_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut kept: Vec<Term> = Vec::with_capacity(terms.len());
    for term in terms {
        let negated = -&term;
        if let Some(pos) = kept.iter().position(|k| *k == negated) {
            kept.remove(pos);
        } else {
            kept.push(term);
        }
    }
    kept
}

/// The del-grouping stages: partial, grad, div, curl.
pub fn del_stages() -> Vec<Template> {
    vec![
        partial_template(),
        grad_template(),
        div_template(),
        curl_template(),
    ]
}

/// Every standard reduction stage, in the canonical order.
pub fn full_stages() -> Vec<Template> {
    vec![
        partial_template(),
        grad_template(),
        div_template(),
        curl_template(),
        blade_3vec_template(),
        blade_3vec_flipped_template(),
        dot_template(),
        wedge_template(),
        whole_3vec_squared_template(),
        whole_3vec_template(),
    ]
}

/// Cancel like terms, then run each template stage over the stream in
/// order.
pub fn reduce_terms(terms: Vec<Term>, stages: &[Template], cfg: &ArConfig) -> Vec<Term> {
    let mut terms = cancel_like_terms(terms);
    for stage in stages {
        terms = stage.replace(terms, cfg);
    }
    terms
}
