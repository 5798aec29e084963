//! Display rendering for algebra values.
//!
//! Alphas render as `α` with subscripted indices, values as `ξ` with their
//! partial operators outermost, multivectors as a brace block listing the
//! occupied buckets in configured order.

use std::fmt;

use crate::alpha::Alpha;
use crate::differential::Differential;
use crate::multivector::MultiVector;
use crate::product::inverse;
use crate::term::Term;
use crate::xi::{Xi, XiProduct, XiValue};

/// Subscript character for an index symbol, if one exists.
fn subscript(c: char) -> Option<char> {
    match c {
        '0' => Some('₀'),
        '1' => Some('₁'),
        '2' => Some('₂'),
        '3' => Some('₃'),
        'p' => Some('ₚ'),
        'i' => Some('ᵢ'),
        'j' => Some('ⱼ'),
        'k' => Some('ₖ'),
        _ => None,
    }
}

fn superscript_digit(c: char) -> char {
    match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        _ => c,
    }
}

/// A label with every character subscripted, or `None` if any character has
/// no subscript form (vector notation and reduced labels print raw).
pub fn subscripted(label: &str) -> Option<String> {
    label.chars().map(subscript).collect()
}

/// The partial-operator prefix, oldest application leftmost.
fn partials_prefix(partials: &[Alpha]) -> String {
    let mut out = String::new();
    for p in partials.iter().rev() {
        out.push('∂');
        match subscripted(p.index()) {
            Some(sub) => out.push_str(&sub),
            None => out.push_str(p.index()),
        }
    }
    out
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign().is_neg() {
            write!(f, "-")?;
        }
        match subscripted(self.index()) {
            Some(sub) => write!(f, "α{sub}"),
            None => write!(f, "α{}", self.index()),
        }
    }
}

impl fmt::Display for Xi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign().is_neg() {
            write!(f, "-")?;
        }
        write!(f, "{}", partials_prefix(self.partials()))?;
        match subscripted(self.val()) {
            Some(sub) => write!(f, "ξ{sub}"),
            None => write!(f, "{}", self.val()),
        }
    }
}

impl fmt::Display for XiProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign().is_neg() {
            write!(f, "-")?;
        }
        write!(f, "{}", partials_prefix(self.partials()))?;

        let rendered: Vec<String> = self.components().iter().map(|c| c.to_string()).collect();
        if rendered.len() > 1 && rendered.iter().all(|c| *c == rendered[0]) {
            // Equal factors collapse to a power.
            let power: String = rendered
                .len()
                .to_string()
                .chars()
                .map(superscript_digit)
                .collect();
            write!(f, "{}{power}", rendered[0])
        } else {
            write!(f, "{}", rendered.join("."))
        }
    }
}

impl fmt::Display for XiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XiValue::Atom(x) => write!(f, "{x}"),
            XiValue::Product(p) => write!(f, "{p}"),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.alpha(), self.xi())
    }
}

impl fmt::Display for MultiVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for (alpha, terms) in self.iter_alphas() {
            let values: Vec<String> = terms.iter().map(|t| t.xi().to_string()).collect();
            writeln!(f, "  {:<5}( {} )", alpha.to_string(), values.join(" "))?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Differential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(self.wrt().len());
        for a in self.wrt() {
            let inv = inverse(a, self.config()).map_err(|_| fmt::Error)?;
            let sub = subscripted(a.index()).unwrap_or_else(|| a.index().to_string());
            parts.push(format!("{inv}∂{sub}"));
        }
        write!(f, "{{ {} }}", parts.join(" "))
    }
}
