//! Symbolic scalar values.
//!
//! A `Xi` is a real-valued symbolic quantity bound to a label, carrying the
//! partial-derivative operators that have been applied to it. Partials are
//! stored most-recent-first: differentiation *prepends*, so index 0 is
//! always the outermost operator. The reduction engine's partial matching
//! relies on this order.

use std::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::alpha::{Alpha, Sign};
use crate::config::ArConfig;

/// A single signed symbolic scalar.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Xi {
    val: String,
    partials: Vec<Alpha>,
    sign: Sign,
}

impl Xi {
    /// Build a Xi from a label, stripping a leading `-` into the sign.
    pub fn new(val: &str) -> Xi {
        let (val, sign) = Sign::strip(val);
        Xi {
            val: val.to_string(),
            partials: Vec::new(),
            sign,
        }
    }

    /// Build a Xi with explicit partials and sign. A leading `-` on the
    /// label still folds into the sign.
    pub fn with_partials(val: &str, partials: Vec<Alpha>, sign: Sign) -> Xi {
        let (val, stripped) = Sign::strip(val);
        Xi {
            val: val.to_string(),
            partials,
            sign: sign * stripped,
        }
    }

    /// A Xi labelled by a basis element; the alpha's sign carries over.
    pub fn from_alpha(alpha: &Alpha) -> Xi {
        Xi {
            val: alpha.index().to_string(),
            partials: Vec::new(),
            sign: alpha.sign(),
        }
    }

    pub fn val(&self) -> &str {
        &self.val
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn partials(&self) -> &[Alpha] {
        &self.partials
    }

    /// Same value with the given sign.
    pub fn signed(&self, sign: Sign) -> Xi {
        Xi {
            val: self.val.clone(),
            partials: self.partials.clone(),
            sign,
        }
    }

    /// A new Xi with `wrt` prepended as the outermost partial.
    pub fn with_prepended_partial(&self, wrt: &Alpha) -> Xi {
        let mut partials = Vec::with_capacity(self.partials.len() + 1);
        partials.push(wrt.clone());
        partials.extend(self.partials.iter().cloned());
        Xi {
            val: self.val.clone(),
            partials,
            sign: self.sign,
        }
    }

    /// Sort key used when normalizing product components: configured basis
    /// position first, then the raw label.
    fn order_key(&self, cfg: &ArConfig) -> (usize, String) {
        let pos = cfg.index_position(&self.val).unwrap_or(usize::MAX);
        (pos, self.val.clone())
    }
}

impl Neg for Xi {
    type Output = Xi;

    fn neg(mut self) -> Xi {
        self.sign = self.sign.flip();
        self
    }
}

impl Neg for &Xi {
    type Output = Xi;

    fn neg(self) -> Xi {
        -self.clone()
    }
}

/// A product of several Xi factors with one aggregate sign.
///
/// Factor-level signs are folded into the product sign at construction and
/// the factors are sorted canonically, so structurally equal products
/// compare equal regardless of the order they were multiplied in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct XiProduct {
    components: Vec<Xi>,
    partials: Vec<Alpha>,
    sign: Sign,
}

impl XiProduct {
    pub fn new(components: Vec<Xi>, cfg: &ArConfig) -> XiProduct {
        XiProduct::with_partials(components, Vec::new(), Sign::Pos, cfg)
    }

    pub fn with_partials(
        components: Vec<Xi>,
        partials: Vec<Alpha>,
        sign: Sign,
        cfg: &ArConfig,
    ) -> XiProduct {
        let mut sign = sign;
        let mut components: Vec<Xi> = components
            .into_iter()
            .map(|c| {
                sign = sign * c.sign();
                c.signed(Sign::Pos)
            })
            .collect();
        components.sort_by(|a, b| a.order_key(cfg).cmp(&b.order_key(cfg)));
        XiProduct {
            components,
            partials,
            sign,
        }
    }

    pub fn components(&self) -> &[Xi] {
        &self.components
    }

    pub fn partials(&self) -> &[Alpha] {
        &self.partials
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn with_prepended_partial(&self, wrt: &Alpha) -> XiProduct {
        let mut partials = Vec::with_capacity(self.partials.len() + 1);
        partials.push(wrt.clone());
        partials.extend(self.partials.iter().cloned());
        XiProduct {
            components: self.components.clone(),
            partials,
            sign: self.sign,
        }
    }
}

impl Neg for XiProduct {
    type Output = XiProduct;

    fn neg(mut self) -> XiProduct {
        self.sign = self.sign.flip();
        self
    }
}

/// Either a single symbolic scalar or a product of them: the value slot of a
/// term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum XiValue {
    Atom(Xi),
    Product(XiProduct),
}

impl XiValue {
    pub fn sign(&self) -> Sign {
        match self {
            XiValue::Atom(x) => x.sign(),
            XiValue::Product(p) => p.sign(),
        }
    }

    /// Same value with the given sign.
    pub fn signed(&self, sign: Sign) -> XiValue {
        match self {
            XiValue::Atom(x) => XiValue::Atom(x.signed(sign)),
            XiValue::Product(p) => XiValue::Product(XiProduct {
                components: p.components.clone(),
                partials: p.partials.clone(),
                sign,
            }),
        }
    }

    /// The outermost partial-derivative operators.
    pub fn partials(&self) -> &[Alpha] {
        match self {
            XiValue::Atom(x) => x.partials(),
            XiValue::Product(p) => p.partials(),
        }
    }

    /// The Xi factors: a one-element slice for an atom.
    pub fn components(&self) -> &[Xi] {
        match self {
            XiValue::Atom(x) => std::slice::from_ref(x),
            XiValue::Product(p) => p.components(),
        }
    }

    pub fn with_prepended_partial(&self, wrt: &Alpha) -> XiValue {
        match self {
            XiValue::Atom(x) => XiValue::Atom(x.with_prepended_partial(wrt)),
            XiValue::Product(p) => XiValue::Product(p.with_prepended_partial(wrt)),
        }
    }

    /// Combine two values into a product value, flattening factor lists and
    /// concatenating any outer partials (a differentiated product stays one
    /// opaque differentiated quantity).
    pub fn product_of(a: &XiValue, b: &XiValue, cfg: &ArConfig) -> XiValue {
        let mut components: Vec<Xi> = Vec::new();
        let mut partials: Vec<Alpha> = Vec::new();
        let mut sign = Sign::Pos;
        for value in [a, b] {
            sign = sign * value.sign();
            partials.extend(value.partials().iter().cloned());
            components.extend(value.components().iter().map(|x| x.signed(Sign::Pos)));
        }
        XiValue::Product(XiProduct::with_partials(components, partials, sign, cfg))
    }
}

impl Neg for XiValue {
    type Output = XiValue;

    fn neg(self) -> XiValue {
        match self {
            XiValue::Atom(x) => XiValue::Atom(-x),
            XiValue::Product(p) => XiValue::Product(-p),
        }
    }
}

impl Neg for &XiValue {
    type Output = XiValue;

    fn neg(self) -> XiValue {
        -self.clone()
    }
}

impl From<Xi> for XiValue {
    fn from(x: Xi) -> XiValue {
        XiValue::Atom(x)
    }
}

impl From<XiProduct> for XiValue {
    fn from(p: XiProduct) -> XiValue {
        XiValue::Product(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_minus_folds_into_sign() {
        let x = Xi::new("-p");
        assert_eq!(x.val(), "p");
        assert_eq!(x.sign(), Sign::Neg);
    }

    #[test]
    fn product_normalizes_component_signs() {
        let cfg = ArConfig::default();
        let a = Xi::new("-1");
        let b = Xi::new("-2");
        let p = XiProduct::new(vec![a, b], &cfg);
        assert_eq!(p.sign(), Sign::Pos);
        assert!(p.components().iter().all(|c| c.sign() == Sign::Pos));

        let p = XiProduct::new(vec![Xi::new("-1"), Xi::new("2")], &cfg);
        assert_eq!(p.sign(), Sign::Neg);
    }

    #[test]
    fn product_components_sort_canonically() {
        let cfg = ArConfig::default();
        let p1 = XiProduct::new(vec![Xi::new("2"), Xi::new("1")], &cfg);
        let p2 = XiProduct::new(vec![Xi::new("1"), Xi::new("2")], &cfg);
        assert_eq!(p1, p2);
    }

    #[test]
    fn prepended_partial_is_outermost() {
        let cfg = ArConfig::default();
        let wrt1 = Alpha::new("1", &cfg).unwrap();
        let wrt2 = Alpha::new("2", &cfg).unwrap();
        let x = Xi::new("p")
            .with_prepended_partial(&wrt1)
            .with_prepended_partial(&wrt2);
        assert_eq!(x.partials()[0], wrt2);
        assert_eq!(x.partials()[1], wrt1);
    }

    #[test]
    fn negation_is_involutive() {
        let x = Xi::new("01");
        assert_eq!(-(-x.clone()), x);
    }
}
