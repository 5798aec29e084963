//! Algebra configuration: basis ordering, metric signature, division
//! convention, and every table derived from them.
//!
//! A configuration is an immutable value. "Changing the metric" means
//! building a new `ArConfig` and constructing new algebra values against it;
//! values built from different configurations never compare equal and will
//! not combine. All derived lookups, including the full 16×16 Cayley table
//! for the canonical product, are computed once at construction.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::alpha::Sign;
use crate::error::AlgebraError;
use crate::product::raw_product;
use crate::zet::{Orientation, Zet};

/// Which operand a symbolic division inverts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivisionType {
    /// `a / b = a · b⁻¹` — divide *by* the right operand.
    By,
    /// `a / b = a⁻¹ · b` — divide the left operand *into* the right.
    Into,
}

impl FromStr for DivisionType {
    type Err = AlgebraError;

    fn from_str(s: &str) -> Result<DivisionType, AlgebraError> {
        match s {
            "by" => Ok(DivisionType::By),
            "into" => Ok(DivisionType::Into),
            other => Err(AlgebraError::InvalidDivision {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DivisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivisionType::By => write!(f, "by"),
            DivisionType::Into => write!(f, "into"),
        }
    }
}

/// The four generator signs: whether each of `α0..α3` squares to `+αp` or
/// `-αp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metric([Sign; 4]);

impl Metric {
    pub fn new(signs: [Sign; 4]) -> Metric {
        Metric(signs)
    }

    pub fn signs(&self) -> [Sign; 4] {
        self.0
    }

    /// The metric sign for a generator character (`'0'..'3'`).
    pub fn sign_for(&self, generator: char) -> Result<Sign, AlgebraError> {
        match generator {
            '0' => Ok(self.0[0]),
            '1' => Ok(self.0[1]),
            '2' => Ok(self.0[2]),
            '3' => Ok(self.0[3]),
            other => Err(AlgebraError::InvalidIndex {
                index: other.to_string(),
            }),
        }
    }
}

impl FromStr for Metric {
    type Err = AlgebraError;

    /// Parse a metric from a four-character sign string such as `"+---"`.
    fn from_str(s: &str) -> Result<Metric, AlgebraError> {
        let signs: Vec<Sign> = s
            .chars()
            .map(|c| match c {
                '+' => Ok(Sign::Pos),
                '-' => Ok(Sign::Neg),
                _ => Err(AlgebraError::InvalidMetric {
                    value: s.to_string(),
                }),
            })
            .collect::<Result<_, _>>()?;
        let signs: [Sign; 4] = signs
            .try_into()
            .map_err(|_| AlgebraError::InvalidMetric {
                value: s.to_string(),
            })?;
        Ok(Metric(signs))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sign in self.0 {
            write!(f, "{}", if sign.is_neg() { '-' } else { '+' })?;
        }
        Ok(())
    }
}

/// The full parameterization of the algebra plus all derived lookup tables.
#[derive(Clone, Debug)]
pub struct ArConfig {
    allowed: Vec<String>,
    metric: Metric,
    division: DivisionType,

    position: HashMap<String, usize>,
    // One basis label per (zet, orientation) cell.
    zet_comps: [[String; 4]; 4],
    alpha_to_group: HashMap<String, String>,
    allowed_groups: Vec<String>,
    group_to_zet: HashMap<String, Zet>,
    // cayley[i][j] = (position of the product label, product sign).
    cayley: Vec<Vec<(usize, Sign)>>,
}

impl PartialEq for ArConfig {
    fn eq(&self, other: &ArConfig) -> bool {
        self.allowed == other.allowed
            && self.metric == other.metric
            && self.division == other.division
    }
}

impl Eq for ArConfig {}

/// The default labelling and ordering of the 16 elements. The order affects
/// canonical label directions and display, not the structure of products.
const DEFAULT_ALLOWED: [&str; 16] = [
    "p", "23", "31", "12", // ΞB: magnetic field and rest mass
    "0", "023", "031", "012", // ΞT: angular momentum and charge density
    "123", "1", "2", "3", // ΞA: current density and hedgehog
    "0123", "01", "02", "03", // ΞE: electric field and dual rest mass
];

impl Default for ArConfig {
    fn default() -> ArConfig {
        let allowed = DEFAULT_ALLOWED.iter().map(|s| s.to_string()).collect();
        let metric = Metric::new([Sign::Pos, Sign::Neg, Sign::Neg, Sign::Neg]);
        ArConfig::new(allowed, metric, DivisionType::Into)
            .expect("the default configuration is valid")
    }
}

impl ArConfig {
    /// Validate the parameters and derive every dependent table.
    pub fn new(
        allowed: Vec<String>,
        metric: Metric,
        division: DivisionType,
    ) -> Result<ArConfig, AlgebraError> {
        validate_allowed(&allowed)?;

        let position: HashMap<String, usize> = allowed
            .iter()
            .enumerate()
            .map(|(pos, label)| (label.clone(), pos))
            .collect();

        // One representative label per (zet, orientation) cell, classified
        // from generator sets so the assignment is independent of ordering.
        let mut zet_comps: [[String; 4]; 4] = Default::default();
        for label in &allowed {
            let zet = Zet::of_index(label)?;
            let orientation = Orientation::of_index(label)?;
            zet_comps[zet as usize][orientation as usize] = label.clone();
        }

        // The E-zet group label preserves the configured generator order.
        let e_key = if zet_comps[Zet::E as usize][Orientation::X as usize].starts_with('0') {
            "0i"
        } else {
            "i0"
        };
        let group_labels: [(Zet, &str); 4] = [
            (Zet::A, "i"),
            (Zet::E, e_key),
            (Zet::B, "jk"),
            (Zet::T, "0jk"),
        ];

        let mut alpha_to_group = HashMap::new();
        for label in &allowed {
            let group = if Orientation::of_index(label)? == Orientation::T {
                label.clone()
            } else {
                let zet = Zet::of_index(label)?;
                group_labels
                    .iter()
                    .find(|(z, _)| *z == zet)
                    .map(|(_, g)| g.to_string())
                    .unwrap_or_default()
            };
            alpha_to_group.insert(label.clone(), group);
        }

        let h = zet_comps[Zet::A as usize][Orientation::T as usize].clone();
        let q = zet_comps[Zet::E as usize][Orientation::T as usize].clone();
        let t = zet_comps[Zet::T as usize][Orientation::T as usize].clone();
        let mut allowed_groups = vec!["p".to_string(), t, h, q];
        allowed_groups.extend(group_labels.iter().map(|(_, g)| g.to_string()));

        let group_to_zet: HashMap<String, Zet> = group_labels
            .iter()
            .map(|(zet, label)| (label.to_string(), *zet))
            .collect();

        let targets: Vec<(BTreeSet<char>, String)> = allowed
            .iter()
            .map(|label| {
                let set = if label == "p" {
                    BTreeSet::new()
                } else {
                    label.chars().collect()
                };
                (set, label.clone())
            })
            .collect();

        let mut cayley = Vec::with_capacity(16);
        for i in &allowed {
            let mut row = Vec::with_capacity(16);
            for j in &allowed {
                let (label, sign) = raw_product(i, j, &metric, &targets)?;
                let pos = *position
                    .get(&label)
                    .ok_or(AlgebraError::InvalidIndex { index: label })?;
                row.push((pos, sign));
            }
            cayley.push(row);
        }

        Ok(ArConfig {
            allowed,
            metric,
            division,
            position,
            zet_comps,
            alpha_to_group,
            allowed_groups,
            group_to_zet,
            cayley,
        })
    }

    /// The default configuration wrapped for shared ownership.
    pub fn default_shared() -> Arc<ArConfig> {
        Arc::new(ArConfig::default())
    }

    /// A copy of this configuration with a different metric.
    pub fn with_metric(&self, metric: Metric) -> Result<ArConfig, AlgebraError> {
        ArConfig::new(self.allowed.clone(), metric, self.division)
    }

    /// A copy of this configuration with a different division convention.
    pub fn with_division(&self, division: DivisionType) -> Result<ArConfig, AlgebraError> {
        ArConfig::new(self.allowed.clone(), self.metric, division)
    }

    /// A copy of this configuration with a different basis ordering.
    pub fn with_allowed(&self, allowed: Vec<String>) -> Result<ArConfig, AlgebraError> {
        ArConfig::new(allowed, self.metric, self.division)
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn division(&self) -> DivisionType {
        self.division
    }

    /// The 8 labels results group under: the four time-like scalars plus the
    /// four 3-vector group names.
    pub fn allowed_groups(&self) -> &[String] {
        &self.allowed_groups
    }

    /// The four 3-vector group names (`i`, `0i`/`i0`, `jk`, `0jk`).
    pub fn vector_groups(&self) -> &[String] {
        &self.allowed_groups[4..]
    }

    pub fn is_allowed(&self, index: &str) -> bool {
        self.position.contains_key(index)
    }

    pub fn is_group(&self, index: &str) -> bool {
        self.allowed_groups.iter().any(|g| g == index)
    }

    pub fn index_position(&self, index: &str) -> Option<usize> {
        self.position.get(index).copied()
    }

    /// The basis label occupying a (zet, orientation) cell.
    pub fn zet_component(&self, zet: Zet, orientation: Orientation) -> &str {
        &self.zet_comps[zet as usize][orientation as usize]
    }

    /// The group name for a zet's spatial 3-vector.
    pub fn group_label(&self, zet: Zet) -> &str {
        match zet {
            Zet::A => &self.allowed_groups[4],
            Zet::E => &self.allowed_groups[5],
            Zet::B => &self.allowed_groups[6],
            Zet::T => &self.allowed_groups[7],
        }
    }

    /// The group a basis label is collected under when results are reduced:
    /// time-like labels stand alone, spatial labels join their zet's
    /// 3-vector group.
    pub fn alpha_group(&self, index: &str) -> Option<&str> {
        self.alpha_to_group.get(index).map(|s| s.as_str())
    }

    /// The zet a 3-vector group name belongs to.
    pub fn group_zet(&self, group: &str) -> Option<Zet> {
        self.group_to_zet.get(group).copied()
    }

    /// Cayley-table lookup for two basis labels, ignoring operand signs.
    pub(crate) fn cayley_lookup(&self, i: &str, j: &str) -> Result<(&str, Sign), AlgebraError> {
        let pi = self
            .position
            .get(i)
            .ok_or_else(|| AlgebraError::UndefinedProduct {
                index: i.to_string(),
            })?;
        let pj = self
            .position
            .get(j)
            .ok_or_else(|| AlgebraError::UndefinedProduct {
                index: j.to_string(),
            })?;
        let (pos, sign) = self.cayley[*pi][*pj];
        Ok((&self.allowed[pos], sign))
    }
}

fn validate_allowed(allowed: &[String]) -> Result<(), AlgebraError> {
    if allowed.len() != 16 {
        return Err(AlgebraError::InvalidAllowed {
            reason: format!("expected 16 basis labels, got {}", allowed.len()),
        });
    }

    let mut seen: BTreeSet<BTreeSet<char>> = BTreeSet::new();
    for label in allowed {
        let valid = label == "p"
            || (!label.is_empty() && label.chars().all(|c| matches!(c, '0'..='3')));
        if !valid {
            return Err(AlgebraError::InvalidAllowed {
                reason: format!("invalid basis label '{label}'"),
            });
        }
        let set: BTreeSet<char> = if label == "p" {
            BTreeSet::new()
        } else {
            label.chars().collect()
        };
        if set.len() != label.len() && label != "p" {
            return Err(AlgebraError::InvalidAllowed {
                reason: format!("repeated generator in label '{label}'"),
            });
        }
        if !seen.insert(set) {
            return Err(AlgebraError::InvalidAllowed {
                reason: format!("duplicate generator combination '{label}'"),
            });
        }
    }

    // 16 distinct subsets of a 4-element set means every combination is
    // present exactly once.
    Ok(())
}
