//! Category representation with its conversion rule

use std::collections::{HashMap, HashSet};
use engconv_core::{ConvError, Result};

/// Converts `value` from one unit name to another within a single category.
///
/// Used for relationships that are not a pure scale factor (temperature).
pub type AffineFn = fn(value: f64, from: &str, to: &str) -> Result<f64>;

/// How the units of a category relate to each other
#[derive(Debug, Clone)]
pub enum ConversionRule {
    /// Every unit is a fixed multiple of a base unit
    Linear(LinearRule),
    /// Offset relationships handled by a dedicated transform
    Affine(AffineFn),
}

impl ConversionRule {
    /// Check if this is a scale-only rule
    pub fn is_linear(&self) -> bool {
        matches!(self, ConversionRule::Linear(_))
    }

    /// Short name of the rule kind
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionRule::Linear(_) => "linear",
            ConversionRule::Affine(_) => "affine",
        }
    }
}

/// Scale factors relative to a base unit.
///
/// A factor answers "how many of this unit equal one base unit", so
/// converting A to B is `value / factor[A] * factor[B]`.
#[derive(Debug, Clone)]
pub struct LinearRule {
    base: &'static str,
    units: Vec<&'static str>,
    factors: HashMap<&'static str, f64>,
}

impl LinearRule {
    /// Build from `(unit, factor)` pairs; the first pair names the base unit
    pub fn new(factors: &[(&'static str, f64)]) -> Self {
        LinearRule {
            base: factors.first().map(|(unit, _)| *unit).unwrap_or(""),
            units: factors.iter().map(|(unit, _)| *unit).collect(),
            factors: factors.iter().copied().collect(),
        }
    }

    /// The base unit (factor 1.0)
    pub fn base(&self) -> &'static str {
        self.base
    }

    /// Factor for a unit, if it has one
    pub fn factor(&self, unit: &str) -> Option<f64> {
        self.factors.get(unit).copied()
    }

    /// Convert a value from one unit to another.
    ///
    /// `Registry::convert` checks membership first; a unit without a factor
    /// still fails with `UnknownUnit` listing the units of this rule.
    pub fn apply(&self, value: f64, from: &str, to: &str, category: &str) -> Result<f64> {
        let factor_from = self.factor(from)
            .ok_or_else(|| self.unknown(category, from))?;
        let factor_to = self.factor(to)
            .ok_or_else(|| self.unknown(category, to))?;

        // Divide first, then multiply
        Ok(value / factor_from * factor_to)
    }

    fn unknown(&self, category: &str, unit: &str) -> ConvError {
        ConvError::unknown_unit(category, unit).with_valid(self.units.iter().copied())
    }
}

/// A physical quantity kind and the units that measure it
#[derive(Debug, Clone)]
pub struct Category {
    /// The category name (e.g., "Length")
    pub name: &'static str,
    /// Member units in presentation order
    pub units: Vec<&'static str>,
    /// Whether negative input values are physically meaningful
    pub allow_negative: bool,
    /// How to convert between member units
    pub rule: ConversionRule,
}

impl Category {
    /// Create a category whose units are multiples of the first one
    pub fn linear(name: &'static str, allow_negative: bool, factors: &[(&'static str, f64)]) -> Self {
        Category {
            name,
            units: factors.iter().map(|(unit, _)| *unit).collect(),
            allow_negative,
            rule: ConversionRule::Linear(LinearRule::new(factors)),
        }
    }

    /// Create a category converted by a custom transform
    pub fn affine(name: &'static str, allow_negative: bool, units: &[&'static str], transform: AffineFn) -> Self {
        Category {
            name,
            units: units.to_vec(),
            allow_negative,
            rule: ConversionRule::Affine(transform),
        }
    }

    /// Check if a unit belongs to this category
    pub fn has_unit(&self, unit: &str) -> bool {
        self.units.iter().any(|u| *u == unit)
    }

    /// Fail with `UnknownUnit` unless the unit belongs to this category
    pub fn ensure_unit(&self, unit: &str) -> Result<()> {
        if self.has_unit(unit) {
            Ok(())
        } else {
            Err(ConvError::unknown_unit(self.name, unit).with_valid(self.units.iter().copied()))
        }
    }

    /// Check the table invariants for this category
    pub fn validate(&self) -> Result<()> {
        if self.units.len() < 2 {
            return Err(ConvError::internal(format!(
                "category '{}' needs at least two units, has {}",
                self.name,
                self.units.len()
            )));
        }

        let mut seen = HashSet::new();
        for unit in &self.units {
            if !seen.insert(*unit) {
                return Err(ConvError::internal(format!(
                    "category '{}' lists unit '{}' twice",
                    self.name, unit
                )));
            }
        }

        if let ConversionRule::Linear(rule) = &self.rule {
            if rule.factor(rule.base()) != Some(1.0) {
                return Err(ConvError::internal(format!(
                    "category '{}': base unit '{}' must have factor 1.0",
                    self.name,
                    rule.base()
                )));
            }
            for unit in &self.units {
                match rule.factor(unit) {
                    Some(f) if f.is_finite() && f > 0.0 => {}
                    Some(f) => {
                        return Err(ConvError::internal(format!(
                            "category '{}': factor {} for '{}' must be positive",
                            self.name, f, unit
                        )));
                    }
                    None => {
                        return Err(ConvError::internal(format!(
                            "category '{}': no factor for '{}'",
                            self.name, unit
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
