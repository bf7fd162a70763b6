//! Category registry - the built-in unit table

use std::collections::HashMap;
use std::sync::LazyLock;
use engconv_core::{ConvError, Result};
use crate::category::{Category, ConversionRule};
use crate::temperature;

/// Global registry with the physically correct temperature formulas
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::standard);

/// Immutable catalog of categories, their units and conversion rules
#[derive(Debug, Clone)]
pub struct Registry {
    categories: Vec<Category>,
    names: Vec<&'static str>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Built-in table
    pub fn standard() -> Self {
        Self::build(temperature::convert)
    }

    /// Built-in table with the legacy Kelvin to Fahrenheit formula
    pub fn legacy() -> Self {
        Self::build(temperature::convert_legacy)
    }

    fn build(temperature_rule: crate::category::AffineFn) -> Self {
        let mut registry = Registry {
            categories: Vec::new(),
            names: Vec::new(),
            index: HashMap::new(),
        };
        registry.register_length();
        registry.register_mass();
        registry.register_force();
        registry.register(Category::affine(
            temperature::CATEGORY,
            true,
            &temperature::UNITS,
            temperature_rule,
        ));
        registry.register_pressure();
        registry
    }

    fn register(&mut self, category: Category) {
        self.index.insert(category.name, self.categories.len());
        self.names.push(category.name);
        self.categories.push(category);
    }

    // ========== Lookups ==========

    /// All category names in registration order
    pub fn list_categories(&self) -> &[&'static str] {
        &self.names
    }

    /// All categories in registration order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Get a category by name
    pub fn category(&self, name: &str) -> Result<&Category> {
        self.index
            .get(name)
            .map(|&i| &self.categories[i])
            .ok_or_else(|| {
                ConvError::unknown_category(name).with_valid(self.names.iter().copied())
            })
    }

    /// Units of a category in declared order
    pub fn units_for(&self, category: &str) -> Result<&[&'static str]> {
        Ok(self.category(category)?.units.as_slice())
    }

    /// Whether the category accepts negative input
    pub fn allows_negative(&self, category: &str) -> Result<bool> {
        Ok(self.category(category)?.allow_negative)
    }

    /// Conversion rule of the category
    pub fn rule_for(&self, category: &str) -> Result<&ConversionRule> {
        Ok(&self.category(category)?.rule)
    }

    /// Check if a unit is a member of a category
    pub fn contains_unit(&self, category: &str, unit: &str) -> bool {
        self.category(category).map_or(false, |c| c.has_unit(unit))
    }

    /// Check the table invariants for every category
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(ConvError::internal("registry has no categories"));
        }
        for category in &self.categories {
            category.validate()?;
        }
        Ok(())
    }

    // ========== Built-in categories ==========

    fn register_length(&mut self) {
        self.register(Category::linear("Length", false, &[
            ("Meters", 1.0),
            ("Kilometers", 0.001),
            ("Centimeters", 100.0),
            ("Millimeters", 1000.0),
            ("Inches", 39.3701),
            ("Feet", 3.28084),
            ("Yards", 1.09361),
            ("Miles", 0.000621371),
        ]));
    }

    fn register_mass(&mut self) {
        self.register(Category::linear("Mass", false, &[
            ("Kilograms", 1.0),
            ("Grams", 1000.0),
            ("Milligrams", 1e6),
            ("Pounds", 2.20462),
            ("Ounces", 35.274),
            ("Tons (Metric)", 0.001),
        ]));
    }

    fn register_force(&mut self) {
        self.register(Category::linear("Force", true, &[
            ("Newtons", 1.0),
            ("Kilonewtons", 0.001),
            ("Pounds-force", 0.224809),
            ("Kilogram-force", 0.101972),
        ]));
    }

    fn register_pressure(&mut self) {
        self.register(Category::linear("Pressure", false, &[
            ("Pascals", 1.0),
            ("Bar", 1e-5),
            ("Atmospheres", 9.8692e-6),
            ("PSI", 0.000145038),
        ]));
    }
}
