//! engconv Units - Engineering Unit Conversion
//!
//! Converts values between units of one physical quantity category.
//! The built-in table is immutable and shared process-wide.
//!
//! Categories:
//! - Length (Meters, Kilometers, Feet, Miles, etc.)
//! - Mass (Kilograms, Grams, Pounds, Ounces, etc.)
//! - Force (Newtons, Kilonewtons, Pounds-force, Kilogram-force)
//! - Temperature (Celsius, Fahrenheit, Kelvin)
//! - Pressure (Pascals, Bar, Atmospheres, PSI)
//!
//! ```
//! let feet = engconv_units::convert("Length", "Meters", "Feet", 1.0).unwrap();
//! assert!((feet - 3.28084).abs() < 1e-9);
//! ```

mod category;
mod convert;
mod format;
mod registry;
pub mod temperature;

pub use category::{AffineFn, Category, ConversionRule, LinearRule};
pub use convert::{ConversionRequest, ConversionResult};
pub use format::{format_result, format_value, DISPLAY_PRECISION};
pub use registry::{Registry, REGISTRY};

use engconv_core::Result;

/// All category names in registration order
pub fn list_categories() -> &'static [&'static str] {
    REGISTRY.list_categories()
}

/// Units of a category in declared order
pub fn units_for(category: &str) -> Result<&'static [&'static str]> {
    REGISTRY.units_for(category)
}

/// Whether the category accepts negative input
pub fn allows_negative(category: &str) -> Result<bool> {
    REGISTRY.allows_negative(category)
}

/// Conversion rule of the category
pub fn rule_for(category: &str) -> Result<&'static ConversionRule> {
    REGISTRY.rule_for(category)
}

/// Convert a value using the global registry
pub fn convert(category: &str, from_unit: &str, to_unit: &str, value: f64) -> Result<f64> {
    REGISTRY.convert(category, from_unit, to_unit, value)
}

/// Evaluate a request using the global registry
pub fn evaluate(request: &ConversionRequest) -> Result<ConversionResult> {
    REGISTRY.evaluate(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_lookups() {
        assert_eq!(list_categories().len(), 5);
        assert_eq!(units_for("Force").unwrap().len(), 4);
        assert!(allows_negative("Temperature").unwrap());
        assert!(!rule_for("Temperature").unwrap().is_linear());
    }

    #[test]
    fn test_global_convert() {
        assert_eq!(convert("Temperature", "Celsius", "Fahrenheit", 100.0).unwrap(), 212.0);
        assert!(convert("Length", "Meters", "Feet", -1.0).is_err());
        assert!(evaluate(&ConversionRequest::new("Force", "Newtons", "Pounds-force", -5.0)).is_ok());
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Registry>();

        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || convert("Mass", "Kilograms", "Grams", i as f64)))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let grams = handle.join().unwrap().unwrap();
            assert!((grams - i as f64 * 1000.0).abs() < 1e-9);
        }
    }
}
