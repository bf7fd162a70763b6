//! Conversion evaluator

use serde::{Deserialize, Serialize};
use tracing::debug;
use engconv_core::{ConvError, Result};
use crate::category::ConversionRule;
use crate::registry::Registry;

/// One conversion to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub category: String,
    pub from_unit: String,
    pub to_unit: String,
    pub value: f64,
}

impl ConversionRequest {
    pub fn new(
        category: impl Into<String>,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
        value: f64,
    ) -> Self {
        ConversionRequest {
            category: category.into(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            value,
        }
    }
}

/// Outcome of a successful conversion, echoing its request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub category: String,
    pub from_unit: String,
    pub to_unit: String,
    pub value: f64,
    /// Converted value at full precision
    pub result: f64,
}

impl Registry {
    /// Convert `value` from `from_unit` to `to_unit` within `category`.
    ///
    /// Validation order: category, source unit, target unit, value.
    /// Same-unit conversions return `value` untouched.
    pub fn convert(&self, category: &str, from_unit: &str, to_unit: &str, value: f64) -> Result<f64> {
        let cat = self.category(category)?;
        cat.ensure_unit(from_unit)?;
        cat.ensure_unit(to_unit)?;

        if !value.is_finite() {
            return Err(ConvError::not_finite(cat.name, value));
        }
        if !cat.allow_negative && value < 0.0 {
            return Err(ConvError::negative_not_allowed(cat.name, value));
        }

        if from_unit == to_unit {
            return Ok(value);
        }

        let result = match &cat.rule {
            ConversionRule::Linear(rule) => rule.apply(value, from_unit, to_unit, cat.name)?,
            ConversionRule::Affine(transform) => transform(value, from_unit, to_unit)?,
        };

        debug!(
            category = cat.name,
            from = from_unit,
            to = to_unit,
            value,
            result,
            rule = cat.rule.kind(),
            "converted"
        );

        Ok(result)
    }

    /// Evaluate a request into a result record
    pub fn evaluate(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let result = self.convert(&request.category, &request.from_unit, &request.to_unit, request.value)?;
        Ok(ConversionResult {
            category: request.category.clone(),
            from_unit: request.from_unit.clone(),
            to_unit: request.to_unit.clone(),
            value: request.value,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engconv_core::codes;
    use crate::registry::REGISTRY;

    const SAMPLES: [f64; 5] = [0.0, 1.0, 2.5, 1234.5678, 1e-3];

    fn rel_close(a: f64, b: f64) -> bool {
        if b == 0.0 {
            a.abs() < 1e-12
        } else {
            ((a - b) / b).abs() < 1e-9
        }
    }

    fn linear_categories() -> Vec<&'static str> {
        REGISTRY
            .categories()
            .filter(|c| c.rule.is_linear())
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn test_identity_exact() {
        for category in REGISTRY.categories() {
            for unit in &category.units {
                for v in SAMPLES {
                    assert_eq!(REGISTRY.convert(category.name, unit, unit, v).unwrap(), v);
                }
                if category.allow_negative {
                    assert_eq!(REGISTRY.convert(category.name, unit, unit, -12.34).unwrap(), -12.34);
                }
            }
        }
    }

    #[test]
    fn test_identity_exact_legacy() {
        let legacy = Registry::legacy();
        assert_eq!(legacy.convert("Temperature", "Kelvin", "Kelvin", 300.15).unwrap(), 300.15);
    }

    #[test]
    fn test_round_trip_linear() {
        for name in linear_categories() {
            let units = REGISTRY.units_for(name).unwrap();
            for a in units {
                for b in units {
                    for v in SAMPLES {
                        let there = REGISTRY.convert(name, a, b, v).unwrap();
                        let back = REGISTRY.convert(name, b, a, there).unwrap();
                        assert!(rel_close(back, v), "{name}: {a} -> {b} -> {a} gave {back} for {v}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_linearity() {
        for name in linear_categories() {
            let units = REGISTRY.units_for(name).unwrap();
            for a in units {
                for b in units {
                    let base = REGISTRY.convert(name, a, b, 3.0).unwrap();
                    let scaled = REGISTRY.convert(name, a, b, 7.0 * 3.0).unwrap();
                    assert!(rel_close(scaled, 7.0 * base), "{name}: {a} -> {b}");
                }
            }
        }
    }

    #[test]
    fn test_negative_rejected() {
        let err = REGISTRY.convert("Length", "Meters", "Feet", -1.0).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_INPUT);

        for name in ["Length", "Mass", "Pressure"] {
            let units = REGISTRY.units_for(name).unwrap();
            assert!(REGISTRY.convert(name, units[0], units[1], -0.5).is_err(), "{name}");
        }
    }

    #[test]
    fn test_negative_rejected_for_same_unit() {
        let err = REGISTRY.convert("Mass", "Grams", "Grams", -3.0).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_INPUT);
    }

    #[test]
    fn test_negative_allowed() {
        let lbf = REGISTRY.convert("Force", "Newtons", "Pounds-force", -5.0).unwrap();
        assert!(rel_close(lbf, -5.0 * 0.224809));

        let f = REGISTRY.convert("Temperature", "Celsius", "Fahrenheit", -40.0).unwrap();
        assert_eq!(f, -40.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = REGISTRY.convert("Force", "Newtons", "Kilonewtons", v).unwrap_err();
            assert_eq!(err.code(), codes::INVALID_INPUT);
        }
    }

    #[test]
    fn test_unknown_unit() {
        let err = REGISTRY.convert("Length", "Meters", "Lightyears", 1.0).unwrap_err();
        match err {
            ConvError::UnknownUnit { category, unit, valid } => {
                assert_eq!(category, "Length");
                assert_eq!(unit, "Lightyears");
                assert_eq!(valid.len(), 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unit_from_other_category() {
        let err = REGISTRY.convert("Length", "Pounds", "Meters", 1.0).unwrap_err();
        assert_eq!(err.code(), codes::UNKNOWN_UNIT);
    }

    #[test]
    fn test_source_unit_checked_first() {
        let err = REGISTRY.convert("Mass", "Stones", "Carats", 1.0).unwrap_err();
        assert!(matches!(err, ConvError::UnknownUnit { ref unit, .. } if unit == "Stones"));
    }

    #[test]
    fn test_unit_checked_before_value() {
        let err = REGISTRY.convert("Length", "Meters", "Lightyears", -1.0).unwrap_err();
        assert_eq!(err.code(), codes::UNKNOWN_UNIT);
    }

    #[test]
    fn test_unknown_category() {
        let err = REGISTRY.convert("Time", "Seconds", "Minutes", 1.0).unwrap_err();
        assert_eq!(err.code(), codes::UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_literal_scenarios() {
        let feet = REGISTRY.convert("Length", "Meters", "Feet", 1.0).unwrap();
        assert!(rel_close(feet, 3.28084));

        let pounds = REGISTRY.convert("Mass", "Kilograms", "Pounds", 10.0).unwrap();
        assert!(rel_close(pounds, 22.0462));

        assert_eq!(REGISTRY.convert("Temperature", "Celsius", "Fahrenheit", 100.0).unwrap(), 212.0);
        assert_eq!(REGISTRY.convert("Temperature", "Fahrenheit", "Celsius", 32.0).unwrap(), 0.0);

        let pascals = REGISTRY.convert("Pressure", "Atmospheres", "Pascals", 1.0).unwrap();
        assert!(rel_close(pascals, 1.0 / 9.8692e-6));
        assert!((pascals - 101_325.335).abs() < 0.001);
    }

    #[test]
    fn test_cross_unit_linear() {
        // 1 km = 1000 m = 100000 cm
        let cm = REGISTRY.convert("Length", "Kilometers", "Centimeters", 1.0).unwrap();
        assert!(rel_close(cm, 100_000.0));

        let t = REGISTRY.convert("Mass", "Grams", "Tons (Metric)", 2_000_000.0).unwrap();
        assert!(rel_close(t, 2.0));
    }

    #[test]
    fn test_kelvin_fahrenheit_standard_vs_legacy() {
        let standard = REGISTRY.convert("Temperature", "Kelvin", "Fahrenheit", 373.15).unwrap();
        assert!((standard - 212.0).abs() < 1e-9);

        let legacy = Registry::legacy().convert("Temperature", "Kelvin", "Fahrenheit", 373.15).unwrap();
        assert!((legacy - (373.15 - 273.15 * 9.0 / 5.0 + 32.0)).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate() {
        let request = ConversionRequest::new("Mass", "Kilograms", "Grams", 1.5);
        let result = REGISTRY.evaluate(&request).unwrap();

        assert_eq!(result.category, "Mass");
        assert_eq!(result.value, 1.5);
        assert!(rel_close(result.result, 1500.0));
    }

    #[test]
    fn test_evaluate_error() {
        let request = ConversionRequest::new("Pressure", "Pascals", "Bar", -10.0);
        assert!(REGISTRY.evaluate(&request).is_err());
    }

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"category":"Force","from_unit":"Newtons","to_unit":"Kilonewtons","value":2500}"#;
        let request: ConversionRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request, ConversionRequest::new("Force", "Newtons", "Kilonewtons", 2500.0));
    }
}
