//! Temperature conversions
//!
//! Celsius, Fahrenheit and Kelvin differ by an offset as well as a scale,
//! so they cannot share a single base-unit factor table. Each directed
//! pair gets its own formula.

use engconv_core::{ConvError, Result};

pub const CATEGORY: &str = "Temperature";

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Units in presentation order
pub const UNITS: [&str; 3] = ["Celsius", "Fahrenheit", "Kelvin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Celsius" => Some(TemperatureScale::Celsius),
            "Fahrenheit" => Some(TemperatureScale::Fahrenheit),
            "Kelvin" => Some(TemperatureScale::Kelvin),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "Celsius",
            TemperatureScale::Fahrenheit => "Fahrenheit",
            TemperatureScale::Kelvin => "Kelvin",
        }
    }

    fn parse(name: &str) -> Result<Self> {
        Self::from_name(name)
            .ok_or_else(|| ConvError::unknown_unit(CATEGORY, name).with_valid(UNITS))
    }
}

/// Physically correct transform
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64> {
    dispatch(value, from, to, kelvin_to_fahrenheit)
}

/// Transform reproducing the legacy Kelvin to Fahrenheit formula.
///
/// The legacy formula is `v - 273.15 * 9 / 5 + 32`, which only subtracts
/// the scaled offset and never rescales `v`. Every other pair matches
/// [`convert`].
pub fn convert_legacy(value: f64, from: &str, to: &str) -> Result<f64> {
    dispatch(value, from, to, legacy_kelvin_to_fahrenheit)
}

fn kelvin_to_fahrenheit(value: f64) -> f64 {
    (value - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0
}

fn legacy_kelvin_to_fahrenheit(value: f64) -> f64 {
    value - KELVIN_OFFSET * 9.0 / 5.0 + 32.0
}

fn dispatch(value: f64, from: &str, to: &str, k_to_f: fn(f64) -> f64) -> Result<f64> {
    use TemperatureScale::*;

    let from = TemperatureScale::parse(from)?;
    let to = TemperatureScale::parse(to)?;

    let result = match (from, to) {
        (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => value,
        (Celsius, Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (Fahrenheit, Celsius) => (value - 32.0) * 5.0 / 9.0,
        (Celsius, Kelvin) => value + KELVIN_OFFSET,
        (Kelvin, Celsius) => value - KELVIN_OFFSET,
        (Fahrenheit, Kelvin) => (value - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
        (Kelvin, Fahrenheit) => k_to_f(value),
    };

    Ok(result)
}
