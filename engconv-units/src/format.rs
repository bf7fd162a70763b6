//! Display formatting for conversion results

use crate::convert::ConversionResult;

/// Decimal places shown for converted values
pub const DISPLAY_PRECISION: usize = 4;

/// Format a value with the fixed display precision
pub fn format_value(value: f64) -> String {
    format!("{:.*}", DISPLAY_PRECISION, value)
}

/// One-line summary, e.g. `1 Meters = 3.2808 Feet`
pub fn format_result(result: &ConversionResult) -> String {
    format!(
        "{} {} = {} {}",
        result.value,
        result.from_unit,
        format_value(result.result),
        result.to_unit
    )
}
