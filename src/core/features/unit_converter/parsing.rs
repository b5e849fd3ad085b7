use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::error::{AppError, AppResult};

const ERR_CANNOT_PARSE_QUANTITY: &str = "Could not parse quantity from text";

// Number first, then whatever is left is the unit ("12km", "3.5 kilometer (km)", "-40 °F")
static RE_NUMBER_THEN_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)\s*([^\d\s.+-].*)$")
        .expect("Failed to compile quantity pattern")
});

// Unit first ("km 12")
static RE_UNIT_THEN_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s+([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)$")
        .expect("Failed to compile quantity pattern")
});

/// A value with a still-unresolved unit query
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

/// Parse `"12 km"`, `"12km"`, `"3,5 kilometer (km)"` or `"km 12"` into value and unit text.
///
/// Comma decimal separators are accepted. The unit is not resolved here.
pub fn parse_quantity(text: &str) -> AppResult<Quantity> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Empty text".to_string()));
    }

    let normalized = text.replace(',', ".");

    if let Some(caps) = RE_NUMBER_THEN_UNIT.captures(&normalized) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return Ok(Quantity { value, unit: caps[2].trim().to_string() });
        }
    }

    if let Some(caps) = RE_UNIT_THEN_NUMBER.captures(&normalized) {
        if let Ok(value) = caps[2].parse::<f64>() {
            return Ok(Quantity { value, unit: caps[1].trim().to_string() });
        }
    }

    tracing::debug!(text, "quantity parse failed");
    Err(AppError::Validation(format!("{}: {}", ERR_CANNOT_PARSE_QUANTITY, text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12 km", 12.0, "km")]
    #[case("12km", 12.0, "km")]
    #[case("3.5 kilometer (km)", 3.5, "kilometer (km)")]
    #[case("3,5 kelvin (K)", 3.5, "kelvin (K)")]
    #[case("-40 °F", -40.0, "°F")]
    #[case("1e-12 W/m²", 1e-12, "W/m²")]
    #[case(".5 mi", 0.5, "mi")]
    #[case("km 12", 12.0, "km")]
    #[case("  100   meter (m)  ", 100.0, "meter (m)")]
    fn parses_value_and_unit(#[case] text: &str, #[case] value: f64, #[case] unit: &str) {
        let quantity = parse_quantity(text).unwrap();
        assert_eq!(quantity.value, value);
        assert_eq!(quantity.unit, unit);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("km")]
    #[case("12")]
    fn rejects_text_without_value_and_unit(#[case] text: &str) {
        assert!(matches!(parse_quantity(text), Err(AppError::Validation(_))));
    }
}
