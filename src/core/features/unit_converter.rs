//! Unit conversion engine
//!
//! One catalog and one dispatcher shared by the web API and the CLI. Every
//! operation here is a pure function of its inputs.

mod catalog;
mod format;
mod parsing;
mod rules;

pub use catalog::{categories, find_unit, unit_symbol, Category, CategoryDefinition, CategoryGroup};
pub use format::format_number;
pub use parsing::{parse_quantity, Quantity};
pub use rules::{Convert, ConversionRule, REFERENCE_INTENSITY};

use tracing::debug;

use crate::shared::errors::{ConversionError, ConversionResult};

/// Result of converting into one target unit of a category
#[derive(Debug, Clone, PartialEq)]
pub struct UnitConversion {
    pub unit: &'static str,
    pub result: ConversionResult<f64>,
}

pub fn resolve_category(name: &str) -> ConversionResult<Category> {
    Category::from_name(name).ok_or_else(|| ConversionError::UnknownCategory(name.to_string()))
}

pub fn resolve_unit(category: Category, unit: &str) -> ConversionResult<usize> {
    category.unit_index(unit).ok_or_else(|| ConversionError::UnknownUnit {
        category: category.name().to_string(),
        unit: unit.to_string(),
    })
}

/// Convert `value` between two units of the named category
pub fn convert(category: &str, from_unit: &str, to_unit: &str, value: f64) -> ConversionResult<f64> {
    convert_in(resolve_category(category)?, from_unit, to_unit, value)
}

/// Same as [`convert`] for an already resolved category
pub fn convert_in(category: Category, from_unit: &str, to_unit: &str, value: f64) -> ConversionResult<f64> {
    let from = resolve_unit(category, from_unit)?;
    let to = resolve_unit(category, to_unit)?;
    convert_indices(category, from, to, value)
}

/// Convert between unit indices of `category`.
///
/// Same-unit conversions return `value` untouched so no float round trip
/// can drift the result.
pub fn convert_indices(category: Category, from: usize, to: usize, value: f64) -> ConversionResult<f64> {
    if !value.is_finite() {
        return Err(ConversionError::NonFiniteValue);
    }

    let (Some(from_label), Some(to_label)) = (category.unit_label(from), category.unit_label(to)) else {
        return Err(ConversionError::UnknownUnit {
            category: category.name().to_string(),
            unit: format!("#{}", from.max(to)),
        });
    };

    if from == to {
        return Ok(value);
    }

    let rule = category.rule();
    let result = rule.convert(from, to, value)?;
    debug!(
        category = category.name(),
        rule = rule.kind(),
        from = from_label,
        to = to_label,
        value,
        result,
        "converted"
    );
    Ok(result)
}

/// Convert `value` into every unit of the category, in display order.
///
/// An unknown category or source unit, or a non-finite value, fails the whole
/// call. Failures of individual targets are reported per unit.
pub fn convert_all(category: &str, from_unit: &str, value: f64) -> ConversionResult<Vec<UnitConversion>> {
    convert_all_in(resolve_category(category)?, from_unit, value)
}

pub fn convert_all_in(category: Category, from_unit: &str, value: f64) -> ConversionResult<Vec<UnitConversion>> {
    let from = resolve_unit(category, from_unit)?;
    if !value.is_finite() {
        return Err(ConversionError::NonFiniteValue);
    }

    Ok(category
        .units()
        .iter()
        .enumerate()
        .map(|(to, unit)| UnitConversion {
            unit,
            result: convert_indices(category, from, to, value),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const SAMPLE_VALUES: [f64; 7] = [0.0, 1.0, -1.0, 2.5, 1234.5678, 1e-9, -7.25e12];

    fn is_linear(category: Category) -> bool {
        matches!(category.rule(), ConversionRule::Linear(_))
    }

    #[test]
    fn same_unit_conversion_is_exact_identity() {
        for category in Category::ALL {
            for unit in category.units() {
                for value in SAMPLE_VALUES.iter().chain([0.1, 1.0 / 3.0, f64::MAX, f64::MIN_POSITIVE].iter()) {
                    assert_eq!(convert(category.name(), unit, unit, *value).unwrap(), *value);
                }
            }
        }
    }

    #[test]
    fn linear_conversions_are_reciprocal() {
        for category in Category::ALL.into_iter().filter(|c| is_linear(*c)) {
            for a in category.units() {
                for b in category.units() {
                    let one_back = convert_in(category, b, a, 1.0).unwrap();
                    for value in SAMPLE_VALUES {
                        let forward = convert_in(category, a, b, value).unwrap();
                        assert_relative_eq!(forward, value / one_back, max_relative = 1e-12, epsilon = 1e-300);
                    }
                }
            }
        }
    }

    #[test]
    fn round_trips_recover_the_input() {
        let categories = Category::ALL.into_iter().filter(|c| {
            matches!(
                c.rule(),
                ConversionRule::Linear(_) | ConversionRule::Temperature(_) | ConversionRule::SoundIntensity(_)
            )
        });
        for category in categories {
            for a in category.units() {
                for b in category.units() {
                    for value in [1.0, 2.5, 1234.5678] {
                        let there = convert_in(category, b, a, value).unwrap();
                        let back = convert_in(category, a, b, there).unwrap();
                        assert_relative_eq!(back, value, max_relative = 1e-9);
                    }
                }
            }
        }
    }

    #[rstest]
    #[case("Celsius (°C)", "Fahrenheit (°F)", 0.0, 32.0)]
    #[case("Celsius (°C)", "Fahrenheit (°F)", 100.0, 212.0)]
    #[case("kelvin (K)", "Celsius (°C)", 273.15, 0.0)]
    #[case("Celsius (°C)", "kelvin (K)", 0.0, 273.15)]
    #[case("Fahrenheit (°F)", "Celsius (°C)", -40.0, -40.0)]
    #[case("Fahrenheit (°F)", "Celsius (°C)", 212.0, 100.0)]
    fn temperature_is_exact_at_reference_points(
        #[case] from: &str,
        #[case] to: &str,
        #[case] value: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(convert("Temperature", from, to, value).unwrap(), expected);
    }

    #[test]
    fn kelvin_to_fahrenheit_routes_through_celsius() {
        assert_relative_eq!(convert("Temperature", "K", "°F", 0.0).unwrap(), -459.67, max_relative = 1e-12);
    }

    #[test]
    fn sound_intensity_reference_is_zero_db() {
        assert_eq!(convert("Sound Intensity", "intensity (W/m²)", "level (dB)", 1e-12).unwrap(), 0.0);
        assert_relative_eq!(
            convert("Sound Intensity", "intensity (W/m²)", "level (dB)", 1.0).unwrap(),
            120.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convert("Sound Intensity", "level (dB)", "intensity (W/m²)", 60.0).unwrap(),
            1e-6,
            max_relative = 1e-12
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1e-12)]
    #[case(-5.0)]
    fn non_positive_intensity_is_a_domain_error(#[case] value: f64) {
        let err = convert("Sound Intensity", "intensity (W/m²)", "level (dB)", value).unwrap_err();
        assert_eq!(err, ConversionError::NonPositiveIntensity);
        assert!(err.is_domain());
    }

    #[test]
    fn data_sizes() {
        assert_eq!(convert("Data", "byte (B)", "bit (b)", 1.0).unwrap(), 8.0);
        assert_eq!(convert("Data", "kibibyte (KiB)", "byte (B)", 1.0).unwrap(), 1024.0);
        assert_eq!(convert("Data", "MB", "kB", 1.0).unwrap(), 1000.0);
        assert_eq!(convert("Data", "GiB", "MiB", 1.0).unwrap(), 1024.0);
    }

    #[test]
    fn angle_conversions() {
        assert_relative_eq!(
            convert("Angle", "degree (°)", "radian (rad)", 180.0).unwrap(),
            std::f64::consts::PI,
            max_relative = 1e-15
        );
        assert_relative_eq!(
            convert("Angle", "radian (rad)", "degree (°)", std::f64::consts::FRAC_PI_2).unwrap(),
            90.0,
            max_relative = 1e-15
        );
    }

    #[test]
    fn linear_spot_checks() {
        assert_eq!(convert("Length", "kilometer (km)", "meter (m)", 1.0).unwrap(), 1000.0);
        assert_relative_eq!(convert("Length", "mile (mi)", "kilometer (km)", 1.0).unwrap(), 1.609344, max_relative = 1e-15);
        assert_relative_eq!(convert("Mass", "stone", "pound (lb)", 1.0).unwrap(), 14.0, max_relative = 1e-12);
        assert_eq!(convert("Time", "day", "hour (h)", 1.0).unwrap(), 24.0);
        assert_relative_eq!(convert("Pressure", "atm", "Torr", 1.0).unwrap(), 760.0, max_relative = 1e-12);
        assert_relative_eq!(convert("Speed", "km/h", "m/s", 36.0).unwrap(), 10.0, max_relative = 1e-12);
        assert_relative_eq!(convert("Frequency", "GHz", "MHz", 2.4).unwrap(), 2400.0, max_relative = 1e-15);
    }

    #[test]
    fn rpm_family_uses_the_literal_factor_tables() {
        // Into the base unit behaves as expected
        assert_relative_eq!(
            convert("RPM", "revolutions per second (RPS)", "revolutions per minute (RPM)", 1.0).unwrap(),
            60.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convert("RPM", "radians per second (rad/s)", "revolutions per minute (RPM)", 2.0 * std::f64::consts::PI)
                .unwrap(),
            60.0,
            max_relative = 1e-12
        );
        // Out of the base unit multiplies by from_base
        assert_eq!(
            convert("RPM", "revolutions per minute (RPM)", "revolutions per second (RPS)", 60.0).unwrap(),
            3600.0
        );
    }

    #[test]
    fn rounds_per_hour_uses_the_same_factor_as_rounds_per_second() {
        assert_relative_eq!(
            convert("Firearm ROF", "rounds per hour (RPH)", "rounds per minute (RPM)", 1.0).unwrap(),
            60.0,
            max_relative = 1e-12
        );
        assert_eq!(
            convert("Firearm ROF", "rounds per minute (RPM)", "rounds per hour (RPH)", 1.0).unwrap(),
            60.0
        );
        assert_relative_eq!(
            convert("Firearm ROF", "RPS", "RPH", 1.0).unwrap(),
            3600.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn unknown_category_is_a_lookup_error() {
        let err = convert("Currency", "USD", "EUR", 1.0).unwrap_err();
        assert_eq!(err, ConversionError::UnknownCategory("Currency".into()));
        assert!(err.is_lookup());
    }

    #[test]
    fn unknown_unit_is_a_lookup_error() {
        let err = convert("Length", "parsec", "meter (m)", 1.0).unwrap_err();
        assert!(err.is_lookup());
        // A unit of another category is unknown here too
        assert!(convert("Length", "meter (m)", "kilogram (kg)", 1.0).unwrap_err().is_lookup());
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn non_finite_input_is_a_domain_error(#[case] value: f64) {
        let err = convert("Length", "meter (m)", "meter (m)", value).unwrap_err();
        assert_eq!(err, ConversionError::NonFiniteValue);
        assert!(err.is_domain());
    }

    #[test]
    fn unit_lookup_fails_before_value_check() {
        assert!(convert("Length", "parsec", "meter (m)", f64::NAN).unwrap_err().is_lookup());
        assert!(convert_all("Length", "parsec", f64::NAN).unwrap_err().is_lookup());
    }

    #[test]
    fn convert_all_follows_display_order() {
        let results = convert_all("Temperature", "Celsius (°C)", 100.0).unwrap();
        let units: Vec<_> = results.iter().map(|r| r.unit).collect();
        assert_eq!(units, Category::Temperature.units());
        assert_relative_eq!(*results[0].result.as_ref().unwrap(), 373.15, max_relative = 1e-12);
        assert_eq!(results[1].result, Ok(100.0));
        assert_eq!(results[2].result, Ok(212.0));
    }

    #[test]
    fn convert_all_reports_failures_per_unit() {
        let results = convert_all("Sound Intensity", "intensity (W/m²)", 0.0).unwrap();
        assert_eq!(results[0].result, Ok(0.0));
        assert_eq!(results[1].result, Err(ConversionError::NonPositiveIntensity));
    }

    #[test]
    fn convert_all_rejects_bad_input_up_front() {
        assert!(convert_all("Nope", "m", 1.0).unwrap_err().is_lookup());
        assert!(convert_all("Length", "parsec", 1.0).unwrap_err().is_lookup());
        assert_eq!(convert_all("Length", "m", f64::NAN).unwrap_err(), ConversionError::NonFiniteValue);
    }

    #[test]
    fn index_out_of_range_is_a_lookup_error() {
        assert!(convert_indices(Category::Angle, 0, 7, 1.0).unwrap_err().is_lookup());
    }
}
