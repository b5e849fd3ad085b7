//! Conversion rules, one per category kind
//!
//! Rules work on unit indices into the owning category's unit list. The
//! dispatcher has already resolved both indices and handled `from == to`.

use std::f64::consts::PI;

use enum_dispatch::enum_dispatch;

use crate::shared::errors::{ConversionError, ConversionResult};

/// Reference sound intensity (W/m²) for decibel conversions
pub const REFERENCE_INTENSITY: f64 = 1e-12;

#[enum_dispatch]
pub trait Convert {
    fn convert(&self, from: usize, to: usize, value: f64) -> ConversionResult<f64>;
}

/// Static dispatch over the conversion kinds known to the catalog
#[enum_dispatch(Convert)]
#[derive(Debug, Clone)]
pub enum ConversionRule {
    Linear(LinearRule),
    Temperature(TemperatureRule),
    Angle(AngleRule),
    SoundIntensity(SoundIntensityRule),
    BaseRate(BaseRateRule),
}

impl ConversionRule {
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionRule::Linear(_) => "linear",
            ConversionRule::Temperature(_) => "affine",
            ConversionRule::Angle(_) => "angle",
            ConversionRule::SoundIntensity(_) => "logarithmic",
            ConversionRule::BaseRate(_) => "base_rate",
        }
    }

    /// Number of units the rule has data for
    pub fn len(&self) -> usize {
        match self {
            ConversionRule::Linear(r) => r.factors.len(),
            ConversionRule::Temperature(r) => r.scales.len(),
            ConversionRule::Angle(r) => r.units.len(),
            ConversionRule::SoundIntensity(r) => r.units.len(),
            ConversionRule::BaseRate(r) => r.to_base.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Linear
// ============================================================================

/// `factor[i]` is unit `i` expressed in the category's base unit
#[derive(Debug, Clone)]
pub struct LinearRule {
    pub factors: Vec<f64>,
}

impl Convert for LinearRule {
    fn convert(&self, from: usize, to: usize, value: f64) -> ConversionResult<f64> {
        Ok(value * self.factors[from] / self.factors[to])
    }
}

// ============================================================================
// Temperature (affine, via Celsius)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        }
    }

    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            // Keep (c * 9/5) + 32 ordering so 100 °C lands on exactly 212 °F
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemperatureRule {
    pub scales: Vec<TemperatureScale>,
}

impl Convert for TemperatureRule {
    fn convert(&self, from: usize, to: usize, value: f64) -> ConversionResult<f64> {
        let celsius = self.scales[from].to_celsius(value);
        Ok(self.scales[to].from_celsius(celsius))
    }
}

// ============================================================================
// Angle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degree,
    Radian,
}

#[derive(Debug, Clone)]
pub struct AngleRule {
    pub units: Vec<AngleUnit>,
}

impl Convert for AngleRule {
    fn convert(&self, from: usize, to: usize, value: f64) -> ConversionResult<f64> {
        Ok(match (self.units[from], self.units[to]) {
            (AngleUnit::Degree, AngleUnit::Radian) => value * PI / 180.0,
            (AngleUnit::Radian, AngleUnit::Degree) => value * 180.0 / PI,
            _ => value,
        })
    }
}

// ============================================================================
// Sound intensity (logarithmic)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundUnit {
    /// Linear intensity in W/m²
    Intensity,
    /// Level in dB relative to [`REFERENCE_INTENSITY`]
    Level,
}

#[derive(Debug, Clone)]
pub struct SoundIntensityRule {
    pub units: Vec<SoundUnit>,
    pub reference: f64,
}

impl Convert for SoundIntensityRule {
    fn convert(&self, from: usize, to: usize, value: f64) -> ConversionResult<f64> {
        match (self.units[from], self.units[to]) {
            (SoundUnit::Intensity, SoundUnit::Level) => {
                if value <= 0.0 {
                    return Err(ConversionError::NonPositiveIntensity);
                }
                Ok(10.0 * (value / self.reference).log10())
            }
            (SoundUnit::Level, SoundUnit::Intensity) => Ok(self.reference * 10f64.powf(value / 10.0)),
            _ => Ok(value),
        }
    }
}

// ============================================================================
// Base-rate families (RPM, rate of fire)
// ============================================================================

/// Funnels through an implicit base unit: `value / to_base[from] * from_base[to]`.
///
/// `from_base[u]` is the reciprocal of `to_base[u]`, both relative to a base
/// unit whose factors are 1.0. Both columns are stored as given.
#[derive(Debug, Clone)]
pub struct BaseRateRule {
    pub to_base: Vec<f64>,
    pub from_base: Vec<f64>,
}

impl BaseRateRule {
    pub fn new(pairs: &[(f64, f64)]) -> Self {
        let (to_base, from_base) = pairs.iter().copied().unzip();
        Self { to_base, from_base }
    }
}

impl Convert for BaseRateRule {
    fn convert(&self, from: usize, to: usize, value: f64) -> ConversionResult<f64> {
        let base = value / self.to_base[from];
        Ok(base * self.from_base[to])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_rule_scales_by_factor_ratio() {
        let rule = ConversionRule::from(LinearRule { factors: vec![1.0, 1000.0] });
        assert_eq!(rule.convert(1, 0, 2.5).unwrap(), 2500.0);
        assert_eq!(rule.convert(0, 1, 2500.0).unwrap(), 2.5);
    }

    #[test]
    fn temperature_scales_round_trip_through_celsius() {
        for scale in [TemperatureScale::Celsius, TemperatureScale::Fahrenheit, TemperatureScale::Kelvin] {
            assert_relative_eq!(scale.to_celsius(scale.from_celsius(37.0)), 37.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn sound_rule_rejects_non_positive_intensity() {
        let rule = SoundIntensityRule {
            units: vec![SoundUnit::Intensity, SoundUnit::Level],
            reference: REFERENCE_INTENSITY,
        };
        assert_eq!(rule.convert(0, 1, 0.0), Err(ConversionError::NonPositiveIntensity));
        assert_eq!(rule.convert(0, 1, -1.0), Err(ConversionError::NonPositiveIntensity));
        // Negative levels are fine, they are just quieter than the reference
        assert_relative_eq!(rule.convert(1, 0, -10.0).unwrap(), 1e-13, max_relative = 1e-12);
    }

    #[test]
    fn base_rate_rule_splits_pairs() {
        let rule = BaseRateRule::new(&[(1.0, 1.0), (0.5, 2.0)]);
        assert_eq!(rule.to_base, vec![1.0, 0.5]);
        assert_eq!(rule.from_base, vec![1.0, 2.0]);
        assert_eq!(rule.convert(1, 0, 3.0).unwrap(), 6.0);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ConversionRule::from(AngleRule { units: vec![] }).kind(), "angle");
        assert!(ConversionRule::from(AngleRule { units: vec![] }).is_empty());
    }
}
