//! Result formatting for conversion and calculator output

/// Significant digits used in general notation
const SIGNIFICANT_DIGITS: i32 = 6;

/// Format a result for display.
///
/// - `0` renders as `"0"`
/// - `|v| >= 1e6` or `|v| < 1e-3` use general notation with 6 significant digits
///   (`1234567` -> `"1.23457e+06"`)
/// - everything else is fixed-point with 6 decimals, trailing zeros and a
///   trailing point stripped (`1.5`, `2`)
///
/// Non-finite values fall back to their default rendering.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if abs >= 1e6 || abs < 1e-3 {
        return format_general(value);
    }

    strip_fraction_zeros(&format!("{:.6}", value)).to_string()
}

/// `%.6g` semantics: scientific when the rounded exponent is < -4 or >= the
/// precision, fixed otherwise, trailing zeros removed either way.
fn format_general(value: f64) -> String {
    let precision = (SIGNIFICANT_DIGITS - 1) as usize;
    let scientific = format!("{:.*e}", precision, value);

    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_fraction_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_fraction_zeros(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.')
}
