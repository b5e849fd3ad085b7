//! Basic calculator mode
//!
//! Evaluates typed or keypad-built expressions through the whitelisted
//! [`expression`] parser. No dynamic code is ever executed.

pub mod expression;

pub use expression::{Expression, Function};

use crate::shared::errors::{CalcError, CalcResult};

/// Replace keypad glyphs with their ASCII operators
pub fn normalize_expression(text: &str) -> String {
    text.trim().replace('×', "*").replace('÷', "/").replace('−', "-")
}

/// Evaluate a constant expression (no `x`)
///
/// Non-finite results are reported as errors rather than returned.
pub fn evaluate_expression(text: &str) -> CalcResult<f64> {
    let cleaned = normalize_expression(text);
    let expr = Expression::parse(&cleaned)?;

    let result = expr.eval(None)?;
    if result.is_nan() {
        return Err(CalcError::NotANumber);
    }
    if result.is_infinite() {
        return Err(CalcError::Infinite);
    }

    tracing::debug!(expression = %cleaned, result, "evaluated expression");
    Ok(result)
}
