//! Domain error types for the conversion engine and calculator modes
//!
//! Every error is serializable so shells can forward it as-is.

use thiserror::Error;
use serde::Serialize;

/// Broad class of a conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Unknown category or unit. A well-formed caller never sees this.
    Lookup,
    /// Value outside the domain of the requested conversion
    Domain,
}

/// Conversion errors
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ConversionError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown unit '{unit}' for category {category}")]
    UnknownUnit { category: String, unit: String },

    #[error("Intensity must be > 0 for dB")]
    NonPositiveIntensity,

    #[error("Value must be a finite number")]
    NonFiniteValue,
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::UnknownCategory(_) | ConversionError::UnknownUnit { .. } => ErrorKind::Lookup,
            ConversionError::NonPositiveIntensity | ConversionError::NonFiniteValue => ErrorKind::Domain,
        }
    }

    pub fn is_lookup(&self) -> bool {
        self.kind() == ErrorKind::Lookup
    }

    pub fn is_domain(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }
}

/// Calculator errors (basic, expression and programmer modes)
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum CalcError {
    /// Expression could not be parsed
    #[error("Failed to parse expression: {0}")]
    Parse(String),

    /// Expression references `x` but no value was supplied
    #[error("Variable 'x' is not bound")]
    UnboundVariable,

    #[error("Result is NaN (Not a Number)")]
    NotANumber,

    #[error("Result is infinite")]
    Infinite,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Operator {0} needs a right-hand operand")]
    MissingOperand(String),

    #[error("Unknown radix: {0}")]
    UnknownRadix(String),

    #[error("Unsupported word size: {0} (expected 8, 16, 32 or 64)")]
    UnsupportedWordSize(u32),

    #[error("Invalid digits for {radix}: {text}")]
    InvalidDigits { radix: String, text: String },
}

/// Graphing errors
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum GraphError {
    #[error("Invalid x-range")]
    InvalidXRange,

    #[error("x max must be > x min")]
    EmptyXRange,

    #[error("y max must be > y min")]
    EmptyYRange,

    #[error("No valid points")]
    NoValidPoints,
}

/// Settings persistence errors
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum SettingsError {
    #[error("Failed to determine config directory")]
    NoConfigDir,

    #[error("Failed to read settings file: {0}")]
    Read(String),

    #[error("Failed to write settings file: {0}")]
    Write(String),

    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConversionResult<T> = Result<T, ConversionError>;
pub type CalcResult<T> = Result<T, CalcError>;
