use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::core::features::unit_converter::{format_number, Category, UnitConversion};

const ERROR_RESULT: &str = "Error";

fn default_main_category() -> String {
    Category::Length.name().to_string()
}

fn default_graph_expression() -> String {
    "sin(x)".to_string()
}

fn default_xmin() -> f64 {
    -10.0
}

fn default_xmax() -> f64 {
    10.0
}

fn default_samples() -> usize {
    crate::core::features::graphing::DEFAULT_SAMPLES
}

fn default_radix() -> String {
    "DEC".to_string()
}

fn default_word_size() -> u32 {
    32
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept `12.5` as well as `"12.5"`
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("could not convert string to float: '{}'", text))),
    }
}

// ============================================================================
// Unit conversion
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ConvertRequest {
    #[serde(default = "default_main_category")]
    pub category: String,
    pub from_unit: String,
    pub to_unit: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[ts(type = "number | string")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ConvertResponse {
    /// Display form
    pub result: String,
    /// Raw result
    pub value: f64,
}

/// Body for `convert-all` and `convert-misc`; the category default depends on the route
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ConvertAllRequest {
    #[ts(optional)]
    pub category: Option<String>,
    pub from_unit: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[ts(type = "number | string")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ConvertAllEntry {
    pub unit: String,
    /// Formatted value, or `"Error"` when this unit failed
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl From<UnitConversion> for ConvertAllEntry {
    fn from(conversion: UnitConversion) -> Self {
        match conversion.result {
            Ok(value) => Self {
                unit: conversion.unit.to_string(),
                result: format_number(value),
                value: Some(value),
                error: None,
            },
            Err(e) => Self {
                unit: conversion.unit.to_string(),
                result: ERROR_RESULT.to_string(),
                value: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ConvertAllResponse {
    pub results: Vec<ConvertAllEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    /// `"main"` or `"misc"`
    pub group: String,
    pub units: Vec<String>,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_string(),
            group: category.group().as_str().to_string(),
            units: category.units().iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

// ============================================================================
// Calculator modes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct CalculateRequest {
    #[serde(default)]
    pub expr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct CalculateResponse {
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct GraphSampleRequest {
    #[serde(default = "default_graph_expression")]
    pub expr: String,
    #[serde(default = "default_xmin", deserialize_with = "lenient_f64")]
    #[ts(type = "number | string")]
    pub xmin: f64,
    #[serde(default = "default_xmax", deserialize_with = "lenient_f64")]
    #[ts(type = "number | string")]
    pub xmax: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct GraphSampleResponse {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Auto-fitted window, absent when no point was valid
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ymin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ymax: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ProgrammerRequest {
    pub lhs: String,
    /// `+ - * / AND OR XOR NOT SHL SHR`
    pub op: String,
    #[ts(optional)]
    pub rhs: Option<String>,
    #[serde(default = "default_radix")]
    pub radix: String,
    #[serde(default = "default_word_size")]
    pub word_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ProgrammerResponse {
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::ConversionError;
    use serde_json::json;

    #[test]
    fn convert_request_defaults() {
        let req: ConvertRequest = serde_json::from_value(json!({ "from_unit": "meter (m)", "to_unit": "foot (ft)" })).unwrap();
        assert_eq!(req.category, "Length");
        assert_eq!(req.value, 0.0);
    }

    #[test]
    fn numbers_may_be_strings() {
        let req: ConvertRequest =
            serde_json::from_value(json!({ "from_unit": "a", "to_unit": "b", "value": " 2.5 " })).unwrap();
        assert_eq!(req.value, 2.5);

        let req: GraphSampleRequest = serde_json::from_value(json!({ "xmin": "-1", "xmax": 3 })).unwrap();
        assert_eq!((req.xmin, req.xmax, req.samples), (-1.0, 3.0, 600));
        assert_eq!(req.expr, "sin(x)");

        let err = serde_json::from_value::<ConvertRequest>(json!({ "from_unit": "a", "to_unit": "b", "value": "abc" }));
        assert!(err.is_err());
    }

    #[test]
    fn programmer_request_defaults() {
        let req: ProgrammerRequest = serde_json::from_value(json!({ "lhs": "1", "op": "+", "rhs": "2" })).unwrap();
        assert_eq!(req.radix, "DEC");
        assert_eq!(req.word_size, 32);
    }

    #[test]
    fn failed_entry_renders_error() {
        let entry = ConvertAllEntry::from(UnitConversion {
            unit: "decibel (dB)",
            result: Err(ConversionError::NonPositiveIntensity),
        });
        assert_eq!(entry.result, "Error");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, json!({ "unit": "decibel (dB)", "result": "Error", "error": "Intensity must be > 0 for dB" }));
    }

    #[test]
    fn category_info_lists_units() {
        let info = CategoryInfo::from(Category::Rpm);
        assert_eq!(info.id, "rpm");
        assert_eq!(info.group, "misc");
        assert!(!info.units.is_empty());
    }
}
