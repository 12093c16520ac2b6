//! Module parameter values.

use serde::{Deserialize, Serialize};

/// A module parameter as written in a document: a bare number or a string
/// with an optional unit.
///
/// # Example
///
/// ```rust
/// use audio_matrix_config::ParamValue;
///
/// assert_eq!(ParamValue::Number(0.5).resolve(), Some(0.5));
/// assert_eq!(ParamValue::from("50%").resolve(), Some(0.5));
/// assert!(ParamValue::from("loud").resolve().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    /// Plain number, e.g. `gain = 0.5`.
    Number(f64),
    /// String value, e.g. `gain = "-6dB"`.
    Text(String),
}

impl ParamValue {
    /// Resolves the value to the number a module receives.
    ///
    /// Returns `None` for unparsable or non-finite values.
    pub fn resolve(&self) -> Option<f32> {
        let value = match self {
            ParamValue::Number(n) => *n as f32,
            ParamValue::Text(s) => parse_param_value(s)?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Number(f64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Parse a parameter value string into an f32.
///
/// Supports:
/// - Plain numbers: "0.5", "1.2", "-0.3"
/// - Percentages: "50%", "120%" (divided by 100)
/// - Decibels: "-6dB", "+3dB" (converted to linear gain)
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim();

    // Percentages
    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|v| v / 100.0);
    }

    // Decibels
    if let Some(db) = value
        .strip_suffix("dB")
        .or_else(|| value.strip_suffix("db"))
        .or_else(|| value.strip_suffix("DB"))
    {
        return db
            .trim()
            .parse::<f32>()
            .ok()
            .map(audio_matrix_core::db_to_linear);
    }

    // Plain number
    value.parse::<f32>().ok()
}
