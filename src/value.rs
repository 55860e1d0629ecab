//! Dynamically typed option values

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A value of one of the scalar types an option commonly holds.
///
/// Serializes untagged, so a collection of `OptionValue`s stores plain JSON
/// scalars and can be read back by a collection typed as `bool`, `i64`,
/// `f64` or `String` for the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl OptionValue {
    /// Interpret user input: JSON scalars (`true`, `42`, `1.5`, `"quoted"`)
    /// keep their type, anything else is taken as a plain string.
    pub fn parse_input(input: &str) -> Self {
        serde_json::from_str(input.trim())
            .unwrap_or_else(|_| OptionValue::String(input.to_string()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::String(_) => "string",
        }
    }

    /// Get as bool, returning error if wrong type
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            OptionValue::Bool(v) => Ok(*v),
            _ => anyhow::bail!("Expected bool, got {}", self.type_name()),
        }
    }

    /// Get as int, returning error if wrong type
    pub fn as_int(&self) -> Result<i64> {
        match self {
            OptionValue::Int(v) => Ok(*v),
            _ => anyhow::bail!("Expected int, got {}", self.type_name()),
        }
    }

    /// Get as float; ints widen
    pub fn as_float(&self) -> Result<f64> {
        match self {
            OptionValue::Float(v) => Ok(*v),
            OptionValue::Int(v) => Ok(*v as f64),
            _ => anyhow::bail!("Expected float, got {}", self.type_name()),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            OptionValue::String(v) => Ok(v),
            _ => anyhow::bail!("Expected string, got {}", self.type_name()),
        }
    }
}

impl Default for OptionValue {
    fn default() -> Self {
        OptionValue::String(String::new())
    }
}

/// Same as [`OptionValue::parse_input`]; never fails
impl FromStr for OptionValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_input(s))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{}", v),
            OptionValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::String(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::String(v)
    }
}
