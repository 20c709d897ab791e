//! Item type tags for list fields
//!
//! A list field declares the type of its items from a closed set of tags.
//! Each tag owns its conversion rule, so there is no duck typing at the
//! point of assignment: a value either already has the tag's shape, widens
//! into it (`Int -> Float` only), or is rejected.

use crate::error::SchemaError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemType {
    /// `true` / `false`
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float; accepts integers by widening
    Float,
    /// UTF-8 text
    String,
}

impl ItemType {
    /// Canonical name, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Bool => "bool",
            ItemType::Int => "int",
            ItemType::Float => "float",
            ItemType::String => "str",
        }
    }

    /// Apply the tag's implicit conversion.
    ///
    /// Only `Int -> Float` widening is performed; anything else is returned
    /// unchanged for `accepts` to judge.
    pub fn cast(&self, value: Value) -> Value {
        match (self, value) {
            (ItemType::Float, Value::Int(i)) => Value::Float(i as f64),
            (_, v) => v,
        }
    }

    /// Whether `value` is a legal item of this type.
    ///
    /// `Null` is always accepted: an absent item is allowed in a list.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (ItemType::Bool, Value::Bool(_))
                | (ItemType::Int, Value::Int(_))
                | (ItemType::Float, Value::Float(_))
                | (ItemType::String, Value::String(_))
        )
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(ItemType::Bool),
            "int" => Ok(ItemType::Int),
            "float" => Ok(ItemType::Float),
            "str" | "string" => Ok(ItemType::String),
            other => Err(SchemaError::UnsupportedItemType {
                name: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ItemType {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ItemType> for String {
    fn from(t: ItemType) -> Self {
        t.name().to_string()
    }
}
