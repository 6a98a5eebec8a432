//! The tagged union of values an attribute argument can carry.
//!
//! The parser (out of scope here) only ever produces one of four shapes for
//! an argument: a string literal, an integer, a boolean, an ordered list of
//! strings, or a function call such as `now()` or `dbgenerated("expr")`.
//! Downstream code matches on this instead of downcasting a dynamic value.

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
    Function { name: String, args: Vec<AttributeArg> },
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<(&str, &[AttributeArg])> {
        match self {
            AttributeValue::Function { name, args } => Some((name.as_str(), args.as_slice())),
            _ => None,
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        self.as_function().map(|(name, _)| name)
    }
}

/// A single, optionally-named argument of an [`crate::Attribute`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeArg {
    pub name: Option<String>,
    pub value: AttributeValue,
}

impl AttributeArg {
    pub fn unnamed(value: AttributeValue) -> Self {
        AttributeArg { name: None, value }
    }

    pub fn named(name: impl Into<String>, value: AttributeValue) -> Self {
        AttributeArg {
            name: Some(name.into()),
            value,
        }
    }
}
