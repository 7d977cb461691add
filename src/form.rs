//! Input model: an ordered collection of named form fields.
//!
//! Browsers hand over heterogeneous controls (text inputs, select lists, ...).
//! Here every control value is one of the [`Field`] variants, so downstream
//! code never has to probe a field for `options` to learn what it is.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

lazy_static! {
    static ref BLANK: Regex = Regex::new(r"^\s*$").unwrap();
}

/// True when a value consists only of whitespace.
pub fn is_blank(value: &str) -> bool {
    BLANK.is_match(value)
}

/// The value carried by a single control.
///
/// In JSON a plain string is a scalar, `{"options": [..], "selected_index": n}`
/// a choice list and `{"low": .., "high": ..}` an already resolved range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Scalar(String),
    Choice { options: Vec<String>, selected_index: usize },
    Range { low: String, high: String },
}

impl Field {
    /// The single string this control contributes. A choice whose index points
    /// outside its options contributes the empty string. Ranges have no scalar.
    pub fn scalar(&self) -> Option<&str> {
        match self {
            Field::Scalar(value) => Some(value),
            Field::Choice { options, selected_index } => {
                Some(options.get(*selected_index).map(String::as_str).unwrap_or(""))
            }
            Field::Range { .. } => None,
        }
    }
    /// Blank when there is no value to speak of, see [`is_blank`].
    pub fn is_blank(&self) -> bool {
        match self {
            Field::Range { low, high } => is_blank(low) && is_blank(high),
            other => other.scalar().is_none_or(is_blank),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self { Field::Scalar(value.to_string()) }
}
impl From<String> for Field {
    fn from(value: String) -> Self { Field::Scalar(value) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: Field,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<Field>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// The submitted form. Order is significant and names may repeat
/// (multi-select controls post one entry per selected option).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormData {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }
    /// Builder style append, mostly handy in tests and benches.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Field>) -> Self {
        self.push(name, value);
        self
    }
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Field>) {
        self.fields.push(FormField::new(name, value));
    }
    /// First field carrying `name`, the way a form is indexed by control name.
    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, FormField> {
        self.fields.iter()
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<Field>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        Self {
            fields: pairs.into_iter().map(|(k, v)| FormField::new(k, v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FormData {
    type Item = &'a FormField;
    type IntoIter = std::slice::Iter<'a, FormField>;
    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
