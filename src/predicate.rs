//! Search predicates and the metadata fields that qualify them.
//!
//! A form declares operators for an attribute through metadata fields named
//! `_<attribute>_logical` (AND, OR, ...) and `_<attribute>_comp` (=, LIKE,
//! BETWEEN, ...). The value itself sits in a field named `<attribute>`.
//!
//! Predicates are built in two passes. The first pass collects every operator
//! into an [`OperatorTable`], the second formats value fields against the
//! complete table, so the position of a metadata field in the form is
//! irrelevant. The table lives only for the duration of one call.
//!
//! BETWEEN comparisons take their bounds from two sibling controls,
//! `<attribute>_between` (low) and `<attribute>_not_between` (high), unless
//! the `<attribute>` field already carries a resolved range.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::escape::quote;
use crate::form::{Field, FormData, is_blank};
use crate::settings::ControlNames;

pub const METADATA_SIGIL: char = '_';
pub const BETWEEN: &str = "BETWEEN";
const LOW_BOUND_SUFFIX: &str = "_between";
const HIGH_BOUND_SUFFIX: &str = "_not_between";

lazy_static! {
    static ref METADATA_NAME: Regex = Regex::new(r"^_(.+)_(logical|comp)$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Logical,
    Comparison,
}

/// The attribute and operator kind encoded in a metadata field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNameDecomposition {
    pub attribute: String,
    pub kind: OperatorKind,
}

impl FieldNameDecomposition {
    /// Decomposes `_<attribute>_logical` or `_<attribute>_comp`. Any other
    /// name yields `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let captures = METADATA_NAME.captures(name)?;
        let kind = match &captures[2] {
            "logical" => OperatorKind::Logical,
            _ => OperatorKind::Comparison,
        };
        Some(Self { attribute: captures[1].to_string(), kind })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operators {
    pub logical: Option<String>,
    pub comparison: Option<String>,
}

impl Operators {
    pub fn is_between(&self) -> bool {
        self.comparison
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(BETWEEN))
    }
}

/// Operators declared per attribute, collected from one form.
#[derive(Debug, Default)]
pub struct OperatorTable {
    declared: HashMap<String, Operators>,
}

impl OperatorTable {
    pub fn collect(form: &FormData) -> Self {
        let mut table = Self::default();
        for field in form {
            let name = field.name.as_str();
            if is_blank(name) || !name.starts_with(METADATA_SIGIL) {
                continue;
            }
            match FieldNameDecomposition::parse(name) {
                Some(decomposition) => table.record(decomposition, &field.value),
                None => debug!(name, "not an operator field, skipped"),
            }
        }
        table
    }

    /// Records an operator. Later declarations replace earlier ones and a
    /// blank operator value clears the operator.
    pub fn record(&mut self, decomposition: FieldNameDecomposition, value: &Field) {
        let operator = value
            .scalar()
            .filter(|v| !is_blank(v))
            .map(str::to_string);
        let entry = self.declared.entry(decomposition.attribute).or_default();
        match decomposition.kind {
            OperatorKind::Logical => entry.logical = operator,
            OperatorKind::Comparison => entry.comparison = operator,
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&Operators> {
        self.declared.get(attribute)
    }

    /// True when any metadata field names `attribute`.
    pub fn declares(&self, attribute: &str) -> bool {
        self.declared.contains_key(attribute)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateValue {
    Single(String),
    Range(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPredicate {
    pub attribute: String,
    pub logical: Option<String>,
    pub comparison: Option<String>,
    pub value: PredicateValue,
}

impl SearchPredicate {
    /// `<attribute>[ <logical>][ <comparison>] "<value>"`, or a bracketed pair
    /// of quoted bounds for ranges.
    pub fn render(&self, escape_quotes: bool) -> String {
        let quoted = |v: &str| {
            if escape_quotes {
                format!("\"{}\"", quote(v))
            } else {
                format!("\"{v}\"")
            }
        };
        let mut out = self.attribute.clone();
        for operator in [&self.logical, &self.comparison].into_iter().flatten() {
            out.push(' ');
            out.push_str(operator);
        }
        match &self.value {
            PredicateValue::Single(v) => {
                out.push(' ');
                out.push_str(&quoted(v));
            }
            PredicateValue::Range(low, high) => {
                out.push_str(&format!(" [{}, {}]", quoted(low), quoted(high)));
            }
        }
        out
    }
}

// Which bound a sibling control supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Low,
    High,
}

fn bound_sibling<'a>(name: &'a str, table: &OperatorTable) -> Option<(&'a str, Bound)> {
    // the high suffix also ends in the low one, so it goes first
    [(HIGH_BOUND_SUFFIX, Bound::High), (LOW_BOUND_SUFFIX, Bound::Low)]
        .into_iter()
        .find_map(|(suffix, bound)| {
            name.strip_suffix(suffix)
                .filter(|stem| !stem.is_empty() && table.declares(stem))
                .map(|stem| (stem, bound))
        })
}

fn field_value(value: &Field) -> Option<PredicateValue> {
    if value.is_blank() {
        return None;
    }
    match value {
        Field::Range { low, high } => Some(PredicateValue::Range(low.clone(), high.clone())),
        other => other.scalar().map(|v| PredicateValue::Single(v.to_string())),
    }
}

fn between_value(form: &FormData, attribute: &str) -> Option<PredicateValue> {
    if let Some(field) = form.get(attribute) {
        if let Field::Range { .. } = field.value {
            return field_value(&field.value);
        }
    }
    let bound = |suffix: &str| {
        form.get(&format!("{attribute}{suffix}"))
            .and_then(|f| f.value.scalar())
            .unwrap_or("")
            .to_string()
    };
    let (low, high) = (bound(LOW_BOUND_SUFFIX), bound(HIGH_BOUND_SUFFIX));
    if is_blank(&low) && is_blank(&high) {
        // no bounds posted, the plain control still counts
        return form.get(attribute).and_then(|f| field_value(&f.value));
    }
    Some(PredicateValue::Range(low, high))
}

/// Extracts the predicates of a form, in field order.
pub fn search_predicates(form: &FormData, names: &ControlNames) -> Vec<SearchPredicate> {
    let table = OperatorTable::collect(form);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut predicates = Vec::new();
    for field in form {
        let name = field.name.as_str();
        if is_blank(name) || name.starts_with(METADATA_SIGIL) || names.is_control(name) {
            continue;
        }
        let (attribute, sibling) = match bound_sibling(name, &table) {
            Some((stem, bound)) => (stem, Some(bound)),
            None => (name, None),
        };
        if seen.contains(attribute) {
            debug!(attribute, "repeated field, only the first occurrence counts");
            continue;
        }
        let operators = table.get(attribute).cloned().unwrap_or_default();
        let value = if operators.is_between() {
            seen.insert(attribute);
            between_value(form, attribute)
        } else if let Some(bound) = sibling {
            debug!(name, ?bound, "bound control without BETWEEN, skipped");
            continue;
        } else {
            seen.insert(attribute);
            field_value(&field.value)
        };
        let Some(value) = value else {
            debug!(attribute, "blank value, skipped");
            continue;
        };
        predicates.push(SearchPredicate {
            attribute: attribute.to_string(),
            logical: operators.logical,
            comparison: operators.comparison,
            value,
        });
    }
    predicates
}

/// Comma-joined textual form of a list of predicates.
pub fn predicate_string(predicates: &[SearchPredicate], escape_quotes: bool) -> String {
    predicates
        .iter()
        .map(|p| p.render(escape_quotes))
        .collect::<Vec<_>>()
        .join(", ")
}
