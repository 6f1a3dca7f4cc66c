//! Categorical equality filtering of sample records.

use crate::data::Dataset;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Text form of the "no filter" selection.
pub const ALL: &str = "All";

/// What a predicate asks of its field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    /// No filter; the predicate is skipped.
    All,
    /// Keep records whose field equals this value.
    Equals(String),
}

impl Selection {
    /// Parse a widget selection, mapping `"All"` to the sentinel.
    pub fn parse(s: &str) -> Self {
        if s == ALL {
            Self::All
        } else {
            Self::Equals(s.to_string())
        }
    }

    /// Check if this is the "no filter" sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL),
            Self::Equals(v) => write!(f, "{}", v),
        }
    }
}

/// A (field, desired value) equality predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub selection: Selection,
}

impl Predicate {
    /// Predicate requiring `field == value`.
    pub fn equals(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            selection: Selection::Equals(value.to_string()),
        }
    }

    /// Predicate from a widget selection, where `"All"` disables it.
    pub fn from_selection(field: &str, selection: &str) -> Self {
        Self {
            field: field.to_string(),
            selection: Selection::parse(selection),
        }
    }
}

/// Keep the records matching every active predicate, preserving order.
///
/// Predicates holding `Selection::All` are skipped. A predicate on a field
/// the schema does not have matches nothing. An empty result is a valid
/// dataset, not an error.
pub fn filter(dataset: &Dataset, predicates: &[Predicate]) -> Dataset {
    // Resolve each active predicate to a column position up front
    let mut active: Vec<(Option<usize>, &str)> = Vec::new();
    for p in predicates {
        if let Selection::Equals(desired) = &p.selection {
            active.push((dataset.schema().position(&p.field), desired.as_str()));
        }
    }

    if active.is_empty() {
        return dataset.retain(|_| true);
    }

    let view = dataset.retain(|record| {
        active.iter().all(|(pos, desired)| match pos {
            Some(pos) => record
                .value_at(*pos)
                .map(|v| v.matches(desired))
                .unwrap_or(false),
            None => false,
        })
    });

    debug!(
        "Filter {:?} kept {} of {} samples",
        predicates
            .iter()
            .filter(|p| !p.selection.is_all())
            .map(|p| format!("{}={}", p.field, p.selection))
            .collect::<Vec<_>>(),
        view.len(),
        dataset.len()
    );

    view
}

/// Options for a filter widget: `"All"` followed by the distinct present
/// values of `field` in order of first appearance.
///
/// An unknown field yields just `["All"]`.
pub fn filter_options(dataset: &Dataset, field: &str) -> Vec<String> {
    let mut options = vec![ALL.to_string()];
    let Some(values) = dataset.column(field) else {
        return options;
    };

    let mut seen = HashSet::new();
    for v in values {
        if v.is_absent() {
            continue;
        }
        let s = v.to_string();
        if seen.insert(s.clone()) {
            options.push(s);
        }
    }
    options
}
