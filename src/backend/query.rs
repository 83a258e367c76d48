//! Row query model shared by every backend implementation.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

// == Filter ==
/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals value
    Eq(String, Value),
    /// Column differs from value; a missing column passes
    NotEq(String, Value),
    /// Column is one of the values
    In(String, Vec<Value>),
    /// Column is none of the values
    NotIn(String, Vec<Value>),
    /// Column is greater than or equal to value
    Gte(String, Value),
    /// Case-insensitive substring match on any of the columns
    ILike { columns: Vec<String>, term: String },
}

impl Filter {
    /// Evaluates the predicate against a row.
    pub fn matches(&self, row: &serde_json::Map<String, Value>) -> bool {
        let column = |name: &str| row.get(name).unwrap_or(&Value::Null);

        match self {
            Filter::Eq(name, value) => values_equal(column(name), value),
            Filter::NotEq(name, value) => !values_equal(column(name), value),
            Filter::In(name, values) => values.iter().any(|v| values_equal(column(name), v)),
            Filter::NotIn(name, values) => !values.iter().any(|v| values_equal(column(name), v)),
            Filter::Gte(name, value) => matches!(
                compare_values(column(name), value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::ILike { columns, term } => {
                let needle = term.to_lowercase();
                columns.iter().any(|name| match column(name) {
                    Value::String(s) => s.to_lowercase().contains(&needle),
                    _ => false,
                })
            }
        }
    }
}

// == Order ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

// == Row Query ==
/// Filters, ordering and pagination for one `select`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::Eq(column.to_string(), value.into()))
    }

    pub fn not_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::NotEq(column.to_string(), value.into()))
    }

    /// Rows not soft-deleted. Rows without an `is_active` column count as active.
    pub fn active(self) -> Self {
        self.not_eq("is_active", false)
    }

    pub fn is_in(self, column: &str, values: Vec<Value>) -> Self {
        self.filter(Filter::In(column.to_string(), values))
    }

    pub fn not_in(self, column: &str, values: Vec<Value>) -> Self {
        self.filter(Filter::NotIn(column.to_string(), values))
    }

    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::Gte(column.to_string(), value.into()))
    }

    pub fn ilike(self, columns: &[&str], term: &str) -> Self {
        self.filter(Filter::ILike {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            term: term.to_string(),
        })
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

// == Value Comparison ==
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

/// Orders two column values.
///
/// Numbers compare numerically, RFC 3339 strings chronologically, other strings
/// lexically. Mixed or null operands are incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order used for sorting rows.
///
/// Values are ranked by kind (bool, number, timestamp string, other string,
/// array, object), then compared within the kind. Timestamps that denote the
/// same instant fall back to their raw text.
pub fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(s) if parse_timestamp(s).is_some() => 3,
            Value::String(_) => 4,
            Value::Array(_) => 5,
            Value::Object(_) => 6,
        }
    }

    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty).then_with(|| x.cmp(y)),
            _ => x.cmp(y),
        },
        _ => a.to_string().cmp(&b.to_string()),
    })
}
