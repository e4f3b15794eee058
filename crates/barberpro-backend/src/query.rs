//! Row filters in PostgREST terms.
//!
//! Only the operators the application needs are modelled: equality filters,
//! a single ordering column and a row limit.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<Filter>,
    order: Option<(String, bool)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `column = value` filter.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> Option<(&str, bool)> {
        self.order.as_ref().map(|(c, asc)| (c.as_str(), *asc))
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Query-string pairs for a PostgREST read. `with_select` is false for
    /// PATCH/DELETE, which take filters only.
    pub fn to_pairs(&self, with_select: bool) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        if with_select {
            pairs.push(("select".to_string(), "*".to_string()));
        }
        for filter in &self.filters {
            pairs.push((filter.column.clone(), format!("eq.{}", filter.value)));
        }
        if with_select {
            if let Some((column, ascending)) = &self.order {
                let direction = if *ascending { "asc" } else { "desc" };
                pairs.push(("order".to_string(), format!("{column}.{direction}")));
            }
            if let Some(limit) = self.limit {
                pairs.push(("limit".to_string(), limit.to_string()));
            }
        }
        pairs
    }

    /// Whether a JSON row satisfies every filter.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|filter| {
            row.get(&filter.column)
                .map(|v| filter_text(v) == filter.value)
                .unwrap_or(false)
        })
    }
}

/// Renders a JSON scalar the way it appears in a filter value.
pub(crate) fn filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
