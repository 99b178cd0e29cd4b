//! # Filter Expressions
//!
//! Optional search predicates for list queries. A `FilterSet` appends one
//! `AND <column> <op> ?` fragment per filter to a query whose base already
//! ends in a `WHERE` clause, binding every value positionally.

use sqlx::{Any, QueryBuilder};

/// Escape character used in `LIKE ... ESCAPE` clauses
const LIKE_ESCAPE: char = '!';

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,

    /// Greater than or equal
    Gte,

    /// Substring match (LIKE '%value%')
    Contains,
}

impl FilterOperator {
    /// SQL fragment placed between the column and the placeholder
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Gte => ">=",
            FilterOperator::Contains => "LIKE",
        }
    }
}

/// Value bound to a filter placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    /// Qualified column, always a code constant
    pub column: &'static str,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: FilterValue,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(column: &'static str, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            column,
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(column: &'static str, value: i64) -> Self {
        Self::new(column, FilterOperator::Eq, FilterValue::Integer(value))
    }

    /// Create a lower-bound filter
    pub fn gte(column: &'static str, value: i64) -> Self {
        Self::new(column, FilterOperator::Gte, FilterValue::Integer(value))
    }

    /// Create a substring filter
    pub fn contains(column: &'static str, needle: impl Into<String>) -> Self {
        Self::new(
            column,
            FilterOperator::Contains,
            FilterValue::Text(needle.into()),
        )
    }

    /// Value as it is bound: substring needles are escaped and wrapped in `%`
    pub fn bound_value(&self) -> FilterValue {
        match (&self.operator, &self.value) {
            (FilterOperator::Contains, FilterValue::Text(needle)) => {
                FilterValue::Text(format!("%{}%", escape_like(needle)))
            }
            (_, value) => value.clone(),
        }
    }

    /// Append ` AND <column> <op> ?` and bind the value
    pub fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        builder.push(" AND ");
        builder.push(self.column);
        builder.push(" ");
        builder.push(self.operator.as_sql());
        builder.push(" ");

        match self.bound_value() {
            FilterValue::Text(text) => builder.push_bind(text),
            FilterValue::Integer(n) => builder.push_bind(n),
        };

        if self.operator == FilterOperator::Contains {
            builder.push(format!(" ESCAPE '{}'", LIKE_ESCAPE));
        }
    }
}

/// Escape LIKE wildcards so the needle matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// A set of filters combined with AND logic
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a substring filter unless the needle is absent or blank
    pub fn and_contains(self, column: &'static str, needle: Option<&str>) -> Self {
        match needle.map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => self.and(FilterExpr::contains(column, needle)),
            None => self,
        }
    }

    /// Add a lower-bound filter when a threshold is given
    pub fn and_gte(self, column: &'static str, threshold: Option<i64>) -> Self {
        match threshold {
            Some(value) => self.and(FilterExpr::gte(column, value)),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Append every filter to `builder`
    pub fn push_to(&self, builder: &mut QueryBuilder<'_, Any>) {
        for filter in &self.filters {
            filter.push_to(builder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT * FROM Customers c WHERE 1 = 1";

    fn render(set: &FilterSet) -> String {
        let mut builder = QueryBuilder::<Any>::new(BASE);
        set.push_to(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_empty_set_leaves_base_query() {
        let set = FilterSet::new();
        assert!(set.is_empty());
        assert_eq!(render(&set), BASE);
    }

    #[test]
    fn test_blank_needles_are_ignored() {
        let set = FilterSet::new()
            .and_contains("c.first_name", None)
            .and_contains("c.last_name", Some("   "))
            .and_gte("c.rating", None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_one_placeholder_per_filter() {
        let set = FilterSet::new()
            .and_contains("c.first_name", Some("Jo"))
            .and_contains("c.last_name", Some("Tan"))
            .and_gte("c.rating", Some(3));
        let sql = render(&set);

        assert_eq!(set.len(), 3);
        assert_eq!(sql.matches('?').count(), 3);
        assert!(sql.contains(" AND c.first_name LIKE ? ESCAPE '!'"));
        assert!(sql.contains(" AND c.last_name LIKE ? ESCAPE '!'"));
        assert!(sql.ends_with(" AND c.rating >= ?"));
    }

    #[test]
    fn test_values_are_never_interpolated() {
        let set = FilterSet::new().and_contains("c.first_name", Some("'; DROP TABLE Customers; --"));
        let sql = render(&set);
        assert!(!sql.contains("DROP TABLE"));
    }

    #[test]
    fn test_contains_wraps_and_trims() {
        let set = FilterSet::new().and_contains("c.first_name", Some("  Jo "));
        assert_eq!(
            set.filters[0].bound_value(),
            FilterValue::Text("%Jo%".to_string())
        );
    }

    #[test]
    fn test_contains_escapes_wildcards() {
        let filter = FilterExpr::contains("c.first_name", "50%_off!");
        assert_eq!(
            filter.bound_value(),
            FilterValue::Text("%50!%!_off!!%".to_string())
        );
    }

    #[test]
    fn test_eq_filter() {
        let filter = FilterExpr::eq("c.customer_id", 9);
        assert_eq!(filter.operator.as_sql(), "=");
        assert_eq!(filter.bound_value(), FilterValue::Integer(9));
    }
}
