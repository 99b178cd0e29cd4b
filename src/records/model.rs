//! Row and input types for the record access layer

use serde::Serialize;

use super::errors::{RecordError, RecordResult, ValidationErrors};
use super::filter::FilterSet;

/// Result of a lookup by identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn from_option(row: Option<T>) -> Self {
        match row {
            Some(row) => Lookup::Found(row),
            None => Lookup::NotFound,
        }
    }

    /// Turn `NotFound` into `RecordError::NotFound`
    pub fn found(self, entity: &'static str, id: i64) -> RecordResult<T> {
        match self {
            Lookup::Found(row) => Ok(row),
            Lookup::NotFound => Err(RecordError::not_found(entity, id)),
        }
    }
}

// ==================
// Reference Entities
// ==================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Company {
    pub company_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Department {
    pub department_id: i64,
    pub name: String,
}

// ==================
// Customers
// ==================

/// Customer joined with its company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CustomerRow {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub rating: i64,
    pub company_id: i64,
    pub company_name: String,
}

/// User-supplied customer columns, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub rating: i64,
    pub company_id: i64,
}

impl CustomerFields {
    /// Field checks that need no store access
    pub fn check(&self) -> ValidationErrors {
        check_names(&self.first_name, &self.last_name)
    }
}

/// Optional customer search predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub min_rating: Option<i64>,
}

impl CustomerFilter {
    pub fn to_filter_set(&self) -> FilterSet {
        FilterSet::new()
            .and_contains("c.first_name", self.first_name.as_deref())
            .and_contains("c.last_name", self.last_name.as_deref())
            .and_gte("c.rating", self.min_rating)
    }
}

// ==================
// Employees
// ==================

/// Employee joined with its department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct EmployeeRow {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub department_id: i64,
    pub department_name: String,
}

/// Employee linked to a customer through `EmployeeCustomer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct EmployeeSummary {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// User-supplied employee columns, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    pub department_id: i64,
}

impl EmployeeFields {
    /// Field checks that need no store access
    pub fn check(&self) -> ValidationErrors {
        check_names(&self.first_name, &self.last_name)
    }
}

/// Optional employee search predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl EmployeeFilter {
    pub fn to_filter_set(&self) -> FilterSet {
        FilterSet::new()
            .and_contains("e.first_name", self.first_name.as_deref())
            .and_contains("e.last_name", self.last_name.as_deref())
    }
}

fn check_names(first_name: &str, last_name: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if first_name.trim().is_empty() {
        errors.push("first_name", "is required");
    }
    if last_name.trim().is_empty() {
        errors.push("last_name", "is required");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_found() {
        let lookup = Lookup::from_option(Some(5));
        assert_eq!(lookup, Lookup::Found(5));
        assert_eq!(lookup.found("customer", 1).unwrap(), 5);
    }

    #[test]
    fn test_lookup_not_found_is_error() {
        let lookup: Lookup<i64> = Lookup::from_option(None);
        assert_eq!(lookup, Lookup::NotFound);
        assert!(matches!(
            lookup.found("employee", 8),
            Err(RecordError::NotFound { entity: "employee", .. })
        ));
    }

    #[test]
    fn test_customer_filter_set() {
        assert!(CustomerFilter::default().to_filter_set().is_empty());

        let filter = CustomerFilter {
            first_name: Some("Jo".to_string()),
            last_name: Some(String::new()),
            min_rating: Some(4),
        };
        let set = filter.to_filter_set();
        assert_eq!(set.len(), 2);
        assert_eq!(set.filters[0].column, "c.first_name");
        assert_eq!(set.filters[1].column, "c.rating");
    }

    #[test]
    fn test_blank_names_fail_check() {
        let fields = CustomerFields {
            first_name: " ".to_string(),
            last_name: "Tan".to_string(),
            rating: 3,
            company_id: 1,
        };
        let errors = fields.check();
        assert_eq!(errors.len(), 1);
        assert!(errors.has("first_name"));
    }

    #[test]
    fn test_employee_filter_set() {
        let filter = EmployeeFilter {
            first_name: None,
            last_name: Some("Lee".to_string()),
        };
        let set = filter.to_filter_set();
        assert_eq!(set.len(), 1);
        assert_eq!(set.filters[0].column, "e.last_name");
    }
}
