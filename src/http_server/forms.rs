//! Form and query shapes
//!
//! Forms arrive as raw urlencoded pairs so the repeated `employee_id` key
//! survives. Raw values are kept as strings to re-render a rejected form
//! exactly as submitted; `validate` turns them into typed record fields.

use serde::{Deserialize, Serialize};

use crate::records::{
    CustomerFields, CustomerFilter, CustomerRow, EmployeeFields, EmployeeFilter, EmployeeRow,
    ValidationErrors,
};

/// Decoded `application/x-www-form-urlencoded` body
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `name`, or "" when absent
    pub fn value(&self, name: &str) -> String {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    /// Every value for `name`, in submission order
    pub fn values(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

// ==================
// Customers
// ==================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub rating: String,
    pub company_id: String,
    pub employee_id: Vec<String>,
}

impl CustomerForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            first_name: fields.value("first_name"),
            last_name: fields.value("last_name"),
            rating: fields.value("rating"),
            company_id: fields.value("company_id"),
            employee_id: fields
                .values("employee_id")
                .into_iter()
                .filter(|v| !v.trim().is_empty())
                .collect(),
        }
    }

    /// Pre-filled edit form
    pub fn from_row(row: &CustomerRow) -> Self {
        Self {
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            rating: row.rating.to_string(),
            company_id: row.company_id.to_string(),
            employee_id: Vec::new(),
        }
    }

    /// Typed fields plus the selected employee ids
    pub fn validate(&self) -> Result<(CustomerFields, Vec<i64>), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let first_name = required_text(&mut errors, "first_name", &self.first_name);
        let last_name = required_text(&mut errors, "last_name", &self.last_name);
        let rating = required_integer(&mut errors, "rating", &self.rating);
        let company_id = required_id(&mut errors, "company_id", &self.company_id);

        let mut employee_ids = Vec::with_capacity(self.employee_id.len());
        for raw in &self.employee_id {
            match parse_id(raw) {
                Some(id) => employee_ids.push(id),
                None => errors.push("employee_id", format!("'{}' is not a valid id", raw)),
            }
        }

        match (first_name, last_name, rating, company_id) {
            (Some(first_name), Some(last_name), Some(rating), Some(company_id))
                if errors.is_empty() =>
            {
                let fields = CustomerFields {
                    first_name,
                    last_name,
                    rating,
                    company_id,
                };
                Ok((fields, employee_ids))
            }
            _ => Err(errors),
        }
    }
}

/// `GET /customers` query string
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerSearch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub ratings: Option<String>,
}

impl CustomerSearch {
    /// Filter to run; a blank `ratings` means no threshold
    pub fn to_filter(&self) -> Result<CustomerFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let min_rating = match self.ratings.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(rating) => Some(rating),
                Err(_) => {
                    errors.push("ratings", "must be a whole number");
                    None
                }
            },
        };

        errors.into_result(CustomerFilter {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            min_rating,
        })
    }
}

// ==================
// Employees
// ==================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub department_id: String,
}

impl EmployeeForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            first_name: fields.value("first_name"),
            last_name: fields.value("last_name"),
            department_id: fields.value("department_id"),
        }
    }

    pub fn from_row(row: &EmployeeRow) -> Self {
        Self {
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            department_id: row.department_id.to_string(),
        }
    }

    pub fn validate(&self) -> Result<EmployeeFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let first_name = required_text(&mut errors, "first_name", &self.first_name);
        let last_name = required_text(&mut errors, "last_name", &self.last_name);
        let department_id = required_id(&mut errors, "department_id", &self.department_id);

        match (first_name, last_name, department_id) {
            (Some(first_name), Some(last_name), Some(department_id)) => Ok(EmployeeFields {
                first_name,
                last_name,
                department_id,
            }),
            _ => Err(errors),
        }
    }
}

/// `GET /employees` query string
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EmployeeSearch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl EmployeeSearch {
    pub fn to_filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

// ==================
// Field Parsing
// ==================

/// Parse a path or form identifier
///
/// Keys are `INT` columns, so only positive values within `i32` are ids.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .map(i64::from)
}

fn required_text(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(field, "is required");
        None
    } else {
        Some(value.to_string())
    }
}

fn required_integer(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<i64> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(field, "is required");
        return None;
    }
    match value.parse::<i64>() {
        Ok(n) if i32::try_from(n).is_ok() => Some(n),
        Ok(_) => {
            errors.push(field, "is out of range");
            None
        }
        Err(_) => {
            errors.push(field, "must be a whole number");
            None
        }
    }
}

fn required_id(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<i64> {
    if raw.trim().is_empty() {
        errors.push(field, "is required");
        return None;
    }
    match parse_id(raw) {
        Some(id) => Some(id),
        None => {
            errors.push(field, "is not a valid id");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_repeated_employee_ids_are_kept() {
        let form = CustomerForm::from_fields(&fields(&[
            ("first_name", "John"),
            ("last_name", "Tan"),
            ("rating", "4"),
            ("company_id", "1"),
            ("employee_id", "2"),
            ("employee_id", "5"),
        ]));

        let (customer, employee_ids) = form.validate().unwrap();
        assert_eq!(customer.first_name, "John");
        assert_eq!(customer.rating, 4);
        assert_eq!(customer.company_id, 1);
        assert_eq!(employee_ids, vec![2, 5]);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let form = CustomerForm::from_fields(&fields(&[("rating", "lots")]));
        let errors = form.validate().unwrap_err();

        assert!(errors.has("first_name"));
        assert!(errors.has("last_name"));
        assert!(errors.has("rating"));
        assert!(errors.has("company_id"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_bad_employee_id_rejects_form() {
        let form = CustomerForm::from_fields(&fields(&[
            ("first_name", "John"),
            ("last_name", "Tan"),
            ("rating", "4"),
            ("company_id", "1"),
            ("employee_id", "abc"),
        ]));
        let errors = form.validate().unwrap_err();
        assert!(errors.has("employee_id"));
    }

    #[test]
    fn test_names_are_trimmed() {
        let form = EmployeeForm::from_fields(&fields(&[
            ("first_name", "  Ada "),
            ("last_name", "Lee"),
            ("department_id", "3"),
        ]));
        let employee = form.validate().unwrap();
        assert_eq!(employee.first_name, "Ada");
        assert_eq!(employee.department_id, 3);
    }

    #[test]
    fn test_employee_department_required() {
        let form = EmployeeForm::from_fields(&fields(&[
            ("first_name", "Ada"),
            ("last_name", "Lee"),
            ("department_id", "0"),
        ]));
        let errors = form.validate().unwrap_err();
        assert!(errors.has("department_id"));
    }

    #[test]
    fn test_customer_search_blank_rating() {
        let search = CustomerSearch {
            first_name: Some("Jo".to_string()),
            last_name: None,
            ratings: Some("".to_string()),
        };
        let filter = search.to_filter().unwrap();
        assert_eq!(filter.min_rating, None);
        assert_eq!(filter.first_name.as_deref(), Some("Jo"));
    }

    #[test]
    fn test_customer_search_bad_rating() {
        let search = CustomerSearch {
            ratings: Some("high".to_string()),
            ..Default::default()
        };
        assert!(search.to_filter().unwrap_err().has("ratings"));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("x"), None);
        assert_eq!(parse_id("2147483647"), Some(2147483647));
        assert_eq!(parse_id("2147483648"), None);
    }

    #[test]
    fn test_values_beyond_int_columns_are_rejected() {
        let form = CustomerForm::from_fields(&fields(&[
            ("first_name", "John"),
            ("last_name", "Tan"),
            ("rating", "3000000000"),
            ("company_id", "4294967296"),
            ("employee_id", "9999999999"),
        ]));
        let errors = form.validate().unwrap_err();

        assert!(errors.has("rating"));
        assert!(errors.has("company_id"));
        assert!(errors.has("employee_id"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_negative_rating_within_range_is_kept() {
        let form = CustomerForm::from_fields(&fields(&[
            ("first_name", "John"),
            ("last_name", "Tan"),
            ("rating", "-2147483648"),
            ("company_id", "1"),
        ]));
        let (customer, _) = form.validate().unwrap();
        assert_eq!(customer.rating, i64::from(i32::MIN));
    }
}
