//! Customer record access
//!
//! Customers belong to exactly one company and link to any number of
//! employees through `EmployeeCustomer`. Creation writes the customer row
//! and its association rows in one transaction.

use std::collections::BTreeSet;

use sqlx::{Any, AnyConnection, AnyPool, QueryBuilder};
use tracing::{debug, info};

use crate::store::Backend;

use super::errors::{RecordError, RecordResult};
use super::filter::{FilterExpr, FilterSet};
use super::model::{
    Company, CustomerFields, CustomerFilter, CustomerRow, EmployeeSummary, Lookup,
};

const ENTITY: &str = "customer";

const SELECT_CUSTOMERS: &str = "SELECT c.customer_id, c.first_name, c.last_name, c.rating, \
     c.company_id, co.name AS company_name \
     FROM Customers c JOIN Companies co ON c.company_id = co.company_id \
     WHERE 1 = 1";

/// Customer repository over the shared pool
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: AnyPool,
    backend: Backend,
}

impl CustomerRepository {
    pub fn new(pool: AnyPool, backend: Backend) -> Self {
        Self { pool, backend }
    }

    /// Customers joined with their company, narrowed by `filter`
    pub async fn list(&self, filter: &CustomerFilter) -> RecordResult<Vec<CustomerRow>> {
        let mut builder = QueryBuilder::<Any>::new(SELECT_CUSTOMERS);
        filter.to_filter_set().push_to(&mut builder);

        let rows = builder
            .build_query_as::<CustomerRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, customer_id: i64) -> RecordResult<Lookup<CustomerRow>> {
        let mut builder = QueryBuilder::<Any>::new(SELECT_CUSTOMERS);
        FilterSet::new()
            .and(FilterExpr::eq("c.customer_id", customer_id))
            .push_to(&mut builder);

        let row = builder
            .build_query_as::<CustomerRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(Lookup::from_option(row))
    }

    /// Like `get_by_id`, but a missing row is `RecordError::NotFound`
    pub async fn require(&self, customer_id: i64) -> RecordResult<CustomerRow> {
        self.get_by_id(customer_id).await?.found(ENTITY, customer_id)
    }

    /// All companies, for form choice lists
    pub async fn list_companies(&self) -> RecordResult<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>("SELECT company_id, name FROM Companies")
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    /// Employees currently linked to a customer
    pub async fn assigned_employees(&self, customer_id: i64) -> RecordResult<Vec<EmployeeSummary>> {
        let employees = sqlx::query_as::<_, EmployeeSummary>(
            "SELECT e.employee_id, e.first_name, e.last_name \
             FROM EmployeeCustomer ec JOIN Employees e ON ec.employee_id = e.employee_id \
             WHERE ec.customer_id = ?",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    /// Insert a customer and link it to `employee_ids`, returning the new id
    ///
    /// Duplicate employee ids are collapsed. Every referenced company and
    /// employee must exist. Nothing is written unless every statement
    /// succeeds.
    pub async fn create(&self, fields: &CustomerFields, employee_ids: &[i64]) -> RecordResult<i64> {
        let employee_ids: Vec<i64> = employee_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut tx = self.pool.begin().await?;

        let mut errors = fields.check();
        if !company_exists(&mut tx, fields.company_id).await? {
            errors.push("company_id", format!("company {} does not exist", fields.company_id));
        }
        for missing in missing_employees(&mut tx, &employee_ids).await? {
            errors.push("employee_id", format!("employee {} does not exist", missing));
        }
        errors.into_result(())?;

        sqlx::query(
            "INSERT INTO Customers (first_name, last_name, rating, company_id) VALUES (?, ?, ?, ?)",
        )
        .bind(fields.first_name.as_str())
        .bind(fields.last_name.as_str())
        .bind(fields.rating)
        .bind(fields.company_id)
        .execute(&mut *tx)
        .await?;

        let customer_id = self.backend.last_insert_id(&mut tx).await?;

        if !employee_ids.is_empty() {
            let mut builder =
                QueryBuilder::<Any>::new("INSERT INTO EmployeeCustomer (employee_id, customer_id) ");
            builder.push_values(employee_ids.iter(), |mut row, employee_id| {
                row.push_bind(*employee_id).push_bind(customer_id);
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|source| RecordError::Association { source })?;
        }

        tx.commit().await?;

        info!(
            customer_id,
            company_id = fields.company_id,
            employees = employee_ids.len(),
            "customer created"
        );
        Ok(customer_id)
    }

    /// Overwrite every user-supplied column of one customer
    ///
    /// Updating an id with no row is not an error.
    pub async fn update(&self, customer_id: i64, fields: &CustomerFields) -> RecordResult<()> {
        let mut conn = self.pool.acquire().await?;

        let mut errors = fields.check();
        if !company_exists(&mut conn, fields.company_id).await? {
            errors.push("company_id", format!("company {} does not exist", fields.company_id));
        }
        errors.into_result(())?;

        let result = sqlx::query(
            "UPDATE Customers SET first_name = ?, last_name = ?, rating = ?, company_id = ? \
             WHERE customer_id = ?",
        )
        .bind(fields.first_name.as_str())
        .bind(fields.last_name.as_str())
        .bind(fields.rating)
        .bind(fields.company_id)
        .bind(customer_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            debug!(customer_id, "customer update matched no row");
        } else {
            info!(customer_id, "customer updated");
        }
        Ok(())
    }

    /// Delete one customer, returning whether a row was removed
    ///
    /// Association rows referencing the customer are left in place.
    pub async fn delete(&self, customer_id: i64) -> RecordResult<bool> {
        let result = sqlx::query("DELETE FROM Customers WHERE customer_id = ?")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(customer_id, "customer deleted");
        } else {
            debug!(customer_id, "customer delete matched no row");
        }
        Ok(removed)
    }
}

async fn company_exists(conn: &mut AnyConnection, company_id: i64) -> RecordResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT company_id FROM Companies WHERE company_id = ?")
        .bind(company_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

/// Ids in `employee_ids` with no `Employees` row
async fn missing_employees(conn: &mut AnyConnection, employee_ids: &[i64]) -> RecordResult<Vec<i64>> {
    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder =
        QueryBuilder::<Any>::new("SELECT employee_id FROM Employees WHERE employee_id IN (");
    let mut separated = builder.separated(", ");
    for employee_id in employee_ids {
        separated.push_bind(*employee_id);
    }
    separated.push_unseparated(")");

    let existing: BTreeSet<i64> = builder
        .build_query_scalar::<i64>()
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();

    Ok(employee_ids
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect())
}
