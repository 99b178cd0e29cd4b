//! Employee record access
//!
//! Employees belong to exactly one department. Creation is a single-table
//! insert; customer links are only ever written from the customer side.

use sqlx::{Any, AnyConnection, AnyPool, QueryBuilder};
use tracing::{debug, info};

use crate::store::Backend;

use super::errors::RecordResult;
use super::filter::{FilterExpr, FilterSet};
use super::model::{Department, EmployeeFields, EmployeeFilter, EmployeeRow, Lookup};

const ENTITY: &str = "employee";

const SELECT_EMPLOYEES: &str = "SELECT e.employee_id, e.first_name, e.last_name, \
     e.department_id, d.name AS department_name \
     FROM Employees e JOIN Departments d ON e.department_id = d.department_id \
     WHERE 1 = 1";

/// Employee repository over the shared pool
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: AnyPool,
    backend: Backend,
}

impl EmployeeRepository {
    pub fn new(pool: AnyPool, backend: Backend) -> Self {
        Self { pool, backend }
    }

    /// Employees joined with their department, narrowed by `filter`
    pub async fn list(&self, filter: &EmployeeFilter) -> RecordResult<Vec<EmployeeRow>> {
        let mut builder = QueryBuilder::<Any>::new(SELECT_EMPLOYEES);
        filter.to_filter_set().push_to(&mut builder);

        let rows = builder
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, employee_id: i64) -> RecordResult<Lookup<EmployeeRow>> {
        let mut builder = QueryBuilder::<Any>::new(SELECT_EMPLOYEES);
        FilterSet::new()
            .and(FilterExpr::eq("e.employee_id", employee_id))
            .push_to(&mut builder);

        let row = builder
            .build_query_as::<EmployeeRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(Lookup::from_option(row))
    }

    pub async fn require(&self, employee_id: i64) -> RecordResult<EmployeeRow> {
        self.get_by_id(employee_id).await?.found(ENTITY, employee_id)
    }

    /// All departments, for form choice lists
    pub async fn list_departments(&self) -> RecordResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT department_id, name FROM Departments")
                .fetch_all(&self.pool)
                .await?;
        Ok(departments)
    }

    /// Insert an employee, returning the new id
    pub async fn create(&self, fields: &EmployeeFields) -> RecordResult<i64> {
        let mut conn = self.pool.acquire().await?;
        check_fields(&mut conn, fields).await?;

        sqlx::query(
            "INSERT INTO Employees (first_name, last_name, department_id) VALUES (?, ?, ?)",
        )
        .bind(fields.first_name.as_str())
        .bind(fields.last_name.as_str())
        .bind(fields.department_id)
        .execute(&mut *conn)
        .await?;

        let employee_id = self.backend.last_insert_id(&mut conn).await?;

        info!(employee_id, department_id = fields.department_id, "employee created");
        Ok(employee_id)
    }

    /// Overwrite every user-supplied column of one employee
    pub async fn update(&self, employee_id: i64, fields: &EmployeeFields) -> RecordResult<()> {
        let mut conn = self.pool.acquire().await?;
        check_fields(&mut conn, fields).await?;

        let result = sqlx::query(
            "UPDATE Employees SET first_name = ?, last_name = ?, department_id = ? \
             WHERE employee_id = ?",
        )
        .bind(fields.first_name.as_str())
        .bind(fields.last_name.as_str())
        .bind(fields.department_id)
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            debug!(employee_id, "employee update matched no row");
        } else {
            info!(employee_id, "employee updated");
        }
        Ok(())
    }

    /// Delete one employee, returning whether a row was removed
    pub async fn delete(&self, employee_id: i64) -> RecordResult<bool> {
        let result = sqlx::query("DELETE FROM Employees WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(employee_id, "employee deleted");
        } else {
            debug!(employee_id, "employee delete matched no row");
        }
        Ok(removed)
    }
}

async fn check_fields(conn: &mut AnyConnection, fields: &EmployeeFields) -> RecordResult<()> {
    let mut errors = fields.check();

    let department = sqlx::query_scalar::<_, i64>(
        "SELECT department_id FROM Departments WHERE department_id = ?",
    )
    .bind(fields.department_id)
    .fetch_optional(&mut *conn)
    .await?;

    if department.is_none() {
        errors.push(
            "department_id",
            format!("department {} does not exist", fields.department_id),
        );
    }

    errors.into_result(())?;
    Ok(())
}
