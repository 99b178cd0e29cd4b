//! DDL bootstrap
//!
//! Creates the fixed schema when it is missing. Existing tables are never
//! altered. `EmployeeCustomer` carries no foreign keys: deleting a customer
//! or employee leaves its association rows in place.

use tracing::info;

use super::{Backend, Store, StoreError, StoreResult};

const MYSQL_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS Companies (
        company_id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL
    ) ENGINE = InnoDB",
    "CREATE TABLE IF NOT EXISTS Departments (
        department_id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL
    ) ENGINE = InnoDB",
    "CREATE TABLE IF NOT EXISTS Customers (
        customer_id INT AUTO_INCREMENT PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        rating INT NOT NULL,
        company_id INT NOT NULL,
        FOREIGN KEY (company_id) REFERENCES Companies (company_id)
    ) ENGINE = InnoDB",
    "CREATE TABLE IF NOT EXISTS Employees (
        employee_id INT AUTO_INCREMENT PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        department_id INT NOT NULL,
        FOREIGN KEY (department_id) REFERENCES Departments (department_id)
    ) ENGINE = InnoDB",
    "CREATE TABLE IF NOT EXISTS EmployeeCustomer (
        employee_customer_id INT AUTO_INCREMENT PRIMARY KEY,
        employee_id INT NOT NULL,
        customer_id INT NOT NULL,
        INDEX (employee_id),
        INDEX (customer_id)
    ) ENGINE = InnoDB",
];

const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS Companies (
        company_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS Departments (
        department_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS Customers (
        customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        rating INTEGER NOT NULL,
        company_id INTEGER NOT NULL REFERENCES Companies (company_id)
    )",
    "CREATE TABLE IF NOT EXISTS Employees (
        employee_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        department_id INTEGER NOT NULL REFERENCES Departments (department_id)
    )",
    "CREATE TABLE IF NOT EXISTS EmployeeCustomer (
        employee_customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER NOT NULL,
        customer_id INTEGER NOT NULL
    )",
];

fn statements(backend: Backend) -> &'static [&'static str] {
    match backend {
        Backend::MySql => MYSQL_SCHEMA,
        Backend::Sqlite => SQLITE_SCHEMA,
    }
}

impl Store {
    /// Create any missing tables
    pub async fn apply_schema(&self) -> StoreResult<()> {
        for statement in statements(self.backend) {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Schema)?;
        }

        info!(backend = self.backend.as_str(), "schema applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;

    #[test]
    fn test_both_backends_create_every_table() {
        for backend in [Backend::MySql, Backend::Sqlite] {
            let ddl = statements(backend).join("\n");
            for table in [
                "Companies",
                "Departments",
                "Customers",
                "Employees",
                "EmployeeCustomer",
            ] {
                assert!(
                    ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                    "{} missing for {:?}",
                    table,
                    backend
                );
            }
        }
    }

    #[tokio::test]
    async fn test_apply_schema_is_repeatable() {
        let store = Store::connect(&StoreConfig::in_memory()).await.unwrap();
        store.apply_schema().await.unwrap();
        store.apply_schema().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Customers")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
