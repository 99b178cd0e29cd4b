//! Shared helpers for integration tests: an in-memory store with the schema
//! applied, plus seed functions for reference rows.

#![allow(dead_code)]

use std::sync::Arc;

use clientdesk::http_server::AppState;
use clientdesk::records::{CustomerFields, EmployeeFields};
use clientdesk::store::{Store, StoreConfig};
use clientdesk::views::Views;

/// Fresh in-memory store with every table created.
pub async fn memory_store() -> Store {
    let store = Store::connect(&StoreConfig::in_memory()).await.unwrap();
    store.apply_schema().await.unwrap();
    store
}

/// Handler state over a fresh in-memory store.
pub async fn app_state() -> Arc<AppState> {
    Arc::new(AppState::new(memory_store().await, Views::new().unwrap()))
}

/// Insert one reference row and read its key back on the same connection.
async fn insert_named(store: &Store, sql: &str, name: &str) -> i64 {
    let mut conn = store.pool().acquire().await.unwrap();
    sqlx::query(sql)
        .bind(name)
        .execute(&mut *conn)
        .await
        .unwrap();
    store.backend().last_insert_id(&mut conn).await.unwrap()
}

pub async fn seed_company(store: &Store, name: &str) -> i64 {
    insert_named(store, "INSERT INTO Companies (name) VALUES (?)", name).await
}

pub async fn seed_department(store: &Store, name: &str) -> i64 {
    insert_named(store, "INSERT INTO Departments (name) VALUES (?)", name).await
}

pub async fn seed_employee(store: &Store, first: &str, last: &str, department_id: i64) -> i64 {
    store
        .employees()
        .create(&EmployeeFields {
            first_name: first.to_string(),
            last_name: last.to_string(),
            department_id,
        })
        .await
        .unwrap()
}

pub fn customer(first: &str, last: &str, rating: i64, company_id: i64) -> CustomerFields {
    CustomerFields {
        first_name: first.to_string(),
        last_name: last.to_string(),
        rating,
        company_id,
    }
}

pub async fn seed_customer(store: &Store, first: &str, last: &str, rating: i64, company_id: i64) -> i64 {
    store
        .customers()
        .create(&customer(first, last, rating, company_id), &[])
        .await
        .unwrap()
}

/// Row count of `table`.
pub async fn count_rows(store: &Store, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(store.pool())
        .await
        .unwrap()
}

/// Association rows for one customer.
pub async fn links_for(store: &Store, customer_id: i64) -> Vec<i64> {
    let mut ids = sqlx::query_scalar::<_, i64>(
        "SELECT employee_id FROM EmployeeCustomer WHERE customer_id = ?",
    )
    .bind(customer_id)
    .fetch_all(store.pool())
    .await
    .unwrap();
    ids.sort();
    ids
}
