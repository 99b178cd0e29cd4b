//! # Record Access Layer
//!
//! Turns typed requests (list with filters, get by id, reference rows,
//! create, update, delete) into parameterized SQL against the store and
//! returns typed rows.
//!
//! Every value reaches the store through a bound `?` placeholder. Lookups
//! by id return `Lookup::Found | Lookup::NotFound` rather than an empty
//! collection.

mod customer;
mod employee;
mod errors;
pub mod filter;
mod model;

pub use customer::CustomerRepository;
pub use employee::EmployeeRepository;
pub use errors::{FieldError, RecordError, RecordResult, ValidationErrors};
pub use filter::{FilterExpr, FilterOperator, FilterSet, FilterValue};
pub use model::{
    Company, CustomerFields, CustomerFilter, CustomerRow, Department, EmployeeFields,
    EmployeeFilter, EmployeeRow, EmployeeSummary, Lookup,
};
