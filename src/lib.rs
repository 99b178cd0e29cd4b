//! clientdesk - server-rendered customer and employee records
//!
//! Customers belong to companies and link to employees; employees belong
//! to departments. Pages are rendered from a relational store through a
//! parameterized record access layer.

pub mod cli;
pub mod http_server;
pub mod records;
pub mod store;
pub mod views;
