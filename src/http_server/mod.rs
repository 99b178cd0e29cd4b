//! # HTTP Server Module
//!
//! Server-rendered pages over the record access layer.
//!
//! # Endpoints
//!
//! - `/` - Home page
//! - `/health` - Liveness check
//! - `/customers/*` - Customer list, create, edit, delete
//! - `/employees/*` - Employee list, create, edit, delete

pub mod config;
pub mod customer_routes;
pub mod employee_routes;
pub mod errors;
pub mod forms;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{HttpError, HttpResult};
pub use server::{build_router, HttpServer};
pub use state::AppState;
