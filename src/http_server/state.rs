//! Shared handler state

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;

use super::errors::HttpResult;
use crate::store::Store;
use crate::views::Views;

/// Store handle and compiled views, shared by every handler behind an `Arc`
#[derive(Debug)]
pub struct AppState {
    pub store: Store,
    pub views: Views,
}

impl AppState {
    pub fn new(store: Store, views: Views) -> Self {
        Self { store, views }
    }

    /// Render `view` as a 200 page
    pub fn page(&self, view: &str, data: &Value) -> HttpResult<Response> {
        self.page_with_status(StatusCode::OK, view, data)
    }

    pub fn page_with_status(
        &self,
        status: StatusCode,
        view: &str,
        data: &Value,
    ) -> HttpResult<Response> {
        let html = self.views.render(view, data)?;
        Ok((status, Html(html)).into_response())
    }
}
