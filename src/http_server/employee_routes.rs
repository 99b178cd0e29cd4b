//! Employee HTTP Routes
//!
//! Mirrors the customer pages, keyed by department instead of company and
//! without employee links.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde_json::json;

use super::errors::{HttpError, HttpResult};
use super::forms::{parse_id, EmployeeForm, EmployeeSearch, FormFields};
use super::state::AppState;
use crate::records::{RecordError, ValidationErrors};
use crate::views::Choice;

const LIST_PATH: &str = "/employees";

/// Create employee routes
pub fn employee_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/employees", get(list_employees_handler))
        .route(
            "/employees/create",
            get(create_form_handler).post(create_employee_handler),
        )
        .route(
            "/employees/:id/edit",
            get(edit_form_handler).post(update_employee_handler),
        )
        .route(
            "/employees/:id/delete",
            get(delete_confirm_handler).post(delete_employee_handler),
        )
        .with_state(state)
}

fn employee_id(raw: &str) -> HttpResult<i64> {
    parse_id(raw).ok_or_else(|| HttpError::InvalidId {
        entity: "employee",
        id: raw.to_string(),
    })
}

async fn department_choices(state: &AppState, selected: &str) -> HttpResult<Vec<Choice>> {
    let departments = state.store.employees().list_departments().await?;
    let selected = [selected.to_string()];
    Ok(departments
        .iter()
        .map(|d| Choice::for_id(d.department_id, d.name.as_str(), &selected))
        .collect())
}

async fn render_form(
    state: &AppState,
    status: StatusCode,
    employee_id: Option<i64>,
    form: &EmployeeForm,
    errors: &ValidationErrors,
) -> HttpResult<Response> {
    let departments = department_choices(state, &form.department_id).await?;

    let (view, title) = match employee_id {
        Some(_) => ("employees/edit", "Edit employee"),
        None => ("employees/create", "New employee"),
    };

    state.page_with_status(
        status,
        view,
        &json!({
            "title": title,
            "employee_id": employee_id,
            "form": form,
            "errors": errors,
            "departments": departments,
        }),
    )
}

async fn list_employees_handler(
    State(state): State<Arc<AppState>>,
    Query(search): Query<EmployeeSearch>,
) -> HttpResult<Response> {
    let employees = state.store.employees().list(&search.to_filter()).await?;

    state.page(
        "employees",
        &json!({
            "title": "Employees",
            "search": search,
            "employees": employees,
        }),
    )
}

async fn create_form_handler(State(state): State<Arc<AppState>>) -> HttpResult<Response> {
    render_form(
        &state,
        StatusCode::OK,
        None,
        &EmployeeForm::default(),
        &ValidationErrors::new(),
    )
    .await
}

async fn create_employee_handler(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let form = EmployeeForm::from_fields(&FormFields::new(pairs));

    let outcome = match form.validate() {
        Ok(fields) => state.store.employees().create(&fields).await.map(|_| ()),
        Err(errors) => Err(RecordError::Validation(errors)),
    };

    match outcome {
        Ok(()) => Ok(Redirect::to(LIST_PATH).into_response()),
        Err(RecordError::Validation(errors)) => {
            render_form(&state, StatusCode::BAD_REQUEST, None, &form, &errors).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn edit_form_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Response> {
    let employee_id = employee_id(&id)?;
    let employee = state.store.employees().require(employee_id).await?;

    render_form(
        &state,
        StatusCode::OK,
        Some(employee_id),
        &EmployeeForm::from_row(&employee),
        &ValidationErrors::new(),
    )
    .await
}

async fn update_employee_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let employee_id = employee_id(&id)?;
    let form = EmployeeForm::from_fields(&FormFields::new(pairs));

    let outcome = match form.validate() {
        Ok(fields) => state.store.employees().update(employee_id, &fields).await,
        Err(errors) => Err(RecordError::Validation(errors)),
    };

    match outcome {
        Ok(()) => Ok(Redirect::to(LIST_PATH).into_response()),
        Err(RecordError::Validation(errors)) => {
            render_form(&state, StatusCode::BAD_REQUEST, Some(employee_id), &form, &errors).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn delete_confirm_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Response> {
    let employee_id = employee_id(&id)?;
    let employee = state.store.employees().require(employee_id).await?;

    state.page(
        "employees/delete",
        &json!({
            "title": "Delete employee",
            "employee": employee,
        }),
    )
}

async fn delete_employee_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Response> {
    let employee_id = employee_id(&id)?;
    state.store.employees().delete(employee_id).await?;
    Ok(Redirect::to(LIST_PATH).into_response())
}
