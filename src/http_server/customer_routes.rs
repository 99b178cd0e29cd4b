//! Customer HTTP Routes
//!
//! List/search, create (with employee links), edit and delete pages for
//! customers. Every successful POST redirects back to `/customers`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde_json::json;

use super::errors::{HttpError, HttpResult};
use super::forms::{parse_id, CustomerForm, CustomerSearch, FormFields};
use super::state::AppState;
use crate::records::{EmployeeFilter, RecordError, ValidationErrors};
use crate::views::Choice;

const LIST_PATH: &str = "/customers";

/// Create customer routes
pub fn customer_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/customers", get(list_customers_handler))
        .route(
            "/customers/create",
            get(create_form_handler).post(create_customer_handler),
        )
        .route("/customers/add", post(add_customer_handler))
        .route(
            "/customers/:id/edit",
            get(edit_form_handler).post(update_customer_handler),
        )
        .route(
            "/customers/:id/delete",
            get(delete_confirm_handler).post(delete_customer_handler),
        )
        .with_state(state)
}

fn customer_id(raw: &str) -> HttpResult<i64> {
    parse_id(raw).ok_or_else(|| HttpError::InvalidId {
        entity: "customer",
        id: raw.to_string(),
    })
}

// ==================
// Page Builders
// ==================

async fn company_choices(state: &AppState, selected: &str) -> HttpResult<Vec<Choice>> {
    let companies = state.store.customers().list_companies().await?;
    let selected = [selected.to_string()];
    Ok(companies
        .iter()
        .map(|c| Choice::for_id(c.company_id, c.name.as_str(), &selected))
        .collect())
}

async fn render_create_form(
    state: &AppState,
    status: StatusCode,
    form: &CustomerForm,
    errors: &ValidationErrors,
) -> HttpResult<Response> {
    let companies = company_choices(state, &form.company_id).await?;
    let employees: Vec<Choice> = state
        .store
        .employees()
        .list(&EmployeeFilter::default())
        .await?
        .iter()
        .map(|e| {
            Choice::for_id(
                e.employee_id,
                format!("{} {}", e.first_name, e.last_name),
                &form.employee_id,
            )
        })
        .collect();

    state.page_with_status(
        status,
        "customers/create",
        &json!({
            "title": "New customer",
            "form": form,
            "errors": errors,
            "companies": companies,
            "employees": employees,
        }),
    )
}

async fn render_edit_form(
    state: &AppState,
    status: StatusCode,
    customer_id: i64,
    form: &CustomerForm,
    errors: &ValidationErrors,
) -> HttpResult<Response> {
    let companies = company_choices(state, &form.company_id).await?;
    let assigned = state.store.customers().assigned_employees(customer_id).await?;

    state.page_with_status(
        status,
        "customers/edit",
        &json!({
            "title": "Edit customer",
            "customer_id": customer_id,
            "form": form,
            "errors": errors,
            "companies": companies,
            "assigned_employees": assigned,
        }),
    )
}

// ==================
// Handlers
// ==================

async fn list_customers_handler(
    State(state): State<Arc<AppState>>,
    Query(search): Query<CustomerSearch>,
) -> HttpResult<Response> {
    let filter = search
        .to_filter()
        .map_err(|errors| HttpError::BadRequest(errors.to_string()))?;
    let customers = state.store.customers().list(&filter).await?;

    state.page(
        "customers",
        &json!({
            "title": "Customers",
            "search": search,
            "customers": customers,
        }),
    )
}

async fn create_form_handler(State(state): State<Arc<AppState>>) -> HttpResult<Response> {
    render_create_form(
        &state,
        StatusCode::OK,
        &CustomerForm::default(),
        &ValidationErrors::new(),
    )
    .await
}

async fn create_customer_handler(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let form = CustomerForm::from_fields(&FormFields::new(pairs));
    create_customer(&state, form).await
}

/// Older form endpoint: creates the customer without employee links
async fn add_customer_handler(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let mut form = CustomerForm::from_fields(&FormFields::new(pairs));
    form.employee_id.clear();
    create_customer(&state, form).await
}

async fn create_customer(state: &AppState, form: CustomerForm) -> HttpResult<Response> {
    let outcome = match form.validate() {
        Ok((fields, employee_ids)) => state
            .store
            .customers()
            .create(&fields, &employee_ids)
            .await
            .map(|_| ()),
        Err(errors) => Err(RecordError::Validation(errors)),
    };

    match outcome {
        Ok(()) => Ok(Redirect::to(LIST_PATH).into_response()),
        Err(RecordError::Validation(errors)) => {
            render_create_form(state, StatusCode::BAD_REQUEST, &form, &errors).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn edit_form_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Response> {
    let customer_id = customer_id(&id)?;
    let customer = state.store.customers().require(customer_id).await?;

    render_edit_form(
        &state,
        StatusCode::OK,
        customer_id,
        &CustomerForm::from_row(&customer),
        &ValidationErrors::new(),
    )
    .await
}

async fn update_customer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let customer_id = customer_id(&id)?;
    let form = CustomerForm::from_fields(&FormFields::new(pairs));

    let outcome = match form.validate() {
        Ok((fields, _)) => state.store.customers().update(customer_id, &fields).await,
        Err(errors) => Err(RecordError::Validation(errors)),
    };

    match outcome {
        Ok(()) => Ok(Redirect::to(LIST_PATH).into_response()),
        Err(RecordError::Validation(errors)) => {
            render_edit_form(&state, StatusCode::BAD_REQUEST, customer_id, &form, &errors).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn delete_confirm_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Response> {
    let customer_id = customer_id(&id)?;
    let customers = state.store.customers();
    let customer = customers.require(customer_id).await?;
    let assigned = customers.assigned_employees(customer_id).await?;

    state.page(
        "customers/delete",
        &json!({
            "title": "Delete customer",
            "customer": customer,
            "assigned_employees": assigned,
        }),
    )
}

async fn delete_customer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Response> {
    let customer_id = customer_id(&id)?;
    state.store.customers().delete(customer_id).await?;
    Ok(Redirect::to(LIST_PATH).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_parsing() {
        assert_eq!(customer_id("4").unwrap(), 4);
        assert!(matches!(
            customer_id("four"),
            Err(HttpError::InvalidId { entity: "customer", .. })
        ));
    }
}
