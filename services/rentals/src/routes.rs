//! Rentals service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{
    error::ApiError,
    models::{
        CreateCustomerRequest, Customer, CustomerQuery, NewCustomer, RegisterCustomerResponse,
        UpdateCustomerRequest,
    },
    state::AppState,
    validation,
};

/// Create the router for the rentals service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/customers", post(register_customer))
        .route("/customers", get(list_customers))
        .route("/customers/:id", get(get_customer))
        .route("/customers/:id", put(update_customer))
        .route("/customers/:id", delete(delete_customer))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "rentals-service"
    }))
}

/// Register a new customer
pub async fn register_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_registration(&payload).map_err(ApiError::Validation)?;

    let new_customer = NewCustomer {
        national_id: payload.national_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        rental_days: payload.rental_days.unwrap_or(1),
        amount_owed: payload.amount_owed.unwrap_or(0.0),
    };

    let customer = state
        .customer_repository
        .create(&new_customer)
        .await
        .map_err(|e| {
            tracing::error!("Failed to register customer: {}", e);
            ApiError::persistence(e)
        })?;

    let response = RegisterCustomerResponse {
        message: "Customer registered successfully".to_string(),
        customer,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// List customers, optionally filtered by a search term
///
/// Without a term (or with a blank one) the listing is ordered by
/// registration time, earliest first. With a term, every customer
/// whose national id, name, or phone contains it case-insensitively
/// is returned.
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let customers: Vec<Customer> =
        match validation::normalize_search_term(query.search.as_deref()) {
            Some(term) => state.customer_repository.search(&term).await,
            None => state.customer_repository.list_all().await,
        }
        .map_err(|e| {
            tracing::error!("Failed to list customers: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(customers))
}

/// Get a customer by ID
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .customer_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get customer: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Customer"))?;

    Ok(Json(customer))
}

/// Apply a partial update to a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = validation::patch_from_request(&payload).map_err(ApiError::Validation)?;

    let mut customer = state
        .customer_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load customer for update: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Customer"))?;

    customer.apply(&patch);

    let updated = state
        .customer_repository
        .update(&customer)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update customer: {}", e);
            ApiError::persistence(e)
        })?
        .ok_or(ApiError::NotFound("Customer"))?;

    Ok(Json(updated))
}

/// Delete a customer by ID
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.customer_repository.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete customer: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(Json(json!({"message": "Customer deleted successfully"})))
    } else {
        Err(ApiError::NotFound("Customer"))
    }
}
