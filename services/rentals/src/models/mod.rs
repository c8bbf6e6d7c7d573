//! Rentals service models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod customer;

// Re-export for convenience
pub use customer::{Customer, CustomerPatch, NewCustomer};

/// Request for customer registration
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Rental period in whole days; defaults to 1 when omitted
    pub rental_days: Option<i32>,
    /// Amount owed by the customer; defaults to 0.0 when omitted
    pub amount_owed: Option<f64>,
}

/// Request for a partial customer update
///
/// Every field is optional and submitted as text; empty values mean
/// "leave the stored value alone", so a client can resend a record
/// with only the fields it wants to change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    pub national_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub rental_days: Option<String>,
    pub amount_owed: Option<String>,
    /// Date-only, `YYYY-MM-DD`
    pub registered_at: Option<String>,
}

/// Query parameters for customer listing
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerQuery {
    /// Free-text search term matched against national id, names and phone
    pub search: Option<String>,
}

/// Response for a successful registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterCustomerResponse {
    pub message: String,
    pub customer: Customer,
}
