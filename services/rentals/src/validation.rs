//! Input validation and form-field parsing

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::warn;

use crate::models::{CreateCustomerRequest, CustomerPatch, UpdateCustomerRequest};

/// Validate a national id
pub fn validate_national_id(national_id: &str) -> Result<(), String> {
    if national_id.trim().is_empty() {
        return Err("National id is required".to_string());
    }

    if national_id.chars().count() > 8 {
        return Err("National id must be at most 8 characters long".to_string());
    }

    Ok(())
}

/// Validate a first or last name
pub fn validate_name(field: &str, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    if name.chars().count() > 100 {
        return Err(format!("{} must be at most 100 characters long", field));
    }

    Ok(())
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.trim().is_empty() {
        return Err("Phone is required".to_string());
    }

    if phone.chars().count() > 9 {
        return Err("Phone must be at most 9 characters long".to_string());
    }

    Ok(())
}

/// Longest rental period accepted, in days. Keeps the due-date
/// arithmetic inside the calendar range.
pub const MAX_RENTAL_DAYS: i32 = 3650;

/// Validate a rental period, when supplied
pub fn validate_rental_days(rental_days: Option<i32>) -> Result<(), String> {
    if let Some(days) = rental_days {
        if !(1..=MAX_RENTAL_DAYS).contains(&days) {
            return Err(format!(
                "Rental days must be between 1 and {}",
                MAX_RENTAL_DAYS
            ));
        }
    }

    Ok(())
}

/// Validate an amount owed, when supplied
pub fn validate_amount_owed(amount_owed: Option<f64>) -> Result<(), String> {
    if let Some(amount) = amount_owed {
        if !amount.is_finite() || amount < 0.0 {
            return Err("Amount owed must be a non-negative number".to_string());
        }
    }

    Ok(())
}

/// Validate a full registration request
pub fn validate_registration(request: &CreateCustomerRequest) -> Result<(), String> {
    validate_national_id(&request.national_id)?;
    validate_name("First name", &request.first_name)?;
    validate_name("Last name", &request.last_name)?;
    validate_phone(&request.phone)?;
    validate_rental_days(request.rental_days)?;
    validate_amount_owed(request.amount_owed)?;

    Ok(())
}

/// Treat empty and whitespace-only values as "not supplied"
fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalize a listing search term: blank terms fall back to the
/// unfiltered listing
pub fn normalize_search_term(raw: Option<&str>) -> Option<String> {
    supplied(raw).map(|term| term.trim().to_string())
}

/// Build a [`CustomerPatch`] from an update request.
///
/// A rental period that does not parse as an integer is skipped with a
/// warning and the rest of the update still applies. A bad amount or a
/// bad date rejects the whole request before anything is written.
pub fn patch_from_request(request: &UpdateCustomerRequest) -> Result<CustomerPatch, String> {
    let mut patch = CustomerPatch {
        national_id: supplied(request.national_id.as_deref()).map(str::to_string),
        first_name: supplied(request.first_name.as_deref()).map(str::to_string),
        last_name: supplied(request.last_name.as_deref()).map(str::to_string),
        phone: supplied(request.phone.as_deref()).map(str::to_string),
        ..CustomerPatch::default()
    };

    if let Some(raw) = supplied(request.rental_days.as_deref()) {
        match raw.trim().parse::<i32>() {
            Ok(days) if (1..=MAX_RENTAL_DAYS).contains(&days) => {
                patch.rental_days = Some(days);
            }
            Ok(days) => warn!("Ignoring rental days update, out of range: {}", days),
            Err(_) => warn!("Ignoring rental days update, not a valid integer: {}", raw),
        }
    }

    if let Some(raw) = supplied(request.amount_owed.as_deref()) {
        let amount = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Amount owed must be a number, got '{}'", raw))?;
        patch.amount_owed = Some(amount);
    }

    if let Some(raw) = supplied(request.registered_at.as_deref()) {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Registration date must be YYYY-MM-DD, got '{}'", raw))?;
        patch.registered_at = Some(midnight_utc(date));
    }

    Ok(patch)
}

/// Date-only edits land at midnight UTC
fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
