//! Customer entity and the rules that keep its due date consistent

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Customer entity
///
/// `due_at` is a derived value, never a source of truth: it must equal
/// `registered_at + rental_days` days after every mutation. All writes
/// to it funnel through [`Customer::due_date`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i32,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub registered_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub rental_days: i32,
    pub amount_owed: f64,
}

/// New customer creation payload, already validated
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub rental_days: i32,
    pub amount_owed: f64,
}

/// Partial customer update
///
/// One `Option` per editable field. `Some` overwrites the stored
/// value, `None` leaves it untouched. There is deliberately no
/// `due_at` field here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub national_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub rental_days: Option<i32>,
    pub amount_owed: Option<f64>,
    pub registered_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Due date for a rental period: whole days added to the
    /// registration timestamp. Saturates at the calendar limit
    /// instead of overflowing.
    pub fn due_date(registered_at: DateTime<Utc>, rental_days: i32) -> DateTime<Utc> {
        registered_at
            .checked_add_signed(Duration::days(i64::from(rental_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Apply a partial update in place.
    ///
    /// If the rental period or the registration date was supplied, the
    /// due date is recomputed exactly once, after both have been
    /// merged.
    pub fn apply(&mut self, patch: &CustomerPatch) {
        if let Some(national_id) = &patch.national_id {
            self.national_id = national_id.clone();
        }
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(amount_owed) = patch.amount_owed {
            self.amount_owed = amount_owed;
        }

        let mut period_changed = false;
        if let Some(rental_days) = patch.rental_days {
            self.rental_days = rental_days;
            period_changed = true;
        }
        if let Some(registered_at) = patch.registered_at {
            self.registered_at = registered_at;
            period_changed = true;
        }

        if period_changed {
            self.due_at = Self::due_date(self.registered_at, self.rental_days);
        }
    }
}

impl NewCustomer {
    /// Stamp the registration time and derive the due date for a
    /// fresh record.
    pub fn register_now(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.register_at(Utc::now())
    }

    /// Derive the registration and due timestamps from an explicit
    /// clock value.
    pub fn register_at(&self, registered_at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            registered_at,
            Customer::due_date(registered_at, self.rental_days),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_customer() -> Customer {
        let registered_at = Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap();
        Customer {
            id: 1,
            national_id: "12345678".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Quispe".to_string(),
            phone: "987654321".to_string(),
            registered_at,
            due_at: Customer::due_date(registered_at, 7),
            rental_days: 7,
            amount_owed: 150.0,
        }
    }

    #[test]
    fn test_due_date_adds_whole_days() {
        let registered_at = Utc.with_ymd_and_hms(2025, 1, 31, 8, 0, 0).unwrap();
        let due_at = Customer::due_date(registered_at, 3);
        assert_eq!(due_at, Utc.with_ymd_and_hms(2025, 2, 3, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_due_date_saturates_instead_of_overflowing() {
        let near_the_end = DateTime::<Utc>::MAX_UTC;
        assert_eq!(
            Customer::due_date(near_the_end, i32::MAX),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[test]
    fn test_register_at_derives_due_date_from_registration() {
        let new_customer = NewCustomer {
            national_id: "87654321".to_string(),
            first_name: "Pedro".to_string(),
            last_name: "Huaman".to_string(),
            phone: "955511222".to_string(),
            rental_days: 5,
            amount_owed: 80.0,
        };
        let clock = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        let (registered_at, due_at) = new_customer.register_at(clock);

        assert_eq!(registered_at, clock);
        assert_eq!(due_at, Utc.with_ymd_and_hms(2025, 6, 6, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_register_now_keeps_due_date_consistent() {
        let new_customer = NewCustomer {
            national_id: "87654321".to_string(),
            first_name: "Pedro".to_string(),
            last_name: "Huaman".to_string(),
            phone: "955511222".to_string(),
            rental_days: 3,
            amount_owed: 0.0,
        };

        let (registered_at, due_at) = new_customer.register_now();

        assert_eq!(due_at, Customer::due_date(registered_at, 3));
        assert_eq!(due_at - registered_at, Duration::days(3));
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut customer = sample_customer();
        let before = customer.clone();

        customer.apply(&CustomerPatch::default());

        assert_eq!(customer, before);
    }

    #[test]
    fn test_rental_days_patch_touches_only_period_fields() {
        let mut customer = sample_customer();
        let before = customer.clone();

        customer.apply(&CustomerPatch {
            rental_days: Some(14),
            ..CustomerPatch::default()
        });

        assert_eq!(customer.rental_days, 14);
        assert_eq!(
            customer.due_at,
            Customer::due_date(before.registered_at, 14)
        );
        assert_eq!(customer.national_id, before.national_id);
        assert_eq!(customer.first_name, before.first_name);
        assert_eq!(customer.last_name, before.last_name);
        assert_eq!(customer.phone, before.phone);
        assert_eq!(customer.registered_at, before.registered_at);
        assert_eq!(customer.amount_owed, before.amount_owed);
    }

    #[test]
    fn test_registered_at_patch_rederives_due_date() {
        let mut customer = sample_customer();
        let new_start = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();

        customer.apply(&CustomerPatch {
            registered_at: Some(new_start),
            ..CustomerPatch::default()
        });

        assert_eq!(customer.registered_at, new_start);
        assert_eq!(customer.due_at, Customer::due_date(new_start, 7));
    }

    #[test]
    fn test_period_and_start_patched_together_use_both_new_values() {
        let mut customer = sample_customer();
        let new_start = Utc.with_ymd_and_hms(2025, 5, 20, 0, 0, 0).unwrap();

        customer.apply(&CustomerPatch {
            rental_days: Some(30),
            registered_at: Some(new_start),
            ..CustomerPatch::default()
        });

        assert_eq!(customer.due_at, Customer::due_date(new_start, 30));
    }

    #[test]
    fn test_contact_patch_leaves_due_date_alone() {
        let mut customer = sample_customer();
        let before_due = customer.due_at;

        customer.apply(&CustomerPatch {
            phone: Some("911".to_string()),
            amount_owed: Some(0.0),
            ..CustomerPatch::default()
        });

        assert_eq!(customer.phone, "911");
        assert_eq!(customer.amount_owed, 0.0);
        assert_eq!(customer.due_at, before_due);
    }
}
