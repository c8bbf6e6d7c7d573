//! Repositories for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::{Customer, NewCustomer};

/// Customer repository for database operations
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new customer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new customer
    ///
    /// The registration and due timestamps come from
    /// [`NewCustomer::register_now`], so a freshly inserted row is
    /// always consistent.
    pub async fn create(&self, new_customer: &NewCustomer) -> Result<Customer> {
        info!(
            "Registering customer with national id {}",
            new_customer.national_id
        );

        let (registered_at, due_at) = new_customer.register_now();

        let row = sqlx::query(
            r#"
            INSERT INTO customers
                (national_id, first_name, last_name, phone, registered_at, due_at, rental_days, amount_owed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, national_id, first_name, last_name, phone, registered_at, due_at, rental_days, amount_owed
            "#,
        )
        .bind(&new_customer.national_id)
        .bind(&new_customer.first_name)
        .bind(&new_customer.last_name)
        .bind(&new_customer.phone)
        .bind(registered_at)
        .bind(due_at)
        .bind(new_customer.rental_days)
        .bind(new_customer.amount_owed)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_customer(&row))
    }

    /// Get all customers, earliest registrations first
    pub async fn list_all(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, national_id, first_name, last_name, phone, registered_at, due_at, rental_days, amount_owed
            FROM customers
            ORDER BY registered_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_customer).collect())
    }

    /// Search customers by a case-insensitive substring over national
    /// id, names, and phone. Results come back in storage order.
    pub async fn search(&self, term: &str) -> Result<Vec<Customer>> {
        let pattern = like_pattern(term);

        let rows = sqlx::query(
            r#"
            SELECT id, national_id, first_name, last_name, phone, registered_at, due_at, rental_days, amount_owed
            FROM customers
            WHERE national_id ILIKE $1
               OR first_name ILIKE $1
               OR last_name ILIKE $1
               OR phone ILIKE $1
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_customer).collect())
    }

    /// Find a customer by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, national_id, first_name, last_name, phone, registered_at, due_at, rental_days, amount_owed
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_customer))
    }

    /// Persist an already-merged customer record in one statement
    ///
    /// Returns `None` when the row no longer exists.
    pub async fn update(&self, customer: &Customer) -> Result<Option<Customer>> {
        info!("Updating customer {}", customer.id);

        let row = sqlx::query(
            r#"
            UPDATE customers
            SET national_id = $2,
                first_name = $3,
                last_name = $4,
                phone = $5,
                registered_at = $6,
                due_at = $7,
                rental_days = $8,
                amount_owed = $9
            WHERE id = $1
            RETURNING id, national_id, first_name, last_name, phone, registered_at, due_at, rental_days, amount_owed
            "#,
        )
        .bind(customer.id)
        .bind(&customer.national_id)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.phone)
        .bind(customer.registered_at)
        .bind(customer.due_at)
        .bind(customer.rental_days)
        .bind(customer.amount_owed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_customer))
    }

    /// Delete a customer by ID
    pub async fn delete(&self, id: i32) -> Result<bool> {
        info!("Deleting customer {}", id);

        let result = sqlx::query(
            r#"
            DELETE FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Wrap a search term in `%` wildcards, escaping LIKE metacharacters
/// so the term itself matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn map_customer(row: &PgRow) -> Customer {
    Customer {
        id: row.get("id"),
        national_id: row.get("national_id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        phone: row.get("phone"),
        registered_at: row.get("registered_at"),
        due_at: row.get("due_at"),
        rental_days: row.get("rental_days"),
        amount_owed: row.get("amount_owed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_plain_terms() {
        assert_eq!(like_pattern("555"), "%555%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("5%0"), "%5\\%0%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }
}
