//! Billing repository for database operations
//!
//! Updates and deletes are blind single statements: no existence check,
//! no version column, so concurrent writers to one bill race and the last
//! write wins.

use anyhow::Result;
use chrono::{DateTime, Utc};
use power_bills_shared::models::BillPatch;
use power_bills_shared::{BillingRecord, NewBillingRecord, PageWindow};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Bill row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<BillRow> for BillingRecord {
    fn from(row: BillRow) -> Self {
        BillingRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}

/// Build an ILIKE pattern matching `term` anywhere, with wildcards escaped
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn into_records(rows: Vec<BillRow>) -> Vec<BillingRecord> {
    rows.into_iter().map(BillingRecord::from).collect()
}

/// Billing repository for database operations
pub struct BillingRepository;

impl BillingRepository {
    /// Insert a bill and return its generated id
    pub async fn insert(pool: &PgPool, bill: &NewBillingRecord) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO bills (name, email, phone, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&bill.name)
        .bind(&bill.email)
        .bind(&bill.phone)
        .bind(bill.amount)
        .bind(bill.created_at)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    /// Every bill, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<BillingRecord>> {
        let rows = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT id, name, email, phone, amount, created_at
            FROM bills
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(into_records(rows))
    }

    /// Bills newest first, optionally restricted to a page window
    pub async fn list_recent(
        pool: &PgPool,
        window: Option<PageWindow>,
    ) -> Result<Vec<BillingRecord>> {
        let (offset, limit) = match window {
            Some(w) => (w.offset, w.limit),
            None => (0, None),
        };

        // LIMIT NULL is no limit
        let rows = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT id, name, email, phone, amount, created_at
            FROM bills
            ORDER BY created_at DESC, id DESC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(into_records(rows))
    }

    /// Case-insensitive substring search on name
    pub async fn search_by_name(pool: &PgPool, term: &str) -> Result<Vec<BillingRecord>> {
        let rows = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT id, name, email, phone, amount, created_at
            FROM bills
            WHERE name ILIKE $1 ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(contains_pattern(term))
        .fetch_all(pool)
        .await?;

        Ok(into_records(rows))
    }

    /// Exact match on email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Vec<BillingRecord>> {
        let rows = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT id, name, email, phone, amount, created_at
            FROM bills
            WHERE email = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(email)
        .fetch_all(pool)
        .await?;

        Ok(into_records(rows))
    }

    /// Exact match on phone
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Vec<BillingRecord>> {
        let rows = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT id, name, email, phone, amount, created_at
            FROM bills
            WHERE phone = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(phone)
        .fetch_all(pool)
        .await?;

        Ok(into_records(rows))
    }

    /// Apply the supplied fields of `patch`; returns the number of rows matched
    pub async fn update(pool: &PgPool, id: Uuid, patch: &BillPatch) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE bills SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                amount = COALESCE($5, amount)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(patch.amount)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a bill; returns the number of rows removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM bills
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_term() {
        assert_eq!(contains_pattern("al"), "%al%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\"), "%c:\\\\%");
    }
}
