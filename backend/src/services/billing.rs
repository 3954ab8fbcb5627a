//! Billing service
//!
//! Narrows loose request bodies into records and delegates to
//! [`BillingRepository`]. Any authenticated caller may act on any bill.

use crate::error::ApiError;
use crate::repositories::BillingRepository;
use chrono::Utc;
use power_bills_shared::validation::validate_search_term;
use power_bills_shared::{
    BillInput, BillingListQuery, BillingListResponse, BillingRecord, DeleteResult, InsertResult,
    UpdateDocument,
};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

/// Parse a path id; anything that is not a UUID can never match a bill
pub fn parse_bill_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid bill id: {}", raw)))
}

/// Billing service
pub struct BillingService;

impl BillingService {
    /// Validate and insert a new bill
    pub async fn add(pool: &PgPool, input: BillInput) -> Result<InsertResult, ApiError> {
        let bill = input.into_new_record(Utc::now())?;

        let id = BillingRepository::insert(pool, &bill)
            .await
            .map_err(ApiError::StorageFailure)?;

        info!(bill_id = %id, "Bill added");
        Ok(InsertResult::new(id))
    }

    /// All bills plus the newest-first, optionally paginated view
    pub async fn list(
        pool: &PgPool,
        query: &BillingListQuery,
    ) -> Result<BillingListResponse, ApiError> {
        let window = query.window();
        debug!(?window, "Listing bills");

        let all_bills = BillingRepository::list_all(pool).await?;
        let bills = BillingRepository::list_recent(pool, window).await?;

        Ok(BillingListResponse { all_bills, bills })
    }

    /// Blind partial update; echoes the applied document even if nothing matched
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: BillInput,
    ) -> Result<UpdateDocument, ApiError> {
        let id = parse_bill_id(id)?;
        let patch = input.into_patch()?;

        if patch.is_empty() {
            debug!(bill_id = %id, "Update with no fields; nothing to apply");
        } else {
            let matched = BillingRepository::update(pool, id, &patch).await?;
            debug!(bill_id = %id, matched, "Bill updated");
        }

        Ok(UpdateDocument { set: patch })
    }

    /// Delete a bill; a missing id reports zero deletions
    pub async fn delete(pool: &PgPool, id: &str) -> Result<DeleteResult, ApiError> {
        let id = parse_bill_id(id)?;
        let deleted = BillingRepository::delete(pool, id).await?;

        info!(bill_id = %id, deleted, "Bill delete requested");
        Ok(DeleteResult::new(deleted))
    }

    pub async fn search_by_name(
        pool: &PgPool,
        name: Option<&str>,
    ) -> Result<Vec<BillingRecord>, ApiError> {
        let term = validate_search_term("name", name)
            .map_err(|msg| ApiError::invalid_field("name", msg))?;
        Ok(BillingRepository::search_by_name(pool, term).await?)
    }

    pub async fn search_by_email(
        pool: &PgPool,
        email: Option<&str>,
    ) -> Result<Vec<BillingRecord>, ApiError> {
        let email = validate_search_term("email", email)
            .map_err(|msg| ApiError::invalid_field("email", msg))?;
        Ok(BillingRepository::find_by_email(pool, email).await?)
    }

    pub async fn search_by_phone(
        pool: &PgPool,
        phone: Option<&str>,
    ) -> Result<Vec<BillingRecord>, ApiError> {
        let phone = validate_search_term("phone", phone)
            .map_err(|msg| ApiError::invalid_field("phone", msg))?;
        Ok(BillingRepository::find_by_phone(pool, phone).await?)
    }
}
