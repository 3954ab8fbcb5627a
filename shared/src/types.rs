//! API request and response types

use crate::errors::BillError;
use crate::models::{BillPatch, BillingRecord, NewBillingRecord};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Body returned by the auth gate when it rejects a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body returned when login fails for any reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFailedResponse {
    pub error: String,
}

/// Generic `{ success, result }` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub result: T,
}

impl<T> SuccessResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// Generic `{ success: false, message }` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of inserting a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertResult {
    pub fn new(inserted_id: Uuid) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Result of deleting documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request
///
/// Any other submitted keys are ignored and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub message: String,
}

// ============================================================================
// Billing Types
// ============================================================================

/// Loosely-typed bill body as submitted by clients
///
/// Every field is optional and untyped here; [`BillInput::into_new_record`]
/// and [`BillInput::into_patch`] narrow it into the fixed record shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillInput {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<Value>,
}

impl BillInput {
    /// Narrow into a new record; `now` is used when no `createdAt` was sent
    pub fn into_new_record(self, now: DateTime<Utc>) -> Result<NewBillingRecord, BillError> {
        let name = required(narrow_text("name", self.name)?, "name")?;
        let email = required(narrow_text("email", self.email)?, "email")?;
        let phone = required(narrow_text("phone", self.phone)?, "phone")?;
        let amount = narrow_amount(self.amount)?.ok_or(BillError::MissingField("amount"))?;
        let created_at = narrow_timestamp(self.created_at)?.unwrap_or(now);

        Ok(NewBillingRecord {
            name,
            email,
            phone,
            amount,
            created_at,
        })
    }

    /// Narrow into a partial update; absent fields stay `None`
    pub fn into_patch(self) -> Result<BillPatch, BillError> {
        Ok(BillPatch {
            name: narrow_text("name", self.name)?,
            email: narrow_text("email", self.email)?,
            phone: narrow_text("phone", self.phone)?,
            amount: narrow_amount(self.amount)?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, BillError> {
    value.ok_or(BillError::MissingField(field))
}

fn narrow_text(field: &'static str, value: Option<Value>) -> Result<Option<String>, BillError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(BillError::InvalidField {
                    field,
                    reason: "must not be empty".to_string(),
                })
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(BillError::InvalidField {
            field,
            reason: "must be a string".to_string(),
        }),
    }
}

fn narrow_amount(value: Option<Value>) -> Result<Option<Decimal>, BillError> {
    let invalid = |reason: &str| BillError::InvalidField {
        field: "amount",
        reason: reason.to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            let amount = if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            };
            amount.map(Some).ok_or_else(|| invalid("out of range"))
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map(Some)
                .map_err(|_| invalid("must be a number"))
        }
        Some(_) => Err(invalid("must be a number")),
    }
}

fn narrow_timestamp(value: Option<Value>) -> Result<Option<DateTime<Utc>>, BillError> {
    let invalid = || BillError::InvalidField {
        field: "createdAt",
        reason: "must be an RFC 3339 timestamp or epoch milliseconds".to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| invalid()),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

/// Body of `PUT /api/update-billing/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBillingRequest {
    #[serde(default)]
    pub data: BillInput,
}

/// The update document echoed back after an update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDocument {
    #[serde(rename = "$set")]
    pub set: BillPatch,
}

/// Query parameters for the billing list
///
/// Values are kept as raw strings and parsed leniently, so `?page=abc`
/// behaves like an absent parameter instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingListQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Offset/limit window derived from `page` and `size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: i64,
    /// `None` means no limit
    pub limit: Option<i64>,
}

impl BillingListQuery {
    /// Compute the page window, or `None` when the list is not paginated
    ///
    /// Pagination applies when either `page` or `size` is positive.
    /// A size of zero removes the limit.
    pub fn window(&self) -> Option<PageWindow> {
        let page = parse_lenient(self.page.as_deref());
        let size = parse_lenient(self.size.as_deref());

        if page == 0 && size == 0 {
            return None;
        }

        Some(PageWindow {
            offset: page.saturating_mul(size),
            limit: (size > 0).then_some(size),
        })
    }
}

/// Parse a leading integer, treating garbage and negatives as zero
fn parse_lenient(value: Option<&str>) -> i64 {
    let Some(raw) = value else { return 0 };
    let raw = raw.trim();
    let digits_end = raw
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());

    raw[..digits_end].parse::<i64>().unwrap_or(0).max(0)
}

/// Billing list response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingListResponse {
    pub all_bills: Vec<BillingRecord>,
    pub bills: Vec<BillingRecord>,
}

/// `?name=` for search-by-fullname
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// `?email=` for search-by-email
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// `?phone=` for search-by-phone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoneQuery {
    pub phone: Option<String>,
}
