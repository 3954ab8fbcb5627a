//! Data models for the Power Bills application

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A stored billing record
///
/// Serialized with the field names existing clients expect
/// (`_id`, `createdAt`) and the amount as a plain JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A validated bill ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillingRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Fields of a bill that an update may change
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
}

impl BillPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.amount.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_billing_record_wire_names() {
        let record = BillingRecord {
            id: Uuid::nil(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "0170000000".to_string(),
            amount: Decimal::from_str("10.5").unwrap(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["amount"], serde_json::json!(10.5));
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_user_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_bill_patch_skips_missing_fields() {
        let patch = BillPatch {
            amount: Some(Decimal::from(20)),
            ..Default::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "amount": 20.0 }));
        assert!(!patch.is_empty());
        assert!(BillPatch::default().is_empty());
    }
}
