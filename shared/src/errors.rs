//! Error types for the Power Bills application

use thiserror::Error;

/// Errors raised while narrowing a loose bill body into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BillError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl BillError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            BillError::MissingField(field) => field,
            BillError::InvalidField { field, .. } => field,
        }
    }
}

/// Authentication error types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_error_field() {
        assert_eq!(BillError::MissingField("name").field(), "name");
        let err = BillError::InvalidField {
            field: "amount",
            reason: "not a number".to_string(),
        };
        assert_eq!(err.field(), "amount");
        assert_eq!(err.to_string(), "Invalid value for amount: not a number");
    }
}
