//! Crate-wide error type.
//!
//! Calculation code never fails; everything here comes from validation at the
//! command boundary, persistence, or configuration loading.

use thiserror::Error;

/// Unified error type for repositories, the store, and configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Amount is zero, negative, or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Month key is not of the form `YYYY-MM`
    #[error("Invalid month '{value}', expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        value: String,
    },

    /// No category was selected for an expense or category budget
    #[error("A category is required")]
    MissingCategory,

    /// Income source is not one of the known sources
    #[error("Unknown income source: {name}")]
    UnknownIncomeSource {
        /// The rejected source identifier
        name: String,
    },

    /// Update or delete targeted a record that does not exist
    #[error("{kind} {id} not found")]
    RecordNotFound {
        /// Record type, e.g. `"expense"`
        kind: &'static str,
        /// Primary key that was looked up
        id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

/// Rejects amounts that are not strictly positive finite numbers.
pub fn ensure_positive_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Rejects amounts that are negative or not finite. Zero is allowed.
pub fn ensure_non_negative_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive_amount() {
        assert!(ensure_positive_amount(10.0).is_ok());
        assert!(matches!(
            ensure_positive_amount(0.0),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(ensure_positive_amount(-5.0).is_err());
        assert!(ensure_positive_amount(f64::NAN).is_err());
        assert!(ensure_positive_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_non_negative_amount_allows_zero() {
        assert!(ensure_non_negative_amount(0.0).is_ok());
        assert!(ensure_non_negative_amount(-0.01).is_err());
        assert!(ensure_non_negative_amount(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::RecordNotFound {
            kind: "expense",
            id: 42,
        };
        assert_eq!(err.to_string(), "expense 42 not found");

        let err = Error::InvalidMonth {
            value: "2024-13".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid month '2024-13', expected YYYY-MM");
    }
}
