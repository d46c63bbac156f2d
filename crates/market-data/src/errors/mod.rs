//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether a backfill should try the same request again.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but the provider returned no usable bars.
    #[error("No data for date range")]
    NoDataForRange,

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (non-2xx status, error payload).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned a payload that could not be interpreted.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// ```
    /// use tradeboard_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "YAHOO".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::SymbolNotFound(_) | Self::NoDataForRange | Self::ValidationFailed { .. } => {
                RetryClass::Never
            }

            Self::RateLimited { .. } | Self::Timeout { .. } => RetryClass::WithBackoff,

            // 5xx and connection resets are usually transient
            Self::ProviderError { .. } | Self::Network(_) => RetryClass::Once,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_errors_never_retry() {
        assert_eq!(
            MarketDataError::SymbolNotFound("INVALID".to_string()).retry_class(),
            RetryClass::Never
        );
        assert_eq!(MarketDataError::NoDataForRange.retry_class(), RetryClass::Never);
        assert_eq!(
            MarketDataError::ValidationFailed {
                message: "timestamps and closes differ in length".to_string(),
            }
            .retry_class(),
            RetryClass::Never
        );
    }

    #[test]
    fn test_throttling_retries_with_backoff() {
        let error = MarketDataError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);

        let error = MarketDataError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_provider_error_retries_once() {
        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "HTTP 502 Bad Gateway".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Once);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: YAHOO - HTTP 500");
    }
}
