use crate::engine::cart::VariantId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the coupon rule
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum CouponError {
    /// The coupon configuration cannot be used (missing or bad effect parameters)
    #[error("Invalid coupon configuration: {0}")]
    InvalidConfig(String),

    /// The configured variant no longer resolves in the catalog
    #[error("Variant not found: {0}")]
    VariantNotFound(VariantId),

    /// The coupon is disabled, used up or expired
    #[error("Coupon not active: {0}")]
    Inactive(String),

    /// No factory is registered for the coupon kind tag
    #[error("Unknown coupon kind: {0}")]
    UnknownKind(String),

    /// Catalog, cart or coupon store failures
    #[error("Store error: {0}")]
    Store(String),

    /// A cart event handler failed during dispatch
    #[error("Handler error in {handler}: {context}")]
    Handler {
        handler: String,
        context: String,
        #[source]
        #[serde(skip)]
        source: Option<Box<CouponError>>,
    },

    /// JSON serialization/deserialization errors
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// I/O errors (file reading, etc.)
    #[error("IO error: {0}")]
    Io(String),
}

impl CouponError {
    /// Wraps a handler failure with the name of the handler that raised it
    pub fn handler<S: Into<String>>(handler: S, source: CouponError) -> Self {
        CouponError::Handler {
            handler: handler.into(),
            context: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        CouponError::Store(message.into())
    }

    /// Convert from std::io::Error
    pub fn from_io(err: std::io::Error) -> Self {
        CouponError::Io(err.to_string())
    }

    /// Convert from serde_json::Error
    pub fn from_serde(err: serde_json::Error) -> Self {
        CouponError::Deserialization(err.to_string())
    }

    /// Whether the rule can swallow this error and carry on as a no-op.
    ///
    /// A coupon may outlive the variant it points at, so a missing variant at
    /// evaluation time only disables the coupon's effect. Everything else
    /// belongs to the host's error handling.
    pub fn recoverable(&self) -> bool {
        match self {
            CouponError::VariantNotFound(_) => true,
            CouponError::Handler { source, .. } => {
                source.as_ref().map(|e| e.recoverable()).unwrap_or(false)
            }
            CouponError::InvalidConfig(_)
            | CouponError::Inactive(_)
            | CouponError::UnknownKind(_)
            | CouponError::Store(_)
            | CouponError::Deserialization(_)
            | CouponError::Io(_) => false,
        }
    }

    /// Stable error code, included in log lines next to the message
    pub fn code(&self) -> &'static str {
        match self {
            CouponError::InvalidConfig(_) => "INVALID_CONFIG",
            CouponError::VariantNotFound(_) => "VARIANT_NOT_FOUND",
            CouponError::Inactive(_) => "COUPON_INACTIVE",
            CouponError::UnknownKind(_) => "UNKNOWN_KIND",
            CouponError::Store(_) => "STORE_ERROR",
            CouponError::Handler { .. } => "HANDLER_ERROR",
            CouponError::Deserialization(_) => "DESERIALIZATION_ERROR",
            CouponError::Io(_) => "IO_ERROR",
        }
    }
}

/// Type alias for Result with CouponError
pub type Result<T> = std::result::Result<T, CouponError>;
