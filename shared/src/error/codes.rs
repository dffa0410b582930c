//! Unified error codes for the marketplace
//!
//! This module defines all error codes used across market-server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Gig errors
//! - 7xxx: Review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Seller capability required
    SellerRequired = 2002,
    /// Caller does not own the gig
    NotGigOwner = 2003,
    /// Caller is neither buyer nor seller of the order
    NotOrderParty = 2004,

    // ==================== 3xxx: Account ====================
    /// User profile not found
    UserNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is not in a state that allows the transition
    OrderStateConflict = 4002,
    /// Revision allowance exhausted
    RevisionLimitReached = 4003,
    /// Buyers cannot order their own gig
    SelfOrderNotAllowed = 4004,
    /// Package tier is not offered by the gig
    InvalidPackageType = 4005,
    /// Order code collision could not be resolved
    OrderCodeExhausted = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Payment gateway is not configured
    PaymentUnavailable = 5002,
    /// Payment gateway request failed
    PaymentGatewayError = 5003,
    /// Webhook signature rejected
    WebhookSignatureInvalid = 5004,

    // ==================== 6xxx: Gig ====================
    /// Gig not found
    GigNotFound = 6001,
    /// Gig is paused or inactive
    GigNotListable = 6002,
    /// Gig price is invalid
    GigInvalidPrice = 6003,

    // ==================== 7xxx: Review ====================
    /// Review already left for this order
    ReviewAlreadyLeft = 7001,
    /// Rating outside 1..=5
    InvalidRating = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Network error
    NetworkError = 9101,
    /// Timeout
    TimeoutError = 9102,
    /// Notification dispatch failed
    NotificationFailed = 9201,

    // Storage (94xx)
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Out of memory
    OutOfMemory = 9402,
    /// Storage corrupted
    StorageCorrupted = 9403,
    /// System busy
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::SellerRequired => "Only sellers can perform this action",
            ErrorCode::NotGigOwner => "Not authorized to modify this gig",
            ErrorCode::NotOrderParty => "Not authorized to access this order",

            // Account
            ErrorCode::UserNotFound => "User not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderStateConflict => "Order is not in a valid state for this action",
            ErrorCode::RevisionLimitReached => "Maximum revisions exceeded",
            ErrorCode::SelfOrderNotAllowed => "You cannot order your own gig",
            ErrorCode::InvalidPackageType => "Invalid package type",
            ErrorCode::OrderCodeExhausted => "Could not allocate a unique order code",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentUnavailable => "Payment service is not available",
            ErrorCode::PaymentGatewayError => "Payment gateway request failed",
            ErrorCode::WebhookSignatureInvalid => "Webhook signature verification failed",

            // Gig
            ErrorCode::GigNotFound => "Gig not found",
            ErrorCode::GigNotListable => "Gig is not available",
            ErrorCode::GigInvalidPrice => "Gig price must be positive",

            // Review
            ErrorCode::ReviewAlreadyLeft => "Review already submitted for this order",
            ErrorCode::InvalidRating => "Rating must be between 1 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::NotificationFailed => "Notification dispatch failed",

            // Storage
            ErrorCode::StorageFull => "Storage full (disk space insufficient)",
            ErrorCode::OutOfMemory => "Out of memory",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
            ErrorCode::SystemBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::SellerRequired),
            2003 => Ok(ErrorCode::NotGigOwner),
            2004 => Ok(ErrorCode::NotOrderParty),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderStateConflict),
            4003 => Ok(ErrorCode::RevisionLimitReached),
            4004 => Ok(ErrorCode::SelfOrderNotAllowed),
            4005 => Ok(ErrorCode::InvalidPackageType),
            4006 => Ok(ErrorCode::OrderCodeExhausted),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentUnavailable),
            5003 => Ok(ErrorCode::PaymentGatewayError),
            5004 => Ok(ErrorCode::WebhookSignatureInvalid),

            // Gig
            6001 => Ok(ErrorCode::GigNotFound),
            6002 => Ok(ErrorCode::GigNotListable),
            6003 => Ok(ErrorCode::GigInvalidPrice),

            // Review
            7001 => Ok(ErrorCode::ReviewAlreadyLeft),
            7002 => Ok(ErrorCode::InvalidRating),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::NetworkError),
            9102 => Ok(ErrorCode::TimeoutError),
            9201 => Ok(ErrorCode::NotificationFailed),
            9401 => Ok(ErrorCode::StorageFull),
            9402 => Ok(ErrorCode::OutOfMemory),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
