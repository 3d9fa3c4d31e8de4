//! Unified error codes for the marketplace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Order errors
//! - 6xxx: Listing and file errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that clients in any
/// language can branch on them without parsing messages.
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
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Account ====================
    /// Account not found
    AccountNotFound = 3001,
    /// Email already registered
    EmailAlreadyRegistered = 3002,
    /// Password too short
    PasswordTooShort = 3003,
    /// Role cannot be self-assigned
    RoleNotSelfAssignable = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Not enough stock to fulfil the order
    InsufficientStock = 4002,
    /// Order quantity is invalid
    InvalidQuantity = 4003,
    /// Delivery address is missing
    DeliveryAddressRequired = 4004,
    /// Order can no longer be cancelled
    OrderNotCancellable = 4005,

    // ==================== 6xxx: Listing / File ====================
    /// Listing not found
    ListingNotFound = 6001,
    /// Listing price is invalid
    ListingInvalidPrice = 6002,
    /// Listing quantity is below the allowed minimum
    ListingBelowMinimumQuantity = 6003,
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// File is not a valid image
    InvalidImageFile = 6503,
    /// No file provided
    NoFileProvided = 6504,
    /// Failed to store the file
    FileStorageFailed = 6509,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Service temporarily unavailable
    ServiceUnavailable = 9003,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",

            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Required role missing",
            Self::AdminRequired => "Administrator role required",

            Self::AccountNotFound => "Account not found",
            Self::EmailAlreadyRegistered => "Email already registered",
            Self::PasswordTooShort => "Password is too short",
            Self::RoleNotSelfAssignable => "Role cannot be self-assigned",

            Self::OrderNotFound => "Order not found",
            Self::InsufficientStock => "Insufficient stock",
            Self::InvalidQuantity => "Invalid quantity",
            Self::DeliveryAddressRequired => "Delivery address is required",
            Self::OrderNotCancellable => "Order cannot be cancelled",

            Self::ListingNotFound => "Listing not found",
            Self::ListingInvalidPrice => "Invalid listing price",
            Self::ListingBelowMinimumQuantity => "Listing quantity below minimum",
            Self::FileTooLarge => "File too large",
            Self::UnsupportedFileFormat => "Unsupported file format",
            Self::InvalidImageFile => "Invalid image file",
            Self::NoFileProvided => "No file provided",
            Self::FileStorageFailed => "Failed to store file",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ServiceUnavailable => "Service temporarily unavailable",
            Self::TimeoutError => "Operation timed out",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Returned when a u16 does not map to a known [`ErrorCode`]
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
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            8 => Ok(Self::ValueOutOfRange),

            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),

            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::RoleRequired),
            2003 => Ok(Self::AdminRequired),

            3001 => Ok(Self::AccountNotFound),
            3002 => Ok(Self::EmailAlreadyRegistered),
            3003 => Ok(Self::PasswordTooShort),
            3004 => Ok(Self::RoleNotSelfAssignable),

            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::InsufficientStock),
            4003 => Ok(Self::InvalidQuantity),
            4004 => Ok(Self::DeliveryAddressRequired),
            4005 => Ok(Self::OrderNotCancellable),

            6001 => Ok(Self::ListingNotFound),
            6002 => Ok(Self::ListingInvalidPrice),
            6003 => Ok(Self::ListingBelowMinimumQuantity),
            6501 => Ok(Self::FileTooLarge),
            6502 => Ok(Self::UnsupportedFileFormat),
            6503 => Ok(Self::InvalidImageFile),
            6504 => Ok(Self::NoFileProvided),
            6509 => Ok(Self::FileStorageFailed),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::ServiceUnavailable),
            9004 => Ok(Self::TimeoutError),
            9005 => Ok(Self::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::EmailAlreadyRegistered.code(), 3002);
        assert_eq!(ErrorCode::InsufficientStock.code(), 4002);
        assert_eq!(ErrorCode::ListingNotFound.code(), 6001);
        assert_eq!(ErrorCode::ServiceUnavailable.code(), 9003);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::ValueOutOfRange,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::RoleRequired,
            ErrorCode::AdminRequired,
            ErrorCode::AccountNotFound,
            ErrorCode::EmailAlreadyRegistered,
            ErrorCode::PasswordTooShort,
            ErrorCode::RoleNotSelfAssignable,
            ErrorCode::OrderNotFound,
            ErrorCode::InsufficientStock,
            ErrorCode::InvalidQuantity,
            ErrorCode::DeliveryAddressRequired,
            ErrorCode::OrderNotCancellable,
            ErrorCode::ListingNotFound,
            ErrorCode::ListingInvalidPrice,
            ErrorCode::ListingBelowMinimumQuantity,
            ErrorCode::FileTooLarge,
            ErrorCode::UnsupportedFileFormat,
            ErrorCode::InvalidImageFile,
            ErrorCode::NoFileProvided,
            ErrorCode::FileStorageFailed,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::ServiceUnavailable,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "4002");
        let code: ErrorCode = serde_json::from_str("1002").unwrap();
        assert_eq!(code, ErrorCode::InvalidCredentials);
        assert!(serde_json::from_str::<ErrorCode>("65000").is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::InsufficientStock.message(), "Insufficient stock");
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }
}
