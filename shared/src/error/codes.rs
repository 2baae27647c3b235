//! Unified error codes for the back-office service
//!
//! This module defines all error codes used across the server and its
//! clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 3xxx: Customer errors
//! - 4xxx: Sale errors (45xx: Sale-return errors)
//! - 5xxx: Payment errors
//! - 6xxx: Product / stock errors
//! - 7xxx: Attendance / schedule errors
//! - 8xxx: Employee / role errors
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

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Customer phone number already registered
    CustomerPhoneExists = 3002,
    /// Customer is inactive
    CustomerInactive = 3003,

    // ==================== 4xxx: Sale ====================
    /// Sale not found
    SaleNotFound = 4001,
    /// Sale has no line items
    SaleEmpty = 4002,
    /// Sale line item not found
    SaleItemNotFound = 4003,

    // ==================== 45xx: Sale Return ====================
    /// Sale return not found
    ReturnNotFound = 4501,
    /// Sale return has no line items
    ReturnEmpty = 4502,
    /// Return reason is required
    ReturnReasonRequired = 4503,
    /// Return customer does not match the original sale's customer
    ReturnCustomerMismatch = 4504,
    /// Returned product was not part of the original sale
    ReturnProductNotInSale = 4505,
    /// Returned quantity exceeds the quantity purchased
    ReturnQuantityExceedsPurchase = 4506,
    /// Original sale reference cannot change after creation
    ReturnSaleImmutable = 4507,
    /// Customer reference cannot change after creation
    ReturnCustomerImmutable = 4508,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5002,
    /// Invalid payment amount
    PaymentInvalidAmount = 5003,

    // ==================== 6xxx: Product / Stock ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Requested quantity exceeds available stock
    InsufficientStock = 6003,
    /// Product SKU already exists
    ProductSkuExists = 6004,
    /// Product is inactive
    ProductInactive = 6005,

    // ==================== 7xxx: Attendance / Schedule ====================
    /// Attendance record not found
    AttendanceNotFound = 7001,
    /// Employee already clocked in
    AlreadyClockedIn = 7002,
    /// Employee has not clocked in
    NotClockedIn = 7003,
    /// Schedule not found
    ScheduleNotFound = 7101,
    /// Schedule overlaps an existing one
    ScheduleOverlap = 7102,

    // ==================== 8xxx: Employee / Role ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Employee username already exists
    EmployeeUsernameExists = 8002,
    /// Cannot modify/delete system employee
    EmployeeIsSystem = 8003,
    /// Role not found
    RoleNotFound = 8101,
    /// Role name already exists
    RoleNameExists = 8102,
    /// Role is in use
    RoleInUse = 8103,
    /// Cannot modify/delete system role
    RoleIsSystem = 8104,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Audit log hash chain verification failed
    AuditChainBroken = 9101,
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

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerPhoneExists => "Customer phone number already registered",
            ErrorCode::CustomerInactive => "Customer is inactive",

            // Sale
            ErrorCode::SaleNotFound => "Sale not found",
            ErrorCode::SaleEmpty => "Sale has no line items",
            ErrorCode::SaleItemNotFound => "Sale line item not found",

            // Sale Return
            ErrorCode::ReturnNotFound => "Sale return not found",
            ErrorCode::ReturnEmpty => "Sale return has no line items",
            ErrorCode::ReturnReasonRequired => "Return reason is required",
            ErrorCode::ReturnCustomerMismatch => {
                "Return customer does not match the original sale's customer"
            }
            ErrorCode::ReturnProductNotInSale => "Product was not part of the original sale",
            ErrorCode::ReturnQuantityExceedsPurchase => {
                "Returned quantity exceeds the quantity purchased"
            }
            ErrorCode::ReturnSaleImmutable => "Original sale cannot change after creation",
            ErrorCode::ReturnCustomerImmutable => "Customer cannot change after creation",

            // Payment
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentInvalidAmount => "Invalid payment amount",

            // Product / Stock
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::InsufficientStock => "Requested quantity exceeds available stock",
            ErrorCode::ProductSkuExists => "Product SKU already exists",
            ErrorCode::ProductInactive => "Product is inactive",

            // Attendance / Schedule
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AlreadyClockedIn => "Employee already clocked in",
            ErrorCode::NotClockedIn => "Employee has not clocked in",
            ErrorCode::ScheduleNotFound => "Schedule not found",
            ErrorCode::ScheduleOverlap => "Schedule overlaps an existing one",

            // Employee / Role
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeUsernameExists => "Employee username already exists",
            ErrorCode::EmployeeIsSystem => "Cannot modify system employee",
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role name already exists",
            ErrorCode::RoleInUse => "Role is currently in use",
            ErrorCode::RoleIsSystem => "Cannot modify system role",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::AuditChainBroken => "Audit log hash chain verification failed",
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

            // Customer
            3001 => Ok(ErrorCode::CustomerNotFound),
            3002 => Ok(ErrorCode::CustomerPhoneExists),
            3003 => Ok(ErrorCode::CustomerInactive),

            // Sale
            4001 => Ok(ErrorCode::SaleNotFound),
            4002 => Ok(ErrorCode::SaleEmpty),
            4003 => Ok(ErrorCode::SaleItemNotFound),

            // Sale Return
            4501 => Ok(ErrorCode::ReturnNotFound),
            4502 => Ok(ErrorCode::ReturnEmpty),
            4503 => Ok(ErrorCode::ReturnReasonRequired),
            4504 => Ok(ErrorCode::ReturnCustomerMismatch),
            4505 => Ok(ErrorCode::ReturnProductNotInSale),
            4506 => Ok(ErrorCode::ReturnQuantityExceedsPurchase),
            4507 => Ok(ErrorCode::ReturnSaleImmutable),
            4508 => Ok(ErrorCode::ReturnCustomerImmutable),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentInvalidMethod),
            5003 => Ok(ErrorCode::PaymentInvalidAmount),

            // Product / Stock
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::InsufficientStock),
            6004 => Ok(ErrorCode::ProductSkuExists),
            6005 => Ok(ErrorCode::ProductInactive),

            // Attendance / Schedule
            7001 => Ok(ErrorCode::AttendanceNotFound),
            7002 => Ok(ErrorCode::AlreadyClockedIn),
            7003 => Ok(ErrorCode::NotClockedIn),
            7101 => Ok(ErrorCode::ScheduleNotFound),
            7102 => Ok(ErrorCode::ScheduleOverlap),

            // Employee / Role
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeUsernameExists),
            8003 => Ok(ErrorCode::EmployeeIsSystem),
            8101 => Ok(ErrorCode::RoleNotFound),
            8102 => Ok(ErrorCode::RoleNameExists),
            8103 => Ok(ErrorCode::RoleInUse),
            8104 => Ok(ErrorCode::RoleIsSystem),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::AuditChainBroken),

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
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Customer
        assert_eq!(ErrorCode::CustomerNotFound.code(), 3001);

        // Sale
        assert_eq!(ErrorCode::SaleNotFound.code(), 4001);
        assert_eq!(ErrorCode::SaleEmpty.code(), 4002);

        // Sale Return
        assert_eq!(ErrorCode::ReturnNotFound.code(), 4501);
        assert_eq!(ErrorCode::ReturnCustomerMismatch.code(), 4504);
        assert_eq!(ErrorCode::ReturnProductNotInSale.code(), 4505);
        assert_eq!(ErrorCode::ReturnQuantityExceedsPurchase.code(), 4506);

        // Payment
        assert_eq!(ErrorCode::PaymentNotFound.code(), 5001);

        // Product / Stock
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::InsufficientStock.code(), 6003);

        // Attendance
        assert_eq!(ErrorCode::AttendanceNotFound.code(), 7001);
        assert_eq!(ErrorCode::ScheduleOverlap.code(), 7102);

        // Employee / Role
        assert_eq!(ErrorCode::EmployeeNotFound.code(), 8001);
        assert_eq!(ErrorCode::RoleInUse.code(), 8103);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::AuditChainBroken.code(), 9101);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::InsufficientStock.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::SaleNotFound));
        assert_eq!(
            ErrorCode::try_from(4506),
            Ok(ErrorCode::ReturnQuantityExceedsPurchase)
        );
        assert_eq!(ErrorCode::try_from(6003), Ok(ErrorCode::InsufficientStock));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(4400), Err(InvalidErrorCode(4400)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::SaleNotFound).unwrap();
        assert_eq!(json, "4001");

        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "6003");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, ErrorCode::NotFound);

        let code: ErrorCode = serde_json::from_str("4504").unwrap();
        assert_eq!(code, ErrorCode::ReturnCustomerMismatch);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::SaleNotFound), "4001");
        assert_eq!(format!("{}", ErrorCode::InternalError), "9001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::SaleNotFound.message(), "Sale not found");
        assert_eq!(
            ErrorCode::InsufficientStock.message(),
            "Requested quantity exceeds available stock"
        );
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::CustomerNotFound,
            ErrorCode::ReturnProductNotInSale,
            ErrorCode::InsufficientStock,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }
}
