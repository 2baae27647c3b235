//! Database Models

// Serde helpers
pub mod serde_helpers;

// People
pub mod customer;
pub mod employee;
pub mod role;

// Catalog
pub mod product;

// Workforce
pub mod attendance;
pub mod schedule;

// Transactions
pub mod payment;
pub mod sale;
pub mod sale_return;

// Re-exports
pub use attendance::{Attendance, AttendanceId, AttendanceStatus, ClockIn, ClockOut};
pub use customer::{Customer, CustomerCreate, CustomerId, CustomerUpdate};
pub use employee::{Employee, EmployeeCreate, EmployeeId, EmployeeResponse, EmployeeUpdate};
pub use payment::{Payment, PaymentCreate, PaymentId, PaymentMethod};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate, StockAdjust};
pub use role::{Role, RoleCreate, RoleId, RoleUpdate};
pub use sale::{
    Sale, SaleBulkDelete, SaleCreate, SaleDetail, SaleId, SaleItem, SaleItemId, SaleLineInput,
    SaleUpdate,
};
pub use sale_return::{
    ReturnLineInput, SaleReturn, SaleReturnBulkDelete, SaleReturnCreate, SaleReturnDetail,
    SaleReturnId, SaleReturnItem, SaleReturnItemId, SaleReturnUpdate,
};
pub use schedule::{Schedule, ScheduleCreate, ScheduleId, ScheduleUpdate};
