//! Domain services
//!
//! Logic that spans more than one table lives here; single-table CRUD
//! stays in the repositories.

pub mod cart_service;
pub mod notification;
pub mod order_service;

pub use cart_service::CartService;
pub use notification::{LowStockAlert, NotificationService};
pub use order_service::OrderWorkflow;
