//! Database Models
//!
//! Serde models mirroring the SurrealDB tables, plus the create/update
//! payloads accepted by the API.

pub mod serde_helpers;

pub mod cart;
pub mod category;
pub mod inventory;
pub mod order;
pub mod product;
pub mod user;
pub mod vendor;

pub use cart::{Cart, CartId, CartItem, CartItemAdd};
pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use inventory::{Inventory, InventoryCreate, InventoryId, InventoryUpdate};
pub use order::{
    Order, OrderId, OrderItem, OrderItemSubmit, OrderStatus, OrderSubmit, OrderUpdate,
};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use user::{User, UserId, UserRegister, UserUpdate};
pub use vendor::{
    Comment, CommentEdit, CustomerFeedback, FeedbackCreate, Vendor, VendorCreate, VendorId,
    VendorUpdate,
};
