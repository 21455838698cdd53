//! Database Models
//!
//! Document shapes for the SurrealDB collections. Persisted field names
//! are camelCase and form a contract for clients reading the
//! collections directly.

pub mod cart_entry;
pub mod category;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod stock_movement;

pub use cart_entry::{CartAdd, CartEntry};
pub use category::{Category, CategoryCreate};
pub use order::{Order, OrderItem, OrderStatus};
pub use product::{Product, ProductCreate, ProductWithStock};
pub use stock_movement::{MovementKind, MovementStatus, StockMovement};
