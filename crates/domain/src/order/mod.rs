//! Orders and their line items.

mod item;
mod model;
mod status;

pub use item::OrderItem;
pub use model::Order;
pub use status::OrderStatus;
