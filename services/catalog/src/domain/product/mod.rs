//! 商品聚合与生命周期

pub mod events;
pub mod lifecycle;
mod notifier;
mod product;
mod repository;
mod status;

pub use events::ProductEvent;
pub use lifecycle::{Transition, TransitionAuthority};
pub use notifier::{VendorNotification, VendorNotifier};
#[cfg(test)]
pub use notifier::MockVendorNotifier;
pub use product::{ApprovalDecision, NewProduct, Product, ProductContent, ProductVariant};
pub use repository::{ProductFilter, ProductRepository};
pub use status::ProductStatus;
