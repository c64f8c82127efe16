//! 商品命令、查询与生命周期服务

mod commands;
mod dto;
mod handlers;
mod queries;
mod service;
mod validators;

pub use commands::*;
pub use dto::*;
pub use handlers::*;
pub use queries::*;
pub use service::{ProductLifecycle, ReviewInput};
pub use validators::{BulkUpdateValidator, CreateProductValidator, validate_approval, validate_listing};
