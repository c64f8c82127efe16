//! 内存仓储实现

mod product_repository;
mod user_role_repository;

pub use product_repository::InMemoryProductRepository;
pub use user_role_repository::InMemoryUserRoleRepository;
