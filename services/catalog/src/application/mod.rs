//! 应用层：命令、查询、处理器与管道装配

pub mod access;
mod app;
mod authorization;
pub mod product;

pub use app::{CatalogApp, CatalogDeps, CatalogSettings, requirement_registry};
pub use authorization::AuthorizationBehavior;
