//! 角色与权限模型

mod catalog;
mod permission;
mod repository;
mod role;

pub use catalog::*;
pub use permission::Permission;
pub use repository::UserRoleRepository;
pub use role::Role;
