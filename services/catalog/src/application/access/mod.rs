//! 用户角色与访问权限

mod commands;
mod handlers;
mod queries;
mod service;

pub use commands::{AssignUserRolesCommand, validate_assign_user_roles};
pub use handlers::{AssignUserRolesHandler, GetUserAccessHandler};
pub use queries::GetUserAccessQuery;
pub use service::{AccessService, UserAccess};
