//! catalog - 越南多卖家市场的商品目录服务
//!
//! 角色/权限模型、授权决策、商品生命周期，以及包裹每个命令/查询的管道

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
