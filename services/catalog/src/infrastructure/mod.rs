//! 基础设施实现

pub mod cache;
pub mod events;
pub mod notification;
pub mod persistence;
