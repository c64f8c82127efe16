//! 领域层

pub mod access;
pub mod authorization;
pub mod product;
