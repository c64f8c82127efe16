//! vnm-auth-core - 认证核心库
//!
//! Principal / Claims / JWT 核心逻辑

mod principal;
mod token;

pub use principal::*;
pub use token::*;
