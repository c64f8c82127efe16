//! vnm-cqrs-core - CQRS 核心库
//!
//! Request/Command/Query trait、请求上下文、管道行为与调度

mod behavior;
mod bus;
mod command;
mod context;
mod middleware;
mod pipeline;
mod query;
mod request;

pub use behavior::*;
pub use bus::*;
pub use command::*;
pub use context::*;
pub use middleware::*;
pub use pipeline::*;
pub use query::*;
pub use request::*;
