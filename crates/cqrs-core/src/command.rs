//! Command trait 定义

use crate::{Request, RequestHandler};

/// Command trait（会修改状态的请求）
pub trait Command: Request {}

/// Command Handler trait
pub trait CommandHandler<C: Command>: RequestHandler<C> {}

impl<C: Command, H: RequestHandler<C>> CommandHandler<C> for H {}
