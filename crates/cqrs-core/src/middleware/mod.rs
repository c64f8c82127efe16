//! 内置管道行为

mod caching;
mod logging;
mod validation;

pub use caching::*;
pub use logging::*;
pub use validation::*;
