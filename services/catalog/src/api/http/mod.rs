//! axum HTTP 适配层

mod error;
mod extract;
mod routes;

use std::sync::Arc;

use vnm_auth_core::TokenService;

use crate::application::CatalogApp;

pub use error::{ApiError, ApiResult};
pub use extract::{Caller, REQUEST_ID_HEADER};
pub use routes::router;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<CatalogApp>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(app: Arc<CatalogApp>, tokens: TokenService) -> Self {
        Self {
            app,
            tokens: Arc::new(tokens),
        }
    }
}
