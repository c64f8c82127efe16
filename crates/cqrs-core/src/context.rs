//! 请求上下文

use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vnm_auth_core::Principal;

/// 随请求在管道中传递的上下文
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub principal: Principal,
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            principal,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(Principal::anonymous())
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
