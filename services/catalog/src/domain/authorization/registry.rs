//! 请求 → 授权要求注册表
//!
//! 启动时显式构建；公开请求登记为空列表

use std::collections::HashMap;

use vnm_cqrs_core::Request;
use vnm_errors::{AppError, AppResult};

use super::Requirement;

#[derive(Debug, Default, Clone)]
pub struct RequirementRegistry {
    entries: HashMap<&'static str, Vec<Requirement>>,
}

impl RequirementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R: Request>(mut self, requirements: Vec<Requirement>) -> Self {
        self.entries.insert(R::NAME, requirements);
        self
    }

    /// 登记无需授权的请求
    pub fn public<R: Request>(self) -> Self {
        self.register::<R>(Vec::new())
    }

    pub fn contains<R: Request>(&self) -> bool {
        self.entries.contains_key(R::NAME)
    }

    /// 查找请求的授权要求；未登记视为编程错误
    pub fn requirements_for<R: Request>(&self) -> AppResult<&[Requirement]> {
        self.entries
            .get(R::NAME)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AppError::internal(format!("No authorization requirements registered for {}", R::NAME))
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Role;

    struct Ping;

    impl Request for Ping {
        const NAME: &'static str = "Ping";
        type Response = ();
    }

    struct Purge;

    impl Request for Purge {
        const NAME: &'static str = "Purge";
        type Response = ();
    }

    #[test]
    fn test_unregistered_request_fails_closed() {
        let registry = RequirementRegistry::new().public::<Ping>();

        assert!(registry.requirements_for::<Ping>().unwrap().is_empty());
        let err = registry.requirements_for::<Purge>().unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_register_replaces_previous_entry() {
        let registry = RequirementRegistry::new()
            .public::<Purge>()
            .register::<Purge>(vec![Requirement::any_role([Role::Admin])]);

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.requirements_for::<Purge>().unwrap(),
            [Requirement::any_role([Role::Admin])]
        );
    }
}
