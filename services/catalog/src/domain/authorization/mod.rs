//! 授权决策

mod decision;
mod engine;
mod registry;
mod requirement;

pub use decision::{Decision, DenyReason};
pub use engine::AuthorizationEngine;
pub use registry::RequirementRegistry;
pub use requirement::{ApprovalOperation, Requirement, ResourceType};
