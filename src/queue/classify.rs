//! Role classification seam between the host and the matchmaking core
//!
//! The core never inspects game state to derive a role; whoever feeds the
//! queue supplies one. This trait models that collaborator so deployments
//! with a live talent/spec inspector can plug it in.

use crate::types::{QueueRequest, Role};

/// Yields the combat role for a queue request before a candidate is built.
#[cfg_attr(test, mockall::automock)]
pub trait RoleClassifier: Send + Sync {
    fn classify(&self, request: &QueueRequest) -> Role;
}

/// Default classifier that trusts the role declared in the request.
#[derive(Debug, Default)]
pub struct DeclaredRoleClassifier;

impl DeclaredRoleClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl RoleClassifier for DeclaredRoleClassifier {
    fn classify(&self, request: &QueueRequest) -> Role {
        request.role
    }
}
