//! Per-request context.

use uuid::Uuid;

/// Identity of the caller on whose behalf an inbox operation runs.
///
/// Built by the (external) web layer after authentication; every inbox
/// operation is scoped to this user.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    /// The authenticated user.
    pub user_id: Uuid,
}

impl RequestContext {
    /// Create a context for the given user.
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
