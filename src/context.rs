/// Request-scoped session identity.
///
/// Every service call takes a `SessionContext` explicitly instead of reading
/// from ambient global state; progress notifications are addressed to
/// `user`.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: String,
}

impl SessionContext {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// Context for system-initiated work outside any interactive session.
    pub fn system() -> Self {
        Self::new("Administrator")
    }
}
