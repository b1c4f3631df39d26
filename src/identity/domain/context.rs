use std::sync::Arc;
use crate::core::library::{LibraryError, LibraryResult, Role};
use crate::identity::domain::PrincipalRegistry;
use crate::identity::domain::model::PrincipalEntity;

/// IdentityContext binds zero or one authenticated principal for the duration
/// of a session and answers role questions for it. Authorization is a
/// caller-side gate: callers check `require_role` or a capability predicate
/// before invoking a privileged catalog or request operation, the services
/// themselves do not re-check roles.
pub struct IdentityContext {
    registry: Arc<dyn PrincipalRegistry>,
    current: Option<PrincipalEntity>,
}

impl IdentityContext {
    pub fn new(registry: Arc<dyn PrincipalRegistry>) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> LibraryResult<()> {
        let principal = self.registry.authenticate(username, password).await?;
        self.current = Some(principal);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_principal(&self) -> Option<&PrincipalEntity> {
        self.current.as_ref()
    }

    pub fn require_role(&self, allowed: &[Role]) -> LibraryResult<&PrincipalEntity> {
        match self.current.as_ref() {
            Some(principal) if allowed.contains(&principal.role) => Ok(principal),
            Some(principal) => Err(LibraryError::forbidden(
                format!("{} is not permitted for role {}", principal.username, principal.role).as_str())),
            None => Err(LibraryError::forbidden("no principal is signed in")),
        }
    }

    pub fn can_manage_catalog(&self) -> bool {
        self.require_role(&[Role::Administrator, Role::Curator]).is_ok()
    }

    pub fn can_process_requests(&self) -> bool {
        self.require_role(&[Role::Administrator, Role::Curator]).is_ok()
    }

    pub fn can_manage_principals(&self) -> bool {
        self.require_role(&[Role::Administrator]).is_ok()
    }
}
