pub mod context;
pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::identity::domain::model::PrincipalEntity;

/// PrincipalRegistry is the account store behind authentication. On first run
/// it is seeded with one default account per role so existing deployments
/// keep their expected sign-ins.
#[async_trait]
pub trait PrincipalRegistry: Sync + Send {
    async fn authenticate(&self, username: &str, password: &str) -> LibraryResult<PrincipalEntity>;

    async fn register(&self, principal: &PrincipalEntity) -> LibraryResult<PrincipalEntity>;

    async fn find_principal(&self, username: &str) -> LibraryResult<PrincipalEntity>;
}
