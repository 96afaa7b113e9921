use async_trait::async_trait;
use rolegate_application::{EffectivePermissions, PermissionAuthority};
use rolegate_core::{AppError, AppResult};

/// Permission authority answering every call with a fixed response.
///
/// Intended for local development without a running auth backend.
#[derive(Debug, Clone)]
pub struct StaticPermissionAuthority {
    response: Option<EffectivePermissions>,
}

impl StaticPermissionAuthority {
    /// Creates an authority that always grants `permissions`.
    #[must_use]
    pub fn granting(permissions: EffectivePermissions) -> Self {
        Self {
            response: Some(permissions),
        }
    }

    /// Creates an authority that always reports an unauthenticated session.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl PermissionAuthority for StaticPermissionAuthority {
    async fn fetch_effective_permissions(&self) -> AppResult<EffectivePermissions> {
        self.response
            .clone()
            .ok_or_else(|| AppError::Unauthorized("no static permissions configured".to_owned()))
    }
}
