use async_trait::async_trait;
use reqwest::StatusCode;
use rolegate_application::{EffectivePermissions, PermissionAuthority};
use rolegate_core::{AppError, AppResult, SessionCredential};
use tracing::debug;
use url::Url;

const PERMISSIONS_PATH: &str = "api/auth/permissions";

/// HTTP-based permission authority bound to one session credential.
///
/// Issues exactly one request per call without retries; the timeout is the
/// one configured on the supplied `reqwest::Client`.
pub struct HttpPermissionAuthority {
    http_client: reqwest::Client,
    endpoint: Url,
    credential: SessionCredential,
}

impl HttpPermissionAuthority {
    /// Creates an authority that calls `{base_url}/api/auth/permissions`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &Url,
        credential: SessionCredential,
    ) -> AppResult<Self> {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        let endpoint = base_url.join(PERMISSIONS_PATH).map_err(|error| {
            AppError::Validation(format!("invalid permission authority URL: {error}"))
        })?;

        Ok(Self {
            http_client,
            endpoint,
            credential,
        })
    }

    /// Returns the resolved permissions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PermissionAuthority for HttpPermissionAuthority {
    async fn fetch_effective_permissions(&self) -> AppResult<EffectivePermissions> {
        debug!(endpoint = %self.endpoint, "fetching effective permissions");

        let response = self
            .http_client
            .get(self.endpoint.clone())
            .bearer_auth(self.credential.expose())
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("permission authority transport error: {error}"))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized(format!(
                "permission authority rejected the session with status {status}"
            )));
        }

        if !status.is_success() {
            return Err(AppError::Unavailable(format!(
                "permission authority responded with status {status}"
            )));
        }

        response
            .json::<EffectivePermissions>()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!(
                    "permission authority returned an invalid payload: {error}"
                ))
            })
    }
}
