use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use rolegate_application::{GuardDecision, GuardRedirect, RedirectReason};
use rolegate_core::AppError;
use tower_sessions::Session;

use crate::auth::session_credential;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_credential(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let credential = session_credential(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(credential);
    Ok(next.run(request).await)
}

/// Applies the route guard to page navigation, answering redirects with 303.
pub async fn guard_routes(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let credential = session_credential(&session).await?;
    let path = request.uri().path().to_owned();

    match state
        .route_guard_service
        .check(credential.as_ref(), path.as_str())
        .await
    {
        GuardDecision::Allow => Ok(next.run(request).await),
        GuardDecision::Redirect(redirect) => {
            let requested = request
                .uri()
                .path_and_query()
                .map_or(path.as_str(), |value| value.as_str());
            Ok(Redirect::to(redirect_location(&redirect, requested).as_str()).into_response())
        }
    }
}

/// Sign-in redirects carry the requested path so the front end can return
/// there afterwards.
fn redirect_location(redirect: &GuardRedirect, requested: &str) -> String {
    if redirect.reason != RedirectReason::SignInRequired {
        return redirect.location.clone();
    }

    let next: String = url::form_urlencoded::byte_serialize(requested.as_bytes()).collect();
    let separator = if redirect.location.contains('?') {
        '&'
    } else {
        '?'
    };
    format!("{}{separator}next={next}", redirect.location)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if headers
            .get("sec-fetch-site")
            .is_some_and(|fetch_site| fetch_site == HeaderValue::from_static("cross-site"))
        {
            return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok());
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok());

        // Non-browser clients send neither header.
        if origin.is_some() || referer.is_some() {
            let origin_is_allowed = origin == Some(state.frontend_url.as_str());
            let referer_is_allowed =
                referer.is_some_and(|value| value.starts_with(state.frontend_url.as_str()));

            if !origin_is_allowed && !referer_is_allowed {
                return Err(AppError::Forbidden("origin validation failed".to_owned()).into());
            }
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use rolegate_application::{GuardRedirect, RedirectReason};

    use super::redirect_location;

    #[test]
    fn sign_in_redirect_carries_the_requested_path() {
        let redirect = GuardRedirect {
            reason: RedirectReason::SignInRequired,
            location: "/login".to_owned(),
        };

        assert_eq!(
            redirect_location(&redirect, "/app/crm?tab=open"),
            "/login?next=%2Fapp%2Fcrm%3Ftab%3Dopen"
        );
    }

    #[test]
    fn other_redirects_use_the_location_verbatim() {
        let redirect = GuardRedirect {
            reason: RedirectReason::MissingPermission,
            location: "/app".to_owned(),
        };

        assert_eq!(redirect_location(&redirect, "/app/crm"), "/app");
    }
}
