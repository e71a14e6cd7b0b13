use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use taskward_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        check_request_origin(request.headers(), &state.frontend_url)?;
    }

    Ok(next.run(request).await)
}

fn check_request_origin(headers: &HeaderMap, allowed_origin: &str) -> Result<(), AppError> {
    if headers
        .get("sec-fetch-site")
        .is_some_and(|fetch_site| fetch_site == HeaderValue::from_static("cross-site"))
    {
        return Err(AppError::Unauthorized("cross-site request blocked".to_owned()));
    }

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if origin != allowed_origin && !referer_matches_origin(referer, allowed_origin) {
        return Err(AppError::Unauthorized("origin validation failed".to_owned()));
    }

    Ok(())
}

/// The referer must be the origin itself or continue with a path, query, or fragment.
fn referer_matches_origin(referer: &str, allowed_origin: &str) -> bool {
    referer
        .strip_prefix(allowed_origin.trim_end_matches('/'))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, Method, header};

    use super::{check_request_origin, is_state_changing_method};

    const FRONTEND: &str = "http://localhost:3000";

    #[test]
    fn matching_origin_passes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        assert!(check_request_origin(&headers, FRONTEND).is_ok());
    }

    #[test]
    fn referer_under_frontend_passes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("http://localhost:3000/tasks"),
        );
        assert!(check_request_origin(&headers, FRONTEND).is_ok());
    }

    #[test]
    fn referer_sharing_only_a_host_prefix_is_blocked() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("http://localhost:3000.evil.example/tasks"),
        );
        assert!(check_request_origin(&headers, FRONTEND).is_err());

        let mut port_suffix = HeaderMap::new();
        port_suffix.insert(
            header::REFERER,
            HeaderValue::from_static("http://localhost:30001/"),
        );
        assert!(check_request_origin(&port_suffix, FRONTEND).is_err());
    }

    #[test]
    fn cross_site_and_foreign_origins_are_blocked() {
        let mut cross_site = HeaderMap::new();
        cross_site.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        cross_site.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));
        assert!(check_request_origin(&cross_site, FRONTEND).is_err());

        let mut foreign = HeaderMap::new();
        foreign.insert(header::ORIGIN, HeaderValue::from_static("https://evil.example"));
        assert!(check_request_origin(&foreign, FRONTEND).is_err());
        assert!(check_request_origin(&HeaderMap::new(), FRONTEND).is_err());
    }

    #[test]
    fn only_mutating_methods_are_checked() {
        assert!(is_state_changing_method(&Method::PATCH));
        assert!(!is_state_changing_method(&Method::GET));
    }
}
