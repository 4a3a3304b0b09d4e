//! HTTP Basic authentication for the admin routes

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine as _;

use super::AppContext;
use crate::infrastructure::config::AdminPrincipal;

pub const REALM_CHALLENGE: &str = "Basic realm=\"Login Required\"";

/// Reject the request with a 401 challenge unless it carries the admin credentials
pub async fn require_basic_auth(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Response {
    let provided = basic_credentials(request.headers());
    match provided {
        Some((id, password)) if is_admin(&ctx.admin, &id, &password) => next.run(request).await,
        provided => {
            tracing::warn!(
                "Rejected {} {} (credentials: {})",
                request.method(),
                request.uri().path(),
                if provided.is_some() { "invalid" } else { "missing" }
            );
            challenge()
        }
    }
}

/// Decode `Authorization: Basic <base64(id:password)>`
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ").or_else(|| value.strip_prefix("basic "))?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, password) = decoded.split_once(':')?;
    Some((id.to_string(), password.to_string()))
}

fn is_admin(admin: &AdminPrincipal, id: &str, password: &str) -> bool {
    admin.id == id && admin.password == password
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, REALM_CHALLENGE)],
        "Could not verify your access level for that URL.\nYou have to login with proper credentials",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_decodes_basic_credentials() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("admin:pa:ss");
        let creds = basic_credentials(&headers(&format!("Basic {}", encoded)));
        assert_eq!(creds, Some(("admin".to_string(), "pa:ss".to_string())));
    }

    #[test]
    fn test_rejects_other_schemes_and_garbage() {
        assert_eq!(basic_credentials(&HeaderMap::new()), None);
        assert_eq!(basic_credentials(&headers("Bearer abc")), None);
        assert_eq!(basic_credentials(&headers("Basic !!!")), None);

        let no_colon = base64::engine::general_purpose::STANDARD.encode("admin");
        assert_eq!(basic_credentials(&headers(&format!("Basic {}", no_colon))), None);
    }

    #[test]
    fn test_is_admin_compares_both_fields() {
        let admin = AdminPrincipal { id: "admin".to_string(), password: "pwd".to_string() };
        assert!(is_admin(&admin, "admin", "pwd"));
        assert!(!is_admin(&admin, "admin", "nope"));
        assert!(!is_admin(&admin, "root", "pwd"));
    }

    #[test]
    fn test_challenge_has_www_authenticate() {
        let response = challenge();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()),
            Some(REALM_CHALLENGE)
        );
    }
}
