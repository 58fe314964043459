use {
    axum::{
        body::Body,
        extract::State,
        http::{HeaderValue, Request, StatusCode, header},
        middleware::Next,
        response::{IntoResponse, Response},
    },
    base64::Engine,
    boxpanel_config::AuthConfig,
    secrecy::ExposeSecret,
    tracing::debug,
};

use crate::state::AppState;

/// Middleware that protects panel pages behind HTTP Basic authentication.
///
/// Requests pass through only when auth is disabled, or when the panel is
/// bound to loopback and no admin password is configured. Anywhere else a
/// missing password means every request is rejected.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.auth_required() {
        return next.run(request).await;
    }
    let auth = &state.config.auth;

    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic_auth);

    if let Some((username, password)) = credentials
        && credentials_match(auth, &username, &password)
    {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "rejecting unauthenticated request");
    unauthorized()
}

fn unauthorized() -> Response {
    let challenge = HeaderValue::from_static("Basic realm=\"boxpanel\", charset=\"UTF-8\"");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, challenge)],
        "not authenticated",
    )
        .into_response()
}

fn credentials_match(auth: &AuthConfig, username: &str, password: &str) -> bool {
    let Some(ref expected) = auth.password else {
        return false;
    };
    let expected = expected.expose_secret();
    if expected.is_empty() {
        return false;
    }
    // Both halves are always compared.
    let user_ok = constant_time_eq(username, &auth.username);
    let pass_ok = constant_time_eq(password, expected);
    user_ok & pass_ok
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Decode an `Authorization: Basic <base64(user:pass)>` header value.
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_owned(), pass.to_owned()))
}
