//! HTTPS enforcement.
//!
//! When `HTTPS_REDIRECT` is on, plain HTTP requests are answered with a
//! `307 Temporary Redirect` to the same path on `https://`, keeping the method
//! and body intact for the retry. The scheme and host come from
//! [`ForwardedInfo`], so requests that reached the proxy over TLS pass
//! through. Responses also carry `Strict-Transport-Security` (see the router).

use axum::{
    extract::{Request, State},
    http::{Uri, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::middleware::forwarded::ForwardedInfo;
use crate::state::AppState;

/// `Strict-Transport-Security` value, a `max-age` of 30 days.
pub const HSTS_MAX_AGE: &str = "max-age=2592000";

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literal, e.g. `[::1]:3000`
    if let Some(end) = host.find(']') {
        return &host[..=end];
    }
    host.split(':').next().unwrap_or(host)
}

/// Build the `https://` location for `uri` on `host`.
pub fn https_location(host: &str, https_port: Option<u16>, uri: &Uri) -> String {
    let host = strip_port(host);
    let port = match https_port {
        Some(port) if port != 443 => format!(":{port}"),
        _ => String::new(),
    };
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    format!("https://{host}{port}{path}")
}

pub async fn https_redirect(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let https = &state.settings.https;
    if !https.redirect {
        return next.run(req).await;
    }

    let forwarded = req.extensions().get::<ForwardedInfo>();
    let is_https = match forwarded {
        Some(info) => info.is_https(),
        None => req.uri().scheme_str() == Some("https"),
    };
    if is_https {
        return next.run(req).await;
    }

    let host = forwarded.and_then(|info| info.host.clone()).or_else(|| {
        req.headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    });
    let Some(host) = host else {
        warn!(path = %req.uri().path(), "Cannot redirect to HTTPS without a host");
        return next.run(req).await;
    };

    let location = https_location(&host, https.https_port, req.uri());
    debug!(location = %location, "Redirecting to HTTPS");
    Redirect::temporary(&location).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_location() {
        let uri = Uri::from_static("/api/permissions/users/u1/tenants?page=2");

        assert_eq!(
            https_location("permissions.example.com", None, &uri),
            "https://permissions.example.com/api/permissions/users/u1/tenants?page=2"
        );
        assert_eq!(
            https_location("localhost:3000", Some(8443), &uri),
            "https://localhost:8443/api/permissions/users/u1/tenants?page=2"
        );
        assert_eq!(
            https_location("example.com:80", Some(443), &Uri::from_static("/health")),
            "https://example.com/health"
        );
    }

    #[test]
    fn test_strip_port_ipv6() {
        assert_eq!(strip_port("[::1]:3000"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
        assert_eq!(strip_port("127.0.0.1:3000"), "127.0.0.1");
    }
}
