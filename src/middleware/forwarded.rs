//! Reverse-proxy header handling.
//!
//! The service runs behind a TLS-terminating proxy. `X-Forwarded-For`,
//! `X-Forwarded-Proto` and `X-Forwarded-Host` are only honored when the
//! direct peer is one of `FORWARDED_KNOWN_PROXIES`, and at most
//! `FORWARDED_FORWARD_LIMIT` entries are consumed, starting from the right.
//! The resolved view of the request is stored as a [`ForwardedInfo`]
//! extension for the middleware and handlers that run after it.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Uri, header},
    middleware::Next,
    response::Response,
};
use saas_config::ForwardedHeadersConfig;
use tracing::debug;

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Scheme, host and client address of a request as seen by its original client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedInfo {
    pub scheme: String,
    pub host: Option<String>,
    pub client_ip: Option<IpAddr>,
}

impl ForwardedInfo {
    pub fn is_https(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("https")
    }
}

// Comma-separated values across every occurrence of the header, in order.
fn header_values(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn nth_from_right(values: &[String], n: usize) -> Option<&str> {
    values
        .len()
        .checked_sub(n + 1)
        .map(|index| values[index].as_str())
}

fn parse_forwarded_ip(value: &str) -> Option<IpAddr> {
    value
        .parse::<IpAddr>()
        .ok()
        .or_else(|| value.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

/// Resolve the original request view from the proxy headers.
///
/// `peer` is the address of the direct connection; without it no header is
/// trusted.
pub fn resolve_forwarded(
    headers: &HeaderMap,
    uri: &Uri,
    peer: Option<IpAddr>,
    config: &ForwardedHeadersConfig,
) -> ForwardedInfo {
    let mut info = ForwardedInfo {
        scheme: uri.scheme_str().unwrap_or("http").to_string(),
        host: headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string())),
        client_ip: peer,
    };

    let Some(mut current) = peer.filter(|_| config.enabled) else {
        return info;
    };

    let fors = header_values(headers, X_FORWARDED_FOR);
    let protos = header_values(headers, X_FORWARDED_PROTO);
    let hosts = header_values(headers, X_FORWARDED_HOST);
    let entries = fors.len().max(protos.len()).max(hosts.len());

    for step in 0..entries.min(config.forward_limit) {
        if !config.is_known_proxy(current) {
            debug!(peer = %current, "Ignoring forwarded headers from unknown proxy");
            break;
        }

        if let Some(value) = nth_from_right(&fors, step) {
            let Some(ip) = parse_forwarded_ip(value) else {
                debug!(value = %value, "Malformed X-Forwarded-For entry");
                break;
            };
            info.client_ip = Some(ip);
            current = ip;
        }
        if let Some(proto) = nth_from_right(&protos, step) {
            info.scheme = proto.to_ascii_lowercase();
        }
        if let Some(host) = nth_from_right(&hosts, step) {
            info.host = Some(host.to_string());
        }
    }

    info
}

pub async fn forwarded_headers(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let info = resolve_forwarded(
        req.headers(),
        req.uri(),
        peer,
        &state.settings.forwarded_headers,
    );
    req.extensions_mut().insert(info);

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(limit: usize) -> ForwardedHeadersConfig {
        ForwardedHeadersConfig {
            enabled: true,
            known_proxies: vec!["10.0.0.1".parse().unwrap(), "10.0.0.2".parse().unwrap()],
            forward_limit: limit,
        }
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(*name, HeaderValue::from_static(value));
        }
        headers
    }

    fn uri() -> Uri {
        Uri::from_static("/api/permissions/users/u1/tenants")
    }

    #[test]
    fn test_known_proxy_headers_are_applied() {
        let headers = headers(&[
            ("host", "internal:3000"),
            ("x-forwarded-for", "203.0.113.7"),
            ("x-forwarded-proto", "https"),
            ("x-forwarded-host", "permissions.example.com"),
        ]);

        let info = resolve_forwarded(&headers, &uri(), "10.0.0.1".parse().ok(), &config(1));

        assert!(info.is_https());
        assert_eq!(info.host.as_deref(), Some("permissions.example.com"));
        assert_eq!(info.client_ip, "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_unknown_peer_is_ignored() {
        let headers = headers(&[
            ("host", "internal:3000"),
            ("x-forwarded-for", "203.0.113.7"),
            ("x-forwarded-proto", "https"),
        ]);
        let peer = "198.51.100.9".parse().ok();

        let info = resolve_forwarded(&headers, &uri(), peer, &config(1));

        assert_eq!(info.scheme, "http");
        assert_eq!(info.host.as_deref(), Some("internal:3000"));
        assert_eq!(info.client_ip, peer);
    }

    #[test]
    fn test_missing_peer_trusts_nothing() {
        let headers = headers(&[("x-forwarded-proto", "https")]);

        let info = resolve_forwarded(&headers, &uri(), None, &config(1));

        assert!(!info.is_https());
        assert_eq!(info.client_ip, None);
    }

    #[test]
    fn test_disabled_ignores_headers() {
        let headers = headers(&[("x-forwarded-proto", "https")]);
        let mut config = config(1);
        config.enabled = false;

        let info = resolve_forwarded(&headers, &uri(), "10.0.0.1".parse().ok(), &config);
        assert!(!info.is_https());
    }

    #[test]
    fn test_forward_limit_takes_rightmost_entries() {
        let headers = headers(&[("x-forwarded-for", "203.0.113.7, 198.51.100.1, 10.0.0.2")]);
        let peer = "10.0.0.1".parse().ok();

        let one = resolve_forwarded(&headers, &uri(), peer, &config(1));
        assert_eq!(one.client_ip, "10.0.0.2".parse().ok());

        // 10.0.0.2 is a known proxy, 198.51.100.1 is not, so the walk stops there
        let three = resolve_forwarded(&headers, &uri(), peer, &config(3));
        assert_eq!(three.client_ip, "198.51.100.1".parse().ok());
    }

    #[test]
    fn test_forwarded_for_with_port() {
        let headers = headers(&[("x-forwarded-for", "203.0.113.7:51234")]);

        let info = resolve_forwarded(&headers, &uri(), "10.0.0.1".parse().ok(), &config(1));
        assert_eq!(info.client_ip, "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_malformed_entry_stops_processing() {
        let headers = headers(&[("x-forwarded-for", "not-an-ip"), ("x-forwarded-proto", "https")]);
        let peer = "10.0.0.1".parse().ok();

        let info = resolve_forwarded(&headers, &uri(), peer, &config(1));

        assert_eq!(info.client_ip, peer);
        assert!(!info.is_https());
    }
}
