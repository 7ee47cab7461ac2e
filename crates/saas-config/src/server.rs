//! Listener, HTTPS enforcement and reverse-proxy settings.
//!
//! # Environment Variables
//!
//! - `HOST` (default `0.0.0.0`), `PORT` (default `3000`)
//! - `HTTPS_REDIRECT` (default `true` in production, `false` otherwise)
//! - `HTTPS_PORT`: port used in redirect targets, omitted when unset
//! - `FORWARDED_HEADERS_ENABLED` (default `true`)
//! - `FORWARDED_KNOWN_PROXIES` (default `127.0.0.1,::1`)
//! - `FORWARDED_FORWARD_LIMIT` (default `1`)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::environment::Environment;
use crate::error::ConfigError;
use crate::raw::RawConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            host: raw.parse_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: raw.parse_or("PORT", 3000)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Clone, Debug)]
pub struct HttpsConfig {
    pub redirect: bool,
    pub https_port: Option<u16>,
}

impl HttpsConfig {
    pub fn from_raw(raw: &RawConfig, environment: Environment) -> Result<Self, ConfigError> {
        Ok(Self {
            redirect: raw.flag("HTTPS_REDIRECT", environment.is_production())?,
            https_port: raw.parse_opt("HTTPS_PORT")?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ForwardedHeadersConfig {
    pub enabled: bool,
    /// Peers whose `X-Forwarded-*` headers are honored
    pub known_proxies: Vec<IpAddr>,
    /// Maximum number of `X-Forwarded-For` entries processed, from the right
    pub forward_limit: usize,
}

impl ForwardedHeadersConfig {
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        let known_proxies = raw
            .list("FORWARDED_KNOWN_PROXIES", "127.0.0.1,::1")
            .iter()
            .map(|ip| {
                ip.parse::<IpAddr>().map_err(|_| {
                    ConfigError::invalid(
                        "FORWARDED_KNOWN_PROXIES",
                        format!("not an IP address: {ip}"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let forward_limit = raw.parse_or("FORWARDED_FORWARD_LIMIT", 1usize)?;
        if forward_limit == 0 {
            return Err(ConfigError::invalid(
                "FORWARDED_FORWARD_LIMIT",
                "must be at least 1",
            ));
        }

        Ok(Self {
            enabled: raw.flag("FORWARDED_HEADERS_ENABLED", true)?,
            known_proxies,
            forward_limit,
        })
    }

    pub fn is_known_proxy(&self, ip: IpAddr) -> bool {
        self.known_proxies.iter().any(|p| *p == ip)
    }
}
