//! Client identification
//!
//! Derives the per-client fingerprint a session is bound to.

use std::net::IpAddr;

use axum::http::{HeaderMap, header};

use crate::crypto::sha256;

/// Client fingerprint derived from request headers
///
/// A session issued to one fingerprint is rejected when presented with
/// another, so a stolen cookie replayed from a different browser fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFingerprint {
    /// SHA-256 of the User-Agent header (empty string when absent)
    pub hash: [u8; 32],
    /// Client IP address, informational only
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    pub fn new(user_agent: Option<&str>, ip: Option<IpAddr>) -> Self {
        Self {
            hash: sha256(user_agent.unwrap_or_default().as_bytes()),
            ip,
            user_agent: user_agent.map(str::to_string),
        }
    }

    /// Whether `other` came from the same client
    ///
    /// Only the User-Agent hash participates; IPs change too often on
    /// mobile networks to be part of the binding.
    pub fn matches(&self, other: &ClientFingerprint) -> bool {
        self.hash == other.hash
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract the client fingerprint from request headers
pub fn extract_fingerprint(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> ClientFingerprint {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    ClientFingerprint::new(user_agent, extract_client_ip(headers, direct_ip))
}

/// Extract client IP address from headers
///
/// The first X-Forwarded-For entry takes precedence over the socket address.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}
