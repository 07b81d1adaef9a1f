//! Per-request routing context.
//!
//! # Responsibilities
//! - Extract the path info (path without leading `/`) from the request
//! - Extract domain (host without port) and sub-domain from the Host header
//! - Carry the `root` prefix and trimmed path info once an app is resolved
//!
//! # Design Decisions
//! - Host matching is case-insensitive (RFC 9110), so the domain is
//!   normalized to lowercase
//! - Path is case-sensitive and kept verbatim
//! - IP-literal hosts never have a sub-domain

use std::net::IpAddr;

use axum::http::{header, Request};
use serde::Serialize;

/// Routing fields read and mutated during app resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    original_path: String,
    path_info: String,
    root: String,
    domain: String,
    sub_domain: String,
}

impl RequestContext {
    /// Build a context from a raw path and Host value.
    ///
    /// `domain_root` is the registrable domain used to split off the
    /// sub-domain; without it the last two labels are taken as the root.
    pub fn new(path: &str, host: &str, domain_root: Option<&str>) -> Self {
        let domain = strip_port(host.trim()).to_lowercase();
        let sub_domain = sub_domain_of(&domain, domain_root);
        let path_info = path.trim_start_matches('/').to_string();

        Self {
            original_path: path_info.clone(),
            path_info,
            root: String::new(),
            domain,
            sub_domain,
        }
    }

    /// Build a context from an HTTP request.
    pub fn from_request<B>(req: &Request<B>, domain_root: Option<&str>) -> Self {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().authority().map(|a| a.as_str()))
            .unwrap_or_default();

        Self::new(req.uri().path(), host, domain_root)
    }

    /// Path info as received, before any root was stripped.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn path_info(&self) -> &str {
        &self.path_info
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn sub_domain(&self) -> &str {
        &self.sub_domain
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = root.into();
    }

    pub fn set_path_info(&mut self, path_info: impl Into<String>) {
        self.path_info = path_info.into();
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.rsplit_once(':').map(|(h, _)| h).unwrap_or(host)
}

fn sub_domain_of(domain: &str, domain_root: Option<&str>) -> String {
    if domain.is_empty() || domain.starts_with('[') || domain.parse::<IpAddr>().is_ok() {
        return String::new();
    }

    match domain_root.map(|r| r.trim_start_matches('.')).filter(|r| !r.is_empty()) {
        Some(root) => {
            let root = root.to_lowercase();
            domain
                .strip_suffix(root.as_str())
                .and_then(|prefix| prefix.strip_suffix('.'))
                .unwrap_or_default()
                .to_string()
        }
        None => {
            let labels: Vec<&str> = domain.split('.').collect();
            if labels.len() <= 2 {
                String::new()
            } else {
                labels[..labels.len() - 2].join(".")
            }
        }
    }
}
