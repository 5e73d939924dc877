// handlers/mod.rs - Handler tiers
//
// public    - no authentication (/, /health)
// protected - any active member of a family (/api/me, /api/logs/*, /api/assignments/*)
// admin     - active admins only (/api/admin/*)

pub mod admin;
pub mod protected;
pub mod public;

use axum::http::{header, HeaderMap};

use crate::config::AppConfig;

/// Base URL for links sent by email. Configured `public_url` wins; otherwise
/// the request's Host header and forwarded scheme are used.
pub(crate) fn public_base_url(config: &AppConfig, headers: &HeaderMap) -> String {
    if let Some(url) = &config.server.public_url {
        return url.trim_end_matches('/').to_string();
    }

    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .unwrap_or("http");

    format!("{}://{}", scheme, host)
}
