//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: access logging, method checks,
//! and dispatch to the JSON API, health probe, static mounts or the public
//! site.

use crate::api;
use crate::config::{AppState, Config};
use crate::handler::static_files::{self, FileRequest};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const HEALTH_PATH: &str = "/healthz";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let started = Instant::now();
    let entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer));

    let mut resp = route_request(req, &state).await;
    apply_common_headers(&mut resp, &state.config);

    if let Some(mut entry) = entry {
        entry.status = resp.status().as_u16();
        entry.body_bytes = resp.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, state.access_log_format);
    }

    Ok(resp)
}

fn access_entry<B>(req: &Request<B>, peer: SocketAddr) -> AccessLogEntry {
    let header_str = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer.ip().to_string(),
        req.method().to_string(),
        req.uri()
            .path_and_query()
            .map_or_else(|| req.uri().path().to_string(), ToString::to_string),
    );
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header_str(header::REFERER);
    entry.user_agent = header_str(header::USER_AGENT);
    entry
}

fn apply_common_headers(resp: &mut Response<Full<Bytes>>, config: &Config) {
    if let Ok(server) = HeaderValue::from_str(&config.http.server_name) {
        resp.headers_mut().insert(header::SERVER, server);
    }
    if config.http.enable_cors {
        http::apply_cors(resp);
    }
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let path = req.uri().path();

    // 1. Preflight
    if req.method() == Method::OPTIONS {
        return http::build_options_response();
    }

    // 2. JSON API (owns its own method handling)
    if path == "/api" || path.starts_with("/api/") {
        return api::handle_api(req, state)
            .await
            .unwrap_or_else(|never| match never {});
    }

    // 3. Everything else is read-only
    let is_head = match *req.method() {
        Method::GET => false,
        Method::HEAD => true,
        ref other => {
            logger::log_warning(&format!("Method not allowed: {other} {path}"));
            return http::build_405_response();
        }
    };

    let file_req = FileRequest {
        is_head,
        range_header: req
            .headers()
            .get(header::RANGE)
            .and_then(|v| v.to_str().ok()),
    };

    // 4. Health probe
    if path == HEALTH_PATH {
        return http::build_health_response();
    }

    // 5. Landing page
    if path == "/" {
        let landing = state.public_dir.join(&state.config.storage.landing_page);
        return static_files::serve_file(&file_req, &landing).await;
    }

    // 6. Static mounts (longest prefix first); a miss falls through to public/
    for (prefix, dir) in &state.static_mounts {
        let Some(rest) = path
            .strip_prefix(prefix.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        else {
            continue;
        };
        if let Some(file) = static_files::resolve(dir, rest).await {
            return static_files::serve_file(&file_req, &file).await;
        }
        break;
    }

    // 7. Public site
    static_files::serve_from_dir(&file_req, &state.public_dir, path).await
}
