//! Request dispatch for the static asset listener
//!
//! Entry point for asset requests: method validation, the fixed health
//! route, then path resolution and static file serving.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::resolver::{PathResolver, Resolution, ResolveError};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

const HEALTH_PATH: &str = "/api/health";

/// Per-request context threaded through the static file pipeline.
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for requests on the asset listener.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    state.logger.access(&format!("{method} {path}"));

    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    // Liveness probe: fixed JSON body, no filesystem access.
    if path == HEALTH_PATH {
        return Ok(http::build_health_response());
    }

    let ctx = RequestContext {
        path,
        is_head,
        if_none_match: header_value(&req, "if-none-match"),
        range_header: header_value(&req, "range"),
    };

    let resolver = PathResolver::new(
        state.config.server.static_dir.clone(),
        state.config.server.index_file.clone(),
    );

    let response = match resolver.resolve(ctx.path).await {
        Ok(Resolution::Asset(path)) => {
            static_files::serve_candidate(&ctx, &state, &resolver, &path).await
        }
        Ok(Resolution::Fallback(index)) => static_files::serve_index(&ctx, &state, &index).await,
        Err(ResolveError::BadRequest(msg)) => {
            state.logger.error(&format!("bad request path '{}': {msg}", ctx.path));
            http::build_bad_request_response(&msg)
        }
        Err(ResolveError::Internal(msg)) => {
            state.logger.error(&msg);
            http::build_internal_error_response(&msg)
        }
    };

    Ok(response)
}

/// Only GET and HEAD are served; OPTIONS is answered, everything else is 405.
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => Some(http::response::build_method_not_allowed_response()),
    }
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
