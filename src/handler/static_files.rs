//! Static file serving
//!
//! Turns a path resolution into an HTTP response: file loading, content
//! type detection, conditional GET, and byte-range handling.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, response, RangeParseResult};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;

/// Serve a candidate path that exists on disk.
///
/// A directory candidate serves the index document inside it, falling back
/// to the SPA index when the directory has none. Read failures other than
/// not-found are internal errors.
pub async fn serve_candidate(
    ctx: &RequestContext<'_>,
    state: &AppState,
    resolver: &crate::resolver::PathResolver,
    candidate: &Path,
) -> Response<Full<Bytes>> {
    let file_path = if candidate.is_dir() {
        candidate.join(&state.config.server.index_file)
    } else {
        candidate.to_path_buf()
    };

    match fs::read(&file_path).await {
        Ok(content) => build_file_response(ctx, &content, mime::content_type_for(&file_path)),
        // The candidate vanished (or a directory without its own index);
        // SPA fallback still applies.
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            serve_index(ctx, state, &resolver.fallback_path()).await
        }
        Err(e) => {
            let msg = format!("failed to read '{}': {e}", file_path.display());
            state.logger.error(&msg);
            http::build_internal_error_response(&msg)
        }
    }
}

/// Serve the SPA index document.
///
/// The index is presumed present; a missing or unreadable index is an
/// internal error, not a 404.
pub async fn serve_index(
    ctx: &RequestContext<'_>,
    state: &AppState,
    index_path: &Path,
) -> Response<Full<Bytes>> {
    match fs::read(index_path).await {
        Ok(content) => build_file_response(ctx, &content, mime::content_type_for(index_path)),
        Err(e) => {
            let msg = format!(
                "index document '{}' unavailable: {e}",
                index_path.display()
            );
            state.logger.error(&msg);
            http::build_internal_error_response(&msg)
        }
    }
}

/// Build the response for loaded file content: 304 on a matching `ETag`,
/// 206/416 for range requests, otherwise a full 200.
fn build_file_response(
    ctx: &RequestContext<'_>,
    data: &[u8],
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return response::build_not_modified_response(&etag);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };
            response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeParseResult::NotSatisfiable => {
            response::build_range_not_satisfiable_response(total_size)
        }
        RangeParseResult::None => response::build_asset_response(
            Bytes::from(data.to_owned()),
            content_type,
            &etag,
            ctx.is_head,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LoggingConfig, PerformanceConfig, ServerConfig};
    use crate::logger::Logger;
    use crate::resolver::PathResolver;
    use http_body_util::BodyExt;

    fn state_for(dir: &Path) -> AppState {
        AppState {
            config: Config {
                server: ServerConfig {
                    static_dir: dir.to_str().unwrap().to_string(),
                    index_file: "index.html".to_string(),
                    spa_addr: "127.0.0.1:0".to_string(),
                    relay_addr: "127.0.0.1:0".to_string(),
                },
                performance: PerformanceConfig {
                    read_timeout: 15,
                    write_timeout: 15,
                },
                logging: LoggingConfig {
                    access_log: false,
                    log_file: None,
                },
            },
            logger: Logger::console(),
        }
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn candidate_file_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), b"let x = 1;").unwrap();
        let state = state_for(dir.path());
        let resolver = PathResolver::new(dir.path(), "index.html");

        let resp =
            serve_candidate(&ctx("/app.js"), &state, &resolver, &dir.path().join("app.js")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/javascript"
        );
        assert_eq!(body_bytes(resp).await, b"let x = 1;");
    }

    #[tokio::test]
    async fn directory_candidate_serves_its_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), b"<p>docs</p>").unwrap();
        std::fs::write(dir.path().join("index.html"), b"<p>root</p>").unwrap();
        let state = state_for(dir.path());
        let resolver = PathResolver::new(dir.path(), "index.html");

        let resp =
            serve_candidate(&ctx("/docs"), &state, &resolver, &dir.path().join("docs")).await;
        assert_eq!(body_bytes(resp).await, b"<p>docs</p>");
    }

    #[tokio::test]
    async fn directory_without_index_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        std::fs::write(dir.path().join("index.html"), b"<p>root</p>").unwrap();
        let state = state_for(dir.path());
        let resolver = PathResolver::new(dir.path(), "index.html");

        let resp =
            serve_candidate(&ctx("/empty"), &state, &resolver, &dir.path().join("empty")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, b"<p>root</p>");
    }

    #[tokio::test]
    async fn missing_index_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let resp = serve_index(&ctx("/whatever"), &state, &dir.path().join("index.html")).await;
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn etag_round_trip_yields_304() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"<p>x</p>").unwrap();
        let state = state_for(dir.path());

        let first = serve_index(&ctx("/"), &state, &dir.path().join("index.html")).await;
        let etag = first.headers().get("ETag").unwrap().to_str().unwrap().to_string();

        let second = serve_index(
            &RequestContext {
                path: "/",
                is_head: false,
                if_none_match: Some(etag),
                range_header: None,
            },
            &state,
            &dir.path().join("index.html"),
        )
        .await;
        assert_eq!(second.status(), 304);
    }

    #[tokio::test]
    async fn range_request_served_partially() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.txt"), b"0123456789").unwrap();
        let state = state_for(dir.path());
        let resolver = PathResolver::new(dir.path(), "index.html");

        let resp = serve_candidate(
            &RequestContext {
                path: "/data.txt",
                is_head: false,
                if_none_match: None,
                range_header: Some("bytes=2-4".to_string()),
            },
            &state,
            &resolver,
            &dir.path().join("data.txt"),
        )
        .await;
        assert_eq!(resp.status(), 206);
        assert_eq!(body_bytes(resp).await, b"234");
    }
}
