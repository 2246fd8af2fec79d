//! HTTP response builders
//!
//! Builders for the status codes this server produces, decoupled from the
//! handlers that choose them. Header values here are static and valid, so
//! builder failures degrade to an empty response instead of panicking.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

fn or_empty(result: Result<Response<Full<Bytes>>, hyper::http::Error>) -> Response<Full<Bytes>> {
    result.unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Liveness probe body: always `{"ok": true}`.
pub fn build_health_response() -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "ok": true }).to_string();
    or_empty(
        Response::builder()
            .status(200)
            .header("Content-Type", "application/json")
            .header("Content-Length", body.len())
            .body(Full::new(Bytes::from(body))),
    )
}

/// Plain-text 200 (relay landing page).
pub fn build_text_response(text: &'static str) -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(200)
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("Content-Length", text.len())
            .body(Full::new(Bytes::from_static(text.as_bytes()))),
    )
}

/// 400 with the error text as body.
pub fn build_bad_request_response(message: &str) -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(400)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(message.to_owned()))),
    )
}

/// 500 with the error text as body.
pub fn build_internal_error_response(message: &str) -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(500)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(message.to_owned()))),
    )
}

pub fn build_not_found_response() -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(404)
            .header("Content-Type", "text/plain")
            .body(Full::new(Bytes::from("404 Not Found"))),
    )
}

pub fn build_method_not_allowed_response() -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(405)
            .header("Content-Type", "text/plain")
            .header("Allow", "GET, HEAD, OPTIONS")
            .body(Full::new(Bytes::from("405 Method Not Allowed"))),
    )
}

/// 204 answer to an OPTIONS preflight.
pub fn build_options_response() -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(204)
            .header("Allow", "GET, HEAD, OPTIONS")
            .body(Full::new(Bytes::new())),
    )
}

/// 304 Not Modified for a matching `If-None-Match`.
pub fn build_not_modified_response(etag: &str) -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(304)
            .header("ETag", etag)
            .body(Full::new(Bytes::new())),
    )
}

/// 416 Range Not Satisfiable.
pub fn build_range_not_satisfiable_response(file_size: usize) -> Response<Full<Bytes>> {
    or_empty(
        Response::builder()
            .status(416)
            .header("Content-Type", "text/plain")
            .header("Content-Range", format!("bytes */{file_size}"))
            .body(Full::new(Bytes::from("Range Not Satisfiable"))),
    )
}

/// Full 200 response for a static asset.
pub fn build_asset_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };
    or_empty(
        Response::builder()
            .status(200)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length)
            .header("Accept-Ranges", "bytes")
            .header("ETag", etag)
            .body(Full::new(body)),
    )
}

/// 206 Partial Content for a satisfiable range request.
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    start: usize,
    end: usize,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = end - start + 1;
    let body = if is_head { Bytes::new() } else { data };
    or_empty(
        Response::builder()
            .status(206)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length)
            .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
            .header("Accept-Ranges", "bytes")
            .header("ETag", etag)
            .body(Full::new(body)),
    )
}
