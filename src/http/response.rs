use bytes::Bytes;
use http_body_util::Full;
use hyper::{StatusCode, header::{self, HeaderValue}};

use super::{Response, handlers::API_METHODS};


pub(crate) fn bad_request(msg: &str) -> Response {
    text(StatusCode::BAD_REQUEST, format!("Bad request: {msg}"))
}

pub(crate) fn not_found() -> Response {
    text(StatusCode::NOT_FOUND, "404 Not found")
}

/// `allow` is the list of methods the resource supports, as sent in the
/// `Allow` header.
pub(crate) fn method_not_allowed(allow: &'static str) -> Response {
    let mut response = text(StatusCode::METHOD_NOT_ALLOWED, "405 Method not allowed");
    response.headers_mut().insert(header::ALLOW, HeaderValue::from_static(allow));
    response
}

pub(crate) fn length_required() -> Response {
    text(StatusCode::LENGTH_REQUIRED, "411 Length required")
}

pub(crate) fn payload_too_large() -> Response {
    text(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload too large")
}

pub(crate) fn internal_server_error() -> Response {
    text(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Answer to a CORS preflight request on the GraphQL endpoint. Without an
/// allowed origin, this only lists the allowed methods.
pub(crate) fn preflight(allow_origin: Option<&HeaderValue>) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, API_METHODS);

    if let Some(origin) = allow_origin {
        builder = builder
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone())
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, API_METHODS)
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "content-type")
            .header(header::ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap()
}

fn text(status: StatusCode, body: impl Into<String>) -> Response {
    let body: String = body.into();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=UTF-8")
        .body(body.into())
        .unwrap()
}
