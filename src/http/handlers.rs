use hyper::{HeaderMap, Method, header};
use std::{sync::Arc, time::Instant};

use crate::{api, prelude::*};
use super::{Context, Request, Response, log, response};


/// Maximum size of a request body we accept. GraphQL documents for this API
/// are tiny, so this is very generous.
pub(super) const MAX_BODY_SIZE: u64 = 1024 * 1024;

/// Methods allowed on the GraphQL endpoint.
pub(super) const API_METHODS: &str = "GET, HEAD, POST, OPTIONS";

/// Methods allowed on the GraphiQL page.
pub(super) const GRAPHIQL_METHODS: &str = "GET, HEAD";

/// This is the main HTTP entry point, called for each incoming request.
pub(super) async fn handle(req: Request, ctx: Arc<Context>) -> Response {
    log::req::log(&req);
    if ctx.log_http_headers {
        log::headers::log(&req);
    }

    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/');
    let is_read = method == Method::GET || method == Method::HEAD;

    match path {
        // The GraphQL endpoint, also available at the root path. This is the
        // only place where operations are executed, and only for POST. That
        // way, following a link can never modify data.
        "" | "/graphql" if method == Method::POST => handle_api(req, &ctx).await,
        "" | "/graphql" if method == Method::OPTIONS => {
            response::preflight(ctx.cors_allow_origin.as_ref())
        }

        // The interactive GraphQL API explorer/IDE. Browsers opening the API
        // endpoint directly get it, too. Query parameters are ignored.
        "" | "/graphql" | "/graphiql" if is_read => {
            juniper_hyper::graphiql("/graphql", None).await.map(Into::into)
        }
        "" | "/graphql" => response::method_not_allowed(API_METHODS),
        "/graphiql" => response::method_not_allowed(GRAPHIQL_METHODS),

        _ => {
            debug!("Responding with 404 to {:?} '{}'", method, path);
            response::not_found()
        }
    }
}

/// Handles a POST request to the GraphQL endpoint.
async fn handle_api(req: Request, ctx: &Context) -> Response {
    let before = Instant::now();

    let mut out = match check_body_size(req.headers()) {
        Err(response) => response,
        Ok(()) => {
            let api_context = Arc::new(api::Context::new(Arc::clone(&ctx.store)));
            juniper_hyper::graphql(Arc::clone(&ctx.api_root), api_context, req)
                .await
                .map(Into::into)
        }
    };

    if let Some(origin) = &ctx.cors_allow_origin {
        out.headers_mut().insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    }

    debug!(status = out.status().as_u16(), "Finished GraphQL request in {:.2?}", before.elapsed());
    out
}

/// Makes sure the request announces a body of at most `MAX_BODY_SIZE` bytes.
/// hyper never yields more body data than announced by `Content-Length`.
pub(super) fn check_body_size(headers: &HeaderMap) -> Result<(), Response> {
    let Some(value) = headers.get(header::CONTENT_LENGTH) else {
        debug!("Rejecting API request without 'Content-Length'");
        return Err(response::length_required());
    };

    let len = value.to_str().ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| response::bad_request("invalid 'Content-Length' header"))?;

    if len > MAX_BODY_SIZE {
        debug!("Request body of {len} bytes exceeds {MAX_BODY_SIZE} bytes");
        return Err(response::payload_too_large());
    }

    Ok(())
}
