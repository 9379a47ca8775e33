//! HTTP Middleware
//!
//! 每个请求带一个 request id（沿用网关传入的 `x-request-id`，否则生成），
//! 回写到响应头，并在 4xx/5xx 时连同耗时一起记录

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 网关传入的 id 过长或含非法字符时丢弃
fn incoming_request_id(request: &Request) -> Option<HeaderValue> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= 64 && v.to_str().is_ok())
        .cloned()
}

/// request id + 错误状态码日志
///
/// 业务错误（errno != 0）在 ApiError::into_response() 中记录，命令失败由 CommandDispatcher 记录
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(|| {
        HeaderValue::from_str(&Uuid::new_v4().simple().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
    });
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let id = request_id.to_str().unwrap_or("-");

    if status.is_server_error() {
        tracing::error!(
            request_id = id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            request_id = id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    }

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}
