//! 服务器中间件
//!
//! 为每个请求分配请求 ID、附加响应头并输出访问日志。

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

/// 请求上下文中间件
///
/// - 生成 `X-Request-Id`
/// - 附加 `X-Powered-By` 与 `X-Server-Time` 响应头
/// - 请求完成后输出一行访问日志
pub async fn request_context(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", value);
    }
    headers.insert(
        "x-powered-by",
        HeaderValue::from_static(concat!("netpulse/", env!("CARGO_PKG_VERSION"))),
    );
    if let Ok(value) = HeaderValue::from_str(&Utc::now().to_rfc3339()) {
        headers.insert("x-server-time", value);
    }

    tracing::info!(
        "[SERVER] {} {} - {} ({}ms) request_id={}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis(),
        request_id
    );

    response
}
