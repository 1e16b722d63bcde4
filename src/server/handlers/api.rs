//! 演示 API 端点
//!
//! 供客户端与监控演示使用的一组小型 JSON 端点。

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::server::AppState;

/// API 错误响应
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// 端点索引响应
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// GET / - 端点索引
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: "netpulse",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET  /                - 端点索引",
            "GET  /api/health      - 健康检查",
            "GET  /api/server-info - 服务器信息",
            "GET  /api/time        - 当前时间",
            "POST /api/echo        - 回显测试",
        ],
    })
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
}

/// GET /api/health - 健康检查
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

/// 服务器信息响应
#[derive(Debug, Serialize)]
pub struct ServerInfoResponse {
    pub timestamp: DateTime<Utc>,
    pub server: &'static str,
    pub version: &'static str,
    pub platform: &'static str,
    pub architecture: &'static str,
    pub cpus: usize,
    pub pid: u32,
    pub uptime_secs: u64,
}

/// GET /api/server-info - 服务器信息
pub async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        timestamp: Utc::now(),
        server: "netpulse-demo",
        version: env!("CARGO_PKG_VERSION"),
        platform: std::env::consts::OS,
        architecture: std::env::consts::ARCH,
        cpus: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        pid: std::process::id(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

/// 时间响应
#[derive(Debug, Serialize)]
pub struct TimeResponse {
    pub timestamp: DateTime<Utc>,
    pub unix_ms: i64,
    pub formatted: String,
    pub utc_offset: String,
}

/// GET /api/time - 当前时间
pub async fn time() -> Json<TimeResponse> {
    let now_local = Local::now();
    Json(TimeResponse {
        timestamp: Utc::now(),
        unix_ms: now_local.timestamp_millis(),
        formatted: now_local.format("%Y-%m-%d %H:%M:%S").to_string(),
        utc_offset: now_local.format("%:z").to_string(),
    })
}

/// 回显响应
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub received_data: serde_json::Value,
    pub headers: BTreeMap<String, String>,
    pub method: String,
    pub path: String,
}

/// POST /api/echo - 回显请求内容
pub async fn echo(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Json<serde_json::Value>>,
) -> Json<EchoResponse> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    Json(EchoResponse {
        message: "Echo successful",
        timestamp: Utc::now(),
        received_data: body.map(|Json(value)| value).unwrap_or(serde_json::Value::Null),
        headers,
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}

/// 兜底 404 处理
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError {
        error: "not_found".to_string(),
        message: format!("请求的资源 {} 不存在", uri.path()),
        status_code: 404,
    }
}
