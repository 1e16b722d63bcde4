//! 演示 API 服务器
//!
//! 基于 axum 的小型服务器，提供客户端与监控演示所需的端点。

pub mod handlers;
pub mod middleware;

use axum::routing::{get, post};
use axum::Router;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::{AppConfig, ServerConfig};

/// 服务器共享状态
#[derive(Debug, Clone)]
pub struct AppState {
    /// 启动时刻，用于计算运行时长
    pub started: Instant,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

/// 构建路由
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/server-info", get(handlers::server_info))
        .route("/api/time", get(handlers::time))
        .route("/api/echo", post(handlers::echo))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_context))
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes)),
        )
        .with_state(state)
}

/// 启动服务器并阻塞运行，收到 Ctrl-C 后优雅关闭
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let router = build_router(AppState::default(), &config.server);
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;

    tracing::info!("[SERVER] 🚀 演示服务器启动: {}", config.server.base_url());
    tracing::info!("[SERVER] 可用端点: / /api/health /api/server-info /api/time /api/echo");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("[SERVER] 📴 服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("[SERVER] 收到中断信号，正在优雅关闭...");
    }
}
