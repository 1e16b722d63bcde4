//! 监控演示驱动
//!
//! 对演示服务器发起一组有代表性的请求（含失败路径与并发扇出），
//! 结束后渲染监控报告。

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;

use crate::client::MonitoredClient;
use crate::config::AppConfig;
use crate::telemetry::{render_report, ConsoleObserver, StatsAggregator};

/// 拼接基础 URL 与路径
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// 创建绑定了聚合器的受监控客户端
fn build_client(config: &AppConfig) -> anyhow::Result<MonitoredClient> {
    let stats = Arc::new(StatsAggregator::new());
    if config.logging.per_request_log {
        stats.add_observer(Arc::new(ConsoleObserver));
    }
    Ok(MonitoredClient::new(&config.client, stats)?)
}

/// 运行监控演示
///
/// 依次访问基础端点、发送 POST 回显、触发 404 与连接失败，
/// 最后并发发起一批请求，停止会话并打印报告。
pub async fn run_demo(config: &AppConfig, base_url: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let stats = client.stats().clone();

    println!("🎯 开始网络监控演示: {base_url}");
    stats.start();

    // 基础端点
    for path in ["/api/health", "/api/server-info", "/api/time"] {
        if let Err(error) = client.get(&endpoint(base_url, path)).await {
            tracing::warn!("[DEMO] GET {path} 失败: {error}");
        }
    }

    // POST 回显
    let payload = serde_json::json!({
        "test": "monitoring",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    if let Err(error) = client.post(&endpoint(base_url, "/api/echo"), payload).await {
        tracing::warn!("[DEMO] POST /api/echo 失败: {error}");
    }

    // 预期中的 404
    let _ = client.get(&endpoint(base_url, "/api/not-found")).await;

    // 连接失败路径（哨兵状态 0）
    let _ = client.get("http://127.0.0.1:9999/api/health").await;

    // 并发扇出：完成顺序任意交错
    let health_url = endpoint(base_url, "/api/health");
    let fan_out = (0..5).map(|_| client.get(&health_url));
    join_all(fan_out).await;

    stats.stop();
    println!("{}", render_report(&stats));
    Ok(())
}

/// 运行并发基准
///
/// 按并发级别 1/5/10 逐级压测健康检查端点，输出每级的
/// 墙钟耗时与单请求均值，最后打印整体报告。
pub async fn run_bench(config: &AppConfig, base_url: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let stats = client.stats().clone();
    let url = endpoint(base_url, "/api/health");

    println!("🚀 并发请求基准: {url}");
    stats.start();

    for concurrency in [1usize, 5, 10] {
        let started = Instant::now();
        let batch = (0..concurrency).map(|_| client.get(&url));
        let results = join_all(batch).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let ok = results.iter().filter(|r| r.is_ok()).count();
        println!(
            "📊 并发 {concurrency}: {ok}/{concurrency} 成功, 共 {elapsed_ms}ms, 平均 {}ms/请求",
            elapsed_ms / concurrency as u64
        );
    }

    stats.stop();
    println!("{}", render_report(&stats));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        assert_eq!(
            endpoint("http://127.0.0.1:3000", "/api/health"),
            "http://127.0.0.1:3000/api/health"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:3000/", "/api/health"),
            "http://127.0.0.1:3000/api/health"
        );
    }
}
